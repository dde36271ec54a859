// Copyright 2024 Adobe. All rights reserved.
// This file is licensed to you under the Apache License,
// Version 2.0 (http://www.apache.org/licenses/LICENSE-2.0)
// or the MIT license (http://opensource.org/licenses/MIT),
// at your option.

// Unless required by applicable law or agreed to in writing,
// this software is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR REPRESENTATIONS OF ANY KIND, either express or
// implied. See the LICENSE-MIT and LICENSE-APACHE files for the
// specific language governing permissions and limitations under
// each license.

//! Assembly of the verification context consulted by signing and extension.

use chrono::{DateTime, Duration, Utc};
use pades_crypto::{revocation::RevocationStatus, time_stamp::TimeStampToken};
use pades_status_tracker::{log_item, validation_codes, StatusTracker};

use crate::{
    revocation::{RevocationAggregator, RevocationEvidence},
    trust::{AdjunctSet, TrustAnchorSet},
    Alert, AlertPolicy, Error, Result, SignatureLevel,
};

/// Tolerated clock difference, in seconds, between this host and the time
/// stamp authority.
const MAX_CLOCK_SKEW_SECS: i64 = 60;

/// Trust anchors, adjunct certificates, revocation evidence and the alert
/// policy for one signing or extension operation.
///
/// A context is built fresh for every operation and is not changed once
/// assembled.
#[derive(Clone, Debug)]
pub struct VerificationContext {
    anchors: TrustAnchorSet,
    adjuncts: AdjunctSet,
    evidence: RevocationEvidence,
    policy: AlertPolicy,
}

impl VerificationContext {
    /// Build a context from a classified chain.
    ///
    /// Revocation status is gathered for every certificate of the chain
    /// that is not a trust anchor, not only the leaf. A revoked
    /// certificate fails immediately with [`Error::RevokedCertificate`];
    /// missing data is handed to `policy`.
    pub fn assemble(
        trust: (TrustAnchorSet, AdjunctSet),
        revocation: &RevocationAggregator,
        policy: AlertPolicy,
        tracker: &mut StatusTracker,
    ) -> Result<Self> {
        let (anchors, adjuncts) = trust;
        let mut evidence = RevocationEvidence::default();

        for anchor in anchors.iter() {
            log_item!(
                anchor.subject.clone(),
                "self-signed certificate accepted as trust anchor",
                "VerificationContext::assemble"
            )
            .validation_status(validation_codes::CERTIFICATE_TRUST_ANCHOR)
            .success(tracker);
        }

        for cert in adjuncts.adjunct_only() {
            let Some(issuer) = adjuncts.issuer_of(cert) else {
                policy.raise(
                    Alert::MissingRevocation,
                    cert.subject.clone(),
                    "issuer is not part of the chain",
                    tracker,
                )?;
                continue;
            };

            match revocation.status_of(cert, issuer) {
                Ok(Some(record)) => {
                    if let RevocationStatus::Revoked { revoked_at } = record.status {
                        return Err(revoked(&cert.subject, revoked_at, tracker));
                    }

                    log_item!(
                        cert.subject.clone(),
                        "certificate is not revoked",
                        "VerificationContext::assemble"
                    )
                    .validation_status(validation_codes::REVOCATION_NOT_REVOKED)
                    .success(tracker);

                    evidence.insert(cert, record);
                }

                Ok(None) => policy.raise(
                    Alert::MissingRevocation,
                    cert.subject.clone(),
                    "certificate names no OCSP responder or CRL distribution point",
                    tracker,
                )?,

                Err(err) => policy.raise(
                    Alert::MissingRevocation,
                    cert.subject.clone(),
                    err.to_string(),
                    tracker,
                )?,
            }
        }

        Ok(Self {
            anchors,
            adjuncts,
            evidence,
            policy,
        })
    }

    /// A context without a chain or revocation evidence.
    ///
    /// Used when a document is extended without a signing identity.
    pub fn minimal(policy: AlertPolicy) -> Self {
        Self {
            anchors: TrustAnchorSet::default(),
            adjuncts: AdjunctSet::default(),
            evidence: RevocationEvidence::default(),
            policy,
        }
    }

    /// Returns `true` if this context carries no certificate chain.
    pub fn is_minimal(&self) -> bool {
        self.adjuncts.is_empty()
    }

    /// Trust anchors of the chain.
    pub fn anchors(&self) -> &TrustAnchorSet {
        &self.anchors
    }

    /// Every certificate of the chain.
    pub fn adjuncts(&self) -> &AdjunctSet {
        &self.adjuncts
    }

    /// Revocation records gathered during assembly.
    pub fn evidence(&self) -> &RevocationEvidence {
        &self.evidence
    }

    /// The alert policy in force.
    pub fn policy(&self) -> &AlertPolicy {
        &self.policy
    }

    /// Check that `token` covers `message`, carries a valid signature from
    /// an authority entitled to issue time stamps and was not issued in the
    /// future.
    pub fn check_time_stamp(
        &self,
        token: &TimeStampToken,
        message: &[u8],
        tracker: &mut StatusTracker,
    ) -> Result<()> {
        if let Err(err) = token.verify_message_imprint(message) {
            return self
                .policy
                .raise(Alert::InvalidTimeStamp, "time stamp", err.to_string(), tracker);
        }

        let tsa = match token.verify_signature() {
            Ok(tsa) => tsa,
            Err(err) => {
                return self.policy.raise(
                    Alert::InvalidTimeStamp,
                    "time stamp",
                    err.to_string(),
                    tracker,
                )
            }
        };

        let gen_time = token.gen_time();
        if gen_time > Utc::now() + Duration::seconds(MAX_CLOCK_SKEW_SECS) {
            return self.policy.raise(
                Alert::InvalidTimeStamp,
                "time stamp",
                format!("time stamp generated in the future ({gen_time})"),
                tracker,
            );
        }

        log_item!(
            "time stamp",
            format!("time stamp issued at {gen_time} by {}", tsa.subject),
            "VerificationContext::check_time_stamp"
        )
        .validation_status(validation_codes::TIMESTAMP_VALIDATED)
        .success(tracker);

        Ok(())
    }

    /// Check that every revocation record was produced at or after
    /// `best_signature_time`, allowing for clock skew.
    pub fn check_revocation_freshness(
        &self,
        best_signature_time: DateTime<Utc>,
        tracker: &mut StatusTracker,
    ) -> Result<()> {
        let earliest = best_signature_time - Duration::seconds(MAX_CLOCK_SKEW_SECS);

        for (cert, record) in self.evidence.iter() {
            if record.this_update < earliest {
                self.policy.raise(
                    Alert::NoRevocationAfterBestSignatureTime,
                    cert.subject.clone(),
                    format!(
                        "revocation data from {} predates best signature time {}",
                        record.this_update, best_signature_time
                    ),
                    tracker,
                )?;
            }
        }

        Ok(())
    }

    /// Check that a signature at `level` has proof of existence.
    pub fn check_proof_of_existence(
        &self,
        level: SignatureLevel,
        tracker: &mut StatusTracker,
    ) -> Result<()> {
        if level.has_time_stamp() {
            return Ok(());
        }

        self.policy.raise(
            Alert::UncoveredProofOfExistence,
            "signature",
            format!("{level} signature carries no time stamp"),
            tracker,
        )
    }
}

fn revoked(subject: &str, revoked_at: DateTime<Utc>, tracker: &mut StatusTracker) -> Error {
    let err = Error::RevokedCertificate {
        subject: subject.to_string(),
        revoked_at,
    };

    log::warn!("{subject} was revoked at {revoked_at}");

    log_item!(
        subject.to_string(),
        format!("certificate revoked at {revoked_at}"),
        "VerificationContext::assemble"
    )
    .validation_status(validation_codes::CERTIFICATE_REVOKED)
    .failure_no_throw(tracker, &err);

    err
}
