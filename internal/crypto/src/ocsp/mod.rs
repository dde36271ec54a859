// Copyright 2022 Adobe. All rights reserved.
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

//! Tools for working with OCSP responses.

use chrono::{DateTime, Utc};
use rasn::prelude::*;
use rasn_ocsp::{BasicOcspResponse, CertStatus, OcspResponseStatus, ResponderId};
use rasn_pkix::Certificate;
use thiserror::Error;

use crate::{
    certificate::{CertificateInfo, KeyPurpose},
    raw_signature::validator_for_sig_and_hash_algs,
    revocation::RevocationStatus,
};

mod fetch;
pub use fetch::fetch_ocsp_response;

/// Status of one certificate extracted from an OCSP response.
#[derive(Clone, Debug)]
pub struct OcspResponse {
    /// Original OCSP DER response.
    pub ocsp_der: Vec<u8>,

    /// Reported status of the certificate.
    pub status: RevocationStatus,

    /// Time at which the status was known to be correct.
    pub this_update: DateTime<Utc>,

    /// Time when OCSP response should be re-checked, if the responder
    /// provided one.
    pub next_update: Option<DateTime<Utc>>,
}

impl OcspResponse {
    /// Extract the status of `cert` from a DER-encoded OCSP response.
    ///
    /// The response must be successful, signed by `issuer` or by a
    /// responder certificate `issuer` delegated OCSP signing to, and carry
    /// a single response whose `CertID` matches `cert` as issued by
    /// `issuer`.
    pub fn from_der(
        der: &[u8],
        cert: &CertificateInfo,
        issuer: &CertificateInfo,
    ) -> Result<Self, OcspError> {
        let ocsp_response = rasn::der::decode::<rasn_ocsp::OcspResponse>(der)
            .map_err(|e| OcspError::InvalidResponse(e.to_string()))?;

        if ocsp_response.status != OcspResponseStatus::Successful {
            return Err(OcspError::ResponderStatus(format!(
                "{:?}",
                ocsp_response.status
            )));
        }

        let Some(response_bytes) = ocsp_response.bytes else {
            return Err(OcspError::InvalidResponse("no response bytes".to_string()));
        };

        let basic_response = rasn::der::decode::<BasicOcspResponse>(&response_bytes.response)
            .map_err(|e| OcspError::InvalidResponse(e.to_string()))?;

        verify_responder_signature(&basic_response, issuer)?;

        let cert_id = cert_id(&cert.der, &issuer.der)?;

        let single_response = basic_response
            .tbs_response_data
            .responses
            .iter()
            .find(|r| r.cert_id == cert_id)
            .ok_or(OcspError::NoMatchingResponse)?;

        let status = match &single_response.cert_status {
            CertStatus::Good => RevocationStatus::Good,
            CertStatus::Revoked(revoked_info) => RevocationStatus::Revoked {
                revoked_at: revoked_info.revocation_time.with_timezone(&Utc),
            },
            _ => return Err(OcspError::CertificateStatusUnknown),
        };

        Ok(Self {
            ocsp_der: der.to_vec(),
            status,
            this_update: single_response.this_update.with_timezone(&Utc),
            next_update: single_response
                .next_update
                .as_ref()
                .map(|nu| nu.with_timezone(&Utc)),
        })
    }
}

/// Build the `CertID` identifying `cert_der` to an OCSP responder.
///
/// Uses SHA-1 hashes of the issuer's name and key, which is what deployed
/// responders expect.
pub fn cert_id(cert_der: &[u8], issuer_der: &[u8]) -> Result<rasn_ocsp::CertId, OcspError> {
    let subject: Certificate =
        rasn::der::decode(cert_der).map_err(|_e| OcspError::InvalidCertificate)?;
    let issuer: Certificate =
        rasn::der::decode(issuer_der).map_err(|_e| OcspError::InvalidCertificate)?;

    let issuer_name_raw = rasn::der::encode(&issuer.tbs_certificate.subject)
        .map_err(|_e| OcspError::InvalidCertificate)?;

    let issuer_key_raw = issuer
        .tbs_certificate
        .subject_public_key_info
        .subject_public_key
        .as_raw_slice();

    let sha1_oid = rasn::types::ObjectIdentifier::new(vec![1, 3, 14, 3, 2, 26])
        .ok_or(OcspError::InvalidCertificate)?;

    let sha1_ai = rasn_pkix::AlgorithmIdentifier {
        algorithm: sha1_oid,
        // Many OCSP responders expect this to be NULL not None.
        parameters: Some(Any::new(
            rasn::der::encode(&()).map_err(|_e| OcspError::InvalidCertificate)?,
        )),
    };

    Ok(rasn_ocsp::CertId {
        hash_algorithm: sha1_ai,
        issuer_name_hash: OctetString::from(crate::hash::sha1(&issuer_name_raw)),
        issuer_key_hash: OctetString::from(crate::hash::sha1(issuer_key_raw)),
        serial_number: subject.tbs_certificate.serial_number,
    })
}

// The issuer itself may sign; so may any certificate in the response that
// the issuer issued with the OCSP signing key purpose. The signer must be the
// one the responder ID names.
fn verify_responder_signature(
    basic: &BasicOcspResponse,
    issuer: &CertificateInfo,
) -> Result<(), OcspError> {
    let issuer_cert: Certificate =
        rasn::der::decode(&issuer.der).map_err(|_e| OcspError::InvalidCertificate)?;

    let mut candidates = vec![issuer_cert];
    for cert in basic.certs.iter().flatten() {
        let der = rasn::der::encode(cert).map_err(|_e| OcspError::InvalidCertificate)?;
        let Ok(info) = CertificateInfo::from_der(&der) else {
            continue;
        };

        if info.is_issued_by(issuer) && info.has_key_purpose(KeyPurpose::OcspSigning) {
            candidates.push(cert.clone());
        }
    }

    let validator = validator_for_sig_and_hash_algs(&basic.signature_algorithm.algorithm, None)
        .ok_or_else(|| {
            OcspError::InvalidSignature(format!(
                "unsupported signature algorithm {}",
                basic.signature_algorithm.algorithm
            ))
        })?;

    let tbs = rasn::der::encode(&basic.tbs_response_data)
        .map_err(|e| OcspError::InvalidResponse(e.to_string()))?;

    for candidate in candidates.iter().filter(|c| names_responder(c, basic)) {
        let public_key =
            rasn::der::encode(&candidate.tbs_certificate.subject_public_key_info)
                .map_err(|_e| OcspError::InvalidCertificate)?;

        if validator
            .validate(basic.signature.as_raw_slice(), &tbs, &public_key)
            .is_ok()
        {
            return Ok(());
        }
    }

    Err(OcspError::InvalidSignature(
        "no authorized responder signed the response".to_string(),
    ))
}

fn names_responder(cert: &Certificate, basic: &BasicOcspResponse) -> bool {
    match &basic.tbs_response_data.responder_id {
        ResponderId::ByName(name) => *name == cert.tbs_certificate.subject,
        ResponderId::ByKey(key_hash) => {
            let key = cert
                .tbs_certificate
                .subject_public_key_info
                .subject_public_key
                .as_raw_slice();
            key_hash.as_ref() == crate::hash::sha1(key).as_slice()
        }
    }
}

/// Describes errors that can occur when fetching or interpreting OCSP
/// responses.
#[derive(Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum OcspError {
    /// The certificate or its issuer could not be parsed.
    #[error("invalid certificate")]
    InvalidCertificate,

    /// The response could not be decoded.
    #[error("invalid OCSP response ({0})")]
    InvalidResponse(String),

    /// The responder answered with a non-successful status.
    #[error("OCSP responder returned {0}")]
    ResponderStatus(String),

    /// The response was not signed by the issuer or a responder it
    /// authorized.
    #[error("OCSP response signature is invalid ({0})")]
    InvalidSignature(String),

    /// The response does not mention the certificate.
    #[error("OCSP response does not cover the certificate")]
    NoMatchingResponse,

    /// The responder does not know the certificate.
    #[error("certificate status unknown")]
    CertificateStatusUnknown,

    /// The responder answered with an HTTP error.
    #[error("OCSP responder returned HTTP status {0}")]
    HttpErrorResponse(u16),

    /// No response was received.
    #[error("unable to reach OCSP responder ({0})")]
    HttpConnectionError(String),
}

impl From<ureq::Error> for OcspError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(code, _) => Self::HttpErrorResponse(code),
            ureq::Error::Transport(transport) => Self::HttpConnectionError(transport.to_string()),
        }
    }
}
