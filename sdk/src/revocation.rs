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

//! Revocation sources and the aggregator that consults them.
//!
//! Nothing is cached. Each source is asked at most once per certificate
//! per operation and a failure is never retried.

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use pades_crypto::{
    certificate::CertificateInfo,
    crl::{fetch_crl, CrlInfo},
    ocsp::{fetch_ocsp_response, OcspResponse},
    revocation::RevocationStatus,
};

use crate::{Error, Result};

/// Connect and read timeout for the online sources.
pub const DEFAULT_REVOCATION_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Where a [`RevocationRecord`] came from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RevocationSourceKind {
    /// An OCSP responder.
    Ocsp,

    /// A certificate revocation list.
    Crl,
}

/// Revocation status of one certificate together with the raw evidence.
#[derive(Clone, Debug)]
pub struct RevocationRecord {
    /// Kind of source that produced the record.
    pub source: RevocationSourceKind,

    /// Reported status.
    pub status: RevocationStatus,

    /// Time at which the status was known to be correct.
    pub this_update: DateTime<Utc>,

    /// Time by which newer information will be available, if stated.
    pub next_update: Option<DateTime<Utc>>,

    /// DER-encoded OCSP response or CRL.
    pub der: Vec<u8>,
}

/// A `RevocationSource` reports the revocation status of a certificate.
pub trait RevocationSource: Send + Sync {
    /// Short name used in log messages.
    fn name(&self) -> &'static str;

    /// Look up the status of `cert`, which was issued by `issuer`.
    ///
    /// Returns `Ok(None)` if this source has nothing to say about the
    /// certificate (for instance, it names no responder).
    fn check(
        &self,
        cert: &CertificateInfo,
        issuer: &CertificateInfo,
    ) -> Result<Option<RevocationRecord>>;
}

/// OCSP responders named in the authority information access extension.
#[derive(Clone, Debug)]
pub struct OnlineOcspSource {
    timeout: Duration,
}

impl OnlineOcspSource {
    /// Create a source with the given connect and read timeout.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for OnlineOcspSource {
    fn default() -> Self {
        Self::new(DEFAULT_REVOCATION_TIMEOUT)
    }
}

impl RevocationSource for OnlineOcspSource {
    fn name(&self) -> &'static str {
        "OCSP"
    }

    fn check(
        &self,
        cert: &CertificateInfo,
        issuer: &CertificateInfo,
    ) -> Result<Option<RevocationRecord>> {
        let Some(der) = fetch_ocsp_response(cert, issuer, self.timeout)? else {
            return Ok(None);
        };

        let response = OcspResponse::from_der(&der, cert, issuer)?;

        Ok(Some(RevocationRecord {
            source: RevocationSourceKind::Ocsp,
            status: response.status,
            this_update: response.this_update,
            next_update: response.next_update,
            der: response.ocsp_der,
        }))
    }
}

/// CRLs published at the certificate's distribution points.
#[derive(Clone, Debug)]
pub struct OnlineCrlSource {
    timeout: Duration,
}

impl OnlineCrlSource {
    /// Create a source with the given connect and read timeout.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for OnlineCrlSource {
    fn default() -> Self {
        Self::new(DEFAULT_REVOCATION_TIMEOUT)
    }
}

impl RevocationSource for OnlineCrlSource {
    fn name(&self) -> &'static str {
        "CRL"
    }

    fn check(
        &self,
        cert: &CertificateInfo,
        issuer: &CertificateInfo,
    ) -> Result<Option<RevocationRecord>> {
        let Some(der) = fetch_crl(cert, self.timeout)? else {
            return Ok(None);
        };

        let crl = CrlInfo::from_der(&der, Some(issuer))?;

        Ok(Some(RevocationRecord {
            source: RevocationSourceKind::Crl,
            status: crl.status_of(&cert.serial),
            this_update: crl.this_update,
            next_update: crl.next_update,
            der: crl.crl_der,
        }))
    }
}

/// Consults revocation sources in order until one has an answer.
#[derive(Clone)]
pub struct RevocationAggregator {
    sources: Vec<Arc<dyn RevocationSource>>,
}

impl RevocationAggregator {
    /// Aggregate the given sources, consulted in order.
    pub fn new(sources: Vec<Arc<dyn RevocationSource>>) -> Self {
        Self { sources }
    }

    /// OCSP first, then CRL, both with `timeout`.
    pub fn online(timeout: Duration) -> Self {
        Self::new(vec![
            Arc::new(OnlineOcspSource::new(timeout)),
            Arc::new(OnlineCrlSource::new(timeout)),
        ])
    }

    /// Ask each source once, in order, for the status of `cert`.
    ///
    /// Returns the first record any source produces. If no source produced
    /// one, returns the last failure as
    /// [`Error::RevocationUnavailable`], or `Ok(None)` if every source
    /// simply had nothing to say.
    pub fn status_of(
        &self,
        cert: &CertificateInfo,
        issuer: &CertificateInfo,
    ) -> Result<Option<RevocationRecord>> {
        let mut last_err = None;

        for source in &self.sources {
            match source.check(cert, issuer) {
                Ok(Some(record)) => {
                    log::debug!(
                        "{} status for {}: {:?}",
                        source.name(),
                        cert.subject,
                        record.status
                    );
                    return Ok(Some(record));
                }
                Ok(None) => {
                    log::debug!("{} has no data for {}", source.name(), cert.subject);
                }
                Err(err) => {
                    log::debug!(
                        "{} lookup for {} failed: {err}",
                        source.name(),
                        cert.subject
                    );
                    last_err = Some(err);
                }
            }
        }

        match last_err {
            Some(Error::RevocationUnavailable(msg)) => Err(Error::RevocationUnavailable(msg)),
            Some(err) => Err(Error::RevocationUnavailable(err.to_string())),
            None => Ok(None),
        }
    }
}

impl std::fmt::Debug for RevocationAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.sources.iter().map(|s| s.name()))
            .finish()
    }
}

/// Revocation records gathered during one operation, keyed by certificate.
#[derive(Clone, Debug, Default)]
pub struct RevocationEvidence {
    entries: Vec<(CertificateInfo, RevocationRecord)>,
}

impl RevocationEvidence {
    pub(crate) fn insert(&mut self, cert: &CertificateInfo, record: RevocationRecord) {
        let fingerprint = cert.fingerprint();
        self.entries.retain(|(c, _)| c.fingerprint() != fingerprint);
        self.entries.push((cert.clone(), record));
    }

    /// Record for `cert`, matched by SHA-256 of its DER.
    pub fn get(&self, cert: &CertificateInfo) -> Option<&RevocationRecord> {
        let fingerprint = cert.fingerprint();
        self.entries
            .iter()
            .find(|(c, _)| c.fingerprint() == fingerprint)
            .map(|(_, r)| r)
    }

    /// Iterate over certificates and their records in the order gathered.
    pub fn iter(&self) -> impl Iterator<Item = (&CertificateInfo, &RevocationRecord)> {
        self.entries.iter().map(|(c, r)| (c, r))
    }

    /// DER-encoded OCSP responses.
    pub fn ocsp_responses(&self) -> Vec<Vec<u8>> {
        self.raw(RevocationSourceKind::Ocsp)
    }

    /// DER-encoded CRLs.
    pub fn crls(&self) -> Vec<Vec<u8>> {
        self.raw(RevocationSourceKind::Crl)
    }

    fn raw(&self, kind: RevocationSourceKind) -> Vec<Vec<u8>> {
        self.entries
            .iter()
            .filter(|(_, r)| r.source == kind)
            .map(|(_, r)| r.der.clone())
            .collect()
    }

    /// Number of certificates with a record.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no records were gathered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
