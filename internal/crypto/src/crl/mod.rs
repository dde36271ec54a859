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

//! Tools for working with certificate revocation lists.

use chrono::{DateTime, Utc};
use thiserror::Error;
use x509_parser::{
    parse_x509_crl,
    prelude::{FromDer, X509Certificate},
};

use crate::{certificate::CertificateInfo, internal::time, revocation::RevocationStatus};

mod fetch;
pub use fetch::fetch_crl;

/// Revoked entry of a CRL.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RevokedEntry {
    /// Raw big-endian serial number of the revoked certificate.
    pub serial: Vec<u8>,

    /// Time of revocation.
    pub revoked_at: DateTime<Utc>,
}

/// Owned summary of a parsed CRL.
#[derive(Clone, Debug)]
pub struct CrlInfo {
    /// Original DER encoding of the list.
    pub crl_der: Vec<u8>,

    /// Issue date of this list.
    pub this_update: DateTime<Utc>,

    /// Date by which the next list will be issued, if stated.
    pub next_update: Option<DateTime<Utc>>,

    /// Entries on the list.
    pub revoked: Vec<RevokedEntry>,
}

impl CrlInfo {
    /// Parse a DER-encoded CRL.
    ///
    /// If `issuer` is given the list's signature must verify against the
    /// issuer's key and the list's issuer name must match its subject.
    pub fn from_der(der: &[u8], issuer: Option<&CertificateInfo>) -> Result<Self, CrlError> {
        let (_rem, crl) =
            parse_x509_crl(der).map_err(|e| CrlError::InvalidCrl(e.to_string()))?;

        if let Some(issuer) = issuer {
            let (_rem, issuer_cert) = X509Certificate::from_der(&issuer.der)
                .map_err(|e| CrlError::InvalidCrl(e.to_string()))?;

            if crl.issuer() != issuer_cert.subject() {
                return Err(CrlError::IssuerMismatch);
            }

            crl.verify_signature(issuer_cert.public_key())
                .map_err(|_e| CrlError::InvalidSignature)?;
        }

        let revoked = crl
            .iter_revoked_certificates()
            .map(|entry| RevokedEntry {
                serial: entry.raw_serial().to_vec(),
                revoked_at: time::from_unix(entry.revocation_date.timestamp()),
            })
            .collect();

        Ok(Self {
            crl_der: der.to_vec(),
            this_update: time::from_unix(crl.last_update().timestamp()),
            next_update: crl.next_update().map(|t| time::from_unix(t.timestamp())),
            revoked,
        })
    }

    /// Status of the certificate with the given raw serial number.
    pub fn status_of(&self, serial: &[u8]) -> RevocationStatus {
        let serial = strip_leading_zeros(serial);

        self.revoked
            .iter()
            .find(|entry| strip_leading_zeros(&entry.serial) == serial)
            .map_or(RevocationStatus::Good, |entry| RevocationStatus::Revoked {
                revoked_at: entry.revoked_at,
            })
    }
}

// DER integers may carry a leading zero byte to stay positive.
fn strip_leading_zeros(serial: &[u8]) -> &[u8] {
    let first = serial
        .iter()
        .position(|b| *b != 0)
        .unwrap_or(serial.len());
    &serial[first..]
}

/// Describes errors that can occur when fetching or interpreting CRLs.
#[derive(Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum CrlError {
    /// The list could not be parsed.
    #[error("invalid CRL ({0})")]
    InvalidCrl(String),

    /// The list was not issued by the expected certificate.
    #[error("CRL issuer does not match")]
    IssuerMismatch,

    /// The list's signature did not verify.
    #[error("CRL signature is invalid")]
    InvalidSignature,

    /// The distribution point answered with an HTTP error.
    #[error("CRL distribution point returned HTTP status {0}")]
    HttpErrorResponse(u16),

    /// No response was received.
    #[error("unable to reach CRL distribution point ({0})")]
    HttpConnectionError(String),
}

impl From<ureq::Error> for CrlError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(code, _) => Self::HttpErrorResponse(code),
            ureq::Error::Transport(transport) => Self::HttpConnectionError(transport.to_string()),
        }
    }
}
