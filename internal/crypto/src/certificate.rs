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

//! Certificate inspection helpers.
//!
//! Parsing is done with `x509-parser`; nothing here builds certificates.

use chrono::{DateTime, Utc};
use thiserror::Error;
use x509_parser::{
    der_parser::{oid, Oid},
    extensions::{DistributionPointName, GeneralName, ParsedExtension},
    pem::Pem,
    prelude::*,
};

use crate::{hash::sha256, internal::time};

/// Summary of a parsed X.509 certificate.
///
/// Holds only owned data so it can outlive the DER buffer it was parsed
/// from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CertificateInfo {
    /// DER encoding of the certificate.
    pub der: Vec<u8>,

    /// Subject distinguished name in RFC 4514 form.
    pub subject: String,

    /// Issuer distinguished name in RFC 4514 form.
    pub issuer: String,

    /// Raw big-endian serial number.
    pub serial: Vec<u8>,

    /// Start of the validity period.
    pub not_before: DateTime<Utc>,

    /// End of the validity period.
    pub not_after: DateTime<Utc>,

    /// `true` if issuer equals subject and the signature verifies against
    /// the certificate's own public key.
    pub self_signed: bool,

    /// OCSP responder URLs from the authority information access extension.
    pub ocsp_responders: Vec<String>,

    /// CRL distribution point URLs.
    pub crl_distribution_points: Vec<String>,
}

impl CertificateInfo {
    /// Parse a DER-encoded certificate.
    pub fn from_der(der: &[u8]) -> Result<Self, CertificateError> {
        let (_rem, cert) = X509Certificate::from_der(der)
            .map_err(|e| CertificateError::InvalidCertificate(e.to_string()))?;

        Ok(Self {
            der: der.to_vec(),
            subject: cert.subject().to_string(),
            issuer: cert.issuer().to_string(),
            serial: cert.raw_serial().to_vec(),
            not_before: time::from_unix(cert.validity().not_before.timestamp()),
            not_after: time::from_unix(cert.validity().not_after.timestamp()),
            self_signed: is_self_signed(&cert),
            ocsp_responders: extract_aia_responders(&cert),
            crl_distribution_points: extract_crl_distribution_points(&cert),
        })
    }

    /// SHA-256 over the DER encoding. Used as a stable identity for the
    /// certificate.
    pub fn fingerprint(&self) -> Vec<u8> {
        sha256(&self.der)
    }

    /// Returns `true` if `issuer` carries the subject name this certificate
    /// names as its issuer and the signature verifies against its key.
    pub fn is_issued_by(&self, issuer: &CertificateInfo) -> bool {
        if self.issuer != issuer.subject {
            return false;
        }

        let Ok((_, cert)) = X509Certificate::from_der(&self.der) else {
            return false;
        };
        let Ok((_, issuer_cert)) = X509Certificate::from_der(&issuer.der) else {
            return false;
        };

        cert.verify_signature(Some(issuer_cert.public_key())).is_ok()
    }

    /// Returns `true` if `time` falls within the validity period.
    pub fn is_valid_at(&self, time: DateTime<Utc>) -> bool {
        self.not_before <= time && time <= self.not_after
    }

    /// Returns `true` if the extended key usage extension lists `purpose`.
    ///
    /// A certificate without the extension grants no purpose.
    pub fn has_key_purpose(&self, purpose: KeyPurpose) -> bool {
        let Ok((_, cert)) = X509Certificate::from_der(&self.der) else {
            return false;
        };
        let Ok(Some(eku)) = cert.extended_key_usage() else {
            return false;
        };

        match purpose {
            KeyPurpose::TimeStamping => eku.value.time_stamping,
            KeyPurpose::OcspSigning => eku.value.ocsp_signing,
        }
    }
}

/// Extended key usages checked on authorities that sign validation data.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum KeyPurpose {
    /// `id-kp-timeStamping`, required of a time stamp authority.
    TimeStamping,

    /// `id-kp-OCSPSigning`, required of a delegated OCSP responder.
    OcspSigning,
}

/// Returns `true` if the certificate is self-signed.
///
/// Both conditions must hold: the issuer name equals the subject name, and
/// the signature verifies against the certificate's own public key.
pub fn is_self_signed(cert: &X509Certificate) -> bool {
    cert.issuer() == cert.subject() && cert.verify_signature(None).is_ok()
}

/// Returns the DER of every `CERTIFICATE` block in a PEM buffer, in order.
///
/// Blocks with other labels (private keys, for instance) are skipped.
pub fn certs_from_pem(pem: &[u8]) -> Result<Vec<Vec<u8>>, CertificateError> {
    let mut certs = Vec::new();

    for pem_result in Pem::iter_from_buffer(pem) {
        let pem = pem_result.map_err(|e| CertificateError::InvalidPem(e.to_string()))?;
        if pem.label == "CERTIFICATE" {
            certs.push(pem.contents);
        }
    }

    Ok(certs)
}

/// Find the certificate in `candidates` that issued `cert`.
///
/// A self-signed certificate is its own issuer.
pub fn find_issuer<'a>(
    cert: &CertificateInfo,
    candidates: &'a [CertificateInfo],
) -> Option<&'a CertificateInfo> {
    if cert.self_signed {
        return candidates.iter().find(|c| c.der == cert.der);
    }

    candidates
        .iter()
        .filter(|c| c.der != cert.der)
        .find(|c| cert.is_issued_by(c))
}

/// Describes errors that can occur when inspecting certificates.
#[derive(Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum CertificateError {
    /// The certificate could not be parsed.
    #[error("invalid certificate: {0}")]
    InvalidCertificate(String),

    /// The PEM bundle could not be parsed.
    #[error("invalid PEM data: {0}")]
    InvalidPem(String),
}

fn extract_aia_responders(cert: &X509Certificate) -> Vec<String> {
    let mut output = Vec::new();

    for ext in cert.extensions() {
        let ParsedExtension::AuthorityInfoAccess(aia) = ext.parsed_extension() else {
            continue;
        };

        for ad in &aia.accessdescs {
            if let GeneralName::URI(uri) = ad.access_location {
                if ad.access_method == AD_OCSP_OID {
                    output.push(uri.to_string());
                }
            }
        }
    }

    output
}

fn extract_crl_distribution_points(cert: &X509Certificate) -> Vec<String> {
    let mut output = Vec::new();

    for ext in cert.extensions() {
        let ParsedExtension::CRLDistributionPoints(points) = ext.parsed_extension() else {
            continue;
        };

        for point in points.iter() {
            if let Some(DistributionPointName::FullName(names)) = &point.distribution_point {
                for name in names {
                    if let GeneralName::URI(uri) = name {
                        output.push(uri.to_string());
                    }
                }
            }
        }
    }

    output
}

const AD_OCSP_OID: Oid<'static> = oid!(1.3.6 .1 .5 .5 .7 .48 .1);
