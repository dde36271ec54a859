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

use chrono::{DateTime, Utc};
use pades_crypto::{
    certificate::CertificateError, crl::CrlError, ocsp::OcspError,
    raw_signature::RawSignerError, time_stamp::TimeStampError,
};
use thiserror::Error;

use crate::{container::PdfContainerError, SignatureLevel};

/// `Error` enumerates errors returned by signing and extension operations.
///
/// Every failure of the core is one of these named conditions. Transport
/// errors from the OCSP, CRL and time stamp clients are folded into
/// [`Error::RevocationUnavailable`] and [`Error::InvalidTimestamp`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The certificate chain is empty or contains a certificate that could
    /// not be parsed.
    #[error("invalid certificate chain: {0}")]
    InvalidChain(String),

    /// The signing identity holds no usable private key entry.
    #[error("no signing key available")]
    NoSigningKey,

    /// The private key could not be opened or used.
    #[error("unable to access signing key: {0}")]
    KeyAccess(String),

    /// Revocation data could not be obtained.
    ///
    /// Whether this stops an operation is decided by the
    /// [`AlertPolicy`](crate::AlertPolicy).
    #[error("revocation data unavailable: {0}")]
    RevocationUnavailable(String),

    /// A certificate in the chain has been revoked. Always fatal.
    #[error("certificate revoked: {subject} (at {revoked_at})")]
    RevokedCertificate {
        /// Subject of the revoked certificate.
        subject: String,

        /// Time of revocation.
        revoked_at: DateTime<Utc>,
    },

    /// The time stamp authority failed or returned an unusable token.
    #[error("invalid time stamp: {0}")]
    InvalidTimestamp(String),

    /// The signature material does not fit in the space reserved for it.
    #[error("signature container overflow: {needed} bytes needed, {reserved} reserved")]
    ContainerOverflow {
        /// Bytes required by the signature material.
        needed: usize,

        /// Bytes reserved by the signature parameters.
        reserved: usize,
    },

    /// The document could not be extended.
    #[error("unable to extend signature: {0}")]
    ExtensionFailed(String),

    /// The document could not be loaded as a PDF.
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// A required input was empty or absent.
    #[error("missing input: {0}")]
    MissingInput(&'static str),

    /// The operation would have lowered the document's signature level.
    #[error("signature level would regress from {from} to {to}")]
    LevelRegression {
        /// Level before the operation.
        from: SignatureLevel,

        /// Level the operation produced.
        to: SignatureLevel,
    },

    /// The configuration could not be loaded or is invalid.
    #[error("invalid settings: {0}")]
    Settings(String),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A specialized `Result` type for signing and extension operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<CertificateError> for Error {
    fn from(err: CertificateError) -> Self {
        Self::InvalidChain(err.to_string())
    }
}

impl From<OcspError> for Error {
    fn from(err: OcspError) -> Self {
        Self::RevocationUnavailable(err.to_string())
    }
}

impl From<CrlError> for Error {
    fn from(err: CrlError) -> Self {
        Self::RevocationUnavailable(err.to_string())
    }
}

impl From<TimeStampError> for Error {
    fn from(err: TimeStampError) -> Self {
        Self::InvalidTimestamp(err.to_string())
    }
}

impl From<RawSignerError> for Error {
    fn from(err: RawSignerError) -> Self {
        Self::KeyAccess(err.to_string())
    }
}

impl From<PdfContainerError> for Error {
    fn from(err: PdfContainerError) -> Self {
        match err {
            PdfContainerError::CapacityExceeded { needed, reserved } => {
                Self::ContainerOverflow { needed, reserved }
            }
            PdfContainerError::NoSignature => {
                Self::ExtensionFailed("document carries no recognizable signature".to_string())
            }
            PdfContainerError::Io(err) => Self::Io(err),
            PdfContainerError::Malformed(msg) | PdfContainerError::Other(msg) => {
                Self::InvalidDocument(msg)
            }
        }
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::Settings(err.to_string())
    }
}
