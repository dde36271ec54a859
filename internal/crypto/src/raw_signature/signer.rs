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

use pkcs8::{ObjectIdentifier, PrivateKeyInfo};
use thiserror::Error;

use crate::raw_signature::{Ed25519Signer, RsaSigner, SigningAlg};

/// Implementations of the `RawSigner` trait generate a cryptographic signature
/// over an arbitrary byte array.
///
/// The data is hashed with SHA-256 (where the algorithm hashes at all)
/// before signing.
pub trait RawSigner: Send + Sync {
    /// Return a raw signature over the original byte slice.
    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, RawSignerError>;

    /// Return the algorithm implemented by this signer.
    fn alg(&self) -> SigningAlg;

    /// Return the signing certificate chain, leaf first.
    fn cert_chain(&self) -> Result<Vec<Vec<u8>>, RawSignerError>;
}

/// Describes errors that can be identified when generating a raw signature.
#[derive(Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum RawSignerError {
    /// The private key could not be read or is of an unsupported type.
    #[error("invalid signing credentials ({0})")]
    InvalidSigningCredentials(String),

    /// An I/O error occurred. This typically happens when loading
    /// public/private key material from files.
    #[error("I/O error ({0})")]
    IoError(String),

    /// An unexpected internal error occured while generating the raw
    /// signature.
    #[error("internal error ({0})")]
    InternalError(String),
}

impl From<std::io::Error> for RawSignerError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}

const ED25519_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.101.112");
const RSA_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");

/// Return a built-in signer for an unencrypted private key.
///
/// `label` is the PEM label the key was found under. `PRIVATE KEY` (PKCS#8)
/// may hold an Ed25519 or RSA key; `RSA PRIVATE KEY` (PKCS#1) holds an RSA
/// key.
pub fn signer_from_key_der(
    label: &str,
    key_der: &[u8],
    cert_chain: Vec<Vec<u8>>,
) -> Result<Box<dyn RawSigner>, RawSignerError> {
    match label {
        "RSA PRIVATE KEY" => Ok(Box::new(RsaSigner::from_pkcs1_der(key_der, cert_chain)?)),

        "PRIVATE KEY" => {
            let info = PrivateKeyInfo::try_from(key_der)
                .map_err(|e| RawSignerError::InvalidSigningCredentials(e.to_string()))?;

            if info.algorithm.oid == ED25519_OID {
                Ok(Box::new(Ed25519Signer::from_pkcs8_der(key_der, cert_chain)?))
            } else if info.algorithm.oid == RSA_OID {
                Ok(Box::new(RsaSigner::from_pkcs8_der(key_der, cert_chain)?))
            } else {
                Err(RawSignerError::InvalidSigningCredentials(format!(
                    "unsupported key algorithm {}",
                    info.algorithm.oid
                )))
            }
        }

        _ => Err(RawSignerError::InvalidSigningCredentials(format!(
            "unsupported key label {label}"
        ))),
    }
}
