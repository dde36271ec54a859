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

use ed25519_dalek::{Signature, VerifyingKey};
use rasn::types::ObjectIdentifier;
use rsa::{
    pkcs1v15,
    pkcs8::DecodePublicKey,
    sha2::{Sha256, Sha384, Sha512},
    signature::Verifier,
    RsaPublicKey,
};
use thiserror::Error;

use crate::raw_signature::SigningAlg;

/// A `RawSignatureValidator` implementation checks a signature produced by
/// a specific signature algorithm against a public key.
///
/// `public_key` is always a DER `SubjectPublicKeyInfo`.
pub trait RawSignatureValidator {
    /// Return `Ok(())` if `sig` is a valid signature over `data` for
    /// `public_key`.
    fn validate(
        &self,
        sig: &[u8],
        data: &[u8],
        public_key: &[u8],
    ) -> Result<(), RawSignatureValidationError>;
}

/// Return the built-in validator for `alg`.
pub fn validator_for_signing_alg(alg: SigningAlg) -> Box<dyn RawSignatureValidator> {
    match alg {
        SigningAlg::Rs256 => Box::new(RsaValidator::Sha256),
        SigningAlg::Ed25519 => Box::new(Ed25519Validator),
    }
}

/// Return a built-in validator for a signature and digest algorithm pair
/// as named in CMS and OCSP structures.
///
/// RSA accepts both `rsaEncryption` (digest named separately) and the
/// combined `sha*WithRSAEncryption` identifiers.
pub(crate) fn validator_for_sig_and_hash_algs(
    sig_alg: &ObjectIdentifier,
    hash_alg: Option<&ObjectIdentifier>,
) -> Option<Box<dyn RawSignatureValidator>> {
    let sig_alg: &[u32] = sig_alg.as_ref();
    let hash_alg: Option<&[u32]> = hash_alg.map(|h| h.as_ref());

    if sig_alg == ED25519_OID {
        return Some(Box::new(Ed25519Validator));
    }

    let rsa = if sig_alg == SHA256_WITH_RSA_OID {
        RsaValidator::Sha256
    } else if sig_alg == SHA384_WITH_RSA_OID {
        RsaValidator::Sha384
    } else if sig_alg == SHA512_WITH_RSA_OID {
        RsaValidator::Sha512
    } else if sig_alg == RSA_OID {
        match hash_alg? {
            h if h == SHA256_OID => RsaValidator::Sha256,
            h if h == SHA384_OID => RsaValidator::Sha384,
            h if h == SHA512_OID => RsaValidator::Sha512,
            _ => return None,
        }
    } else {
        return None;
    };

    Some(Box::new(rsa))
}

/// Describes errors that can be identified when validating a raw signature.
#[derive(Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum RawSignatureValidationError {
    /// The signature does not match the provided data or public key.
    #[error("the signature does not match the provided data or public key")]
    SignatureMismatch,

    /// The signature bytes are malformed for the algorithm.
    #[error("invalid signature value")]
    InvalidSignature,

    /// An invalid public key was provided.
    #[error("invalid public key")]
    InvalidPublicKey,
}

struct Ed25519Validator;

impl RawSignatureValidator for Ed25519Validator {
    fn validate(
        &self,
        sig: &[u8],
        data: &[u8],
        public_key: &[u8],
    ) -> Result<(), RawSignatureValidationError> {
        let key = VerifyingKey::from_public_key_der(public_key)
            .map_err(|_| RawSignatureValidationError::InvalidPublicKey)?;
        let sig =
            Signature::from_slice(sig).map_err(|_| RawSignatureValidationError::InvalidSignature)?;

        key.verify_strict(data, &sig)
            .map_err(|_| RawSignatureValidationError::SignatureMismatch)
    }
}

enum RsaValidator {
    Sha256,
    Sha384,
    Sha512,
}

impl RawSignatureValidator for RsaValidator {
    fn validate(
        &self,
        sig: &[u8],
        data: &[u8],
        public_key: &[u8],
    ) -> Result<(), RawSignatureValidationError> {
        let key = RsaPublicKey::from_public_key_der(public_key)
            .map_err(|_| RawSignatureValidationError::InvalidPublicKey)?;
        let sig = pkcs1v15::Signature::try_from(sig)
            .map_err(|_| RawSignatureValidationError::InvalidSignature)?;

        let result = match self {
            Self::Sha256 => pkcs1v15::VerifyingKey::<Sha256>::new(key).verify(data, &sig),
            Self::Sha384 => pkcs1v15::VerifyingKey::<Sha384>::new(key).verify(data, &sig),
            Self::Sha512 => pkcs1v15::VerifyingKey::<Sha512>::new(key).verify(data, &sig),
        };

        result.map_err(|_| RawSignatureValidationError::SignatureMismatch)
    }
}

const ED25519_OID: &[u32] = &[1, 3, 101, 112];
const RSA_OID: &[u32] = &[1, 2, 840, 113549, 1, 1, 1];
const SHA256_WITH_RSA_OID: &[u32] = &[1, 2, 840, 113549, 1, 1, 11];
const SHA384_WITH_RSA_OID: &[u32] = &[1, 2, 840, 113549, 1, 1, 12];
const SHA512_WITH_RSA_OID: &[u32] = &[1, 2, 840, 113549, 1, 1, 13];
const SHA256_OID: &[u32] = &[2, 16, 840, 1, 101, 3, 4, 2, 1];
const SHA384_OID: &[u32] = &[2, 16, 840, 1, 101, 3, 4, 2, 2];
const SHA512_OID: &[u32] = &[2, 16, 840, 1, 101, 3, 4, 2, 3];
