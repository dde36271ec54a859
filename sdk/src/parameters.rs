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

//! Level-specific signature parameters.

use std::fmt;

use crate::{Error, Result, SignatureLevel, SigningToken};

/// Capacity reserved for a B-B signature container.
pub const BASELINE_B_RESERVED_CAPACITY: usize = 8 * 1024;

/// Capacity reserved for a B-T signature container.
pub const BASELINE_T_RESERVED_CAPACITY: usize = 16 * 1024;

/// Capacity reserved for a B-LT signature container: one chain and one set
/// of revocation evidence.
pub const BASELINE_LT_RESERVED_CAPACITY: usize = 32 * 1024;

/// Capacity reserved for a B-LTA signature container: adds room for an
/// archive time stamp token.
pub const BASELINE_LTA_RESERVED_CAPACITY: usize = 64 * 1024;

/// Default reserved capacity for `level`.
pub fn reserved_capacity_for(level: SignatureLevel) -> usize {
    match level {
        SignatureLevel::BaselineB => BASELINE_B_RESERVED_CAPACITY,
        SignatureLevel::BaselineT => BASELINE_T_RESERVED_CAPACITY,
        SignatureLevel::BaselineLt => BASELINE_LT_RESERVED_CAPACITY,
        SignatureLevel::BaselineLta => BASELINE_LTA_RESERVED_CAPACITY,
    }
}

/// Message digest used for signatures and time stamps.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub enum DigestAlgorithm {
    /// SHA-256
    #[default]
    Sha256,
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha256 => f.write_str("SHA-256"),
        }
    }
}

/// Parameters for producing or extending a signature at one level.
///
/// Values are immutable; the `with_*` methods return a new value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SignatureParameters {
    level: SignatureLevel,
    digest_algorithm: DigestAlgorithm,
    cert_chain: Vec<Vec<u8>>,
    reserved_capacity: usize,
}

impl SignatureParameters {
    /// Parameters for signing at `level` with the key held by `token`.
    ///
    /// Fails with [`Error::NoSigningKey`] if the token has no certificate
    /// chain.
    pub fn for_identity(level: SignatureLevel, token: &SigningToken) -> Result<Self> {
        let cert_chain = token.cert_chain()?;
        if cert_chain.is_empty() {
            return Err(Error::NoSigningKey);
        }

        Ok(Self {
            level,
            digest_algorithm: DigestAlgorithm::Sha256,
            cert_chain,
            reserved_capacity: reserved_capacity_for(level),
        })
    }

    /// Parameters for extending an existing signature to `level`.
    pub fn for_extension(level: SignatureLevel) -> Self {
        Self {
            level,
            digest_algorithm: DigestAlgorithm::Sha256,
            cert_chain: Vec::new(),
            reserved_capacity: reserved_capacity_for(level),
        }
    }

    /// Returns a copy with a different reserved capacity.
    pub fn with_reserved_capacity(self, reserved_capacity: usize) -> Self {
        Self {
            reserved_capacity,
            ..self
        }
    }

    /// Target level.
    pub fn level(&self) -> SignatureLevel {
        self.level
    }

    /// Digest algorithm. Always SHA-256.
    pub fn digest_algorithm(&self) -> DigestAlgorithm {
        self.digest_algorithm
    }

    /// Signing certificate chain, leaf first. Empty for extension.
    pub fn cert_chain(&self) -> &[Vec<u8>] {
        &self.cert_chain
    }

    /// Bytes reserved for the signature container.
    pub fn reserved_capacity(&self) -> usize {
        self.reserved_capacity
    }

    /// Fail with [`Error::ContainerOverflow`] if `needed` bytes do not fit.
    pub fn ensure_capacity(&self, needed: usize) -> Result<()> {
        if needed > self.reserved_capacity {
            return Err(Error::ContainerOverflow {
                needed,
                reserved: self.reserved_capacity,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pades_crypto::{
        ephemeral::{generate_chain, ChainOptions},
        raw_signature::Ed25519Signer,
    };

    use super::*;

    fn token(chain: Vec<Vec<u8>>) -> SigningToken {
        let ephemeral = generate_chain(&ChainOptions::default()).unwrap();
        SigningToken::new(
            Box::new(Ed25519Signer::from_signing_key(ephemeral.leaf_key, chain)),
            "test",
        )
    }

    #[test]
    fn capacities() {
        assert_eq!(reserved_capacity_for(SignatureLevel::BaselineB), 8192);
        assert_eq!(reserved_capacity_for(SignatureLevel::BaselineT), 16384);
        assert_eq!(reserved_capacity_for(SignatureLevel::BaselineLt), 32768);
        assert_eq!(reserved_capacity_for(SignatureLevel::BaselineLta), 65536);
    }

    #[test]
    fn for_identity() {
        let chain = generate_chain(&ChainOptions::default()).unwrap().chain();
        let params =
            SignatureParameters::for_identity(SignatureLevel::BaselineLt, &token(chain.clone()))
                .unwrap();

        assert_eq!(params.level(), SignatureLevel::BaselineLt);
        assert_eq!(params.digest_algorithm(), DigestAlgorithm::Sha256);
        assert_eq!(params.cert_chain(), chain.as_slice());
        assert_eq!(params.reserved_capacity(), 32768);
    }

    #[test]
    fn empty_chain_is_no_signing_key() {
        assert!(matches!(
            SignatureParameters::for_identity(SignatureLevel::BaselineLta, &token(vec![])),
            Err(Error::NoSigningKey)
        ));
    }

    #[test]
    fn with_reserved_capacity_returns_new_value() {
        let params = SignatureParameters::for_extension(SignatureLevel::BaselineLta);
        let bigger = params.clone().with_reserved_capacity(128 * 1024);

        assert_eq!(params.reserved_capacity(), 65536);
        assert_eq!(bigger.reserved_capacity(), 128 * 1024);
        assert!(bigger.cert_chain().is_empty());
    }

    #[test]
    fn ensure_capacity() {
        let params = SignatureParameters::for_extension(SignatureLevel::BaselineLt);

        assert!(params.ensure_capacity(32768).is_ok());
        assert!(matches!(
            params.ensure_capacity(32769),
            Err(Error::ContainerOverflow {
                needed: 32769,
                reserved: 32768
            })
        ));
    }
}
