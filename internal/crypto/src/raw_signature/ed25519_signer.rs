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

use ed25519_dalek::{pkcs8::DecodePrivateKey, SigningKey};

use crate::raw_signature::{RawSigner, RawSignerError, SigningAlg};

/// Implements `RawSigner` trait using `ed25519_dalek` crate's implementation of
/// Edwards Curve encryption.
pub struct Ed25519Signer {
    cert_chain: Vec<Vec<u8>>,
    signing_key: SigningKey,
}

impl Ed25519Signer {
    /// Create a signer from an unencrypted PKCS#8 private key.
    pub fn from_pkcs8_der(
        private_key: &[u8],
        cert_chain: Vec<Vec<u8>>,
    ) -> Result<Self, RawSignerError> {
        let signing_key = SigningKey::from_pkcs8_der(private_key).map_err(|e| {
            RawSignerError::InvalidSigningCredentials(format!("invalid private key: {e}"))
        })?;

        Ok(Self::from_signing_key(signing_key, cert_chain))
    }

    /// Create a signer from an in-memory key.
    pub fn from_signing_key(signing_key: SigningKey, cert_chain: Vec<Vec<u8>>) -> Self {
        Ed25519Signer {
            cert_chain,
            signing_key,
        }
    }
}

impl RawSigner for Ed25519Signer {
    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, RawSignerError> {
        use ed25519_dalek::Signer;

        Ok(self
            .signing_key
            .try_sign(data)
            .map_err(|e| RawSignerError::InternalError(format!("signature error: {e}")))?
            .to_vec())
    }

    fn alg(&self) -> SigningAlg {
        SigningAlg::Ed25519
    }

    fn cert_chain(&self) -> Result<Vec<Vec<u8>>, RawSignerError> {
        Ok(self.cert_chain.clone())
    }
}
