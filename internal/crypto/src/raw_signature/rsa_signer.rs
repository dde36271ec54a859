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

use rsa::{
    pkcs1::DecodeRsaPrivateKey,
    pkcs1v15::SigningKey,
    pkcs8::DecodePrivateKey,
    sha2::Sha256,
    signature::{SignatureEncoding, Signer},
    RsaPrivateKey,
};

use crate::raw_signature::{RawSigner, RawSignerError, SigningAlg};

/// Implements [`RawSigner`] trait using `rsa` crate's implementation of
/// RSASSA-PKCS1-v1_5 with SHA-256.
pub struct RsaSigner {
    cert_chain: Vec<Vec<u8>>,
    signing_key: SigningKey<Sha256>,
}

impl RsaSigner {
    /// Create a signer from an unencrypted PKCS#8 private key.
    pub fn from_pkcs8_der(
        private_key: &[u8],
        cert_chain: Vec<Vec<u8>>,
    ) -> Result<Self, RawSignerError> {
        let private_key = RsaPrivateKey::from_pkcs8_der(private_key)
            .map_err(|e| RawSignerError::InvalidSigningCredentials(e.to_string()))?;

        Ok(Self::from_private_key(private_key, cert_chain))
    }

    /// Create a signer from a PKCS#1 `RSAPrivateKey`.
    pub fn from_pkcs1_der(
        private_key: &[u8],
        cert_chain: Vec<Vec<u8>>,
    ) -> Result<Self, RawSignerError> {
        let private_key = RsaPrivateKey::from_pkcs1_der(private_key)
            .map_err(|e| RawSignerError::InvalidSigningCredentials(e.to_string()))?;

        Ok(Self::from_private_key(private_key, cert_chain))
    }

    fn from_private_key(private_key: RsaPrivateKey, cert_chain: Vec<Vec<u8>>) -> Self {
        RsaSigner {
            cert_chain,
            signing_key: SigningKey::<Sha256>::new(private_key),
        }
    }
}

impl RawSigner for RsaSigner {
    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, RawSignerError> {
        let signature = self
            .signing_key
            .try_sign(data)
            .map_err(|e| RawSignerError::InternalError(format!("signature error: {e}")))?;

        Ok(signature.to_vec())
    }

    fn alg(&self) -> SigningAlg {
        SigningAlg::Rs256
    }

    fn cert_chain(&self) -> Result<Vec<Vec<u8>>, RawSignerError> {
        Ok(self.cert_chain.clone())
    }
}
