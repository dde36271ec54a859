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

//! Signing identities: where the private key and certificate chain come
//! from.

use std::path::{Path, PathBuf};

use pades_crypto::{
    certificate::certs_from_pem,
    raw_signature::{signer_from_key_der, RawSigner, SigningAlg},
};
use pkcs8::EncryptedPrivateKeyInfo;
use x509_parser::pem::Pem;

use crate::{settings::KeystoreSettings, Error, Result};

const ENCRYPTED_KEY_LABEL: &str = "ENCRYPTED PRIVATE KEY";
const KEY_LABELS: [&str; 2] = ["PRIVATE KEY", "RSA PRIVATE KEY"];

/// A `SigningIdentity` yields a [`SigningToken`]: a usable private key and
/// the certificate chain that goes with it.
///
/// Acquiring a token performs no network I/O.
pub trait SigningIdentity: Send + Sync {
    /// Open the key and load the chain.
    fn acquire(&self) -> Result<SigningToken>;
}

/// A private key handle and its certificate chain, scoped to one operation.
///
/// The key is released when the token is dropped.
pub struct SigningToken {
    signer: Box<dyn RawSigner>,
    label: String,
}

impl SigningToken {
    /// Wrap a raw signer. `label` identifies the token in log messages.
    pub fn new(signer: Box<dyn RawSigner>, label: impl Into<String>) -> Self {
        let label = label.into();
        log::debug!("acquired signing token for {label}");
        Self { signer, label }
    }

    /// Sign `data` with the algorithm reported by [`Self::alg`].
    pub fn sign(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(self.signer.sign(data)?)
    }

    /// Signature algorithm of the key.
    pub fn alg(&self) -> SigningAlg {
        self.signer.alg()
    }

    /// Certificate chain, leaf first.
    pub fn cert_chain(&self) -> Result<Vec<Vec<u8>>> {
        Ok(self.signer.cert_chain()?)
    }
}

impl Drop for SigningToken {
    fn drop(&mut self) {
        log::debug!("released signing token for {}", self.label);
    }
}

impl std::fmt::Debug for SigningToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningToken")
            .field("label", &self.label)
            .field("alg", &self.signer.alg())
            .finish()
    }
}

/// A PEM keystore file holding a PKCS#8 private key, usually encrypted, and
/// the certificate chain.
#[derive(Clone)]
pub struct KeystoreIdentity {
    path: PathBuf,
    password: String,
}

impl KeystoreIdentity {
    /// Identity backed by the keystore at `path`.
    pub fn new(path: impl AsRef<Path>, password: impl Into<String>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            password: password.into(),
        }
    }

    /// Identity described by the `keystore` settings section.
    pub fn from_settings(settings: &KeystoreSettings) -> Self {
        Self::new(&settings.path, settings.password.clone())
    }
}

impl std::fmt::Debug for KeystoreIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeystoreIdentity")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl SigningIdentity for KeystoreIdentity {
    fn acquire(&self) -> Result<SigningToken> {
        let pem = std::fs::read(&self.path).map_err(|e| {
            Error::KeyAccess(format!(
                "unable to read keystore {}: {e}",
                self.path.display()
            ))
        })?;

        let signer = signer_from_pem(&pem, Some(&self.password))?;
        Ok(SigningToken::new(signer, self.path.display().to_string()))
    }
}

/// Certificate chain and private key supplied by the caller as PEM text.
///
/// The private key must not be encrypted.
#[derive(Clone)]
pub struct InlinePemIdentity {
    certificate_chain_pem: String,
    private_key_pem: String,
}

impl InlinePemIdentity {
    /// Identity from a PEM certificate chain (leaf first) and a PEM private
    /// key.
    pub fn new(
        certificate_chain_pem: impl Into<String>,
        private_key_pem: impl Into<String>,
    ) -> Self {
        Self {
            certificate_chain_pem: certificate_chain_pem.into(),
            private_key_pem: private_key_pem.into(),
        }
    }
}

impl std::fmt::Debug for InlinePemIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InlinePemIdentity").finish_non_exhaustive()
    }
}

impl SigningIdentity for InlinePemIdentity {
    fn acquire(&self) -> Result<SigningToken> {
        if self.certificate_chain_pem.trim().is_empty() {
            return Err(Error::MissingInput("certificate chain"));
        }
        if self.private_key_pem.trim().is_empty() {
            return Err(Error::NoSigningKey);
        }

        let mut pem = self.private_key_pem.clone();
        pem.push('\n');
        pem.push_str(&self.certificate_chain_pem);

        let signer = signer_from_pem(pem.as_bytes(), None)?;
        Ok(SigningToken::new(signer, "inline PEM identity"))
    }
}

/// Build a signer from a buffer of PEM blocks.
///
/// The first private key block is used. `CERTIFICATE` blocks, in order,
/// form the chain.
fn signer_from_pem(pem: &[u8], password: Option<&str>) -> Result<Box<dyn RawSigner>> {
    let cert_chain = certs_from_pem(pem).map_err(|e| Error::KeyAccess(e.to_string()))?;

    // Malformed blocks were already rejected above.
    let Some(key) = Pem::iter_from_buffer(pem)
        .filter_map(|block| block.ok())
        .find(|b| b.label == ENCRYPTED_KEY_LABEL || KEY_LABELS.contains(&b.label.as_str()))
    else {
        return Err(Error::NoSigningKey);
    };

    if cert_chain.is_empty() {
        log::debug!("private key entry has no certificate chain");
        return Err(Error::NoSigningKey);
    }

    if key.label != ENCRYPTED_KEY_LABEL {
        return Ok(signer_from_key_der(&key.label, &key.contents, cert_chain)?);
    }

    let Some(password) = password else {
        return Err(Error::KeyAccess(
            "private key is encrypted and no password was given".to_string(),
        ));
    };

    let encrypted = EncryptedPrivateKeyInfo::try_from(key.contents.as_slice())
        .map_err(|e| Error::KeyAccess(format!("invalid encrypted private key: {e}")))?;

    let decrypted = encrypted
        .decrypt(password)
        .map_err(|_e| Error::KeyAccess("unable to decrypt private key".to_string()))?;

    Ok(signer_from_key_der(
        "PRIVATE KEY",
        decrypted.as_bytes(),
        cert_chain,
    )?)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::io::Write;

    use pades_crypto::ephemeral::{generate_chain, ChainOptions, EphemeralChain};

    use super::*;

    fn ephemeral() -> EphemeralChain {
        generate_chain(&ChainOptions::default()).unwrap()
    }

    fn keystore_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn keystore_with_encrypted_key() {
        let chain = ephemeral();
        let mut pem = chain.encrypted_private_key_pem("s3cret").unwrap();
        pem.push_str(&chain.chain_pem().unwrap());
        let file = keystore_file(&pem);

        let token = KeystoreIdentity::new(file.path(), "s3cret").acquire().unwrap();

        assert_eq!(token.alg(), SigningAlg::Ed25519);
        assert_eq!(token.cert_chain().unwrap(), chain.chain());
        assert_eq!(token.sign(b"data").unwrap().len(), 64);
    }

    #[test]
    fn keystore_wrong_password() {
        let chain = ephemeral();
        let mut pem = chain.encrypted_private_key_pem("s3cret").unwrap();
        pem.push_str(&chain.chain_pem().unwrap());
        let file = keystore_file(&pem);

        assert!(matches!(
            KeystoreIdentity::new(file.path(), "wrong").acquire(),
            Err(Error::KeyAccess(_))
        ));
    }

    #[test]
    fn keystore_without_key() {
        let chain = ephemeral();
        let file = keystore_file(&chain.chain_pem().unwrap());

        assert!(matches!(
            KeystoreIdentity::new(file.path(), "s3cret").acquire(),
            Err(Error::NoSigningKey)
        ));
    }

    #[test]
    fn keystore_with_malformed_pem() {
        let chain = ephemeral();
        let mut pem = chain.private_key_pem().unwrap();
        pem.push_str("-----BEGIN CERTIFICATE-----\n!!not base64!!\n-----END CERTIFICATE-----\n");
        let file = keystore_file(&pem);

        assert!(matches!(
            KeystoreIdentity::new(file.path(), "").acquire(),
            Err(Error::KeyAccess(_))
        ));
    }

    #[test]
    fn keystore_skips_unrelated_blocks() {
        let chain = ephemeral();
        let mut pem = chain.private_key_pem().unwrap();
        pem.push_str("-----BEGIN X509 CRL-----\nAAAA\n-----END X509 CRL-----\n");
        pem.push_str(&chain.chain_pem().unwrap());
        let file = keystore_file(&pem);

        let token = KeystoreIdentity::new(file.path(), "").acquire().unwrap();
        assert_eq!(token.cert_chain().unwrap(), chain.chain());
    }

    #[test]
    fn keystore_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            KeystoreIdentity::new(dir.path().join("absent.pem"), "x").acquire(),
            Err(Error::KeyAccess(_))
        ));
    }

    #[test]
    fn keystore_from_settings() {
        let settings = KeystoreSettings {
            path: "signer.pem".to_string(),
            password: "pw".to_string(),
        };
        let identity = KeystoreIdentity::from_settings(&settings);
        assert_eq!(identity.path, PathBuf::from("signer.pem"));
        assert_eq!(identity.password, "pw");
    }

    #[test]
    fn inline_pem() {
        let chain = ephemeral();
        let identity =
            InlinePemIdentity::new(chain.chain_pem().unwrap(), chain.private_key_pem().unwrap());

        let token = identity.acquire().unwrap();
        assert_eq!(token.cert_chain().unwrap(), chain.chain());
    }

    #[test]
    fn inline_pem_missing_parts() {
        let chain = ephemeral();

        assert!(matches!(
            InlinePemIdentity::new("", chain.private_key_pem().unwrap()).acquire(),
            Err(Error::MissingInput(_))
        ));
        assert!(matches!(
            InlinePemIdentity::new(chain.chain_pem().unwrap(), "  ").acquire(),
            Err(Error::NoSigningKey)
        ));
    }

    #[test]
    fn inline_pem_rejects_encrypted_key() {
        let chain = ephemeral();
        let identity = InlinePemIdentity::new(
            chain.chain_pem().unwrap(),
            chain.encrypted_private_key_pem("pw").unwrap(),
        );

        assert!(matches!(identity.acquire(), Err(Error::KeyAccess(_))));
    }
}
