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

use ed25519_dalek::pkcs8::{EncodePrivateKey, EncodePublicKey};
use rand::thread_rng;
use rasn::types::ObjectIdentifier;
use rsa::{pkcs1::EncodeRsaPrivateKey, RsaPrivateKey};

use crate::{
    ephemeral::{generate_chain, ChainOptions},
    raw_signature::{
        signer_from_key_der, validator_for_sig_and_hash_algs, validator_for_signing_alg,
        RawSignatureValidationError, RawSignerError, SigningAlg,
    },
};

#[test]
fn ed25519_pkcs8() {
    let chain = generate_chain(&ChainOptions::default()).unwrap();
    let key_der = chain.leaf_key.to_pkcs8_der().unwrap();

    let signer = signer_from_key_der("PRIVATE KEY", key_der.as_bytes(), chain.chain()).unwrap();
    assert_eq!(signer.alg(), SigningAlg::Ed25519);
    assert_eq!(signer.cert_chain().unwrap(), chain.chain());

    let public_key = chain.leaf_key.verifying_key().to_public_key_der().unwrap();
    let validator = validator_for_signing_alg(SigningAlg::Ed25519);

    let sig = signer.sign(b"some data").unwrap();
    validator
        .validate(&sig, b"some data", public_key.as_bytes())
        .unwrap();
    assert_eq!(
        validator.validate(&sig, b"other data", public_key.as_bytes()),
        Err(RawSignatureValidationError::SignatureMismatch)
    );
}

fn rsa_key() -> RsaPrivateKey {
    RsaPrivateKey::new(&mut thread_rng(), 1024).unwrap()
}

#[test]
fn rsa_pkcs1_and_pkcs8() {
    let key = rsa_key();
    let public_key = key.to_public_key().to_public_key_der().unwrap();
    let validator = validator_for_signing_alg(SigningAlg::Rs256);

    let pkcs1 = key.to_pkcs1_der().unwrap();
    let signer = signer_from_key_der("RSA PRIVATE KEY", pkcs1.as_bytes(), vec![]).unwrap();
    assert_eq!(signer.alg(), SigningAlg::Rs256);

    let sig = signer.sign(b"some data").unwrap();
    validator
        .validate(&sig, b"some data", public_key.as_bytes())
        .unwrap();

    let pkcs8 = key.to_pkcs8_der().unwrap();
    let signer = signer_from_key_der("PRIVATE KEY", pkcs8.as_bytes(), vec![]).unwrap();
    assert_eq!(signer.alg(), SigningAlg::Rs256);

    let sig = signer.sign(b"other data").unwrap();
    validator
        .validate(&sig, b"other data", public_key.as_bytes())
        .unwrap();
    assert!(validator
        .validate(&sig, b"some data", public_key.as_bytes())
        .is_err());
}

#[test]
fn unsupported_label() {
    assert!(matches!(
        signer_from_key_der("EC PRIVATE KEY", b"", vec![]),
        Err(RawSignerError::InvalidSigningCredentials(_))
    ));
}

#[test]
fn bad_key_bytes() {
    assert!(matches!(
        signer_from_key_der("PRIVATE KEY", b"not a key", vec![]),
        Err(RawSignerError::InvalidSigningCredentials(_))
    ));
}

#[test]
fn alg_names() {
    assert_eq!(SigningAlg::Rs256.to_string(), "rs256");
    assert_eq!(SigningAlg::Ed25519.to_string(), "ed25519");
}

#[test]
fn validator_by_oid() {
    let oid = |arcs: &[u32]| ObjectIdentifier::new(arcs.to_vec()).unwrap();
    let rsa = oid(&[1, 2, 840, 113549, 1, 1, 1]);
    let sha256 = oid(&[2, 16, 840, 1, 101, 3, 4, 2, 1]);
    let sha1 = oid(&[1, 3, 14, 3, 2, 26]);
    let ed25519 = oid(&[1, 3, 101, 112]);
    let sha256_with_rsa = oid(&[1, 2, 840, 113549, 1, 1, 11]);
    let ecdsa_with_sha256 = oid(&[1, 2, 840, 10045, 4, 3, 2]);

    assert!(validator_for_sig_and_hash_algs(&ed25519, None).is_some());
    assert!(validator_for_sig_and_hash_algs(&sha256_with_rsa, None).is_some());
    assert!(validator_for_sig_and_hash_algs(&rsa, Some(&sha256)).is_some());

    // rsaEncryption needs a digest named alongside it.
    assert!(validator_for_sig_and_hash_algs(&rsa, None).is_none());
    assert!(validator_for_sig_and_hash_algs(&rsa, Some(&sha1)).is_none());

    assert!(validator_for_sig_and_hash_algs(&ecdsa_with_sha256, None).is_none());
}

#[test]
fn validator_rejects_bad_key() {
    let validator = validator_for_signing_alg(SigningAlg::Ed25519);
    assert_eq!(
        validator.validate(&[0u8; 64], b"data", b"not a key"),
        Err(RawSignatureValidationError::InvalidPublicKey)
    );
}
