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

mod common;

use common::{assert_err, write_keystore, Harness, MockPdf, StubAnswer, UNSIGNED_PDF};
use pades::{
    validation_codes, AlertPolicy, DocumentSource, Error, InlinePemIdentity, MemorySource,
    PadesPdf, SignatureLevel,
};
use pades_crypto::ephemeral::ChainOptions;

#[test]
fn direct_signing_adds_one_time_stamp() {
    let h = Harness::new(StubAnswer::Good);

    let signed = h
        .service
        .sign_lta_direct(&MemorySource::new(UNSIGNED_PDF), &h.identity())
        .unwrap();

    assert_eq!(signed.level(), SignatureLevel::BaselineLta);
    assert_eq!(signed.time_stamp_count(), 1);
    assert!(signed.bytes().starts_with(UNSIGNED_PDF));

    assert_eq!(h.tsa.calls(), 1);
    // Only the leaf is an adjunct-only certificate.
    assert_eq!(h.revocation.calls(), 1);

    let log = signed.log();
    assert!(log.has_status(validation_codes::CERTIFICATE_TRUST_ANCHOR));
    assert!(log.has_status(validation_codes::REVOCATION_NOT_REVOKED));
    assert!(log.has_status(validation_codes::TIMESTAMP_VALIDATED));
    assert!(!log.has_any_error());
}

#[test]
fn two_step_signing_adds_two_time_stamps() {
    let h = Harness::new(StubAnswer::Good);

    let signed = h
        .service
        .sign_lta_two_step(&MemorySource::new(UNSIGNED_PDF), &h.identity())
        .unwrap();

    assert_eq!(signed.level(), SignatureLevel::BaselineLta);
    assert_eq!(signed.time_stamp_count(), 2);
    assert_eq!(h.tsa.calls(), 2);
    assert_eq!(h.revocation.calls(), 1);
    assert!(signed
        .log()
        .has_status(validation_codes::ARCHIVE_TIMESTAMP_ADDED));

    let reparsed = MockPdf::from_bytes(signed.bytes()).unwrap();
    assert_eq!(reparsed.signature_level(), Some(SignatureLevel::BaselineLta));
    assert_eq!(reparsed.time_stamp_count(), 2);
}

#[test]
fn sign_bytes_is_direct() {
    let h = Harness::new(StubAnswer::Good);

    let signed = h.service.sign_bytes(UNSIGNED_PDF, &h.identity()).unwrap();

    assert_eq!(signed.time_stamp_count(), 1);
    assert_eq!(h.tsa.calls(), 1);
}

#[test]
fn sign_file_with_keystore() {
    let h = Harness::new(StubAnswer::Good);
    let dir = tempfile::tempdir().unwrap();

    let identity = write_keystore(dir.path(), &h.chain, "correct horse");
    let input = dir.path().join("unsigned.pdf");
    let output = dir.path().join("signed.pdf");
    std::fs::write(&input, UNSIGNED_PDF).unwrap();

    let signed = h.service.sign_file(&input, &output, &identity).unwrap();

    assert_eq!(signed.time_stamp_count(), 2);
    assert_eq!(std::fs::read(&output).unwrap(), signed.bytes());
}

#[test]
fn revoked_certificate_is_fatal() {
    let h = Harness::new(StubAnswer::Revoked);

    let result = h
        .service
        .sign_lta_direct(&MemorySource::new(UNSIGNED_PDF), &h.identity());

    assert_err!(result, Err(Error::RevokedCertificate { .. }));
    assert_eq!(h.tsa.calls(), 0);
}

#[test]
fn revoked_certificate_in_three_level_chain_is_fatal() {
    let options = ChainOptions {
        intermediate: true,
        ..Default::default()
    };
    let h = Harness::with_options(StubAnswer::Revoked, &options, AlertPolicy::default());

    let result = h
        .service
        .sign_lta_two_step(&MemorySource::new(UNSIGNED_PDF), &h.identity());

    assert_err!(result, Err(Error::RevokedCertificate { .. }));
    assert_eq!(h.tsa.calls(), 0);
}

#[test]
fn revocation_checked_for_every_adjunct() {
    let options = ChainOptions {
        intermediate: true,
        ..Default::default()
    };
    let h = Harness::with_options(StubAnswer::Good, &options, AlertPolicy::default());

    h.service
        .sign_lta_direct(&MemorySource::new(UNSIGNED_PDF), &h.identity())
        .unwrap();

    // Leaf and intermediate; the root is a trust anchor.
    assert_eq!(h.revocation.calls(), 2);
}

#[test]
fn oversized_chain_overflows_before_time_stamp() {
    let options = ChainOptions {
        leaf_padding: 70_000,
        ..Default::default()
    };
    let h = Harness::with_options(StubAnswer::Good, &options, AlertPolicy::default());

    let result = h
        .service
        .sign_lta_direct(&MemorySource::new(UNSIGNED_PDF), &h.identity());

    match result {
        Err(Error::ContainerOverflow { needed, reserved }) => {
            assert_eq!(reserved, 65_536);
            assert!(needed > reserved);
        }
        other => panic!("expected ContainerOverflow, got {other:?}"),
    }
    assert_eq!(h.tsa.calls(), 0);
}

#[test]
fn missing_revocation_is_logged_by_default() {
    let h = Harness::new(StubAnswer::Nothing);

    let signed = h
        .service
        .sign_lta_direct(&MemorySource::new(UNSIGNED_PDF), &h.identity())
        .unwrap();

    assert_eq!(signed.time_stamp_count(), 1);
    assert!(signed.log().has_status(validation_codes::REVOCATION_MISSING));
    assert!(signed.log().has_any_error());
}

#[test]
fn strict_policy_escalates_missing_revocation() {
    let h = Harness::with_options(
        StubAnswer::Unavailable,
        &ChainOptions::default(),
        AlertPolicy::strict(),
    );

    let result = h
        .service
        .sign_lta_direct(&MemorySource::new(UNSIGNED_PDF), &h.identity());

    assert_err!(result, Err(Error::RevocationUnavailable(_)));
    assert_eq!(h.revocation.calls(), 1);
    assert_eq!(h.tsa.calls(), 0);
}

#[test]
fn validation_errors_precede_network() {
    let h = Harness::new(StubAnswer::Good);
    let dir = tempfile::tempdir().unwrap();

    assert_err!(
        h.service
            .sign_lta_direct(&MemorySource::new(Vec::new()), &h.identity()),
        Err(Error::MissingInput(_))
    );

    assert_err!(
        h.service
            .sign_lta_direct(&MemorySource::new(b"not a pdf".to_vec()), &h.identity()),
        Err(Error::InvalidDocument(_))
    );

    let keystore = write_keystore(dir.path(), &h.chain, "right");
    let wrong_password = pades::KeystoreIdentity::new(
        dir.path().join("signer.pem"),
        "wrong",
    );
    assert!(h.service.sign_bytes(UNSIGNED_PDF, &keystore).is_ok());
    let calls_after_success = h.network_calls();

    assert_err!(
        h.service.sign_bytes(UNSIGNED_PDF, &wrong_password),
        Err(Error::KeyAccess(_))
    );

    let no_key = InlinePemIdentity::new(h.chain.chain_pem().unwrap(), "");
    assert_err!(
        h.service.sign_lta_two_step(&MemorySource::new(UNSIGNED_PDF), &no_key),
        Err(Error::NoSigningKey)
    );

    assert_eq!(h.network_calls(), calls_after_success);
}

#[test]
fn signed_document_is_a_source() {
    let h = Harness::new(StubAnswer::Good);

    let signed = h.service.sign_bytes(UNSIGNED_PDF, &h.identity()).unwrap();

    assert_eq!(signed.read_bytes().unwrap(), signed.bytes());
}
