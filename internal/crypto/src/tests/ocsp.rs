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

use std::time::Duration;

use httpmock::prelude::*;

use crate::{
    certificate::CertificateInfo,
    ephemeral::{generate_chain, ChainOptions},
    ocsp::{cert_id, fetch_ocsp_response, OcspError, OcspResponse},
};

fn leaf_and_issuer(ocsp_url: Option<String>) -> (CertificateInfo, CertificateInfo) {
    let chain = generate_chain(&ChainOptions {
        ocsp_url,
        ..Default::default()
    })
    .unwrap();

    (
        CertificateInfo::from_der(&chain.leaf_der).unwrap(),
        CertificateInfo::from_der(&chain.root_der).unwrap(),
    )
}

#[test]
fn cert_id_is_stable() {
    let (leaf, root) = leaf_and_issuer(None);

    let a = cert_id(&leaf.der, &root.der).unwrap();
    let b = cert_id(&leaf.der, &root.der).unwrap();
    assert_eq!(a, b);

    // Hashes are SHA-1.
    assert_eq!(a.issuer_name_hash.len(), 20);
    assert_eq!(a.issuer_key_hash.len(), 20);
}

#[test]
fn cert_id_differs_per_certificate() {
    let (leaf, root) = leaf_and_issuer(None);

    let leaf_id = cert_id(&leaf.der, &root.der).unwrap();
    let root_id = cert_id(&root.der, &root.der).unwrap();

    assert_eq!(leaf_id.issuer_key_hash, root_id.issuer_key_hash);
    assert_ne!(leaf_id.serial_number, root_id.serial_number);
}

#[test]
fn cert_id_rejects_garbage() {
    let (_leaf, root) = leaf_and_issuer(None);
    assert_eq!(
        cert_id(b"garbage", &root.der),
        Err(OcspError::InvalidCertificate)
    );
}

#[test]
fn garbage_response() {
    let (leaf, root) = leaf_and_issuer(None);

    assert!(matches!(
        OcspResponse::from_der(b"not an OCSP response", &leaf, &root),
        Err(OcspError::InvalidResponse(_))
    ));
}

#[test]
fn no_responder() {
    let (leaf, root) = leaf_and_issuer(None);
    assert_eq!(
        fetch_ocsp_response(&leaf, &root, Duration::from_secs(1)),
        Ok(None)
    );
}

#[test]
fn fetch_returns_body() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path_contains("/ocsp/");
        then.status(200)
            .header("content-type", "application/ocsp-response")
            .body(b"ocsp bytes");
    });

    let (leaf, root) = leaf_and_issuer(Some(server.url("/ocsp")));

    let rsp = fetch_ocsp_response(&leaf, &root, Duration::from_secs(5)).unwrap();
    assert_eq!(rsp.as_deref(), Some(b"ocsp bytes".as_slice()));
    mock.assert_hits(1);
}

#[test]
fn http_error_is_not_retried() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path_contains("/ocsp/");
        then.status(500);
    });

    let (leaf, root) = leaf_and_issuer(Some(server.url("/ocsp")));

    assert_eq!(
        fetch_ocsp_response(&leaf, &root, Duration::from_secs(5)),
        Err(OcspError::HttpErrorResponse(500))
    );
    mock.assert_hits(1);
}

mod signed_responses {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::{
        ephemeral::{ocsp_response, EphemeralChain, OcspOptions},
        revocation::RevocationStatus,
    };

    fn chain(intermediate: bool) -> EphemeralChain {
        generate_chain(&ChainOptions {
            intermediate,
            ..Default::default()
        })
        .unwrap()
    }

    fn leaf_and_issuer(chain: &EphemeralChain) -> (CertificateInfo, CertificateInfo) {
        (
            CertificateInfo::from_der(&chain.leaf_der).unwrap(),
            CertificateInfo::from_der(chain.issuer_der()).unwrap(),
        )
    }

    #[test]
    fn good() {
        let chain = chain(false);
        let (leaf, issuer) = leaf_and_issuer(&chain);
        let this_update = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let next_update = Utc.with_ymd_and_hms(2024, 5, 8, 12, 0, 0).unwrap();

        let der = ocsp_response(
            &chain,
            &OcspOptions {
                this_update,
                next_update: Some(next_update),
                ..Default::default()
            },
        )
        .unwrap();

        let response = OcspResponse::from_der(&der, &leaf, &issuer).unwrap();
        assert_eq!(response.status, RevocationStatus::Good);
        assert_eq!(response.this_update, this_update);
        assert_eq!(response.next_update, Some(next_update));
        assert_eq!(response.ocsp_der, der);
    }

    #[test]
    fn revoked() {
        let chain = chain(true);
        let (leaf, issuer) = leaf_and_issuer(&chain);
        let revoked_at = Utc.with_ymd_and_hms(2024, 2, 29, 8, 30, 0).unwrap();

        let der = ocsp_response(
            &chain,
            &OcspOptions {
                revoked_at: Some(revoked_at),
                ..Default::default()
            },
        )
        .unwrap();

        let response = OcspResponse::from_der(&der, &leaf, &issuer).unwrap();
        assert_eq!(response.status, RevocationStatus::Revoked { revoked_at });
    }

    #[test]
    fn delegated_responder() {
        let chain = chain(true);
        let (leaf, issuer) = leaf_and_issuer(&chain);

        let der = ocsp_response(
            &chain,
            &OcspOptions {
                delegated: true,
                ..Default::default()
            },
        )
        .unwrap();

        let response = OcspResponse::from_der(&der, &leaf, &issuer).unwrap();
        assert_eq!(response.status, RevocationStatus::Good);
    }

    #[test]
    fn wrong_signing_key() {
        let chain = chain(false);
        let (leaf, issuer) = leaf_and_issuer(&chain);

        let der = ocsp_response(
            &chain,
            &OcspOptions {
                wrong_key: true,
                ..Default::default()
            },
        )
        .unwrap();

        assert!(matches!(
            OcspResponse::from_der(&der, &leaf, &issuer),
            Err(OcspError::InvalidSignature(_))
        ));
    }

    #[test]
    fn delegated_responder_wrong_key() {
        let chain = chain(true);
        let (leaf, issuer) = leaf_and_issuer(&chain);

        let der = ocsp_response(
            &chain,
            &OcspOptions {
                delegated: true,
                wrong_key: true,
                ..Default::default()
            },
        )
        .unwrap();

        assert!(matches!(
            OcspResponse::from_der(&der, &leaf, &issuer),
            Err(OcspError::InvalidSignature(_))
        ));
    }

    #[test]
    fn signed_by_another_issuer() {
        let signed = chain(false);
        let other = chain(false);
        let (leaf, _) = leaf_and_issuer(&signed);
        let (_, other_issuer) = leaf_and_issuer(&other);

        let der = ocsp_response(&signed, &OcspOptions::default()).unwrap();

        assert!(matches!(
            OcspResponse::from_der(&der, &leaf, &other_issuer),
            Err(OcspError::InvalidSignature(_))
        ));
    }

    #[test]
    fn cert_id_mismatch() {
        let chain = chain(true);
        let (_, issuer) = leaf_and_issuer(&chain);

        // A sibling issued by the same CA is not covered by the response.
        let sibling = CertificateInfo::from_der(chain.intermediate_der.as_ref().unwrap()).unwrap();
        let der = ocsp_response(&chain, &OcspOptions::default()).unwrap();

        assert_eq!(
            OcspResponse::from_der(&der, &sibling, &issuer).unwrap_err(),
            OcspError::NoMatchingResponse
        );
    }

    #[test]
    fn fetched_from_responder() {
        let server = MockServer::start();
        let chain = generate_chain(&ChainOptions {
            ocsp_url: Some(server.url("/ocsp")),
            ..Default::default()
        })
        .unwrap();
        let (leaf, issuer) = leaf_and_issuer(&chain);
        let revoked_at = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();

        let body = ocsp_response(
            &chain,
            &OcspOptions {
                revoked_at: Some(revoked_at),
                ..Default::default()
            },
        )
        .unwrap();

        let mock = server.mock(|when, then| {
            when.method(GET).path_contains("/ocsp/");
            then.status(200)
                .header("content-type", "application/ocsp-response")
                .body(&body);
        });

        let der = fetch_ocsp_response(&leaf, &issuer, Duration::from_secs(5))
            .unwrap()
            .unwrap();
        let response = OcspResponse::from_der(&der, &leaf, &issuer).unwrap();

        assert_eq!(response.status, RevocationStatus::Revoked { revoked_at });
        mock.assert_hits(1);
    }
}
