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

use std::{io::Read, time::Duration};

use crate::{base64, certificate::CertificateInfo, ocsp::OcspError};

/// Retrieve an OCSP response for `cert` if its issuer publishes a responder.
///
/// Checks the authority information access extension of `cert` for OCSP
/// responders and asks each in turn, once, for the DER-encoded response.
/// Returns `Ok(None)` if the certificate names no responder.
///
/// `timeout` bounds both connecting and reading.
pub fn fetch_ocsp_response(
    cert: &CertificateInfo,
    issuer: &CertificateInfo,
    timeout: Duration,
) -> Result<Option<Vec<u8>>, OcspError> {
    if cert.ocsp_responders.is_empty() {
        return Ok(None);
    }

    let req_cert = super::cert_id(&cert.der, &issuer.der)?;

    let ocsp_req = rasn_ocsp::Request {
        req_cert,
        single_request_extensions: None,
    };

    let tbs_request = rasn_ocsp::TbsRequest {
        version: rasn_ocsp::Version::from(0u8),
        requestor_name: None,
        request_list: vec![ocsp_req],
        request_extensions: None,
    };

    let ocsp_request = rasn_ocsp::OcspRequest {
        tbs_request,
        optional_signature: None,
    };

    // build query param
    let request_der =
        rasn::der::encode(&ocsp_request).map_err(|_e| OcspError::InvalidCertificate)?;
    let request_str: String =
        url::form_urlencoded::byte_serialize(base64::encode(&request_der).as_bytes()).collect();

    let agent = ureq::AgentBuilder::new()
        .timeout_connect(timeout)
        .timeout_read(timeout)
        .build();

    let mut last_err = OcspError::HttpConnectionError("no usable responder".to_string());

    for responder in &cert.ocsp_responders {
        let Ok(url) = url::Url::parse(responder) else {
            log::debug!("skipping malformed OCSP responder URL {responder}");
            continue;
        };

        let base = if url.path().ends_with('/') {
            url.to_string()
        } else {
            format!("{url}/")
        };
        let req_url = format!("{base}{request_str}");

        log::debug!("requesting OCSP status for {} from {url}", cert.subject);

        // for responders that don't support http 1.0
        let request = agent.get(&req_url);
        let request = if let Some(host) = url.host_str() {
            request.set("Host", host)
        } else {
            request
        };

        match request.call() {
            Ok(response) => {
                let mut ocsp_rsp: Vec<u8> = Vec::with_capacity(10000);

                response
                    .into_reader()
                    .take(1000000)
                    .read_to_end(&mut ocsp_rsp)
                    .map_err(|e| OcspError::HttpConnectionError(e.to_string()))?;

                return Ok(Some(ocsp_rsp));
            }
            Err(err) => {
                log::debug!("OCSP responder {url} failed: {err}");
                last_err = err.into();
            }
        }
    }

    Err(last_err)
}
