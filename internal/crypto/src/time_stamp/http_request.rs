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

use std::{io::Read, time::Duration};

use crate::time_stamp::{asn1::TimeStampReq, TimeStampError, TimeStampToken};

const HTTP_CONTENT_TYPE_REQUEST: &str = "application/timestamp-query";
const HTTP_CONTENT_TYPE_RESPONSE: &str = "application/timestamp-reply";

/// Send an encoded `TimeStampReq` to `url` and return the raw
/// `TimeStampResp`.
///
/// The call is made exactly once; a failure is reported to the caller
/// rather than retried.
pub(crate) fn default_rfc3161_request(
    url: &str,
    headers: Option<Vec<(String, String)>>,
    body: &[u8],
    timeout: Duration,
) -> Result<Vec<u8>, TimeStampError> {
    let request: TimeStampReq = rasn::der::decode(body)?;

    let agent = ureq::AgentBuilder::new()
        .timeout_connect(timeout)
        .timeout_read(timeout)
        .build();

    let mut req = agent.post(url);

    if let Some(headers) = headers {
        for (ref name, ref value) in headers {
            req = req.set(name.as_str(), value.as_str());
        }
    }

    log::debug!("requesting time stamp from {url}");

    let response = req
        .set("Content-Type", HTTP_CONTENT_TYPE_REQUEST)
        .send_bytes(body)?;

    if response.status() != 200 || response.content_type() != HTTP_CONTENT_TYPE_RESPONSE {
        return Err(TimeStampError::HttpErrorResponse(
            response.status(),
            response.content_type().to_string(),
        ));
    }

    let len = response
        .header("Content-Length")
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(20000);

    let mut response_bytes: Vec<u8> = Vec::with_capacity(len);

    response
        .into_reader()
        .take(1000000)
        .read_to_end(&mut response_bytes)?;

    // Verify nonce was reflected, if present.
    let token = TimeStampToken::from_response_der(&response_bytes)?;
    if token.nonce() != request.nonce.as_ref() {
        return Err(TimeStampError::NonceMismatch);
    }

    Ok(response_bytes)
}
