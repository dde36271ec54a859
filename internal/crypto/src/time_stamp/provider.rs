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

use std::time::Duration;

use rand::{thread_rng, Rng};
use rasn::prelude::*;

use crate::{
    hash::sha256,
    time_stamp::{
        asn1::{sha256_algorithm, MessageImprint, TimeStampReq},
        TimeStampError,
    },
};

/// Default time limit for a time stamp round trip.
pub const DEFAULT_TIME_STAMP_TIMEOUT: Duration = Duration::from_secs(30);

/// A `TimeStampProvider` implementation can obtain a time stamp token
/// covering an arbitrary message.
///
/// Implementations must not retry; each call to
/// [`send_time_stamp_request`] is one request to the authority.
///
/// [`send_time_stamp_request`]: TimeStampProvider::send_time_stamp_request
pub trait TimeStampProvider: Send + Sync {
    /// Return the URL for time stamp service.
    fn time_stamp_service_url(&self) -> Option<String> {
        None
    }

    /// Additional request headers to pass to the time stamp service.
    ///
    /// IMPORTANT: You should not include the "Content-type" header here.
    /// That is provided by default.
    fn time_stamp_request_headers(&self) -> Option<Vec<(String, String)>> {
        None
    }

    /// Connect and read timeout for the request.
    fn time_stamp_timeout(&self) -> Duration {
        DEFAULT_TIME_STAMP_TIMEOUT
    }

    /// Generate the request body for the HTTP request to the time stamp
    /// service.
    fn time_stamp_request_body(&self, message: &[u8]) -> Result<Vec<u8>, TimeStampError> {
        default_rfc3161_message(message)
    }

    /// Request a [RFC 3161] time stamp over an arbitrary data packet and
    /// return the DER-encoded `TimeStampResp`.
    ///
    /// The default implementation will send the request to the URL
    /// provided by [`Self::time_stamp_service_url()`], if any. Returns `None`
    /// if no service is configured.
    ///
    /// [RFC 3161]: https://datatracker.ietf.org/doc/html/rfc3161
    fn send_time_stamp_request(&self, message: &[u8]) -> Option<Result<Vec<u8>, TimeStampError>> {
        let url = self.time_stamp_service_url()?;

        Some(self.time_stamp_request_body(message).and_then(|body| {
            super::http_request::default_rfc3161_request(
                &url,
                self.time_stamp_request_headers(),
                &body,
                self.time_stamp_timeout(),
            )
        }))
    }
}

/// A [`TimeStampProvider`] that talks to an RFC 3161 service over HTTP.
#[derive(Clone, Debug)]
pub struct HttpTimeStampProvider {
    url: String,
    timeout: Duration,
}

impl HttpTimeStampProvider {
    /// Create a provider for the service at `url`.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }
}

impl TimeStampProvider for HttpTimeStampProvider {
    fn time_stamp_service_url(&self) -> Option<String> {
        Some(self.url.clone())
    }

    fn time_stamp_timeout(&self) -> Duration {
        self.timeout
    }
}

/// Build a DER-encoded `TimeStampReq` with a SHA-256 imprint of `message`
/// and a random nonce.
pub fn default_rfc3161_message(message: &[u8]) -> Result<Vec<u8>, TimeStampError> {
    let hash_algorithm = sha256_algorithm()
        .ok_or_else(|| TimeStampError::InternalError("bad SHA-256 OID".to_string()))?;

    // Keep the nonce positive so its DER form has no sign ambiguity.
    let nonce = (thread_rng().gen::<u64>() >> 1) as i64;

    let request = TimeStampReq {
        version: Integer::from(1_i64),
        message_imprint: MessageImprint {
            hash_algorithm,
            hashed_message: OctetString::from(sha256(message)),
        },
        req_policy: None,
        nonce: Some(Integer::from(nonce)),
        cert_req: true,
        extensions: None,
    };

    Ok(rasn::der::encode(&request)?)
}
