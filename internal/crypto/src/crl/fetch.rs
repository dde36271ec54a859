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

use crate::{certificate::CertificateInfo, crl::CrlError};

/// Largest CRL that will be read.
const MAX_CRL_SIZE: u64 = 10_000_000;

/// Download the CRL named by `cert`'s distribution points.
///
/// Each HTTP(S) distribution point is asked once, in order, until one
/// answers. Returns `Ok(None)` if the certificate names no HTTP
/// distribution point.
///
/// `timeout` bounds both connecting and reading.
pub fn fetch_crl(cert: &CertificateInfo, timeout: Duration) -> Result<Option<Vec<u8>>, CrlError> {
    let points: Vec<&String> = cert
        .crl_distribution_points
        .iter()
        .filter(|p| p.starts_with("http://") || p.starts_with("https://"))
        .collect();

    if points.is_empty() {
        return Ok(None);
    }

    let agent = ureq::AgentBuilder::new()
        .timeout_connect(timeout)
        .timeout_read(timeout)
        .build();

    let mut last_err = CrlError::HttpConnectionError("no usable distribution point".to_string());

    for point in points {
        log::debug!("fetching CRL for {} from {point}", cert.subject);

        match agent.get(point).call() {
            Ok(response) => {
                let mut crl: Vec<u8> = Vec::new();

                response
                    .into_reader()
                    .take(MAX_CRL_SIZE)
                    .read_to_end(&mut crl)
                    .map_err(|e| CrlError::HttpConnectionError(e.to_string()))?;

                return Ok(Some(crl));
            }
            Err(err) => {
                log::debug!("CRL distribution point {point} failed: {err}");
                last_err = err.into();
            }
        }
    }

    Err(last_err)
}
