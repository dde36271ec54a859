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

use thiserror::Error;

/// Describes errors that can occur when requesting or parsing an [RFC 3161]
/// time stamp.
///
/// [RFC 3161]: https://www.ietf.org/rfc/rfc3161.txt
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TimeStampError {
    /// The time stamp in the response did not match the data that was sent.
    #[error("time stamp does not match data")]
    InvalidData,

    /// The time stamp uses an unsupported hash algorithm.
    #[error("time stamp contains an unsupported algorithm")]
    UnsupportedAlgorithm,

    /// The time stamp authority refused the request.
    #[error("time stamp request was not granted (status = {0})")]
    NotGranted(String),

    /// The token's CMS signature is missing or does not verify.
    #[error("time stamp signature is invalid ({0})")]
    InvalidSignature(String),

    /// The time stamp authority's certificate is unusable for this token.
    #[error("time stamp certificate is invalid ({0})")]
    InvalidCertificate(String),

    /// An error was encountered when decoding the time stamp response.
    #[error("decode error ({0})")]
    DecodeError(String),

    /// An I/O error occurred while reading the HTTP response.
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    /// The time stamp service did not respond with the same nonce as provided.
    #[error("nonce mismatch")]
    NonceMismatch,

    /// The time stamp service responded with an error condition.
    #[error("service responded with an HTTP error (status = {0}, content-type = {1})")]
    HttpErrorResponse(u16, String),

    /// Unable to complete the HTTP time stamp request.
    ///
    /// This error should be used _only_ if no response is received from the
    /// time stamp service. Any error response from the service should be
    /// described using `HttpErrorResponse`.
    #[error("unable to complete HTTP request ({0})")]
    HttpConnectionError(String),

    /// An unexpected internal error occurred while requesting the time stamp
    /// response.
    #[error("internal error ({0})")]
    InternalError(String),
}

impl From<ureq::Error> for TimeStampError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(code, response) => {
                Self::HttpErrorResponse(code, response.content_type().to_string())
            }
            ureq::Error::Transport(transport) => Self::HttpConnectionError(transport.to_string()),
        }
    }
}

impl From<rasn::error::DecodeError> for TimeStampError {
    fn from(err: rasn::error::DecodeError) -> Self {
        Self::DecodeError(err.to_string())
    }
}

impl From<rasn::error::EncodeError> for TimeStampError {
    fn from(err: rasn::error::EncodeError) -> Self {
        Self::InternalError(err.to_string())
    }
}
