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

//! Revocation status shared by the OCSP and CRL clients.

use chrono::{DateTime, Utc};

/// Status of a certificate as reported by a revocation source.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RevocationStatus {
    /// The source vouches that the certificate is not revoked.
    Good,

    /// The certificate was revoked at the given time.
    Revoked {
        /// Time of revocation.
        revoked_at: DateTime<Utc>,
    },
}
