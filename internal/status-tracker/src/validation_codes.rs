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

//! Status codes recorded while assembling verification data for a PAdES
//! signature.

// -- success codes --

/// A certificate in the signing chain is self-signed and was accepted as a
/// trust anchor.
pub const CERTIFICATE_TRUST_ANCHOR: &str = "certificate.trustAnchor";

/// Revocation data was obtained for a certificate and it is not revoked.
pub const REVOCATION_NOT_REVOKED: &str = "revocation.notRevoked";

/// The time stamp token was well-formed and its message imprint matched.
pub const TIMESTAMP_VALIDATED: &str = "timeStamp.validated";

/// A new archive time stamp was added to the document.
pub const ARCHIVE_TIMESTAMP_ADDED: &str = "timeStamp.archive.added";

// -- failure codes --

/// A certificate in the chain has been revoked.
///
/// Always fatal.
pub const CERTIFICATE_REVOKED: &str = "certificate.revoked";

/// No revocation data could be obtained for a certificate.
pub const REVOCATION_MISSING: &str = "revocation.missing";

/// The time stamp token was malformed or did not cover the expected data.
pub const TIMESTAMP_INVALID: &str = "timeStamp.invalid";

/// The only revocation data available predates the best signature time.
pub const REVOCATION_NONE_AFTER_BEST_SIGNATURE_TIME: &str =
    "revocation.noneAfterBestSignatureTime";

/// The signature has no time stamp establishing proof of existence.
pub const POE_UNCOVERED: &str = "proofOfExistence.uncovered";
