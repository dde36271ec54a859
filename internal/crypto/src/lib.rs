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

#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg, doc_cfg_hide))]

//! Cryptography internals for the `pades` crate.
//!
//! This crate holds the primitives the PAdES signing core calls into:
//! certificate inspection, OCSP and CRL retrieval, the RFC 3161 time stamp
//! client and raw signers. None of it knows about PDF documents.

pub mod base64;
pub mod certificate;
pub mod crl;
pub mod hash;
pub(crate) mod internal;
pub mod ocsp;
pub mod raw_signature;
pub mod revocation;
pub mod time_stamp;

#[cfg(any(test, feature = "test_utils"))]
pub mod ephemeral;

#[cfg(test)]
pub(crate) mod tests;
