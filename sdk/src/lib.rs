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

#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg, doc_cfg_hide))]

//! This library produces PAdES signatures on PDF documents and upgrades
//! them to the long-term archival (LTA) level.
//!
//! The core is a small state machine. A certificate chain is classified
//! into trust anchors and adjunct certificates
//! ([`trust::classify_chain`]). Revocation evidence is gathered for every
//! adjunct certificate ([`revocation::RevocationAggregator`]). Both are
//! combined with an [`AlertPolicy`] into a
//! [`verifier::VerificationContext`] which decides whether signing may
//! proceed. [`PadesService`] then drives a document through the
//! [`SignatureLevel`]s, either directly to LTA
//! ([`PadesService::sign_lta_direct`]), in two steps
//! ([`PadesService::sign_lta_two_step`]), or by extending an existing
//! signature ([`PadesService::extend_to_lta`]).
//!
//! The PDF byte layout itself is not handled here. Callers supply an
//! implementation of [`PadesPdf`] for the container format they use.
//!
//! # Example
//!
//! ```no_run
//! use pades::{
//!     FileSource, KeystoreIdentity, PadesPdf, PadesService, Result, Settings, SignedDocument,
//! };
//!
//! fn sign<P: PadesPdf>() -> Result<SignedDocument> {
//!     let settings = Settings::default().with_toml(r#"tsa_url = "https://tsa.example.com""#)?;
//!     let service = PadesService::<P>::new(settings)?;
//!
//!     let identity = KeystoreIdentity::new("signer.pem", "secret");
//!     service.sign_lta_direct(&FileSource::new("unsigned.pdf"), &identity)
//! }
//! ```

pub mod alert_policy;
pub use alert_policy::{Alert, AlertPolicy, AlertSeverity};

pub mod container;
pub use container::{ExtensionMaterial, PadesPdf, PdfContainerError, SignatureMaterial};

pub mod document;
pub use document::{DocumentSource, FileSource, MemorySource, SignedDocument};

mod error;
pub use error::{Error, Result};

mod extension;

pub mod identity;
pub use identity::{InlinePemIdentity, KeystoreIdentity, SigningIdentity, SigningToken};

pub mod parameters;
pub use parameters::{DigestAlgorithm, SignatureParameters};

pub mod revocation;

mod service;
pub use service::PadesService;

pub mod settings;
pub use settings::Settings;

mod signature_level;
pub use signature_level::SignatureLevel;

mod signing;

pub mod trust;
pub mod verifier;

pub use pades_crypto::{
    raw_signature::{RawSigner, SigningAlg},
    time_stamp::{HttpTimeStampProvider, TimeStampProvider, TimeStampToken},
};
pub use pades_status_tracker::{validation_codes, LogItem, StatusTracker};
