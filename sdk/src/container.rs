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

//! The PDF container capability.
//!
//! This crate decides *what* goes into a PAdES signature. Where those bytes
//! live inside the PDF (incremental updates, `/ByteRange`, the document
//! security store) is the business of a [`PadesPdf`] implementation
//! supplied by the caller.

use thiserror::Error;

use crate::{SignatureLevel, SignatureParameters};

/// A PDF document that can carry PAdES signatures.
///
/// Implementations must be append-only: embedding or extending a
/// signature never changes bytes that are already covered by an earlier
/// signature or time stamp.
pub trait PadesPdf: Sized {
    /// Parse a document.
    fn from_bytes(bytes: &[u8]) -> Result<Self, PdfContainerError>;

    /// Serialize the document.
    fn to_bytes(&self) -> Vec<u8>;

    /// Level of the most recent signature, or `None` if the document is
    /// unsigned.
    fn signature_level(&self) -> Option<SignatureLevel>;

    /// Number of signature and archive time stamps in the document.
    fn time_stamp_count(&self) -> usize;

    /// Bytes the signer must sign, laid out for `params`.
    fn data_to_sign(&self, params: &SignatureParameters) -> Result<Vec<u8>, PdfContainerError>;

    /// Produce a new document with `material` embedded as a signature at
    /// `params.level()`.
    ///
    /// Fails with [`PdfContainerError::CapacityExceeded`] if the material
    /// does not fit in `params.reserved_capacity()`.
    fn embed_signature(
        &self,
        params: &SignatureParameters,
        material: &SignatureMaterial,
    ) -> Result<Self, PdfContainerError>;

    /// Bytes an archive time stamp must cover.
    fn time_stamp_data(&self) -> Result<Vec<u8>, PdfContainerError>;

    /// Produce a new document with `material` appended as validation data
    /// and an archive time stamp.
    fn extend(
        &self,
        params: &SignatureParameters,
        material: &ExtensionMaterial,
    ) -> Result<Self, PdfContainerError>;
}

/// Everything that goes into a signature container.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SignatureMaterial {
    /// Raw signature value.
    pub signature: Vec<u8>,

    /// Signing chain, leaf first.
    pub cert_chain: Vec<Vec<u8>>,

    /// DER `TimeStampToken` over the signature value, for T and above.
    pub signature_time_stamp: Option<Vec<u8>>,

    /// DER OCSP responses, for LT and above.
    pub ocsp_responses: Vec<Vec<u8>>,

    /// DER CRLs, for LT and above.
    pub crls: Vec<Vec<u8>>,
}

impl SignatureMaterial {
    /// Total size of the material in bytes.
    pub fn encoded_len(&self) -> usize {
        self.signature.len()
            + total_len(&self.cert_chain)
            + self.signature_time_stamp.as_ref().map_or(0, Vec::len)
            + total_len(&self.ocsp_responses)
            + total_len(&self.crls)
    }
}

/// Validation data and archive time stamp appended by an extension.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ExtensionMaterial {
    /// DER `TimeStampToken` over [`PadesPdf::time_stamp_data`].
    pub archive_time_stamp: Vec<u8>,

    /// Certificates to add to the document security store.
    pub cert_chain: Vec<Vec<u8>>,

    /// DER OCSP responses to add to the document security store.
    pub ocsp_responses: Vec<Vec<u8>>,

    /// DER CRLs to add to the document security store.
    pub crls: Vec<Vec<u8>>,
}

impl ExtensionMaterial {
    /// Total size of the material in bytes.
    pub fn encoded_len(&self) -> usize {
        self.archive_time_stamp.len()
            + total_len(&self.cert_chain)
            + total_len(&self.ocsp_responses)
            + total_len(&self.crls)
    }
}

fn total_len(items: &[Vec<u8>]) -> usize {
    items.iter().map(Vec::len).sum()
}

/// Errors reported by a [`PadesPdf`] implementation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PdfContainerError {
    /// The bytes are not a PDF the container can parse.
    #[error("malformed PDF: {0}")]
    Malformed(String),

    /// The document has no signature to extend.
    #[error("document has no signature")]
    NoSignature,

    /// The material does not fit in the reserved space.
    #[error("signature needs {needed} bytes but only {reserved} are reserved")]
    CapacityExceeded {
        /// Bytes required.
        needed: usize,

        /// Bytes reserved.
        reserved: usize,
    },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Any other container failure.
    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_material_len() {
        let material = SignatureMaterial {
            signature: vec![0; 64],
            cert_chain: vec![vec![0; 300], vec![0; 200]],
            signature_time_stamp: Some(vec![0; 1000]),
            ocsp_responses: vec![vec![0; 50]],
            crls: vec![],
        };

        assert_eq!(material.encoded_len(), 1614);
        assert_eq!(SignatureMaterial::default().encoded_len(), 0);
    }

    #[test]
    fn extension_material_len() {
        let material = ExtensionMaterial {
            archive_time_stamp: vec![0; 1200],
            cert_chain: vec![vec![0; 300]],
            ocsp_responses: vec![],
            crls: vec![vec![0; 10], vec![0; 20]],
        };

        assert_eq!(material.encoded_len(), 1530);
    }
}
