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

use chrono::{DateTime, Utc};
use rasn::prelude::*;
use rasn_cms::SignedData;

use crate::{
    certificate::CertificateInfo,
    hash::sha256,
    time_stamp::{
        asn1::{
            oid, ContentInfo, TimeStampResp, TstInfo, SHA256_OID, SIGNED_DATA_OID, TST_INFO_OID,
        },
        verify::verify_time_stamp,
        TimeStampError,
    },
};

/// A parsed [RFC 3161] time stamp token.
///
/// The token is kept in its original DER encoding (a CMS `ContentInfo`
/// wrapping `SignedData`) so it can be embedded verbatim.
///
/// [RFC 3161]: https://www.ietf.org/rfc/rfc3161.txt
#[derive(Clone, Debug)]
pub struct TimeStampToken {
    der: Vec<u8>,
    signed_data: SignedData,
    tst_info: TstInfo,
}

impl TimeStampToken {
    /// Parse the token out of a DER-encoded `TimeStampResp`.
    ///
    /// Fails with [`TimeStampError::NotGranted`] if the service did not
    /// grant the request.
    pub fn from_response_der(response: &[u8]) -> Result<Self, TimeStampError> {
        let resp: TimeStampResp = rasn::der::decode(response)?;

        if !resp.status.is_granted() {
            return Err(TimeStampError::NotGranted(format!("{:?}", resp.status.status)));
        }

        let Some(content_info) = resp.time_stamp_token else {
            return Err(TimeStampError::DecodeError(
                "granted response carries no time stamp token".to_string(),
            ));
        };

        Self::from_content_info(content_info)
    }

    /// Parse a bare DER-encoded time stamp token.
    pub fn from_der(der: &[u8]) -> Result<Self, TimeStampError> {
        let content_info: ContentInfo = rasn::der::decode(der)?;
        Self::from_content_info(content_info)
    }

    fn from_content_info(content_info: ContentInfo) -> Result<Self, TimeStampError> {
        let (signed_data, tst_info) = decode_content_info(&content_info)?;
        let der = rasn::der::encode(&content_info)?;

        Ok(Self {
            der,
            signed_data,
            tst_info,
        })
    }

    /// DER encoding of the token.
    pub fn as_der(&self) -> &[u8] {
        &self.der
    }

    /// Consume the token, returning its DER encoding.
    pub fn into_der(self) -> Vec<u8> {
        self.der
    }

    /// Time at which the authority created the token.
    pub fn gen_time(&self) -> DateTime<Utc> {
        self.tst_info.gen_time.with_timezone(&Utc)
    }

    /// Hashed message the token covers.
    pub fn message_imprint(&self) -> &[u8] {
        self.tst_info.message_imprint.hashed_message.as_ref()
    }

    pub(crate) fn nonce(&self) -> Option<&Integer> {
        self.tst_info.nonce.as_ref()
    }

    /// Check that the token covers `message`.
    ///
    /// Only SHA-256 imprints are accepted.
    pub fn verify_message_imprint(&self, message: &[u8]) -> Result<(), TimeStampError> {
        let sha256_oid = oid(SHA256_OID).ok_or(TimeStampError::UnsupportedAlgorithm)?;

        if self.tst_info.message_imprint.hash_algorithm.algorithm != sha256_oid {
            return Err(TimeStampError::UnsupportedAlgorithm);
        }

        if self.message_imprint() != sha256(message).as_slice() {
            return Err(TimeStampError::InvalidData);
        }

        Ok(())
    }

    /// Verify the authority's signature over the token.
    ///
    /// The signing certificate must be embedded in the token, carry the
    /// time stamping key purpose and be valid at [`Self::gen_time`].
    /// Returns that certificate.
    pub fn verify_signature(&self) -> Result<CertificateInfo, TimeStampError> {
        verify_time_stamp(&self.signed_data, self.gen_time())
    }
}

fn decode_content_info(
    content_info: &ContentInfo,
) -> Result<(SignedData, TstInfo), TimeStampError> {
    let signed_data_oid = oid(SIGNED_DATA_OID)
        .ok_or_else(|| TimeStampError::InternalError("bad signed data OID".to_string()))?;
    let tst_info_oid = oid(TST_INFO_OID)
        .ok_or_else(|| TimeStampError::InternalError("bad TSTInfo OID".to_string()))?;

    if content_info.content_type != signed_data_oid {
        return Err(TimeStampError::DecodeError(
            "time stamp has invalid OID".to_string(),
        ));
    }

    let signed_data: SignedData = rasn::der::decode(content_info.content.as_bytes())
        .map_err(|_err| TimeStampError::DecodeError("time stamp invalid".to_string()))?;

    if signed_data.encap_content_info.content_type != tst_info_oid {
        return Err(TimeStampError::DecodeError(
            "time stamp does not carry TSTInfo".to_string(),
        ));
    }

    let Some(content) = &signed_data.encap_content_info.content else {
        return Err(TimeStampError::DecodeError(
            "time stamp has no content".to_string(),
        ));
    };

    let tst_info = rasn::der::decode::<TstInfo>(content.as_ref())?;
    Ok((signed_data, tst_info))
}
