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

//! ASN.1 structures from [RFC 3161] used by the time stamp client.
//!
//! [RFC 3161]: https://www.ietf.org/rfc/rfc3161.txt

use rasn::prelude::*;
use rasn_pkix::{AlgorithmIdentifier, Extensions, GeneralName};

/// `MessageImprint ::= SEQUENCE { hashAlgorithm, hashedMessage }`
#[derive(AsnType, Clone, Debug, Decode, Encode, PartialEq)]
pub(crate) struct MessageImprint {
    pub(crate) hash_algorithm: AlgorithmIdentifier,
    pub(crate) hashed_message: OctetString,
}

#[derive(AsnType, Clone, Debug, Decode, Encode, PartialEq)]
pub(crate) struct TimeStampReq {
    pub(crate) version: Integer,
    pub(crate) message_imprint: MessageImprint,
    pub(crate) req_policy: Option<ObjectIdentifier>,
    pub(crate) nonce: Option<Integer>,
    #[rasn(default)]
    pub(crate) cert_req: bool,
    #[rasn(tag(0))]
    pub(crate) extensions: Option<Extensions>,
}

#[derive(AsnType, Clone, Debug, Decode, Encode, PartialEq)]
pub(crate) struct PkiStatusInfo {
    pub(crate) status: Integer,
    pub(crate) status_string: Option<SequenceOf<Utf8String>>,
    pub(crate) fail_info: Option<BitString>,
}

#[derive(AsnType, Clone, Debug, Decode, Encode, PartialEq)]
pub(crate) struct TimeStampResp {
    pub(crate) status: PkiStatusInfo,
    pub(crate) time_stamp_token: Option<ContentInfo>,
}

/// CMS `ContentInfo`; a time stamp token is one of these wrapping
/// `SignedData`.
#[derive(AsnType, Clone, Debug, Decode, Encode, PartialEq)]
pub(crate) struct ContentInfo {
    pub(crate) content_type: ObjectIdentifier,

    #[rasn(tag(explicit(0)))]
    pub(crate) content: Any,
}

#[derive(AsnType, Clone, Debug, Decode, Encode, PartialEq)]
pub(crate) struct Accuracy {
    pub(crate) seconds: Option<Integer>,
    #[rasn(tag(0))]
    pub(crate) millis: Option<Integer>,
    #[rasn(tag(1))]
    pub(crate) micros: Option<Integer>,
}

#[derive(AsnType, Clone, Debug, Decode, Encode, PartialEq)]
pub(crate) struct TstInfo {
    pub(crate) version: Integer,
    pub(crate) policy: ObjectIdentifier,
    pub(crate) message_imprint: MessageImprint,
    pub(crate) serial_number: Integer,
    pub(crate) gen_time: GeneralizedTime,
    pub(crate) accuracy: Option<Accuracy>,
    #[rasn(default)]
    pub(crate) ordering: bool,
    pub(crate) nonce: Option<Integer>,
    #[rasn(tag(explicit(0)))]
    pub(crate) tsa: Option<GeneralName>,
    #[rasn(tag(1))]
    pub(crate) extensions: Option<Extensions>,
}

pub(crate) const SHA256_OID: &[u32] = &[2, 16, 840, 1, 101, 3, 4, 2, 1];
pub(crate) const SHA384_OID: &[u32] = &[2, 16, 840, 1, 101, 3, 4, 2, 2];
pub(crate) const SHA512_OID: &[u32] = &[2, 16, 840, 1, 101, 3, 4, 2, 3];
pub(crate) const SIGNED_DATA_OID: &[u32] = &[1, 2, 840, 113549, 1, 7, 2];
pub(crate) const TST_INFO_OID: &[u32] = &[1, 2, 840, 113549, 1, 9, 16, 1, 4];

// CMS signed attributes.
pub(crate) const CONTENT_TYPE_OID: &[u32] = &[1, 2, 840, 113549, 1, 9, 3];
pub(crate) const MESSAGE_DIGEST_OID: &[u32] = &[1, 2, 840, 113549, 1, 9, 4];

// PKIStatus values that carry a token.
pub(crate) const STATUS_GRANTED: i64 = 0;
pub(crate) const STATUS_GRANTED_WITH_MODS: i64 = 1;

pub(crate) fn oid(components: &[u32]) -> Option<ObjectIdentifier> {
    ObjectIdentifier::new(components.to_vec())
}

pub(crate) fn sha256_algorithm() -> Option<AlgorithmIdentifier> {
    Some(AlgorithmIdentifier {
        algorithm: oid(SHA256_OID)?,
        // Many services expect this to be NULL rather than absent.
        parameters: Some(Any::new(rasn::der::encode(&()).ok()?)),
    })
}

impl PkiStatusInfo {
    pub(crate) fn is_granted(&self) -> bool {
        self.status == Integer::from(STATUS_GRANTED)
            || self.status == Integer::from(STATUS_GRANTED_WITH_MODS)
    }
}
