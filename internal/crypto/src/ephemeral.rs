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

//! Ephemeral Ed25519 PKI, time stamp tokens and OCSP responses for tests.
//!
//! Certificates are built with `rasn-pkix` and signed with `ed25519-dalek`.
//! Nothing generated here should ever be trusted outside a test.

use chrono::{DateTime, SubsecRound, Utc};
use ed25519_dalek::{pkcs8::EncodePrivateKey, Signer, SigningKey, VerifyingKey};
use pkcs8::{der::pem::LineEnding, PrivateKeyInfo};
use rand::{thread_rng, Rng};
use rasn::types::{
    Any, BitString, Ia5String, Integer, ObjectIdentifier, OctetString, PrintableString, SetOf,
};
use rasn_cms::{
    CertificateChoices, EncapsulatedContentInfo, IssuerAndSerialNumber, SignedData,
    SignerIdentifier, SignerInfo,
};
use rasn_ocsp::{
    BasicOcspResponse, CertStatus, OcspResponseStatus, ResponderId, ResponseBytes, ResponseData,
    RevokedInfo, SingleResponse,
};
use rasn_pkix::{
    AccessDescription, AlgorithmIdentifier, Attribute, AttributeTypeAndValue, BasicConstraints,
    Certificate, DistributionPoint, DistributionPointName, Extension, Extensions, GeneralName,
    GeneralNames, Name, RelativeDistinguishedName, SubjectPublicKeyInfo, TbsCertificate, Time,
    Validity, Version,
};
use thiserror::Error;

use crate::{
    hash::{sha1, sha256},
    ocsp::cert_id,
    time_stamp::asn1::{
        oid as oid_from, sha256_algorithm, ContentInfo, MessageImprint, PkiStatusInfo,
        TimeStampReq, TimeStampResp, TstInfo, CONTENT_TYPE_OID, MESSAGE_DIGEST_OID,
        SIGNED_DATA_OID, TST_INFO_OID,
    },
};

/// OID id-ed25519 (1.3.101.112)
const ED25519_OID: &[u32] = &[1, 3, 101, 112];

/// OID commonName (2.5.4.3)
const CN_OID: &[u32] = &[2, 5, 4, 3];

/// OID organizationName (2.5.4.10)
const ORG_OID: &[u32] = &[2, 5, 4, 10];

/// OID id-ce-basicConstraints (2.5.29.19)
const BASIC_CONSTRAINTS_OID: &[u32] = &[2, 5, 29, 19];

/// OID id-ce-subjectKeyIdentifier (2.5.29.14)
const SUBJECT_KEY_ID_OID: &[u32] = &[2, 5, 29, 14];

/// OID id-ce-cRLDistributionPoints (2.5.29.31)
const CRL_DP_OID: &[u32] = &[2, 5, 29, 31];

/// OID id-pe-authorityInfoAccess (1.3.6.1.5.5.7.1.1)
const AIA_OID: &[u32] = &[1, 3, 6, 1, 5, 5, 7, 1, 1];

/// OID id-ad-ocsp (1.3.6.1.5.5.7.48.1)
const AD_OCSP_OID: &[u32] = &[1, 3, 6, 1, 5, 5, 7, 48, 1];

/// OID id-pkix-ocsp-basic (1.3.6.1.5.5.7.48.1.1)
const OCSP_BASIC_OID: &[u32] = &[1, 3, 6, 1, 5, 5, 7, 48, 1, 1];

/// OID id-ce-extKeyUsage (2.5.29.37)
const EXT_KEY_USAGE_OID: &[u32] = &[2, 5, 29, 37];

/// OID id-kp-timeStamping (1.3.6.1.5.5.7.3.8)
const KP_TIME_STAMPING_OID: &[u32] = &[1, 3, 6, 1, 5, 5, 7, 3, 8];

/// OID id-kp-OCSPSigning (1.3.6.1.5.5.7.3.9)
const KP_OCSP_SIGNING_OID: &[u32] = &[1, 3, 6, 1, 5, 5, 7, 3, 9];

/// Private-arc OID for the filler extension used to inflate certificates.
const PADDING_OID: &[u32] = &[1, 3, 6, 1, 4, 1, 55555, 1];

/// Private-arc OID used as the TSA policy.
const TSA_POLICY_OID: &[u32] = &[1, 3, 6, 1, 4, 1, 55555, 2];

/// Errors from building ephemeral test material.
#[derive(Debug, Error)]
#[error("ephemeral PKI error: {0}")]
pub struct EphemeralError(String);

/// Result type for this module.
pub type Result<T> = std::result::Result<T, EphemeralError>;

fn err<E: std::fmt::Display>(e: E) -> EphemeralError {
    EphemeralError(e.to_string())
}

fn oid(components: &[u32]) -> Result<ObjectIdentifier> {
    ObjectIdentifier::new(components.to_vec()).ok_or_else(|| err("invalid OID"))
}

/// Options controlling [`generate_chain`].
#[derive(Clone, Debug, Default)]
pub struct ChainOptions {
    /// Insert an intermediate CA between the root and the leaf.
    pub intermediate: bool,

    /// OCSP responder URL placed in the AIA extension of every
    /// non-root certificate.
    pub ocsp_url: Option<String>,

    /// CRL distribution point placed in every non-root certificate.
    pub crl_url: Option<String>,

    /// Bytes of filler added to the leaf certificate.
    pub leaf_padding: usize,
}

/// A generated certificate chain and the leaf's key.
pub struct EphemeralChain {
    /// Root CA certificate (self-signed).
    pub root_der: Vec<u8>,

    /// Intermediate CA certificate, if requested.
    pub intermediate_der: Option<Vec<u8>>,

    /// Leaf certificate.
    pub leaf_der: Vec<u8>,

    /// Leaf private key.
    pub leaf_key: SigningKey,

    /// Private key of the leaf's issuer, which also answers OCSP requests
    /// for the leaf.
    pub issuer_key: SigningKey,
}

impl EphemeralChain {
    /// Certificate that issued the leaf.
    pub fn issuer_der(&self) -> &[u8] {
        self.intermediate_der.as_deref().unwrap_or(&self.root_der)
    }

    /// Chain ordered leaf first, root last.
    pub fn chain(&self) -> Vec<Vec<u8>> {
        let mut chain = vec![self.leaf_der.clone()];
        if let Some(intermediate) = &self.intermediate_der {
            chain.push(intermediate.clone());
        }
        chain.push(self.root_der.clone());
        chain
    }

    /// Chain as a PEM bundle, leaf first.
    pub fn chain_pem(&self) -> Result<String> {
        let mut pem = String::new();
        for der in self.chain() {
            pem.push_str(
                &pkcs8::der::pem::encode_string("CERTIFICATE", LineEnding::LF, &der)
                    .map_err(err)?,
            );
        }
        Ok(pem)
    }

    /// Leaf key as unencrypted PKCS#8 PEM.
    pub fn private_key_pem(&self) -> Result<String> {
        Ok(self
            .leaf_key
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(err)?
            .to_string())
    }

    /// Leaf key as PBES2-encrypted PKCS#8 PEM.
    pub fn encrypted_private_key_pem(&self, password: &str) -> Result<String> {
        let doc = self.leaf_key.to_pkcs8_der().map_err(err)?;
        let info = PrivateKeyInfo::try_from(doc.as_bytes()).map_err(err)?;
        let encrypted = info.encrypt(thread_rng(), password).map_err(err)?;

        Ok(encrypted
            .to_pem("ENCRYPTED PRIVATE KEY", LineEnding::LF)
            .map_err(err)?
            .to_string())
    }
}

/// Generate a root CA, optional intermediate and leaf, all Ed25519.
pub fn generate_chain(options: &ChainOptions) -> Result<EphemeralChain> {
    let root_key = generate_ed25519_keypair();
    let root_name = build_name("pades-ephemeral-root.local", "Ephemeral Root CA")?;
    let root = CertTemplate::ca(root_name.clone(), &root_key);
    let root_der = build_cert(&root, &root_name, &root_key)?;

    let (issuer_name, issuer_key, intermediate_der) = if options.intermediate {
        let key = generate_ed25519_keypair();
        let name = build_name("pades-ephemeral-intermediate.local", "Ephemeral Intermediate CA")?;
        let template = CertTemplate {
            ocsp_url: options.ocsp_url.clone(),
            crl_url: options.crl_url.clone(),
            ..CertTemplate::ca(name.clone(), &key)
        };
        let der = build_cert(&template, &root_name, &root_key)?;
        (name, key, Some(der))
    } else {
        (root_name, root_key, None)
    };

    let leaf_key = generate_ed25519_keypair();
    let leaf = CertTemplate {
        ocsp_url: options.ocsp_url.clone(),
        crl_url: options.crl_url.clone(),
        padding: options.leaf_padding,
        ..CertTemplate::end_entity(
            build_name("pades-ephemeral-signer.local", "Ephemeral Signer")?,
            &leaf_key,
        )
    };
    let leaf_der = build_cert(&leaf, &issuer_name, &issuer_key)?;

    Ok(EphemeralChain {
        root_der,
        intermediate_der,
        leaf_der,
        leaf_key,
        issuer_key,
    })
}

/// Build a granted `TimeStampResp` whose token covers `message`.
///
/// The token is signed by a freshly generated authority.
pub fn time_stamp_response(message: &[u8], nonce: Option<i64>) -> Result<Vec<u8>> {
    time_stamp_response_at(message, nonce, Utc::now())
}

/// Like [`time_stamp_response`] with an explicit generation time.
pub fn time_stamp_response_at(
    message: &[u8],
    nonce: Option<i64>,
    gen_time: DateTime<Utc>,
) -> Result<Vec<u8>> {
    EphemeralTsa::generate(gen_time)?.response(message, nonce, gen_time)
}

/// Build a granted `TimeStampResp` over `message` whose token is flawed
/// as described by `forgery`.
///
/// The token still parses and its message imprint matches `message`.
pub fn forged_time_stamp_response(message: &[u8], forgery: TokenForgery) -> Result<Vec<u8>> {
    let now = Utc::now();
    let tsa = EphemeralTsa::build(now, forgery != TokenForgery::WrongKeyPurpose)?;
    tsa.response_with(message, None, now, Some(forgery))
}

/// Ways [`forged_time_stamp_response`] departs from a well-formed token.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TokenForgery {
    /// No signer and no certificates.
    Unsigned,

    /// The signature value is corrupted.
    BadSignature,

    /// The `TSTInfo` was replaced after signing.
    AlteredContent,

    /// The TSA certificate lacks the time stamping key purpose.
    WrongKeyPurpose,
}

/// A time stamp authority: a root CA and the TSA certificate it issued.
pub struct EphemeralTsa {
    /// Root CA certificate.
    pub root_der: Vec<u8>,

    /// Certificate the tokens are signed with.
    pub tsa_der: Vec<u8>,

    tsa_key: SigningKey,
}

impl EphemeralTsa {
    /// Generate an authority whose certificates are valid around `at`.
    pub fn generate(at: DateTime<Utc>) -> Result<Self> {
        Self::build(at, true)
    }

    fn build(at: DateTime<Utc>, time_stamping: bool) -> Result<Self> {
        let root_key = generate_ed25519_keypair();
        let root_name = build_name("pades-ephemeral-tsa-root.local", "Ephemeral TSA Root")?;
        let root = CertTemplate {
            validity: validity_around(at),
            ..CertTemplate::ca(root_name.clone(), &root_key)
        };
        let root_der = build_cert(&root, &root_name, &root_key)?;

        let tsa_key = generate_ed25519_keypair();
        let tsa = CertTemplate {
            key_purpose: time_stamping.then_some(KP_TIME_STAMPING_OID),
            validity: validity_around(at),
            ..CertTemplate::end_entity(
                build_name("pades-ephemeral-tsa.local", "Ephemeral TSA")?,
                &tsa_key,
            )
        };
        let tsa_der = build_cert(&tsa, &root_name, &root_key)?;

        Ok(Self {
            root_der,
            tsa_der,
            tsa_key,
        })
    }

    /// Build a granted `TimeStampResp` whose signed token covers `message`.
    pub fn response(
        &self,
        message: &[u8],
        nonce: Option<i64>,
        gen_time: DateTime<Utc>,
    ) -> Result<Vec<u8>> {
        self.response_with(message, nonce, gen_time, None)
    }

    fn response_with(
        &self,
        message: &[u8],
        nonce: Option<i64>,
        gen_time: DateTime<Utc>,
        forgery: Option<TokenForgery>,
    ) -> Result<Vec<u8>> {
        let tst_info = tst_info(message, nonce, gen_time)?;
        let content = rasn::der::encode(&tst_info).map_err(err)?;

        let signed_data = if forgery == Some(TokenForgery::Unsigned) {
            SignedData {
                version: Integer::from(3_i64),
                digest_algorithms: SetOf::new(),
                encap_content_info: encapsulated(content)?,
                certificates: None,
                crls: None,
                signer_infos: SetOf::new(),
            }
        } else {
            let tsa_cert: Certificate = rasn::der::decode(&self.tsa_der).map_err(err)?;
            let root_cert: Certificate = rasn::der::decode(&self.root_der).map_err(err)?;

            let attrs = signed_attributes(&content)?;
            let mut signature = self
                .tsa_key
                .sign(&rasn::der::encode(&attrs).map_err(err)?)
                .to_bytes()
                .to_vec();

            if forgery == Some(TokenForgery::BadSignature) {
                if let Some(byte) = signature.first_mut() {
                    *byte ^= 0xff;
                }
            }

            let content = if forgery == Some(TokenForgery::AlteredContent) {
                let altered = TstInfo {
                    serial_number: serial_number(),
                    ..tst_info
                };
                rasn::der::encode(&altered).map_err(err)?
            } else {
                content
            };

            let signer_info = SignerInfo {
                version: Integer::from(1_i64),
                sid: SignerIdentifier::IssuerAndSerialNumber(IssuerAndSerialNumber {
                    issuer: tsa_cert.tbs_certificate.issuer.clone(),
                    serial_number: tsa_cert.tbs_certificate.serial_number.clone(),
                }),
                digest_algorithm: sha256_algorithm().ok_or_else(|| err("invalid OID"))?,
                signed_attrs: Some(attrs),
                signature_algorithm: ed25519_algorithm_identifier()?,
                signature: OctetString::from(signature),
                unsigned_attrs: None,
            };

            SignedData {
                version: Integer::from(3_i64),
                digest_algorithms: SetOf::from_vec(vec![
                    sha256_algorithm().ok_or_else(|| err("invalid OID"))?
                ]),
                encap_content_info: encapsulated(content)?,
                certificates: Some(SetOf::from_vec(vec![
                    CertificateChoices::Certificate(Box::new(tsa_cert)),
                    CertificateChoices::Certificate(Box::new(root_cert)),
                ])),
                crls: None,
                signer_infos: SetOf::from_vec(vec![signer_info]),
            }
        };

        let token = ContentInfo {
            content_type: oid_from(SIGNED_DATA_OID).ok_or_else(|| err("invalid OID"))?,
            content: Any::new(rasn::der::encode(&signed_data).map_err(err)?),
        };

        let response = TimeStampResp {
            status: PkiStatusInfo {
                status: Integer::from(0_i64),
                status_string: None,
                fail_info: None,
            },
            time_stamp_token: Some(token),
        };

        rasn::der::encode(&response).map_err(err)
    }
}

fn tst_info(message: &[u8], nonce: Option<i64>, gen_time: DateTime<Utc>) -> Result<TstInfo> {
    Ok(TstInfo {
        version: Integer::from(1_i64),
        policy: oid(TSA_POLICY_OID)?,
        message_imprint: MessageImprint {
            hash_algorithm: sha256_algorithm().ok_or_else(|| err("invalid OID"))?,
            hashed_message: OctetString::from(sha256(message)),
        },
        serial_number: serial_number(),
        gen_time: gen_time.trunc_subsecs(0).fixed_offset(),
        accuracy: None,
        ordering: false,
        nonce: nonce.map(Integer::from),
        tsa: None,
        extensions: None,
    })
}

fn encapsulated(content: Vec<u8>) -> Result<EncapsulatedContentInfo> {
    Ok(EncapsulatedContentInfo {
        content_type: oid_from(TST_INFO_OID).ok_or_else(|| err("invalid OID"))?,
        content: Some(OctetString::from(content)),
    })
}

fn signed_attributes(content: &[u8]) -> Result<SetOf<Attribute>> {
    let content_type = rasn::der::encode(&oid(TST_INFO_OID)?).map_err(err)?;
    let digest = rasn::der::encode(&OctetString::from(sha256(content))).map_err(err)?;

    Ok(SetOf::from_vec(vec![
        attribute(CONTENT_TYPE_OID, content_type)?,
        attribute(MESSAGE_DIGEST_OID, digest)?,
    ]))
}

fn attribute(type_oid: &[u32], value_der: Vec<u8>) -> Result<Attribute> {
    Ok(Attribute {
        r#type: oid(type_oid)?,
        values: SetOf::from_vec(vec![Any::new(value_der)]),
    })
}

/// Options for [`ocsp_response`].
#[derive(Clone, Debug)]
pub struct OcspOptions {
    /// Report the leaf revoked at this time rather than good.
    pub revoked_at: Option<DateTime<Utc>>,

    /// `thisUpdate` of the single response.
    pub this_update: DateTime<Utc>,

    /// `nextUpdate` of the single response.
    pub next_update: Option<DateTime<Utc>>,

    /// Sign with a responder certificate the leaf's issuer delegated to.
    pub delegated: bool,

    /// Name the leaf's issuer as responder but sign with an unrelated key.
    pub wrong_key: bool,
}

impl Default for OcspOptions {
    fn default() -> Self {
        Self {
            revoked_at: None,
            this_update: Utc::now(),
            next_update: None,
            delegated: false,
            wrong_key: false,
        }
    }
}

/// Build a successful OCSP response about `chain`'s leaf.
///
/// Unless [`OcspOptions::delegated`] is set, the response is signed by the
/// leaf's issuer directly.
pub fn ocsp_response(chain: &EphemeralChain, options: &OcspOptions) -> Result<Vec<u8>> {
    let issuer: Certificate = rasn::der::decode(chain.issuer_der()).map_err(err)?;

    let (responder_key, certs) = if options.delegated {
        let key = generate_ed25519_keypair();
        let template = CertTemplate {
            key_purpose: Some(KP_OCSP_SIGNING_OID),
            ..CertTemplate::end_entity(
                build_name("pades-ephemeral-ocsp.local", "Ephemeral OCSP Responder")?,
                &key,
            )
        };
        let der = build_cert(&template, &issuer.tbs_certificate.subject, &chain.issuer_key)?;
        let cert: Certificate = rasn::der::decode(&der).map_err(err)?;
        (key, Some(vec![cert]))
    } else {
        (chain.issuer_key.clone(), None)
    };

    let signing_key = if options.wrong_key {
        generate_ed25519_keypair()
    } else {
        responder_key.clone()
    };

    let cert_status = match options.revoked_at {
        Some(at) => CertStatus::Revoked(RevokedInfo {
            revocation_time: at.trunc_subsecs(0).fixed_offset(),
            revocation_reason: None,
        }),
        None => CertStatus::Good,
    };

    let tbs = ResponseData {
        version: Integer::from(0_i64),
        responder_id: ResponderId::ByKey(OctetString::from(sha1(
            responder_key.verifying_key().as_bytes(),
        ))),
        produced_at: Utc::now().trunc_subsecs(0).fixed_offset(),
        responses: vec![SingleResponse {
            cert_id: cert_id(&chain.leaf_der, chain.issuer_der()).map_err(err)?,
            cert_status,
            this_update: options.this_update.trunc_subsecs(0).fixed_offset(),
            next_update: options
                .next_update
                .map(|t| t.trunc_subsecs(0).fixed_offset()),
            single_extensions: None,
        }],
        response_extensions: None,
    };

    let signature = signing_key.sign(&rasn::der::encode(&tbs).map_err(err)?);

    let basic = BasicOcspResponse {
        tbs_response_data: tbs,
        signature_algorithm: ed25519_algorithm_identifier()?,
        signature: BitString::from_slice(signature.to_bytes().as_slice()),
        certs,
    };

    let response = rasn_ocsp::OcspResponse {
        status: OcspResponseStatus::Successful,
        bytes: Some(ResponseBytes {
            r#type: oid(OCSP_BASIC_OID)?,
            response: OctetString::from(rasn::der::encode(&basic).map_err(err)?),
        }),
    };

    rasn::der::encode(&response).map_err(err)
}

/// Build a `TimeStampResp` with status `rejection` and no token.
pub fn rejected_time_stamp_response() -> Result<Vec<u8>> {
    let response = TimeStampResp {
        status: PkiStatusInfo {
            status: Integer::from(2_i64),
            status_string: None,
            fail_info: None,
        },
        time_stamp_token: None,
    };

    rasn::der::encode(&response).map_err(err)
}

/// Build a `TimeStampReq` over `message` with a fixed nonce.
pub fn time_stamp_request(message: &[u8], nonce: i64) -> Result<Vec<u8>> {
    let request = TimeStampReq {
        version: Integer::from(1_i64),
        message_imprint: MessageImprint {
            hash_algorithm: sha256_algorithm().ok_or_else(|| err("invalid OID"))?,
            hashed_message: OctetString::from(sha256(message)),
        },
        req_policy: None,
        nonce: Some(Integer::from(nonce)),
        cert_req: true,
        extensions: None,
    };

    rasn::der::encode(&request).map_err(err)
}

struct CertTemplate {
    subject: Name,
    subject_key: VerifyingKey,
    ca: bool,
    key_purpose: Option<&'static [u32]>,
    ocsp_url: Option<String>,
    crl_url: Option<String>,
    padding: usize,
    validity: Validity,
}

impl CertTemplate {
    fn ca(subject: Name, key: &SigningKey) -> Self {
        Self {
            subject,
            subject_key: key.verifying_key(),
            ca: true,
            key_purpose: None,
            ocsp_url: None,
            crl_url: None,
            padding: 0,
            validity: validity_around(Utc::now()),
        }
    }

    fn end_entity(subject: Name, key: &SigningKey) -> Self {
        Self {
            ca: false,
            ..Self::ca(subject, key)
        }
    }
}

fn generate_ed25519_keypair() -> SigningKey {
    let mut seed = [0u8; 32];
    thread_rng().fill(&mut seed);
    SigningKey::from_bytes(&seed)
}

fn dn_attr(oid_components: &[u32], value: &str) -> Result<AttributeTypeAndValue> {
    let ps = PrintableString::try_from(value.to_string()).map_err(err)?;
    let value_der = rasn::der::encode(&ps).map_err(err)?;

    Ok(AttributeTypeAndValue {
        r#type: oid(oid_components)?,
        value: Any::new(value_der),
    })
}

fn rdn_single(oid_components: &[u32], value: &str) -> Result<RelativeDistinguishedName> {
    let mut set = SetOf::new();
    set.insert(dn_attr(oid_components, value)?);
    Ok(RelativeDistinguishedName::from(set))
}

fn build_name(cn: &str, org: &str) -> Result<Name> {
    Ok(Name::RdnSequence(vec![
        rdn_single(CN_OID, cn)?,
        rdn_single(ORG_OID, org)?,
    ]))
}

fn ed25519_algorithm_identifier() -> Result<AlgorithmIdentifier> {
    Ok(AlgorithmIdentifier {
        algorithm: oid(ED25519_OID)?,
        parameters: None,
    })
}

/// Validity: notBefore = at - 1 day, notAfter = at + 365 days.
fn validity_around(at: DateTime<Utc>) -> Validity {
    let at = at.trunc_subsecs(0);

    Validity {
        not_before: Time::Utc(at - chrono::Duration::days(1)),
        not_after: Time::Utc(at + chrono::Duration::days(365)),
    }
}

/// Positive serial number, unique with overwhelming probability.
fn serial_number() -> Integer {
    let n = thread_rng().gen::<u64>() >> 8;
    Integer::from((n as i64).saturating_add(1))
}

fn uri(value: &str) -> Result<GeneralName> {
    Ok(GeneralName::Uri(
        Ia5String::try_from(value.to_string()).map_err(err)?,
    ))
}

fn extensions_for(template: &CertTemplate) -> Result<Vec<Extension>> {
    let mut exts = Vec::new();

    if template.ca {
        exts.push(Extension {
            extn_id: oid(BASIC_CONSTRAINTS_OID)?,
            critical: true,
            extn_value: rasn::der::encode(&BasicConstraints {
                ca: true,
                path_len_constraint: None,
            })
            .map_err(err)?
            .into(),
        });
    }

    exts.push(Extension {
        extn_id: oid(SUBJECT_KEY_ID_OID)?,
        critical: false,
        extn_value: rasn::der::encode(&OctetString::from(sha1(template.subject_key.as_bytes())))
            .map_err(err)?
            .into(),
    });

    if let Some(purpose) = template.key_purpose {
        exts.push(Extension {
            extn_id: oid(EXT_KEY_USAGE_OID)?,
            critical: true,
            extn_value: rasn::der::encode(&vec![oid(purpose)?]).map_err(err)?.into(),
        });
    }

    if let Some(url) = &template.ocsp_url {
        let aia = vec![AccessDescription {
            access_method: oid(AD_OCSP_OID)?,
            access_location: uri(url)?,
        }];

        exts.push(Extension {
            extn_id: oid(AIA_OID)?,
            critical: false,
            extn_value: rasn::der::encode(&aia).map_err(err)?.into(),
        });
    }

    if let Some(url) = &template.crl_url {
        let points = vec![DistributionPoint {
            distribution_point: Some(DistributionPointName::FullName(GeneralNames::from(
                vec![uri(url)?],
            ))),
            reasons: None,
            crl_issuer: None,
        }];

        exts.push(Extension {
            extn_id: oid(CRL_DP_OID)?,
            critical: false,
            extn_value: rasn::der::encode(&points).map_err(err)?.into(),
        });
    }

    if template.padding > 0 {
        exts.push(Extension {
            extn_id: oid(PADDING_OID)?,
            critical: false,
            extn_value: rasn::der::encode(&OctetString::from(vec![0u8; template.padding]))
                .map_err(err)?
                .into(),
        });
    }

    Ok(exts)
}

fn build_cert(
    template: &CertTemplate,
    issuer: &Name,
    issuer_key: &SigningKey,
) -> Result<Vec<u8>> {
    let spki = SubjectPublicKeyInfo {
        algorithm: ed25519_algorithm_identifier()?,
        subject_public_key: BitString::from_slice(template.subject_key.as_bytes()),
    };

    let tbs = TbsCertificate {
        version: Version::V3,
        serial_number: serial_number(),
        signature: ed25519_algorithm_identifier()?,
        issuer: issuer.clone(),
        validity: template.validity.clone(),
        subject: template.subject.clone(),
        subject_public_key_info: spki,
        issuer_unique_id: None,
        subject_unique_id: None,
        extensions: Some(Extensions::from(extensions_for(template)?)),
    };

    let tbs_der = rasn::der::encode(&tbs).map_err(err)?;
    let sig = issuer_key.sign(&tbs_der);

    let cert = Certificate {
        tbs_certificate: tbs,
        signature_algorithm: ed25519_algorithm_identifier()?,
        signature_value: BitString::from_slice(sig.to_bytes().as_slice()),
    };

    rasn::der::encode(&cert).map_err(err)
}
