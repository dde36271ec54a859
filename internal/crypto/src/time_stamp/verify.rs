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

//! Verification of the CMS signature carried by a time stamp token.

use chrono::{DateTime, Utc};
use rasn::{prelude::*, types::SetOf};
use rasn_cms::{Attribute, CertificateChoices, SignedData, SignerIdentifier, SignerInfo};
use rasn_pkix::Certificate;
use sha2::{Digest, Sha256, Sha384, Sha512};

use crate::{
    certificate::{find_issuer, CertificateInfo, KeyPurpose},
    raw_signature::validator_for_sig_and_hash_algs,
    time_stamp::{
        asn1::{
            CONTENT_TYPE_OID, MESSAGE_DIGEST_OID, SHA256_OID, SHA384_OID, SHA512_OID,
            TST_INFO_OID,
        },
        TimeStampError,
    },
};

/// Find a signer of `signed_data` whose signature over the token content
/// verifies and whose certificate may issue time stamps at `gen_time`.
///
/// Returns the certificate of the first such signer.
pub(crate) fn verify_time_stamp(
    signed_data: &SignedData,
    gen_time: DateTime<Utc>,
) -> Result<CertificateInfo, TimeStampError> {
    let certs: Vec<&Certificate> = match &signed_data.certificates {
        Some(set) => set
            .to_vec()
            .into_iter()
            .filter_map(|choice| match choice {
                CertificateChoices::Certificate(c) => Some(c.as_ref()),
                _ => None,
            })
            .collect(),
        None => Vec::new(),
    };

    if certs.is_empty() {
        return Err(TimeStampError::InvalidCertificate(
            "time stamp contains no certificates".to_string(),
        ));
    }

    let signer_infos = signed_data.signer_infos.to_vec();
    if signer_infos.is_empty() {
        return Err(TimeStampError::InvalidSignature(
            "time stamp has no signer".to_string(),
        ));
    }

    let Some(content) = &signed_data.encap_content_info.content else {
        return Err(TimeStampError::DecodeError(
            "time stamp has no content".to_string(),
        ));
    };

    let mut last_err =
        TimeStampError::InvalidSignature("no certificate matches the signer".to_string());

    for signer_info in signer_infos {
        let Some(cert) = certs.iter().find(|c| is_signer(c, &signer_info.sid)) else {
            continue;
        };

        match verify_signer(signer_info, cert, content, &certs, gen_time) {
            Ok(info) => return Ok(info),
            Err(err) => last_err = err,
        }
    }

    Err(last_err)
}

fn is_signer(cert: &Certificate, sid: &SignerIdentifier) -> bool {
    match sid {
        SignerIdentifier::IssuerAndSerialNumber(sn) => {
            sn.issuer == cert.tbs_certificate.issuer
                && sn.serial_number == cert.tbs_certificate.serial_number
        }

        SignerIdentifier::SubjectKeyIdentifier(ski) => cert
            .tbs_certificate
            .extensions
            .iter()
            .flat_map(|exts| exts.iter())
            .filter(|ext| ext.extn_id.as_ref() == SUBJECT_KEY_ID_OID)
            .filter_map(|ext| rasn::der::decode::<OctetString>(&ext.extn_value).ok())
            .any(|value| value == *ski),
    }
}

fn verify_signer(
    signer_info: &SignerInfo,
    cert: &Certificate,
    content: &[u8],
    certs: &[&Certificate],
    gen_time: DateTime<Utc>,
) -> Result<CertificateInfo, TimeStampError> {
    // RFC 3161 tokens always sign attributes rather than the bare content.
    let Some(attrs) = &signer_info.signed_attrs else {
        return Err(TimeStampError::InvalidSignature(
            "signer info has no signed attributes".to_string(),
        ));
    };

    let content_type: ObjectIdentifier = single_attribute(attrs, CONTENT_TYPE_OID)?;
    if content_type.as_ref() != TST_INFO_OID {
        return Err(TimeStampError::InvalidSignature(
            "signed content type is not TSTInfo".to_string(),
        ));
    }

    let signed_digest: OctetString = single_attribute(attrs, MESSAGE_DIGEST_OID)?;
    let digest = digest(&signer_info.digest_algorithm.algorithm, content)
        .ok_or(TimeStampError::UnsupportedAlgorithm)?;
    if signed_digest.as_ref() != digest.as_slice() {
        return Err(TimeStampError::InvalidSignature(
            "message digest does not match token content".to_string(),
        ));
    }

    let validator = validator_for_sig_and_hash_algs(
        &signer_info.signature_algorithm.algorithm,
        Some(&signer_info.digest_algorithm.algorithm),
    )
    .ok_or(TimeStampError::UnsupportedAlgorithm)?;

    let tbs = rasn::der::encode(attrs)?;
    let public_key = rasn::der::encode(&cert.tbs_certificate.subject_public_key_info)?;
    validator
        .validate(&signer_info.signature, &tbs, &public_key)
        .map_err(|e| TimeStampError::InvalidSignature(e.to_string()))?;

    let info = certificate_info(cert)?;

    if !info.is_valid_at(gen_time) {
        return Err(TimeStampError::InvalidCertificate(format!(
            "{} is not valid at {gen_time}",
            info.subject
        )));
    }

    if !info.has_key_purpose(KeyPurpose::TimeStamping) {
        return Err(TimeStampError::InvalidCertificate(format!(
            "{} is not authorized for time stamping",
            info.subject
        )));
    }

    verify_chain(&info, certs)?;

    Ok(info)
}

// Each certificate the token supplies above the signer must have signed the
// one below it. The walk stops at a self-signed certificate or when the token
// does not carry the next issuer.
fn verify_chain(signer: &CertificateInfo, certs: &[&Certificate]) -> Result<(), TimeStampError> {
    let infos = certs
        .iter()
        .map(|c| certificate_info(c))
        .collect::<Result<Vec<_>, _>>()?;

    let mut current = signer;
    for _ in 0..infos.len() {
        if current.self_signed {
            break;
        }

        match find_issuer(current, &infos) {
            Some(issuer) => current = issuer,
            None if infos
                .iter()
                .any(|c| c.subject == current.issuer && c.der != current.der) =>
            {
                return Err(TimeStampError::InvalidCertificate(format!(
                    "{} does not verify against its issuer",
                    current.subject
                )));
            }
            None => break,
        }
    }

    Ok(())
}

fn certificate_info(cert: &Certificate) -> Result<CertificateInfo, TimeStampError> {
    let der = rasn::der::encode(cert)?;
    CertificateInfo::from_der(&der).map_err(|e| TimeStampError::InvalidCertificate(e.to_string()))
}

fn single_attribute<T: Decode>(
    attrs: &SetOf<Attribute>,
    oid: &[u32],
) -> Result<T, TimeStampError> {
    let Some(attr) = attrs.to_vec().into_iter().find(|a| a.r#type.as_ref() == oid) else {
        return Err(TimeStampError::InvalidSignature(format!(
            "missing signed attribute {}",
            oid.iter().map(u32::to_string).collect::<Vec<_>>().join(".")
        )));
    };

    let values = attr.values.to_vec();
    let [value] = values.as_slice() else {
        return Err(TimeStampError::InvalidSignature(format!(
            "signed attribute has {} values, should have one",
            values.len()
        )));
    };

    Ok(rasn::der::decode::<T>(value.as_bytes())?)
}

fn digest(alg: &ObjectIdentifier, data: &[u8]) -> Option<Vec<u8>> {
    let alg: &[u32] = alg.as_ref();

    if alg == SHA256_OID {
        Some(Sha256::digest(data).to_vec())
    } else if alg == SHA384_OID {
        Some(Sha384::digest(data).to_vec())
    } else if alg == SHA512_OID {
        Some(Sha512::digest(data).to_vec())
    } else {
        None
    }
}

const SUBJECT_KEY_ID_OID: &[u32] = &[2, 5, 29, 14];
