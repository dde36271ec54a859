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

#![allow(dead_code)]

use std::{
    io::Write,
    path::Path,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use chrono::Utc;
use pades::{
    revocation::{RevocationRecord, RevocationSource, RevocationSourceKind},
    AlertPolicy, ExtensionMaterial, InlinePemIdentity, KeystoreIdentity, PadesPdf, PadesService,
    PdfContainerError, Settings, SignatureLevel, SignatureMaterial, SignatureParameters,
    TimeStampProvider,
};
use pades_crypto::{
    certificate::CertificateInfo,
    ephemeral::{self, generate_chain, ChainOptions, EphemeralChain},
    revocation::RevocationStatus,
    time_stamp::TimeStampError,
};

#[allow(unused_macros)]
macro_rules! assert_err {
    ($expression:expr, $($pattern:tt)+) => {
        match $expression {
            $($pattern)+ => (),
            ref e => panic!("expected `{}` but got `{:?}`", stringify!($($pattern)+), e),
        }
    }
}
#[allow(unused_imports)]
pub(super) use assert_err;

pub const UNSIGNED_PDF: &[u8] = b"%PDF-1.7\n1 0 obj << /Type /Catalog >> endobj\n%%EOF\n";

const MARKER: &str = "%%PADES ";

/// An append-only stand-in for a PDF container.
///
/// Each signature or extension appends one marker line recording the level
/// reached and the number of time stamps added.
#[derive(Clone, Debug)]
pub struct MockPdf {
    bytes: Vec<u8>,
    level: Option<SignatureLevel>,
    time_stamps: usize,
}

impl MockPdf {
    /// Bytes of a document carrying one signature at `level` with
    /// `time_stamps` time stamps.
    pub fn signed_bytes(level: SignatureLevel, time_stamps: usize) -> Vec<u8> {
        let mut bytes = UNSIGNED_PDF.to_vec();
        append_marker(&mut bytes, level, time_stamps);
        bytes
    }

    fn appended(&self, level: SignatureLevel, time_stamps: usize, payload: usize) -> Self {
        let mut bytes = self.bytes.clone();
        writeln!(bytes, "% payload {payload} bytes").ok();
        append_marker(&mut bytes, level, time_stamps);

        Self {
            bytes,
            level: Some(level),
            time_stamps: self.time_stamps + time_stamps,
        }
    }
}

fn append_marker(bytes: &mut Vec<u8>, level: SignatureLevel, time_stamps: usize) {
    writeln!(
        bytes,
        "{MARKER}level={} time-stamps={time_stamps}",
        level_name(level)
    )
    .ok();
}

fn level_name(level: SignatureLevel) -> &'static str {
    match level {
        SignatureLevel::BaselineB => "B-B",
        SignatureLevel::BaselineT => "T",
        SignatureLevel::BaselineLt => "LT",
        SignatureLevel::BaselineLta => "LTA",
    }
}

fn parse_level(name: &str) -> Result<SignatureLevel, PdfContainerError> {
    match name {
        "B-B" => Ok(SignatureLevel::BaselineB),
        "T" => Ok(SignatureLevel::BaselineT),
        "LT" => Ok(SignatureLevel::BaselineLt),
        "LTA" => Ok(SignatureLevel::BaselineLta),
        _ => Err(PdfContainerError::Malformed(format!("unknown level {name}"))),
    }
}

fn check_capacity(needed: usize, params: &SignatureParameters) -> Result<(), PdfContainerError> {
    if needed > params.reserved_capacity() {
        return Err(PdfContainerError::CapacityExceeded {
            needed,
            reserved: params.reserved_capacity(),
        });
    }
    Ok(())
}

impl PadesPdf for MockPdf {
    fn from_bytes(bytes: &[u8]) -> Result<Self, PdfContainerError> {
        if !bytes.starts_with(b"%PDF-") {
            return Err(PdfContainerError::Malformed("missing %PDF- header".into()));
        }

        let text = String::from_utf8_lossy(bytes);
        let mut level = None;
        let mut time_stamps = 0;

        for line in text.lines() {
            let Some(marker) = line.strip_prefix(MARKER) else {
                continue;
            };

            for field in marker.split_whitespace() {
                if let Some(name) = field.strip_prefix("level=") {
                    level = Some(parse_level(name)?);
                } else if let Some(count) = field.strip_prefix("time-stamps=") {
                    time_stamps += count
                        .parse::<usize>()
                        .map_err(|e| PdfContainerError::Malformed(e.to_string()))?;
                }
            }
        }

        Ok(Self {
            bytes: bytes.to_vec(),
            level,
            time_stamps,
        })
    }

    fn to_bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    fn signature_level(&self) -> Option<SignatureLevel> {
        self.level
    }

    fn time_stamp_count(&self) -> usize {
        self.time_stamps
    }

    fn data_to_sign(&self, params: &SignatureParameters) -> Result<Vec<u8>, PdfContainerError> {
        let mut data = self.bytes.clone();
        data.extend_from_slice(level_name(params.level()).as_bytes());
        Ok(data)
    }

    fn embed_signature(
        &self,
        params: &SignatureParameters,
        material: &SignatureMaterial,
    ) -> Result<Self, PdfContainerError> {
        check_capacity(material.encoded_len(), params)?;

        let time_stamps = usize::from(material.signature_time_stamp.is_some());
        Ok(self.appended(params.level(), time_stamps, material.encoded_len()))
    }

    fn time_stamp_data(&self) -> Result<Vec<u8>, PdfContainerError> {
        if self.level.is_none() {
            return Err(PdfContainerError::NoSignature);
        }
        Ok(self.bytes.clone())
    }

    fn extend(
        &self,
        params: &SignatureParameters,
        material: &ExtensionMaterial,
    ) -> Result<Self, PdfContainerError> {
        if self.level.is_none() {
            return Err(PdfContainerError::NoSignature);
        }
        check_capacity(material.encoded_len(), params)?;

        Ok(self.appended(params.level(), 1, material.encoded_len()))
    }
}

/// A time stamp authority that answers locally and counts requests.
#[derive(Debug, Default)]
pub struct CountingTsa {
    calls: AtomicUsize,
}

impl CountingTsa {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TimeStampProvider for CountingTsa {
    fn send_time_stamp_request(&self, message: &[u8]) -> Option<Result<Vec<u8>, TimeStampError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Some(
            ephemeral::time_stamp_response(message, None)
                .map_err(|e| TimeStampError::InternalError(e.to_string())),
        )
    }
}

/// What a [`StubRevocation`] source reports.
#[derive(Clone, Copy, Debug)]
pub enum StubAnswer {
    Good,
    Revoked,
    Nothing,
    Unavailable,
}

/// A revocation source with a fixed answer that counts lookups.
#[derive(Debug)]
pub struct StubRevocation {
    answer: StubAnswer,
    calls: AtomicUsize,
}

impl StubRevocation {
    pub fn new(answer: StubAnswer) -> Arc<Self> {
        Arc::new(Self {
            answer,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RevocationSource for StubRevocation {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn check(
        &self,
        _cert: &CertificateInfo,
        _issuer: &CertificateInfo,
    ) -> pades::Result<Option<RevocationRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let status = match self.answer {
            StubAnswer::Good => RevocationStatus::Good,
            StubAnswer::Revoked => RevocationStatus::Revoked {
                revoked_at: Utc::now(),
            },
            StubAnswer::Nothing => return Ok(None),
            StubAnswer::Unavailable => {
                return Err(pades::Error::RevocationUnavailable(
                    "responder unreachable".to_string(),
                ))
            }
        };

        Ok(Some(RevocationRecord {
            source: RevocationSourceKind::Ocsp,
            status,
            this_update: Utc::now(),
            next_update: None,
            der: b"stub ocsp response".to_vec(),
        }))
    }
}

/// Everything one integration test needs.
pub struct Harness {
    pub chain: EphemeralChain,
    pub tsa: Arc<CountingTsa>,
    pub revocation: Arc<StubRevocation>,
    pub service: PadesService<MockPdf>,
}

impl Harness {
    pub fn new(answer: StubAnswer) -> Self {
        Self::with_options(answer, &ChainOptions::default(), AlertPolicy::default())
    }

    pub fn with_options(answer: StubAnswer, options: &ChainOptions, alerts: AlertPolicy) -> Self {
        let chain = generate_chain(options).unwrap();
        let tsa = Arc::new(CountingTsa::default());
        let revocation = StubRevocation::new(answer);

        let settings = Settings {
            alerts,
            ..Settings::default()
        };

        let service = PadesService::<MockPdf>::new(settings)
            .unwrap()
            .with_time_stamp_provider(tsa.clone())
            .with_revocation_sources(vec![revocation.clone() as Arc<dyn RevocationSource>]);

        Self {
            chain,
            tsa,
            revocation,
            service,
        }
    }

    pub fn identity(&self) -> InlinePemIdentity {
        InlinePemIdentity::new(
            self.chain.chain_pem().unwrap(),
            self.chain.private_key_pem().unwrap(),
        )
    }

    pub fn network_calls(&self) -> usize {
        self.tsa.calls() + self.revocation.calls()
    }
}

/// Write an encrypted keystore for `chain` into `dir`.
pub fn write_keystore(dir: &Path, chain: &EphemeralChain, password: &str) -> KeystoreIdentity {
    let mut pem = chain.encrypted_private_key_pem(password).unwrap();
    pem.push_str(&chain.chain_pem().unwrap());

    let path = dir.join("signer.pem");
    std::fs::write(&path, pem).unwrap();

    KeystoreIdentity::new(path, password)
}
