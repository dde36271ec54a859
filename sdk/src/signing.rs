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

//! Signing a document up to the LTA level.

use std::path::Path;

use pades_status_tracker::StatusTracker;

use crate::{
    extension::extend_pdf,
    service::PadesService,
    trust::classify_chain,
    verifier::VerificationContext,
    DocumentSource, Error, PadesPdf, Result, SignatureLevel, SignatureMaterial,
    SignatureParameters, SignedDocument, SigningIdentity, SigningToken,
};

impl<P: PadesPdf> PadesService<P> {
    /// Sign a document directly at the LTA level.
    ///
    /// The digest is computed with LTA parameters and one signature time
    /// stamp is requested, so the result carries one time stamp.
    pub fn sign_lta_direct(
        &self,
        source: &dyn DocumentSource,
        identity: &dyn SigningIdentity,
    ) -> Result<SignedDocument> {
        let bytes = source.read_bytes()?;
        log::debug!("signing {} directly at LTA", source.name());

        let mut tracker = StatusTracker::default();
        let pdf = load_unsigned::<P>(&bytes)?;
        let token = identity.acquire()?;

        let (signed, _context) =
            self.sign_pdf(&pdf, &token, SignatureLevel::BaselineLta, &mut tracker)?;

        log::info!(
            "signed {} at {}",
            source.name(),
            SignatureLevel::BaselineLta
        );
        Ok(into_signed_document(&signed, SignatureLevel::BaselineLta, tracker))
    }

    /// Sign a document at the LT level, then extend it to LTA.
    ///
    /// The result carries two time stamps: one over the signature and one
    /// archive time stamp.
    pub fn sign_lta_two_step(
        &self,
        source: &dyn DocumentSource,
        identity: &dyn SigningIdentity,
    ) -> Result<SignedDocument> {
        let bytes = source.read_bytes()?;
        log::debug!("signing {} at LT, then extending to LTA", source.name());

        let mut tracker = StatusTracker::default();
        let pdf = load_unsigned::<P>(&bytes)?;
        let token = identity.acquire()?;

        let (signed, context) =
            self.sign_pdf(&pdf, &token, SignatureLevel::BaselineLt, &mut tracker)?;
        let extended = extend_pdf(self, &signed, &context, &mut tracker)?;

        log::info!(
            "signed {} at {}",
            source.name(),
            SignatureLevel::BaselineLta
        );
        Ok(into_signed_document(&extended, SignatureLevel::BaselineLta, tracker))
    }

    /// Sign in-memory PDF bytes. Same as [`Self::sign_lta_direct`].
    pub fn sign_bytes(
        &self,
        pdf_bytes: &[u8],
        identity: &dyn SigningIdentity,
    ) -> Result<SignedDocument> {
        self.sign_lta_direct(&crate::MemorySource::new(pdf_bytes), identity)
    }

    /// Sign the PDF at `input` with [`Self::sign_lta_two_step`] and write
    /// the result to `output`.
    pub fn sign_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        identity: &dyn SigningIdentity,
    ) -> Result<SignedDocument> {
        let signed = self.sign_lta_two_step(&crate::FileSource::new(input), identity)?;
        signed.save_to_file(output)?;
        Ok(signed)
    }

    /// Digest, sign and embed at `level`.
    ///
    /// Everything that can fail without the network (parameters, chain
    /// classification, the signature itself) happens before revocation
    /// data or a time stamp is requested.
    fn sign_pdf(
        &self,
        pdf: &P,
        token: &SigningToken,
        level: SignatureLevel,
        tracker: &mut StatusTracker,
    ) -> Result<(P, VerificationContext)> {
        let params = SignatureParameters::for_identity(level, token)?;
        let trust = classify_chain(params.cert_chain())?;

        let data = pdf.data_to_sign(&params)?;
        let signature = token.sign(&data)?;
        log::debug!(
            "{} signature over {} bytes with {}",
            token.alg(),
            data.len(),
            params.digest_algorithm()
        );

        let context = VerificationContext::assemble(
            trust,
            &self.aggregator(),
            self.settings.alerts,
            tracker,
        )?;

        let mut material = SignatureMaterial {
            signature,
            cert_chain: params.cert_chain().to_vec(),
            ..Default::default()
        };

        if level.has_validation_data() {
            material.ocsp_responses = context.evidence().ocsp_responses();
            material.crls = context.evidence().crls();
        }

        if level.has_time_stamp() {
            params.ensure_capacity(material.encoded_len() + self.settings.time_stamp_reserve)?;

            let time_stamp = self.request_time_stamp(&material.signature, &context, tracker)?;
            context.check_revocation_freshness(time_stamp.gen_time(), tracker)?;

            material.signature_time_stamp = Some(time_stamp.into_der());
        }

        params.ensure_capacity(material.encoded_len())?;

        let signed = pdf.embed_signature(&params, &material)?;

        match signed.signature_level() {
            Some(embedded) if embedded >= level => Ok((signed, context)),
            Some(embedded) => Err(Error::LevelRegression {
                from: level,
                to: embedded,
            }),
            None => Err(Error::InvalidDocument(
                "container reports no signature after embedding".to_string(),
            )),
        }
    }
}

fn load_unsigned<P: PadesPdf>(bytes: &[u8]) -> Result<P> {
    if bytes.is_empty() {
        return Err(Error::MissingInput("document"));
    }
    Ok(P::from_bytes(bytes)?)
}

pub(crate) fn into_signed_document<P: PadesPdf>(
    pdf: &P,
    level: SignatureLevel,
    tracker: StatusTracker,
) -> SignedDocument {
    SignedDocument::new(pdf.to_bytes(), level, pdf.time_stamp_count(), tracker)
}
