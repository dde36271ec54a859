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

//! Extending a signed document to the LTA level.

use pades_status_tracker::{log_item, validation_codes, StatusTracker};

use crate::{
    service::{ensure_monotonic, PadesService},
    signing::into_signed_document,
    trust::classify_chain,
    verifier::VerificationContext,
    DocumentSource, Error, ExtensionMaterial, PadesPdf, Result, SignatureLevel,
    SignatureParameters, SignedDocument, SigningIdentity,
};

impl<P: PadesPdf> PadesService<P> {
    /// Add validation data and one archive time stamp to a signed document.
    ///
    /// If `identity` is given, its chain seeds the verification context and
    /// fresh revocation data is gathered for it. Otherwise the document is
    /// extended with the archive time stamp alone.
    ///
    /// Extending a document that is already at LTA renews it: one more
    /// archive time stamp is appended and the level stays LTA.
    pub fn extend_to_lta(
        &self,
        source: &dyn DocumentSource,
        identity: Option<&dyn SigningIdentity>,
    ) -> Result<SignedDocument> {
        let bytes = source.read_bytes()?;
        if bytes.is_empty() {
            return Err(Error::MissingInput("document"));
        }

        let pdf = P::from_bytes(&bytes).map_err(|err| {
            Error::ExtensionFailed(format!("unable to load {}: {err}", source.name()))
        })?;

        if pdf.signature_level().is_none() {
            return Err(Error::ExtensionFailed(format!(
                "{} carries no recognizable signature",
                source.name()
            )));
        }

        let mut tracker = StatusTracker::default();

        let context = match identity {
            Some(identity) => {
                let chain = identity.acquire()?.cert_chain()?;
                if chain.is_empty() {
                    return Err(Error::NoSigningKey);
                }

                VerificationContext::assemble(
                    classify_chain(&chain)?,
                    &self.aggregator(),
                    self.settings.alerts,
                    &mut tracker,
                )?
            }
            None => VerificationContext::minimal(self.settings.alerts),
        };

        let extended = extend_pdf(self, &pdf, &context, &mut tracker)?;

        log::info!("extended {} to {}", source.name(), SignatureLevel::BaselineLta);
        Ok(into_signed_document(
            &extended,
            SignatureLevel::BaselineLta,
            tracker,
        ))
    }
}

/// One archive time stamp and one call to [`PadesPdf::extend`].
pub(crate) fn extend_pdf<P: PadesPdf>(
    service: &PadesService<P>,
    pdf: &P,
    context: &VerificationContext,
    tracker: &mut StatusTracker,
) -> Result<P> {
    let from = pdf.signature_level().ok_or_else(|| {
        Error::ExtensionFailed("document carries no recognizable signature".to_string())
    })?;

    context.check_proof_of_existence(from, tracker)?;

    let params = SignatureParameters::for_extension(SignatureLevel::BaselineLta);

    let mut material = ExtensionMaterial {
        cert_chain: context.adjuncts().to_der_chain(),
        ocsp_responses: context.evidence().ocsp_responses(),
        crls: context.evidence().crls(),
        ..Default::default()
    };

    params.ensure_capacity(material.encoded_len() + service.settings.time_stamp_reserve)?;

    let data = pdf.time_stamp_data()?;
    let time_stamp = service.request_time_stamp(&data, context, tracker)?;
    context.check_revocation_freshness(time_stamp.gen_time(), tracker)?;
    let gen_time = time_stamp.gen_time();

    material.archive_time_stamp = time_stamp.into_der();
    params.ensure_capacity(material.encoded_len())?;

    let extended = pdf.extend(&params, &material)?;

    let to = extended.signature_level().ok_or_else(|| {
        Error::ExtensionFailed("container reports no signature after extension".to_string())
    })?;
    ensure_monotonic(from, to)?;

    if to != SignatureLevel::BaselineLta {
        return Err(Error::ExtensionFailed(format!(
            "container produced {to} instead of {}",
            SignatureLevel::BaselineLta
        )));
    }

    if extended.time_stamp_count() != pdf.time_stamp_count() + 1 {
        return Err(Error::ExtensionFailed(format!(
            "expected {} time stamps after extension, found {}",
            pdf.time_stamp_count() + 1,
            extended.time_stamp_count()
        )));
    }

    if !extended.to_bytes().starts_with(&pdf.to_bytes()) {
        return Err(Error::ExtensionFailed(
            "container rewrote existing bytes instead of appending an incremental update"
                .to_string(),
        ));
    }

    let description = if from == SignatureLevel::BaselineLta {
        format!("archive time stamp renewed at {gen_time}")
    } else {
        format!("archive time stamp added at {gen_time}, {from} extended to {to}")
    };

    log_item!("document", description, "extend_pdf")
        .validation_status(validation_codes::ARCHIVE_TIMESTAMP_ADDED)
        .success(tracker);

    Ok(extended)
}
