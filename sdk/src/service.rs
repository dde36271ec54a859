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

use std::{marker::PhantomData, sync::Arc};

use pades_crypto::time_stamp::{HttpTimeStampProvider, TimeStampProvider, TimeStampToken};
use pades_status_tracker::StatusTracker;

use crate::{
    revocation::{OnlineCrlSource, OnlineOcspSource, RevocationAggregator, RevocationSource},
    verifier::VerificationContext,
    Error, PadesPdf, Result, Settings, SignatureLevel,
};

/// Entry point for signing and extension operations on PDF container type
/// `P`.
///
/// A service holds configuration only. Every call builds its own status
/// tracker, verification context and signature parameters, so one service
/// can be shared between threads.
pub struct PadesService<P> {
    pub(crate) settings: Settings,
    pub(crate) revocation_sources: Vec<Arc<dyn RevocationSource>>,
    pub(crate) time_stamp_provider: Arc<dyn TimeStampProvider>,
    _container: PhantomData<fn() -> P>,
}

impl<P: PadesPdf> PadesService<P> {
    /// Create a service that consults online OCSP and CRL sources and the
    /// time stamp authority named in `settings`.
    pub fn new(settings: Settings) -> Result<Self> {
        settings.validate()?;

        let revocation_timeout = settings.revocation_timeout();
        let revocation_sources: Vec<Arc<dyn RevocationSource>> = vec![
            Arc::new(OnlineOcspSource::new(revocation_timeout)),
            Arc::new(OnlineCrlSource::new(revocation_timeout)),
        ];

        let time_stamp_provider = Arc::new(HttpTimeStampProvider::new(
            settings.tsa_url.clone(),
            settings.tsa_timeout(),
        ));

        log::debug!("PAdES service using time stamp authority {}", settings.tsa_url);

        Ok(Self {
            settings,
            revocation_sources,
            time_stamp_provider,
            _container: PhantomData,
        })
    }

    /// Replace the revocation sources. They are consulted in order.
    pub fn with_revocation_sources(mut self, sources: Vec<Arc<dyn RevocationSource>>) -> Self {
        self.revocation_sources = sources;
        self
    }

    /// Replace the time stamp authority client.
    pub fn with_time_stamp_provider(mut self, provider: Arc<dyn TimeStampProvider>) -> Self {
        self.time_stamp_provider = provider;
        self
    }

    /// The settings in force.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub(crate) fn aggregator(&self) -> RevocationAggregator {
        RevocationAggregator::new(self.revocation_sources.clone())
    }

    /// One request to the time stamp authority. Never retried.
    pub(crate) fn request_time_stamp(
        &self,
        message: &[u8],
        context: &VerificationContext,
        tracker: &mut StatusTracker,
    ) -> Result<TimeStampToken> {
        let Some(response) = self.time_stamp_provider.send_time_stamp_request(message) else {
            return Err(Error::InvalidTimestamp(
                "no time stamp authority configured".to_string(),
            ));
        };

        let response = response.inspect_err(|err| {
            log::warn!("time stamp request failed: {err}");
        })?;

        let token = TimeStampToken::from_response_der(&response)?;
        context.check_time_stamp(&token, message, tracker)?;

        Ok(token)
    }
}

impl<P> std::fmt::Debug for PadesService<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PadesService")
            .field("settings", &self.settings)
            .field(
                "revocation_sources",
                &self
                    .revocation_sources
                    .iter()
                    .map(|s| s.name())
                    .collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

/// Fails with [`Error::LevelRegression`] if `to` is below `from`.
pub(crate) fn ensure_monotonic(from: SignatureLevel, to: SignatureLevel) -> Result<()> {
    if to < from {
        log::warn!("signature level would regress from {from} to {to}");
        return Err(Error::LevelRegression { from, to });
    }
    Ok(())
}
