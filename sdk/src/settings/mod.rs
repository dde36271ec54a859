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

//! Explicit configuration for [`PadesService`](crate::PadesService).
//!
//! Settings are plain values. They are loaded from TOML or JSON by
//! overlaying the supplied text on [`Settings::default()`] with the
//! `config` crate; nothing is read from the environment or held in global
//! state.

use std::{path::Path, time::Duration};

use config::{Config, FileFormat};
use serde::{Deserialize, Serialize};

use crate::{AlertPolicy, Error, Result};

/// Default RFC 3161 time stamp authority.
pub const DEFAULT_TSA_URL: &str = "https://freetsa.org/tsr";

// trait used to validate user input to make sure user supplied configurations are valid
pub(crate) trait SettingsValidate {
    // returns error if settings are invalid
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Location of a PEM keystore holding an encrypted private key and its
/// certificate chain.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct KeystoreSettings {
    /// Path to the keystore file.
    pub path: String,

    /// Password protecting the private key.
    pub password: String,
}

impl SettingsValidate for KeystoreSettings {
    fn validate(&self) -> Result<()> {
        if self.path.is_empty() {
            return Err(Error::Settings("keystore path is empty".to_string()));
        }
        Ok(())
    }
}

/// Configuration for signing and extension operations.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Settings {
    /// URL of the RFC 3161 time stamp authority.
    pub tsa_url: String,

    /// Connect and read timeout for the time stamp authority, in
    /// milliseconds.
    pub tsa_timeout_ms: u64,

    /// Connect and read timeout for OCSP responders and CRL distribution
    /// points, in milliseconds.
    pub revocation_timeout_ms: u64,

    /// Bytes set aside for a time stamp token when checking capacity before
    /// the token has been obtained.
    pub time_stamp_reserve: usize,

    /// Optional keystore used by [`KeystoreIdentity::from_settings`].
    ///
    /// [`KeystoreIdentity::from_settings`]: crate::KeystoreIdentity::from_settings
    pub keystore: Option<KeystoreSettings>,

    /// Severity of each tunable alert condition.
    pub alerts: AlertPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tsa_url: DEFAULT_TSA_URL.to_string(),
            tsa_timeout_ms: 30_000,
            revocation_timeout_ms: 10_000,
            time_stamp_reserve: 10_000,
            keystore: None,
            alerts: AlertPolicy::default(),
        }
    }
}

impl SettingsValidate for Settings {
    fn validate(&self) -> Result<()> {
        if self.tsa_url.trim().is_empty() {
            return Err(Error::Settings("tsa_url is empty".to_string()));
        }

        if self.tsa_timeout_ms == 0 || self.revocation_timeout_ms == 0 {
            return Err(Error::Settings("timeouts must be non-zero".to_string()));
        }

        if let Some(keystore) = &self.keystore {
            keystore.validate()?;
        }

        Ok(())
    }
}

impl Settings {
    /// Load settings from a TOML string, overlaying [`Settings::default()`].
    pub fn from_toml(toml: &str) -> Result<Self> {
        Self::default().with_toml(toml)
    }

    /// Load settings from a `.toml` or `.json` file, overlaying
    /// [`Settings::default()`].
    pub fn from_file<P: AsRef<Path>>(settings_path: P) -> Result<Self> {
        Self::default().with_file(settings_path)
    }

    /// Overlay a TOML string on these settings.
    pub fn with_toml(self, toml: &str) -> Result<Self> {
        self.with_string(toml, FileFormat::Toml)
    }

    /// Overlay a JSON string on these settings.
    pub fn with_json(self, json: &str) -> Result<Self> {
        self.with_string(json, FileFormat::Json)
    }

    /// Overlay the contents of a `.toml` or `.json` file on these settings.
    pub fn with_file<P: AsRef<Path>>(self, settings_path: P) -> Result<Self> {
        let ext = settings_path
            .as_ref()
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let format = match ext.as_str() {
            "json" => FileFormat::Json,
            "toml" => FileFormat::Toml,
            _ => {
                return Err(Error::Settings(format!(
                    "unsupported settings file type \"{ext}\""
                )))
            }
        };

        let settings_str = std::fs::read_to_string(settings_path)?;
        self.with_string(&settings_str, format)
    }

    /// Set a single value by dotted path, e.g. `alerts.missing_revocation`.
    pub fn with_value<T: Into<config::Value>>(self, path: &str, value: T) -> Result<Self> {
        let config = Config::try_from(&self)?;

        let updated = Config::builder()
            .add_source(config)
            .set_override(path, value)
            .map_err(|e| Error::Settings(format!("invalid path '{path}': {e}")))?
            .build()?
            .try_deserialize::<Settings>()
            .map_err(|e| Error::Settings(format!("invalid value for '{path}': {e}")))?;

        updated.validate()?;
        Ok(updated)
    }

    fn with_string(self, settings_str: &str, format: FileFormat) -> Result<Self> {
        let current = Config::try_from(&self)?;

        // merge overrides, allows for partial changes
        let settings = Config::builder()
            .add_source(current)
            .add_source(config::File::from_str(settings_str, format))
            .build()?
            .try_deserialize::<Settings>()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Checks the settings for values that can never work.
    pub fn validate(&self) -> Result<()> {
        SettingsValidate::validate(self)
    }

    /// Time stamp authority timeout as a [`Duration`].
    pub fn tsa_timeout(&self) -> Duration {
        Duration::from_millis(self.tsa_timeout_ms)
    }

    /// Revocation source timeout as a [`Duration`].
    pub fn revocation_timeout(&self) -> Duration {
        Duration::from_millis(self.revocation_timeout_ms)
    }
}
