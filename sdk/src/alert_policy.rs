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

//! Tunable handling of validation conditions.
//!
//! An [`AlertPolicy`] gives each [`Alert`] a severity. Raising an alert
//! always records it in the operation's status log. Only a
//! [`AlertSeverity::Fail`] alert also stops the operation.

use std::borrow::Cow;

use pades_status_tracker::{log_item, validation_codes, ErrorBehavior, StatusTracker};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// How a tunable alert condition is handled.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    /// Stop the operation with an error.
    Fail,

    /// Record the condition in the status log and continue.
    #[default]
    LogAndContinue,
}

impl From<AlertSeverity> for ErrorBehavior {
    fn from(severity: AlertSeverity) -> Self {
        match severity {
            AlertSeverity::Fail => ErrorBehavior::StopOnFirstError,
            AlertSeverity::LogAndContinue => ErrorBehavior::ContinueWhenPossible,
        }
    }
}

/// Conditions whose severity is set by an [`AlertPolicy`].
///
/// A revoked certificate is not among them; it always fails.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Alert {
    /// No revocation data could be obtained for a certificate.
    MissingRevocation,

    /// A time stamp token was malformed or did not cover the expected data.
    InvalidTimeStamp,

    /// Revocation data predates the best signature time.
    NoRevocationAfterBestSignatureTime,

    /// The signature has no time stamp establishing proof of existence.
    UncoveredProofOfExistence,
}

impl Alert {
    /// Status code recorded for this alert.
    pub fn validation_code(self) -> &'static str {
        match self {
            Self::MissingRevocation => validation_codes::REVOCATION_MISSING,
            Self::InvalidTimeStamp => validation_codes::TIMESTAMP_INVALID,
            Self::NoRevocationAfterBestSignatureTime => {
                validation_codes::REVOCATION_NONE_AFTER_BEST_SIGNATURE_TIME
            }
            Self::UncoveredProofOfExistence => validation_codes::POE_UNCOVERED,
        }
    }

    fn to_error(self, detail: String) -> Error {
        match self {
            Self::MissingRevocation | Self::NoRevocationAfterBestSignatureTime => {
                Error::RevocationUnavailable(detail)
            }
            Self::InvalidTimeStamp | Self::UncoveredProofOfExistence => {
                Error::InvalidTimestamp(detail)
            }
        }
    }
}

/// Per-condition severity for the tunable alerts raised while assembling
/// verification data.
///
/// The default policy logs every condition and continues.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct AlertPolicy {
    /// Severity when no revocation data is available for a certificate.
    pub missing_revocation: AlertSeverity,

    /// Severity when a time stamp token is invalid.
    pub invalid_time_stamp: AlertSeverity,

    /// Severity when revocation data predates the best signature time.
    pub no_revocation_after_best_signature_time: AlertSeverity,

    /// Severity when a signature has no proof of existence.
    pub uncovered_proof_of_existence: AlertSeverity,
}

impl AlertPolicy {
    /// A policy that fails on every tunable condition.
    pub fn strict() -> Self {
        Self {
            missing_revocation: AlertSeverity::Fail,
            invalid_time_stamp: AlertSeverity::Fail,
            no_revocation_after_best_signature_time: AlertSeverity::Fail,
            uncovered_proof_of_existence: AlertSeverity::Fail,
        }
    }

    /// Returns a copy of this policy with `alert` set to `severity`.
    pub fn with_severity(self, alert: Alert, severity: AlertSeverity) -> Self {
        let mut policy = self;
        match alert {
            Alert::MissingRevocation => policy.missing_revocation = severity,
            Alert::InvalidTimeStamp => policy.invalid_time_stamp = severity,
            Alert::NoRevocationAfterBestSignatureTime => {
                policy.no_revocation_after_best_signature_time = severity
            }
            Alert::UncoveredProofOfExistence => policy.uncovered_proof_of_existence = severity,
        }
        policy
    }

    /// Severity configured for `alert`.
    pub fn severity(&self, alert: Alert) -> AlertSeverity {
        match alert {
            Alert::MissingRevocation => self.missing_revocation,
            Alert::InvalidTimeStamp => self.invalid_time_stamp,
            Alert::NoRevocationAfterBestSignatureTime => {
                self.no_revocation_after_best_signature_time
            }
            Alert::UncoveredProofOfExistence => self.uncovered_proof_of_existence,
        }
    }

    /// Record `alert` in `tracker` and decide whether the operation stops.
    ///
    /// Returns `Err` only if the alert's severity is [`AlertSeverity::Fail`].
    pub fn raise(
        &self,
        alert: Alert,
        label: impl Into<Cow<'static, str>>,
        detail: impl Into<String>,
        tracker: &mut StatusTracker,
    ) -> Result<()> {
        let label = label.into();
        let detail = detail.into();
        let severity = self.severity(alert);

        log::warn!("{label}: {detail} ({})", alert.validation_code());

        let err = alert.to_error(detail.clone());
        log_item!(label, detail, "AlertPolicy::raise")
            .validation_status(alert.validation_code())
            .failure(tracker, err, severity.into())
    }
}
