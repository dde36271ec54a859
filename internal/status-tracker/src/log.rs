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

use std::{borrow::Cow, fmt::Debug};

use crate::{ErrorBehavior, StatusTracker};

/// One entry in a [`StatusTracker`].
///
/// An entry names what was examined (`label`), what was found
/// (`description`) and where in the library the finding was made. Failed
/// checks also carry the rendered error and, for tunable alerts, a code from
/// [`validation_codes`](crate::validation_codes).
///
/// Build entries with [`log_item!`](crate::log_item).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LogItem {
    /// Certificate subject or document part the entry refers to.
    pub label: Cow<'static, str>,

    /// What was found.
    pub description: Cow<'static, str>,

    /// Source file of the check.
    pub file: &'static str,

    /// Function performing the check.
    pub function: &'static str,

    /// Source line of the check.
    pub line: u32,

    /// `Debug` rendering of the error, for failed checks.
    pub err_val: Option<Cow<'static, str>>,

    /// Validation status code.
    pub validation_status: Option<Cow<'static, str>>,
}

impl LogItem {
    /// Creates an entry at an explicit source location.
    pub fn new(
        label: impl Into<Cow<'static, str>>,
        description: impl Into<Cow<'static, str>>,
        function: &'static str,
        file: &'static str,
        line: u32,
    ) -> Self {
        Self {
            label: label.into(),
            description: description.into(),
            file,
            function,
            line,
            err_val: None,
            validation_status: None,
        }
    }

    /// Attaches `err` to this entry.
    ///
    /// ```
    /// # use pades_status_tracker::log_item;
    /// let item = log_item!("CN=Leaf", "no OCSP answer", "collect").error("timeout");
    /// assert_eq!(item.err_val.as_deref(), Some("\"timeout\""));
    /// ```
    pub fn error<E: Debug>(mut self, err: E) -> Self {
        self.err_val = Some(format!("{err:?}").into());
        self
    }

    /// Tags this entry with a validation status code.
    pub fn validation_status(mut self, code: &'static str) -> Self {
        self.validation_status = Some(Cow::Borrowed(code));
        self
    }

    /// Records a passed check.
    pub fn success(self, tracker: &mut StatusTracker) {
        tracker.add_non_error(self);
    }

    /// Records a failed check.
    ///
    /// `behavior` decides whether `err` is handed back to stop the
    /// operation or only kept in the log.
    pub fn failure<E: Debug>(
        self,
        tracker: &mut StatusTracker,
        err: E,
        behavior: ErrorBehavior,
    ) -> Result<(), E> {
        let item = self.error(&err);
        tracker.add_error(item, err, behavior)
    }

    /// Records a failed check that the caller reports by other means.
    pub fn failure_no_throw<E: Debug>(self, tracker: &mut StatusTracker, err: E) {
        tracker.add_non_error(self.error(err));
    }
}

/// Builds a [`LogItem`] stamped with the caller's file and line.
///
/// Arguments are `label`, `description` and `function`. The first two
/// accept `&'static str` or `String`.
///
/// ```
/// # use pades_status_tracker::log_item;
/// let subject = String::from("CN=Leaf");
/// let item = log_item!(subject, "revoked", "check_revocation");
///
/// assert_eq!(item.label, "CN=Leaf");
/// assert_eq!(item.file, file!());
/// assert!(item.err_val.is_none());
/// ```
#[macro_export]
macro_rules! log_item {
    ($label:expr, $description:expr, $function:expr) => {{
        $crate::LogItem::new($label, $description, $function, file!(), line!())
    }};
}
