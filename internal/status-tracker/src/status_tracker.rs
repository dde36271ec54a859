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

use crate::LogItem;

/// Log of one signing or extension operation.
///
/// Each operation owns its own tracker. Whether a failed check stops the
/// operation is decided per entry by the [`ErrorBehavior`] passed to
/// [`add_error`](Self::add_error).
#[derive(Debug, Default)]
pub struct StatusTracker {
    logged_items: Vec<LogItem>,
}

impl StatusTracker {
    /// Entries in the order they were recorded.
    pub fn logged_items(&self) -> &[LogItem] {
        &self.logged_items
    }

    /// Records an entry that does not stop the operation.
    pub fn add_non_error(&mut self, log_item: LogItem) {
        self.logged_items.push(log_item);
    }

    /// Records a failed check and applies `behavior` to it.
    ///
    /// Returns `Err(err)` for [`ErrorBehavior::StopOnFirstError`].
    pub fn add_error<E>(
        &mut self,
        log_item: LogItem,
        err: E,
        behavior: ErrorBehavior,
    ) -> Result<(), E> {
        self.logged_items.push(log_item);

        match behavior {
            ErrorBehavior::StopOnFirstError => Err(err),
            ErrorBehavior::ContinueWhenPossible => Ok(()),
        }
    }

    /// Returns `true` if any entry carries the status code `code`.
    pub fn has_status(&self, code: &str) -> bool {
        self.logged_items
            .iter()
            .any(|item| item.validation_status.as_deref() == Some(code))
    }

    /// Returns `true` if any entry records an error.
    pub fn has_any_error(&self) -> bool {
        self.logged_items.iter().any(|item| item.err_val.is_some())
    }
}

/// What a failed check does to the running operation.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ErrorBehavior {
    /// Stop and return the error.
    StopOnFirstError,

    /// Log the error and keep going.
    #[default]
    ContinueWhenPossible,
}
