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

use std::fmt::{self, Display, Formatter};

use crate::{log_item, validation_codes, ErrorBehavior, StatusTracker};

#[test]
fn aggregates_errors() {
    let mut tracker = StatusTracker::default();

    log_item!("test1", "test item 1", "test func").success(&mut tracker);
    assert!(!tracker.has_any_error());

    tracker
        .add_error(
            log_item!("test2", "test item 2", "test func").error(SampleError {}),
            SampleError {},
            ErrorBehavior::ContinueWhenPossible,
        )
        .unwrap();

    assert_eq!(tracker.logged_items().len(), 2);
    assert!(tracker.has_any_error());
}

#[test]
fn stop_returns_error_and_keeps_entry() {
    let mut tracker = StatusTracker::default();

    let item = log_item!("CN=Leaf", "no revocation data", "test func")
        .validation_status(validation_codes::REVOCATION_MISSING)
        .error(SampleError {});

    let result = tracker.add_error(item, SampleError {}, ErrorBehavior::StopOnFirstError);

    assert!(result.is_err());
    assert_eq!(tracker.logged_items().len(), 1);
    assert!(tracker.has_status(validation_codes::REVOCATION_MISSING));
}

#[test]
fn behavior_applies_per_entry() {
    let mut tracker = StatusTracker::default();

    let stopped = log_item!("a", "first", "test func").failure(
        &mut tracker,
        SampleError {},
        ErrorBehavior::StopOnFirstError,
    );
    let continued = log_item!("b", "second", "test func").failure(
        &mut tracker,
        SampleError {},
        ErrorBehavior::ContinueWhenPossible,
    );

    assert!(stopped.is_err());
    assert!(continued.is_ok());
    assert_eq!(tracker.logged_items().len(), 2);
}

#[test]
fn has_status() {
    let mut tracker = StatusTracker::default();
    log_item!("doc", "signature has no time stamp", "test func")
        .validation_status(validation_codes::POE_UNCOVERED)
        .success(&mut tracker);

    assert!(tracker.has_status(validation_codes::POE_UNCOVERED));
    assert!(!tracker.has_status(validation_codes::REVOCATION_MISSING));
    assert!(!tracker.has_any_error());
}

#[test]
fn default_behavior_continues() {
    assert_eq!(ErrorBehavior::default(), ErrorBehavior::ContinueWhenPossible);
}

#[derive(Debug)]
struct SampleError {}

impl Display for SampleError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "SampleError")
    }
}
