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

use std::fmt;

use serde::{Deserialize, Serialize};

/// PAdES baseline signature levels, in order of increasing archival
/// maturity.
///
/// The derived ordering is the maturity ordering: `BaselineB <
/// BaselineT < BaselineLt < BaselineLta`. A document's level never
/// decreases.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum SignatureLevel {
    /// Basic signature (B-B).
    #[serde(rename = "B-B")]
    BaselineB,

    /// Signature with a signature time stamp (B-T).
    #[serde(rename = "T")]
    BaselineT,

    /// Signature with long-term validation data (B-LT).
    #[serde(rename = "LT")]
    BaselineLt,

    /// Signature with an archive time stamp (B-LTA).
    #[serde(rename = "LTA")]
    BaselineLta,
}

impl SignatureLevel {
    /// Returns `true` if a signature at this level carries a time stamp
    /// and therefore proof of existence.
    pub fn has_time_stamp(self) -> bool {
        self >= Self::BaselineT
    }

    /// Returns `true` if a signature at this level embeds revocation
    /// evidence.
    pub fn has_validation_data(self) -> bool {
        self >= Self::BaselineLt
    }
}

impl fmt::Display for SignatureLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::BaselineB => "PAdES-BASELINE-B",
            Self::BaselineT => "PAdES-BASELINE-T",
            Self::BaselineLt => "PAdES-BASELINE-LT",
            Self::BaselineLta => "PAdES-BASELINE-LTA",
        })
    }
}
