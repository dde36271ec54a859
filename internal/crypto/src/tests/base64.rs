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

use crate::base64;

#[test]
fn encode() {
    assert_eq!(base64::encode(b"Hello, world"), "SGVsbG8sIHdvcmxk");
}

#[test]
fn encode_pads() {
    assert_eq!(base64::encode(b"a"), "YQ==");
    assert_eq!(base64::encode(b""), "");
}
