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

//! Document sources and signed results.

use std::path::{Path, PathBuf};

use pades_status_tracker::StatusTracker;

use crate::{Error, Result, SignatureLevel};

/// Where the bytes of a document come from.
pub trait DocumentSource {
    /// Read the whole document.
    fn read_bytes(&self) -> Result<Vec<u8>>;

    /// Short description used in log messages.
    fn name(&self) -> String;
}

/// A document stored in a file.
#[derive(Clone, Debug)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Source reading the file at `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentSource for FileSource {
    fn read_bytes(&self) -> Result<Vec<u8>> {
        Ok(std::fs::read(&self.path)?)
    }

    fn name(&self) -> String {
        self.path.display().to_string()
    }
}

/// A document held in memory.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    bytes: Vec<u8>,
}

impl MemorySource {
    /// Source over `bytes`.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }
}

impl DocumentSource for MemorySource {
    fn read_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }

    fn name(&self) -> String {
        format!("in-memory document ({} bytes)", self.bytes.len())
    }
}

/// The result of a signing or extension operation.
///
/// A `SignedDocument` is never modified. Extending it produces a new one.
#[derive(Debug)]
pub struct SignedDocument {
    bytes: Vec<u8>,
    level: SignatureLevel,
    time_stamp_count: usize,
    log: StatusTracker,
}

impl SignedDocument {
    pub(crate) fn new(
        bytes: Vec<u8>,
        level: SignatureLevel,
        time_stamp_count: usize,
        log: StatusTracker,
    ) -> Self {
        Self {
            bytes,
            level,
            time_stamp_count,
            log,
        }
    }

    /// The signed PDF.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Signature level of the document.
    pub fn level(&self) -> SignatureLevel {
        self.level
    }

    /// Number of time stamps the document carries.
    pub fn time_stamp_count(&self) -> usize {
        self.time_stamp_count
    }

    /// Everything recorded while producing the document, including
    /// conditions the alert policy tolerated.
    pub fn log(&self) -> &StatusTracker {
        &self.log
    }

    /// Consume the document, returning its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Write the signed PDF to `path`.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, &self.bytes).map_err(|err| {
            log::warn!("unable to write {}: {err}", path.display());
            Error::Io(err)
        })
    }
}

impl DocumentSource for SignedDocument {
    fn read_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }

    fn name(&self) -> String {
        format!("{} document", self.level)
    }
}
