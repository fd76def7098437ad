// isoenv-rs: Isomorphic environment tracking for bundlers
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Destinations for emitted assets.
//!
//! ```text
//! AssetSink::emit(name, contents)
//!   BTreeMap<String, String>   in-memory (host collects outputs itself)
//!   OutputDir                  <dir>/<name>, written atomically
//! ```

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::AssetError;

/// Receives output assets produced at the end of a pass.
pub trait AssetSink {
    /// Stores `contents` under `name`, replacing any previous asset.
    ///
    /// # Errors
    ///
    /// Returns an `AssetError` if the asset cannot be stored.
    fn emit(&mut self, name: &str, contents: &str) -> Result<(), AssetError>;
}

impl AssetSink for BTreeMap<String, String> {
    fn emit(&mut self, name: &str, contents: &str) -> Result<(), AssetError> {
        self.insert(name.to_string(), contents.to_string());
        Ok(())
    }
}

/// Writes assets below a directory.
///
/// Each asset is written to a temporary file next to its destination and
/// then renamed over it, so readers never observe a partial manifest.
#[derive(Debug, Clone)]
pub struct OutputDir {
    root: PathBuf,
}

impl OutputDir {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Destination path of the asset called `name`.
    #[must_use]
    pub fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl AssetSink for OutputDir {
    fn emit(&mut self, name: &str, contents: &str) -> Result<(), AssetError> {
        let failed = |source| AssetError::WriteFailed {
            name: name.to_string(),
            source,
        };

        let path = self.path_of(name);
        let parent = path.parent().unwrap_or(&self.root);
        std::fs::create_dir_all(parent).map_err(failed)?;

        let mut file = NamedTempFile::new_in(parent).map_err(failed)?;
        file.write_all(contents.as_bytes()).map_err(failed)?;
        file.persist(&path).map_err(|e| failed(e.error))?;

        debug!(path = %path.display(), bytes = contents.len(), "Wrote asset");
        Ok(())
    }
}
