// isoenv-rs: Isomorphic environment tracking for bundlers
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Cross-pass reconciliation of referenced environment variables.
//!
//! # Reconciliation
//!
//! ```text
//! manifest keys --∩ live--> presented --T > P--> changed --∉ R--> emptied
//!                              |                                   |
//!                              +------------- minus ---------------+
//!                                             |
//!                                             v
//!                                  retained  <-- overlay R (per-file)
//!                                             |
//!                                             v
//!                               manifest'  -->  sorted env keys
//! ledger' = T
//! ```
//!
//! A file with records this pass replaces its entry wholesale. A file
//! without records keeps its entry unless it changed since the last pass,
//! in which case it no longer references anything and is evicted. Files
//! that left the live set are evicted regardless.

pub mod records;

#[cfg(test)]
mod tests;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::AssetError;
use records::{FileEnvMap, PassRecords};

/// Modification time in milliseconds since the Unix epoch.
pub type Timestamp = u64;

/// Reconciled file → variable names mapping for the live module graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvManifest {
    files: FileEnvMap,
}

impl EnvManifest {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            files: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn get(&self, file: &str) -> Option<&BTreeSet<String>> {
        self.files.get(file)
    }

    #[must_use]
    pub fn contains(&self, file: &str) -> bool {
        self.files.contains_key(file)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Sorted, de-duplicated union of every file's names.
    #[must_use]
    pub fn env_keys(&self) -> Vec<String> {
        self.files
            .values()
            .flatten()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .cloned()
            .collect()
    }
}

impl<F, N, I> FromIterator<(F, I)> for EnvManifest
where
    F: Into<String>,
    N: Into<String>,
    I: IntoIterator<Item = N>,
{
    fn from_iter<T: IntoIterator<Item = (F, I)>>(iter: T) -> Self {
        Self {
            files: iter
                .into_iter()
                .map(|(file, names)| (file.into(), names.into_iter().map(Into::into).collect()))
                .collect(),
        }
    }
}

/// Last observed modification time per file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimestampLedger {
    times: BTreeMap<String, Timestamp>,
}

impl TimestampLedger {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            times: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn get(&self, file: &str) -> Option<Timestamp> {
        self.times.get(file).copied()
    }

    pub fn insert(&mut self, file: impl Into<String>, time: Timestamp) {
        self.times.insert(file.into(), time);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }
}

impl<F: Into<String>> FromIterator<(F, Timestamp)> for TimestampLedger {
    fn from_iter<T: IntoIterator<Item = (F, Timestamp)>>(iter: T) -> Self {
        Self {
            times: iter.into_iter().map(|(f, t)| (f.into(), t)).collect(),
        }
    }
}

/// What the host knows at the end of a pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostFacts {
    /// Files currently part of the build graph.
    pub live: BTreeSet<String>,
    /// Current modification time of every file the host tracks.
    pub timestamps: TimestampLedger,
}

impl HostFacts {
    #[must_use]
    pub fn new(
        live: impl IntoIterator<Item = impl Into<String>>,
        timestamps: TimestampLedger,
    ) -> Self {
        Self {
            live: live.into_iter().map(Into::into).collect(),
            timestamps,
        }
    }
}

/// Outcome of one reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    pub manifest: EnvManifest,
    pub ledger: TimestampLedger,
    /// Files evicted because they left the live set.
    pub dropped: Vec<String>,
    /// Files evicted because they changed and no longer reference anything.
    pub emptied: Vec<String>,
}

impl Reconciled {
    #[must_use]
    pub fn env_keys(&self) -> Vec<String> {
        self.manifest.env_keys()
    }
}

/// Merges one pass into the manifest.
///
/// Pure: the previous manifest and ledger are only read. A file is
/// considered changed when its current timestamp is strictly newer than the
/// ledger's, or than `session_start` when the ledger has never seen it.
/// Files the host has no timestamp for are never considered changed.
#[must_use]
pub fn reconcile(
    manifest: &EnvManifest,
    ledger: &TimestampLedger,
    host: HostFacts,
    records: PassRecords,
    session_start: Timestamp,
) -> Reconciled {
    let HostFacts { live, timestamps } = host;

    let (presented, dropped): (Vec<&String>, Vec<&String>) =
        manifest.files.keys().partition(|f| live.contains(*f));

    let is_changed = |file: &str| {
        timestamps
            .get(file)
            .is_some_and(|now| now > ledger.get(file).unwrap_or(session_start))
    };

    let emptied: Vec<String> = presented
        .iter()
        .filter(|f| is_changed(f) && !records.contains(f))
        .map(|f| (*f).clone())
        .collect();

    let mut files: FileEnvMap = presented
        .into_iter()
        .filter(|f| !emptied.contains(f))
        .map(|f| (f.clone(), manifest.files[f].clone()))
        .collect();
    files.extend(records.into_inner());

    Reconciled {
        manifest: EnvManifest { files },
        ledger: timestamps,
        dropped: dropped.into_iter().cloned().collect(),
        emptied,
    }
}

/// The emitted asset: runtime variable name plus the keys client code reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientManifest {
    pub variable: String,
    #[serde(rename = "envKeys")]
    pub env_keys: Vec<String>,
}

impl ClientManifest {
    #[must_use]
    pub fn new(variable: impl Into<String>, manifest: &EnvManifest) -> Self {
        Self {
            variable: variable.into(),
            env_keys: manifest.env_keys(),
        }
    }

    /// Pretty JSON with two-space indentation.
    ///
    /// # Errors
    ///
    /// Returns `AssetError::Serialize` if serialization fails.
    pub fn to_json(&self, name: &str) -> Result<String, AssetError> {
        serde_json::to_string_pretty(self).map_err(|source| AssetError::Serialize {
            name: name.to_string(),
            source,
        })
    }

    /// Parses a previously emitted manifest.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if `json` is not a manifest.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
