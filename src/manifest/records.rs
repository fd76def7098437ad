// isoenv-rs: Isomorphic environment tracking for bundlers
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Per-file variable name sets.
//!
//! ```text
//! FileEnvMap: BTreeMap<file, BTreeSet<name>>
//!   PassRecords  = names seen during one pass (fresh each pass)
//!   EnvManifest  = reconciled names for the live graph (across passes)
//! ```

use std::collections::{BTreeMap, BTreeSet};

/// Mapping from file identity to the variable names it references.
pub type FileEnvMap = BTreeMap<String, BTreeSet<String>>;

/// Variable names referenced by each file analyzed in the current pass.
///
/// Only files that referenced at least one name have an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassRecords {
    files: FileEnvMap,
}

impl PassRecords {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            files: BTreeMap::new(),
        }
    }

    /// Records that `file` references `name`. Returns false if already known.
    pub fn record(&mut self, file: &str, name: &str) -> bool {
        match self.files.get_mut(file) {
            Some(names) => names.insert(name.to_string()),
            None => {
                self.files
                    .insert(file.to_string(), BTreeSet::from([name.to_string()]));
                true
            }
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

    /// Number of files with at least one record.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.files.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Adds every name in `other`, keeping names already recorded.
    pub fn merge(&mut self, other: Self) {
        for (file, names) in other.files {
            self.files.entry(file).or_default().extend(names);
        }
    }

    #[must_use]
    pub fn into_inner(self) -> FileEnvMap {
        self.files
    }
}

impl<F, N, I> FromIterator<(F, I)> for PassRecords
where
    F: Into<String>,
    N: Into<String>,
    I: IntoIterator<Item = N>,
{
    fn from_iter<T: IntoIterator<Item = (F, I)>>(iter: T) -> Self {
        let mut records = Self::new();
        for (file, names) in iter {
            let file = file.into();
            for name in names {
                records.record(&file, &name.into());
            }
        }
        records
    }
}
