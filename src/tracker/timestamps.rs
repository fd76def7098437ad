// isoenv-rs: Isomorphic environment tracking for bundlers
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Modification times for hosts that do not track them themselves.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

use crate::manifest::{Timestamp, TimestampLedger};

/// Milliseconds since the Unix epoch for `time`, 0 before the epoch.
#[must_use]
pub fn to_millis(time: SystemTime) -> Timestamp {
    time.duration_since(UNIX_EPOCH)
        .map_or(0, |d| Timestamp::try_from(d.as_millis()).unwrap_or(Timestamp::MAX))
}

#[must_use]
pub fn now_millis() -> Timestamp {
    to_millis(SystemTime::now())
}

/// Reads the modification time of every path in `files`.
///
/// Files that cannot be inspected (deleted, virtual, no permission) are
/// left out, which makes them count as unchanged.
#[must_use]
pub fn file_timestamps<I, S>(files: I) -> TimestampLedger
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    files
        .into_iter()
        .filter_map(|file| {
            let file = file.as_ref();
            match std::fs::metadata(Path::new(file)).and_then(|m| m.modified()) {
                Ok(modified) => Some((file.to_string(), to_millis(modified))),
                Err(e) => {
                    debug!(file, error = %e, "No modification time");
                    None
                }
            }
        })
        .collect()
}
