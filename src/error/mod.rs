// isoenv-rs: Isomorphic environment tracking for bundlers
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!          IsoEnvError (16 bytes)
//!                   |
//!   +--------+------+--+--------+
//!   |        |         |        |
//!   v        v         v        v
//! Config    Pass    Rewrite   Asset
//!  Box      Box      Box      Box
//!
//! Sub-errors (unboxed internally):
//!   Config   InvalidValue
//!   Pass     NotStarted, OutOfOrder, ForeignPass
//!   Rewrite  InvalidSpan, OverlappingEdits
//!   Asset    WriteFailed, Serialize
//! ```

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`IsoEnvError`].
pub type IsoEnvResult<T> = std::result::Result<T, IsoEnvError>;

/// Top-level library error type.
///
/// All sub-errors are boxed to keep this enum two words wide.
#[derive(Debug, Error)]
pub enum IsoEnvError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Build pass sequencing error.
    #[error("pass error: {0}")]
    Pass(#[from] Box<PassError>),

    /// Source rewriting error.
    #[error("rewrite error: {0}")]
    Rewrite(#[from] Box<RewriteError>),

    /// Asset emission error.
    #[error("asset error: {0}")]
    Asset(#[from] Box<AssetError>),
}

macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for IsoEnvError {
                fn from(err: $error) -> Self {
                    IsoEnvError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    ConfigError => Config,
    PassError => Pass,
    RewriteError => Rewrite,
    AssetError => Asset,
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

// --- Pass Errors ---

/// Build pass sequencing errors.
///
/// Finalizing a pass that is not the currently open one would reconcile a
/// partially populated record store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PassError {
    /// Finalize was called while no pass was open.
    #[error("pass {pass} finalized but no pass is open")]
    NotStarted { pass: u64 },

    /// Finalize was called for a pass other than the open one.
    #[error("pass {pass} finalized while pass {open} is open")]
    OutOfOrder { pass: u64, open: u64 },

    /// Finalize was called with a pass begun by another tracker.
    #[error("pass {pass} belongs to another tracker")]
    ForeignPass { pass: u64 },
}

// --- Rewrite Errors ---

/// Source rewriting errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RewriteError {
    /// Replacement span lies outside the source or splits a character.
    #[error("invalid span {start}..{end} in '{resource}' (source is {len} bytes)")]
    InvalidSpan {
        resource: String,
        start: usize,
        end: usize,
        len: usize,
    },

    /// Two replacements cover the same bytes.
    #[error("overlapping edits at {first}..{second} in '{resource}'")]
    OverlappingEdits {
        resource: String,
        first: usize,
        second: usize,
    },
}

// --- Asset Errors ---

/// Output asset errors.
#[derive(Debug, Error)]
pub enum AssetError {
    /// Writing an asset to its destination failed.
    #[error("failed to write asset '{name}': {source}")]
    WriteFailed {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// Serializing an asset failed.
    #[error("failed to serialize asset '{name}': {source}")]
    Serialize {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests;
