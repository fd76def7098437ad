// isoenv-rs: Isomorphic environment tracking for bundlers
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration section types.
//!
//! ```text
//! Config: PluginConfig, ClientConfig, LoggingConfig
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::logging::LogLevel;

/// Runtime variable read by client code when none is configured.
pub const DEFAULT_VARIABLE: &str = "__ISOMORPHIC_ENV__";

/// Manifest asset name when none is configured.
pub const DEFAULT_FILENAME: &str = "isomorphic-env.json";

/// Identifier path rewritten in analyzed modules.
pub const DEFAULT_TARGET: &str = "process.env";

/// Pattern selecting client-visible variables by prefix.
pub const DEFAULT_CLIENT_PATTERN: &str = "^CLIENT_";

/// Rewriting and manifest emission options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PluginConfig {
    /// Shared runtime variable that replaces the target path.
    pub variable: String,
    /// Name of the emitted manifest asset.
    pub filename: String,
    /// Dotted identifier path treated as the process environment.
    pub target: String,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            variable: DEFAULT_VARIABLE.to_string(),
            filename: DEFAULT_FILENAME.to_string(),
            target: DEFAULT_TARGET.to_string(),
        }
    }
}

/// Client-side projection policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Variables always exposed when present in the environment.
    pub explicit_keys: Vec<String>,
    /// Regex whose first match is stripped from matching names.
    /// Empty disables pattern matching.
    pub pattern: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            explicit_keys: Vec::new(),
            pattern: DEFAULT_CLIENT_PATTERN.to_string(),
        }
    }
}

/// Logging options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level for console output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Optional log file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::TRACE,
            log_file: None,
        }
    }
}
