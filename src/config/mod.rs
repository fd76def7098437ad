// isoenv-rs: Isomorphic environment tracking for bundlers
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for isoenv-rs.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. TOML files (in the order added)
//! 3. TOML strings
//! 4. ISOENV_* env vars
//! 5. explicit overrides (ConfigLoader::set)
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! ISOENV_PLUGIN__VARIABLE=__ENV__      → plugin.variable = "__ENV__"
//! ISOENV_CLIENT__EXPLICIT_KEYS=A,B     → client.explicit_keys = ["A", "B"]
//! ISOENV_LOGGING__OUTPUT_LOG_LEVEL=4   → logging.output_log_level = 4
//! ```

pub mod loader;
pub mod types;


use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Component, Path};
use std::sync::LazyLock;

use crate::env::projector::SelectionPolicy;
use crate::error::{ConfigError, Result};
use crate::logging::LogConfig;

use loader::ConfigLoader;
use types::{ClientConfig, LoggingConfig, PluginConfig};

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("identifier regex is valid")
});

static IDENTIFIER_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*(\.[A-Za-z_$][A-Za-z0-9_$]*)*$")
        .expect("identifier path regex is valid")
});

/// Complete library configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Rewriting and manifest options.
    pub plugin: PluginConfig,
    /// Client projection policy.
    pub client: ClientConfig,
    /// Logging options.
    pub logging: LoggingConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use isoenv::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("isoenv.toml")
    ///     .with_env_prefix("ISOENV")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// fails validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or fails validation.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Validate every section.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for the first offending key.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let invalid = |section: &str, key: &str, message: String| ConfigError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            message,
        };

        if !IDENTIFIER.is_match(&self.plugin.variable) {
            return Err(invalid(
                "plugin",
                "variable",
                format!("'{}' is not a valid identifier", self.plugin.variable),
            ));
        }

        if !IDENTIFIER_PATH.is_match(&self.plugin.target) {
            return Err(invalid(
                "plugin",
                "target",
                format!("'{}' is not a dotted identifier path", self.plugin.target),
            ));
        }

        let filename = Path::new(&self.plugin.filename);
        if self.plugin.filename.is_empty()
            || filename.is_absolute()
            || filename
                .components()
                .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(invalid(
                "plugin",
                "filename",
                format!(
                    "'{}' must be a non-empty relative path without '..'",
                    self.plugin.filename
                ),
            ));
        }

        if let Some(key) = self.client.explicit_keys.iter().find(|k| k.is_empty()) {
            return Err(invalid(
                "client",
                "explicit_keys",
                format!("empty key in {:?} ('{key}')", self.client.explicit_keys),
            ));
        }

        self.client_pattern()?;
        Ok(())
    }

    /// Compile the client pattern. `None` when pattern matching is disabled.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the pattern is not a valid regex.
    pub fn client_pattern(&self) -> std::result::Result<Option<Regex>, ConfigError> {
        if self.client.pattern.is_empty() {
            return Ok(None);
        }
        Regex::new(&self.client.pattern)
            .map(Some)
            .map_err(|e| ConfigError::InvalidValue {
                section: "client".to_string(),
                key: "pattern".to_string(),
                message: e.to_string(),
            })
    }

    /// Build the projection policy described by the `[client]` section.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the pattern is not a valid regex.
    pub fn selection_policy(&self) -> std::result::Result<SelectionPolicy, ConfigError> {
        let policy = SelectionPolicy::new(self.client.explicit_keys.iter().cloned());
        Ok(match self.client_pattern()? {
            Some(pattern) => policy.with_pattern(pattern),
            None => policy.without_pattern(),
        })
    }

    /// Logging setup for [`crate::logging::init_logging`].
    #[must_use]
    pub fn log_config(&self) -> LogConfig {
        LogConfig::builder()
            .with_console_level(self.logging.output_log_level)
            .with_file_level(self.logging.file_log_level)
            .maybe_with_log_file(
                self.logging
                    .log_file
                    .as_ref()
                    .map(|p| p.display().to_string()),
            )
            .build()
    }

    /// Format configuration options for display, sorted by key.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        options.insert("plugin.variable", self.plugin.variable.clone());
        options.insert("plugin.filename", self.plugin.filename.clone());
        options.insert("plugin.target", self.plugin.target.clone());
        options.insert("client.explicit_keys", self.client.explicit_keys.join(","));
        options.insert("client.pattern", self.client.pattern.clone());
        options.insert(
            "logging.output_log_level",
            self.logging.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "logging.file_log_level",
            self.logging.file_log_level.as_u8().to_string(),
        );
        options.insert(
            "logging.log_file",
            self.logging
                .log_file
                .as_ref()
                .map_or_else(String::new, |p| p.display().to_string()),
        );

        let max_key_len = options.keys().map(|k| k.len()).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }
}
