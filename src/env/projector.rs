// isoenv-rs: Isomorphic environment tracking for bundlers
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Projection of a server environment onto the client-visible subset.
//!
//! ```text
//! snapshot {FOO, CLIENT_BAR, OTHER}     policy {explicit: [FOO], ^CLIENT_}
//!            |                                       |
//!            +------------------+--------------------+
//!                               v
//!   1. explicit keys present in snapshot   FOO -> "1"
//!   2. pattern matches, prefix stripped    BAR -> "2"  (only if not taken)
//!                               |
//!                               v
//!            window.__ISOMORPHIC_ENV__ = {"BAR":"2","FOO":"1"};
//! ```

use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;
use serde_json::Value;

use super::EnvSnapshot;
use crate::config::Config;
use crate::config::types::DEFAULT_CLIENT_PATTERN;
use crate::error::ConfigError;
use crate::manifest::ClientManifest;

/// Which snapshot variables are exposed to client code.
///
/// An explicitly listed name always wins over a pattern-derived name with
/// the same exposed name.
#[derive(Debug, Clone)]
pub struct SelectionPolicy {
    explicit_keys: BTreeSet<String>,
    pattern: Option<Regex>,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self::new(std::iter::empty::<String>())
    }
}

impl SelectionPolicy {
    /// Policy exposing `explicit_keys` plus every `CLIENT_*` variable.
    #[must_use]
    pub fn new(explicit_keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            explicit_keys: explicit_keys.into_iter().map(Into::into).collect(),
            pattern: Regex::new(DEFAULT_CLIENT_PATTERN).ok(),
        }
    }

    /// Replaces the prefix pattern. The first match is stripped from each
    /// matching name to form the exposed name.
    #[must_use]
    pub fn with_pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Disables pattern matching; only explicit keys are exposed.
    #[must_use]
    pub fn without_pattern(mut self) -> Self {
        self.pattern = None;
        self
    }

    #[must_use]
    pub const fn explicit_keys(&self) -> &BTreeSet<String> {
        &self.explicit_keys
    }

    #[must_use]
    pub const fn pattern(&self) -> Option<&Regex> {
        self.pattern.as_ref()
    }

    /// Exposed name for `name` under the pattern, if it matches.
    fn strip(&self, name: &str) -> Option<String> {
        let found = self.pattern.as_ref()?.find(name)?;
        let exposed = format!("{}{}", &name[..found.start()], &name[found.end()..]);
        (!exposed.is_empty()).then_some(exposed)
    }
}

/// Computes the client-visible variables of `snapshot`.
///
/// Explicit keys missing from the snapshot are simply absent from the result.
#[must_use]
pub fn project(snapshot: &EnvSnapshot, policy: &SelectionPolicy) -> BTreeMap<String, String> {
    let mut exposed: BTreeMap<String, String> = policy
        .explicit_keys
        .iter()
        .filter_map(|key| Some((key.clone(), snapshot.get(key)?.to_string())))
        .collect();

    for (name, value) in snapshot.iter() {
        if policy.explicit_keys.contains(name) {
            continue;
        }
        if let Some(key) = policy.strip(name) {
            exposed.entry(key).or_insert_with(|| value.to_string());
        }
    }

    exposed
}

/// Serializes a projected map as a JSON object literal.
#[must_use]
pub fn to_json(exposed: &BTreeMap<String, String>) -> String {
    Value::Object(
        exposed
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect(),
    )
    .to_string()
}

/// `window.<variable> = <json>;`
#[must_use]
pub fn render_script(variable: &str, exposed: &BTreeMap<String, String>) -> String {
    format!("window.{variable} = {};", to_json(exposed))
}

/// [`render_script`] wrapped in a `<script>` tag.
///
/// `</` inside the payload is written as `<\/` so a value can never close
/// the tag.
#[must_use]
pub fn render_script_tag(variable: &str, exposed: &BTreeMap<String, String>) -> String {
    format!(
        "<script>{}</script>",
        render_script(variable, exposed).replace("</", "<\\/")
    )
}

/// Server-side helper producing the statement that defines the runtime
/// variable before any bundled code runs.
#[derive(Debug, Clone)]
pub struct ClientEnvScript {
    variable: String,
    policy: SelectionPolicy,
}

impl ClientEnvScript {
    #[must_use]
    pub fn new(variable: impl Into<String>, policy: SelectionPolicy) -> Self {
        Self {
            variable: variable.into(),
            policy,
        }
    }

    /// Uses `[plugin] variable` and the `[client]` policy.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the client pattern is invalid.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self::new(
            config.plugin.variable.clone(),
            config.selection_policy()?,
        ))
    }

    /// Uses a manifest emitted by the tracker: its variable name, and its
    /// key list as the explicit keys. `pattern` adds prefix-discovered
    /// variables on top.
    #[must_use]
    pub fn from_manifest(manifest: &ClientManifest, pattern: Option<Regex>) -> Self {
        let policy = SelectionPolicy::new(manifest.env_keys.iter().cloned());
        let policy = match pattern {
            Some(pattern) => policy.with_pattern(pattern),
            None => policy.without_pattern(),
        };
        Self::new(manifest.variable.clone(), policy)
    }

    #[must_use]
    pub fn variable(&self) -> &str {
        &self.variable
    }

    #[must_use]
    pub const fn policy(&self) -> &SelectionPolicy {
        &self.policy
    }

    #[must_use]
    pub fn client_env(&self, snapshot: &EnvSnapshot) -> BTreeMap<String, String> {
        project(snapshot, &self.policy)
    }

    #[must_use]
    pub fn script(&self, snapshot: &EnvSnapshot) -> String {
        render_script(&self.variable, &self.client_env(snapshot))
    }

    #[must_use]
    pub fn script_tag(&self, snapshot: &EnvSnapshot) -> String {
        render_script_tag(&self.variable, &self.client_env(snapshot))
    }
}
