// isoenv-rs: Isomorphic environment tracking for bundlers
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Rewriting of environment references in analyzed modules.
//!
//! # Reference Shapes
//!
//! ```text
//! const env = process.env     Binding   -> approve rename
//! send(process.env)           Value     -> send(__ISOMORPHIC_ENV__)
//! process.env.API_URL         Member    -> record API_URL for this file,
//!                                          __ISOMORPHIC_ENV__.API_URL
//! window.location             (other)   -> untouched
//! ```
//!
//! The host's parser classifies references and hands them over together
//! with a [`ModuleContext`] for the module being analyzed. [`SourceEdits`]
//! is a ready-made context that applies the replacements to source text.

pub mod edits;


use tracing::trace;

use crate::config::Config;
use crate::manifest::records::PassRecords;

pub use edits::SourceEdits;

/// Byte range `start..end` in a module's source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// A syntactic reference to an identifier path, classified by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvReference<'a> {
    /// The path is the target of a renaming binding.
    Binding { path: &'a str },
    /// The whole path is used as a value.
    Value { path: &'a str, span: Span },
    /// A member with a static name is read off the path. `object` covers
    /// only the path part of the member expression.
    Member {
        path: &'a str,
        object: Span,
        property: &'a str,
    },
}

impl EnvReference<'_> {
    #[must_use]
    pub const fn path(&self) -> &str {
        match self {
            Self::Binding { path } | Self::Value { path, .. } | Self::Member { path, .. } => *path,
        }
    }
}

/// Per-module analysis context supplied by the host.
pub trait ModuleContext {
    /// Stable identity of the module's file.
    fn resource(&self) -> &str;

    /// Allows code to alias `path` freely.
    fn approve_rename(&mut self, path: &str);

    /// Replaces the source covered by `span` with `replacement`.
    fn replace(&mut self, span: Span, replacement: &str);
}

/// What [`Rewriter::rewrite`] did with a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    /// Renaming was approved; no source change.
    Approved,
    /// The reference now points at the runtime variable.
    Rewritten,
    /// Not a reference to the target path.
    PassThrough,
}

/// Redirects references to the target path to the runtime variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewriter {
    target: String,
    variable: String,
}

impl Rewriter {
    #[must_use]
    pub fn new(target: impl Into<String>, variable: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            variable: variable.into(),
        }
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.plugin.target.clone(), config.plugin.variable.clone())
    }

    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    #[must_use]
    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Identifier the host's static evaluator should see for `path`.
    #[must_use]
    pub fn evaluate(&self, path: &str) -> Option<&str> {
        (path == self.target).then_some(self.variable.as_str())
    }

    /// Handles one reference found while analyzing the module behind `ctx`.
    ///
    /// Member names are recorded in `records` before the replacement is
    /// issued.
    pub fn rewrite<C>(
        &self,
        ctx: &mut C,
        reference: &EnvReference<'_>,
        records: &mut PassRecords,
    ) -> Handled
    where
        C: ModuleContext + ?Sized,
    {
        if reference.path() != self.target {
            return Handled::PassThrough;
        }

        match *reference {
            EnvReference::Binding { path } => {
                ctx.approve_rename(path);
                Handled::Approved
            }
            EnvReference::Value { span, .. } => {
                ctx.replace(span, &self.variable);
                Handled::Rewritten
            }
            EnvReference::Member {
                object, property, ..
            } => {
                if records.record(ctx.resource(), property) {
                    trace!(file = ctx.resource(), name = property, "Recorded env reference");
                }
                ctx.replace(object, &self.variable);
                Handled::Rewritten
            }
        }
    }

    /// Rewrites `source` given the references the host found in it.
    ///
    /// Names reach `records` only when the whole module rewrites cleanly.
    ///
    /// # Errors
    ///
    /// Returns a `RewriteError` if a reference span is out of bounds or two
    /// spans overlap.
    pub fn rewrite_source(
        &self,
        resource: &str,
        source: &str,
        references: &[EnvReference<'_>],
        records: &mut PassRecords,
    ) -> Result<String, crate::error::RewriteError> {
        let mut edits = SourceEdits::new(resource, source);
        let mut found = PassRecords::new();
        for reference in references {
            self.rewrite(&mut edits, reference, &mut found);
        }
        let rewritten = edits.apply()?;
        records.merge(found);
        Ok(rewritten)
    }
}
