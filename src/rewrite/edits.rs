// isoenv-rs: Isomorphic environment tracking for bundlers
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Span replacements over a module's source text.

use std::collections::BTreeSet;

use super::{ModuleContext, Span};
use crate::error::RewriteError;

/// [`ModuleContext`] that collects replacements for one source string.
///
/// Replacements are validated and applied in span order by [`apply`].
///
/// [`apply`]: SourceEdits::apply
#[derive(Debug, Clone)]
pub struct SourceEdits<'s> {
    resource: String,
    source: &'s str,
    edits: Vec<(Span, String)>,
    renames: BTreeSet<String>,
}

impl<'s> SourceEdits<'s> {
    #[must_use]
    pub fn new(resource: impl Into<String>, source: &'s str) -> Self {
        Self {
            resource: resource.into(),
            source,
            edits: Vec::new(),
            renames: BTreeSet::new(),
        }
    }

    #[must_use]
    pub const fn source(&self) -> &'s str {
        self.source
    }

    /// Pending replacements in the order they were issued.
    #[must_use]
    pub fn edits(&self) -> &[(Span, String)] {
        &self.edits
    }

    #[must_use]
    pub fn is_rename_approved(&self, path: &str) -> bool {
        self.renames.contains(path)
    }

    /// Produces the rewritten source.
    ///
    /// # Errors
    ///
    /// Returns `RewriteError::InvalidSpan` for a span that is reversed, out of
    /// bounds, or not on a character boundary, and
    /// `RewriteError::OverlappingEdits` when two spans share bytes.
    pub fn apply(&self) -> Result<String, RewriteError> {
        let mut ordered: Vec<&(Span, String)> = self.edits.iter().collect();
        ordered.sort_by_key(|(span, _)| *span);

        let mut out = String::with_capacity(self.source.len());
        let mut cursor = 0;
        for (span, replacement) in ordered {
            self.check_span(*span)?;
            if span.start < cursor {
                return Err(RewriteError::OverlappingEdits {
                    resource: self.resource.clone(),
                    first: span.start,
                    second: cursor,
                });
            }
            out.push_str(&self.source[cursor..span.start]);
            out.push_str(replacement);
            cursor = span.end;
        }
        out.push_str(&self.source[cursor..]);
        Ok(out)
    }

    fn check_span(&self, span: Span) -> Result<(), RewriteError> {
        let valid = span.start <= span.end
            && span.end <= self.source.len()
            && self.source.is_char_boundary(span.start)
            && self.source.is_char_boundary(span.end);
        if valid {
            Ok(())
        } else {
            Err(RewriteError::InvalidSpan {
                resource: self.resource.clone(),
                start: span.start,
                end: span.end,
                len: self.source.len(),
            })
        }
    }
}

impl ModuleContext for SourceEdits<'_> {
    fn resource(&self) -> &str {
        &self.resource
    }

    fn approve_rename(&mut self, path: &str) {
        self.renames.insert(path.to_string());
    }

    fn replace(&mut self, span: Span, replacement: &str) {
        self.edits.push((span, replacement.to_string()));
    }
}
