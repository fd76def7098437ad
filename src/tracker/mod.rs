// isoenv-rs: Isomorphic environment tracking for bundlers
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Pass-by-pass tracking of environment references.
//!
//! ```text
//! Tracker::begin_pass() --> Pass { id, records }
//!        |
//!        |  for each analyzed module / reference:
//!        |    Pass::analyze(ctx, reference)  --> Rewriter::rewrite
//!        v
//! Tracker::finalize(pass, HostFacts)
//!        |  same session, id == open pass?  else PassError
//!        v
//!   manifest::reconcile --> manifest', ledger'
//!        |
//!        v
//! ClientManifest { variable, envKeys } --> AssetSink (emit)
//! ```
//!
//! The tracker is the only owner of the cross-pass manifest and timestamp
//! ledger. A pass holds its own record store, so nothing is shared while
//! modules are analyzed.

pub mod asset;
pub mod timestamps;


use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{IsoEnvResult, PassError};
use crate::logging::pass_span;
use crate::manifest::records::PassRecords;
use crate::manifest::{ClientManifest, EnvManifest, HostFacts, Timestamp, TimestampLedger, reconcile};
use crate::rewrite::{EnvReference, Handled, ModuleContext, Rewriter};

use asset::AssetSink;

static NEXT_SESSION: AtomicU64 = AtomicU64::new(1);

/// One build pass in progress.
///
/// Only the tracker that handed out a pass can finalize it.
#[derive(Debug)]
pub struct Pass {
    session: u64,
    id: u64,
    rewriter: Rewriter,
    records: PassRecords,
}

impl Pass {
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Records collected so far.
    #[must_use]
    pub const fn records(&self) -> &PassRecords {
        &self.records
    }

    /// Handles a reference found while analyzing the module behind `ctx`.
    pub fn analyze<C>(&mut self, ctx: &mut C, reference: &EnvReference<'_>) -> Handled
    where
        C: ModuleContext + ?Sized,
    {
        self.rewriter.rewrite(ctx, reference, &mut self.records)
    }

    /// Rewrites a whole module's source.
    ///
    /// # Errors
    ///
    /// Returns a `RewriteError` for invalid or overlapping reference spans.
    pub fn analyze_source(
        &mut self,
        resource: &str,
        source: &str,
        references: &[EnvReference<'_>],
    ) -> Result<String, crate::error::RewriteError> {
        self.rewriter
            .rewrite_source(resource, source, references, &mut self.records)
    }
}

/// Owns the manifest across passes of one build process or watch session.
///
/// Each tracker is its own session: passes from another tracker are
/// rejected. A clone continues the same session.
#[derive(Debug, Clone)]
pub struct Tracker {
    session: u64,
    rewriter: Rewriter,
    filename: String,
    manifest: EnvManifest,
    ledger: TimestampLedger,
    session_start: Timestamp,
    next_pass: u64,
    open_pass: Option<u64>,
}

impl Tracker {
    /// Tracker whose session starts now.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self::with_session_start(config, timestamps::now_millis())
    }

    /// Files the ledger has never seen count as changed when their
    /// timestamp is newer than `session_start`.
    #[must_use]
    pub fn with_session_start(config: &Config, session_start: Timestamp) -> Self {
        Self {
            session: NEXT_SESSION.fetch_add(1, Ordering::Relaxed),
            rewriter: Rewriter::from_config(config),
            filename: config.plugin.filename.clone(),
            manifest: EnvManifest::new(),
            ledger: TimestampLedger::new(),
            session_start,
            next_pass: 1,
            open_pass: None,
        }
    }

    #[must_use]
    pub const fn rewriter(&self) -> &Rewriter {
        &self.rewriter
    }

    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    #[must_use]
    pub const fn manifest(&self) -> &EnvManifest {
        &self.manifest
    }

    #[must_use]
    pub const fn ledger(&self) -> &TimestampLedger {
        &self.ledger
    }

    #[must_use]
    pub const fn session_start(&self) -> Timestamp {
        self.session_start
    }

    /// Pass currently accepting records, if any.
    #[must_use]
    pub const fn open_pass(&self) -> Option<u64> {
        self.open_pass
    }

    #[must_use]
    pub fn client_manifest(&self) -> ClientManifest {
        ClientManifest::new(self.rewriter.variable(), &self.manifest)
    }

    /// Opens a new pass with an empty record store.
    ///
    /// A pass that is still open is abandoned; finalizing it afterwards
    /// fails with `PassError::OutOfOrder`.
    pub fn begin_pass(&mut self) -> Pass {
        let id = self.next_pass;
        self.next_pass += 1;

        if let Some(abandoned) = self.open_pass.replace(id) {
            warn!(pass = abandoned, next = id, "Abandoning unfinished pass");
        }
        debug!(pass = id, "Pass started");

        Pass {
            session: self.session,
            id,
            rewriter: self.rewriter.clone(),
            records: PassRecords::new(),
        }
    }

    /// Reconciles a completed pass into the manifest.
    ///
    /// Must be called once every module of `pass` has been analyzed. On
    /// error the tracker state is unchanged.
    ///
    /// # Errors
    ///
    /// Returns `PassError::ForeignPass` if another tracker began `pass`,
    /// `PassError::NotStarted` if no pass is open and
    /// `PassError::OutOfOrder` if `pass` is not the open one.
    pub fn finalize(&mut self, pass: Pass, host: HostFacts) -> IsoEnvResult<ClientManifest> {
        let _span = pass_span(pass.id).entered();

        if pass.session != self.session {
            return Err(PassError::ForeignPass { pass: pass.id }.into());
        }
        match self.open_pass {
            Some(open) if open == pass.id => {}
            Some(open) => return Err(PassError::OutOfOrder { pass: pass.id, open }.into()),
            None => return Err(PassError::NotStarted { pass: pass.id }.into()),
        }

        debug!(
            live = host.live.len(),
            recorded = pass.records.len(),
            tracked = self.manifest.len(),
            "Reconciling pass"
        );

        let out = reconcile(
            &self.manifest,
            &self.ledger,
            host,
            pass.records,
            self.session_start,
        );

        for file in &out.dropped {
            debug!(file = %file, "Evicted file no longer in the build graph");
        }
        for file in &out.emptied {
            debug!(file = %file, "Evicted file that no longer references env");
        }

        self.manifest = out.manifest;
        self.ledger = out.ledger;
        self.open_pass = None;

        Ok(self.client_manifest())
    }

    /// [`finalize`](Self::finalize), then writes the manifest asset to `sink`.
    ///
    /// # Errors
    ///
    /// Returns the `finalize` errors, or an `AssetError` if the manifest
    /// cannot be serialized or stored. The manifest is updated even when
    /// storing fails.
    pub fn emit<S>(&mut self, pass: Pass, host: HostFacts, sink: &mut S) -> IsoEnvResult<ClientManifest>
    where
        S: AssetSink + ?Sized,
    {
        let client = self.finalize(pass, host)?;
        let json = client.to_json(&self.filename)?;
        sink.emit(&self.filename, &json)?;

        info!(
            asset = %self.filename,
            keys = client.env_keys.len(),
            "Emitted env manifest"
        );
        Ok(client)
    }
}
