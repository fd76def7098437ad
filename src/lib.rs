// isoenv-rs: Isomorphic environment tracking for bundlers
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! Server code reads `process.env.NAME`; the browser bundle reads
//! `__ISOMORPHIC_ENV__.NAME` instead, and a manifest lists every `NAME` the
//! live bundle still uses so the server can inject exactly those values.
//!
//! # Crate Architecture
//!
//! ```text
//!          host bundler (module graph, parser, watcher)
//!             |                         |
//!   references per module         live files, mtimes
//!             v                         v
//!        ,---------,              ,-----------,
//!        | rewrite | --records--> |  tracker  |
//!        '---------'              '-----+-----'
//!                                       |
//!                                       v
//!                                   manifest
//!                              reconcile + JSON asset
//!                                       |
//!                    server side        v
//!        ,--------------------------------------,
//!        |  env   snapshot + projection -> <script>  |
//!        '--------------------------------------'
//!
//!   +-----------------------------------------+
//!   |  foundation   config, error, logging    |
//!   +-----------------------------------------+
//! ```

pub mod config;
pub mod env;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod rewrite;
pub mod tracker;
