// isoenv-rs: Isomorphic environment tracking for bundlers
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for multi-pass tracking.
//!
//! Each test drives a `Tracker` through several passes the way a watching
//! bundler would: analyze the invalidated modules, then finalize with the
//! current graph and timestamps.

use std::collections::BTreeMap;

use isoenv::config::Config;
use isoenv::env::EnvSnapshot;
use isoenv::env::projector::{ClientEnvScript, SelectionPolicy, project};
use isoenv::manifest::{ClientManifest, HostFacts, TimestampLedger};
use isoenv::rewrite::{EnvReference, Span};
use isoenv::tracker::{Pass, Tracker};

const TARGET: &str = "process.env";
const SESSION_START: u64 = 10_000;

/// Analyzes `source`, turning every `process.env.NAME` into a member
/// reference the way a parser would report it.
fn analyze(pass: &mut Pass, file: &str, source: &str) -> String {
    let refs: Vec<EnvReference<'_>> = source
        .match_indices(TARGET)
        .map(|(start, _)| {
            let rest = &source[start + TARGET.len() + 1..];
            let len = rest
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(rest.len());
            EnvReference::Member {
                path: TARGET,
                object: Span::new(start, start + TARGET.len()),
                property: &rest[..len],
            }
        })
        .collect();
    pass.analyze_source(file, source, &refs).unwrap()
}

fn facts(live: &[&str], times: &[(&str, u64)]) -> HostFacts {
    HostFacts::new(
        live.iter().copied(),
        times.iter().copied().collect::<TimestampLedger>(),
    )
}

fn tracker() -> Tracker {
    Tracker::with_session_start(&Config::default(), SESSION_START)
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn scenario_first_second_third_pass() {
    let mut tracker = tracker();

    // Pass 1: a.js references FOO, b.js references nothing yet.
    let mut pass = tracker.begin_pass();
    analyze(&mut pass, "a.js", "export const foo = process.env.FOO;");
    let client = tracker
        .finalize(
            pass,
            facts(&["a.js", "b.js"], &[("a.js", 10_500), ("b.js", 10_500)]),
        )
        .unwrap();
    assert_eq!(client.env_keys, ["FOO"]);
    assert!(!tracker.manifest().contains("b.js"));

    // Pass 2: b.js gains BAR.
    let mut pass = tracker.begin_pass();
    analyze(&mut pass, "b.js", "export const bar = process.env.BAR;");
    let client = tracker
        .finalize(
            pass,
            facts(&["a.js", "b.js"], &[("a.js", 10_500), ("b.js", 11_000)]),
        )
        .unwrap();
    assert_eq!(client.env_keys, ["BAR", "FOO"]);

    // Pass 3: b.js edited to drop the reference; a.js untouched.
    let pass = tracker.begin_pass();
    let client = tracker
        .finalize(
            pass,
            facts(&["a.js", "b.js"], &[("a.js", 10_500), ("b.js", 12_000)]),
        )
        .unwrap();
    assert_eq!(client.env_keys, ["FOO"]);
    assert!(!tracker.manifest().contains("b.js"));
    assert!(tracker.manifest().contains("a.js"));

    // Pass 4: b.js removed from the graph, nothing changed.
    let pass = tracker.begin_pass();
    let client = tracker
        .finalize(pass, facts(&["a.js"], &[("a.js", 10_500)]))
        .unwrap();
    assert_eq!(client.env_keys, ["FOO"]);
    assert_eq!(tracker.manifest().len(), 1);
}

#[test]
fn untouched_files_survive_partial_rebuilds() {
    let mut tracker = tracker();
    let times = [("a.js", 10_100), ("b.js", 10_100), ("c.js", 10_100)];

    let mut pass = tracker.begin_pass();
    analyze(&mut pass, "a.js", "process.env.A");
    analyze(&mut pass, "b.js", "process.env.B");
    analyze(&mut pass, "c.js", "process.env.C");
    tracker
        .finalize(pass, facts(&["a.js", "b.js", "c.js"], &times))
        .unwrap();

    // Only c.js is rebuilt; it now reads C2 instead of C.
    let mut pass = tracker.begin_pass();
    analyze(&mut pass, "c.js", "process.env.C2");
    let client = tracker
        .finalize(
            pass,
            facts(
                &["a.js", "b.js", "c.js"],
                &[("a.js", 10_100), ("b.js", 10_100), ("c.js", 10_900)],
            ),
        )
        .unwrap();
    assert_eq!(client.env_keys, ["A", "B", "C2"]);
}

#[test]
fn file_readded_after_removal_is_tracked_again() {
    let mut tracker = tracker();

    let mut pass = tracker.begin_pass();
    analyze(&mut pass, "a.js", "process.env.A");
    tracker
        .finalize(pass, facts(&["a.js"], &[("a.js", 10_100)]))
        .unwrap();

    let pass = tracker.begin_pass();
    let client = tracker.finalize(pass, facts(&[], &[])).unwrap();
    assert!(client.env_keys.is_empty());

    let mut pass = tracker.begin_pass();
    analyze(&mut pass, "a.js", "process.env.A");
    let client = tracker
        .finalize(pass, facts(&["a.js"], &[("a.js", 10_100)]))
        .unwrap();
    assert_eq!(client.env_keys, ["A"]);
}

#[test]
fn emitted_manifest_feeds_server_script() {
    let config = Config::parse(
        r#"
[plugin]
variable = "__APP_ENV__"
"#,
    )
    .unwrap();
    let mut tracker = Tracker::with_session_start(&config, SESSION_START);

    let mut pass = tracker.begin_pass();
    let rewritten = analyze(&mut pass, "api.js", "fetch(process.env.API_URL)");
    assert_eq!(rewritten, "fetch(__APP_ENV__.API_URL)");

    let mut assets: BTreeMap<String, String> = BTreeMap::new();
    tracker
        .emit(pass, facts(&["api.js"], &[("api.js", 10_001)]), &mut assets)
        .unwrap();

    let manifest = ClientManifest::from_json(&assets["isomorphic-env.json"]).unwrap();
    let snapshot: EnvSnapshot = [
        ("API_URL", "https://api.example.com"),
        ("DATABASE_PASSWORD", "hunter2"),
    ]
    .into_iter()
    .collect();

    let script = ClientEnvScript::from_manifest(&manifest, None);
    insta::assert_snapshot!(
        script.script_tag(&snapshot),
        @r#"<script>window.__APP_ENV__ = {"API_URL":"https://api.example.com"};</script>"#
    );
}

// =============================================================================
// Projection
// =============================================================================

#[test]
fn projection_explicit_keys_and_default_prefix() {
    let snapshot: EnvSnapshot = [("FOO", "1"), ("CLIENT_BAR", "2"), ("OTHER", "3")]
        .into_iter()
        .collect();
    let exposed = project(&snapshot, &SelectionPolicy::new(["FOO"]));

    let expected: BTreeMap<String, String> = [("FOO", "1"), ("BAR", "2")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    assert_eq!(exposed, expected);
}

#[test]
fn projection_from_config() {
    let config = Config::parse(
        r#"
[client]
explicit_keys = ["NODE_ENV"]
pattern = "^PUBLIC_"
"#,
    )
    .unwrap();
    let snapshot: EnvSnapshot = [
        ("NODE_ENV", "production"),
        ("PUBLIC_SITE", "example.com"),
        ("CLIENT_IGNORED", "x"),
    ]
    .into_iter()
    .collect();

    let script = ClientEnvScript::from_config(&config).unwrap();
    insta::assert_snapshot!(
        script.script(&snapshot),
        @r#"window.__ISOMORPHIC_ENV__ = {"NODE_ENV":"production","SITE":"example.com"};"#
    );
}
