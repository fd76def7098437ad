// isoenv-rs: Isomorphic environment tracking for bundlers
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tests for manifest reconciliation.

use super::records::PassRecords;
use super::{ClientManifest, EnvManifest, HostFacts, TimestampLedger, reconcile};
use std::collections::BTreeSet;

const START: u64 = 1_000;

fn names(list: &[&str]) -> BTreeSet<String> {
    list.iter().map(ToString::to_string).collect()
}

fn ledger(entries: &[(&str, u64)]) -> TimestampLedger {
    entries.iter().map(|(f, t)| (*f, *t)).collect()
}

#[test]
fn test_records_accumulate_within_pass() {
    let mut records = PassRecords::new();
    assert!(records.record("a.js", "FOO"));
    assert!(records.record("a.js", "BAR"));
    assert!(!records.record("a.js", "FOO"));
    assert!(records.record("b.js", "FOO"));

    assert_eq!(records.len(), 2);
    assert_eq!(records.get("a.js"), Some(&names(&["BAR", "FOO"])));
    assert!(!records.contains("c.js"));
}

#[test]
fn test_records_merge() {
    let mut records: PassRecords = [("a.js", ["FOO"])].into_iter().collect();
    let other: PassRecords = [("a.js", ["BAR"]), ("b.js", ["BAZ"])].into_iter().collect();
    records.merge(other);

    assert_eq!(records.get("a.js"), Some(&names(&["BAR", "FOO"])));
    assert_eq!(records.get("b.js"), Some(&names(&["BAZ"])));
}

#[test]
fn test_env_keys_sorted_and_deduplicated() {
    let manifest: EnvManifest = [
        ("b.js", vec!["ZED", "API"]),
        ("a.js", vec!["API", "MID"]),
    ]
    .into_iter()
    .collect();
    assert_eq!(manifest.env_keys(), ["API", "MID", "ZED"]);
}

#[test]
fn test_first_pass() {
    // L = {a.js, b.js}, R = {a.js: {FOO}}, no prior manifest.
    let host = HostFacts::new(["a.js", "b.js"], ledger(&[("a.js", 1_500), ("b.js", 1_500)]));
    let records: PassRecords = [("a.js", ["FOO"])].into_iter().collect();

    let out = reconcile(
        &EnvManifest::new(),
        &TimestampLedger::new(),
        host,
        records,
        START,
    );

    assert_eq!(out.env_keys(), ["FOO"]);
    assert!(!out.manifest.contains("b.js"));
    assert_eq!(out.ledger, ledger(&[("a.js", 1_500), ("b.js", 1_500)]));
}

#[test]
fn test_changed_file_without_records_is_evicted() {
    let manifest: EnvManifest = [("a.js", ["FOO"]), ("b.js", ["BAR"])].into_iter().collect();
    let previous = ledger(&[("a.js", 2_000), ("b.js", 2_000)]);
    let host = HostFacts::new(["a.js", "b.js"], ledger(&[("a.js", 2_000), ("b.js", 3_000)]));

    let out = reconcile(&manifest, &previous, host, PassRecords::new(), START);

    let expected: EnvManifest = [("a.js", ["FOO"])].into_iter().collect();
    assert_eq!(out.manifest, expected);
    assert_eq!(out.env_keys(), ["FOO"]);
    assert_eq!(out.emptied, ["b.js"]);
    assert!(out.dropped.is_empty());
}

#[test]
fn test_file_leaving_graph_is_dropped() {
    let manifest: EnvManifest = [("a.js", ["FOO"]), ("b.js", ["BAR"])].into_iter().collect();
    let previous = ledger(&[("a.js", 2_000), ("b.js", 2_000)]);
    let host = HostFacts::new(["a.js"], ledger(&[("a.js", 2_000)]));

    let out = reconcile(&manifest, &previous, host, PassRecords::new(), START);

    let expected: EnvManifest = [("a.js", ["FOO"])].into_iter().collect();
    assert_eq!(out.manifest, expected);
    assert_eq!(out.dropped, ["b.js"]);
    assert!(out.emptied.is_empty());
}

#[test]
fn test_dropped_file_evicted_even_if_unchanged_or_recorded_before() {
    let manifest: EnvManifest = [("gone.js", ["SECRET"])].into_iter().collect();
    let previous = ledger(&[("gone.js", 5_000)]);
    let host = HostFacts::new(Vec::<String>::new(), ledger(&[("gone.js", 5_000)]));

    let out = reconcile(&manifest, &previous, host, PassRecords::new(), START);
    assert!(out.manifest.is_empty());
    assert!(out.env_keys().is_empty());
}

#[test]
fn test_unchanged_file_keeps_entry_verbatim() {
    let manifest: EnvManifest = [("a.js", ["FOO", "BAR"])].into_iter().collect();
    let previous = ledger(&[("a.js", 2_000)]);
    let host = HostFacts::new(["a.js"], ledger(&[("a.js", 2_000)]));

    let out = reconcile(&manifest, &previous, host, PassRecords::new(), START);
    assert_eq!(out.manifest.get("a.js"), manifest.get("a.js"));
}

#[test]
fn test_records_overwrite_never_union() {
    let manifest: EnvManifest = [("a.js", ["FOO", "BAR"])].into_iter().collect();
    let previous = ledger(&[("a.js", 2_000)]);
    let host = HostFacts::new(["a.js"], ledger(&[("a.js", 2_500)]));
    let records: PassRecords = [("a.js", ["BAZ"])].into_iter().collect();

    let out = reconcile(&manifest, &previous, host, records, START);
    assert_eq!(out.manifest.get("a.js"), Some(&names(&["BAZ"])));
    assert_eq!(out.env_keys(), ["BAZ"]);
}

#[test]
fn test_unseen_file_compares_against_session_start() {
    let manifest: EnvManifest = [("old.js", ["A"]), ("new.js", ["B"])].into_iter().collect();
    // Neither file is in the ledger; old.js predates the session.
    let host = HostFacts::new(
        ["old.js", "new.js"],
        ledger(&[("old.js", START - 1), ("new.js", START + 1)]),
    );

    let out = reconcile(
        &manifest,
        &TimestampLedger::new(),
        host,
        PassRecords::new(),
        START,
    );
    assert!(out.manifest.contains("old.js"));
    assert!(!out.manifest.contains("new.js"));
    assert_eq!(out.emptied, ["new.js"]);
}

#[test]
fn test_file_without_timestamp_is_unchanged() {
    let manifest: EnvManifest = [("virtual.js", ["A"])].into_iter().collect();
    let host = HostFacts::new(["virtual.js"], TimestampLedger::new());

    let out = reconcile(
        &manifest,
        &ledger(&[("virtual.js", 10)]),
        host,
        PassRecords::new(),
        START,
    );
    assert!(out.manifest.contains("virtual.js"));
    assert!(out.ledger.is_empty());
}

#[test]
fn test_records_for_files_outside_manifest_are_added() {
    let host = HostFacts::new(["c.js"], ledger(&[("c.js", 9_000)]));
    let records: PassRecords = [("c.js", ["NEW"])].into_iter().collect();

    let out = reconcile(
        &EnvManifest::new(),
        &TimestampLedger::new(),
        host,
        records,
        START,
    );
    assert_eq!(out.manifest.get("c.js"), Some(&names(&["NEW"])));
}

#[test]
fn test_client_manifest_json() {
    let manifest: EnvManifest = [("a.js", ["FOO", "BAR"])].into_iter().collect();
    let client = ClientManifest::new("__ISOMORPHIC_ENV__", &manifest);
    let json = client.to_json("isomorphic-env.json").unwrap();

    insta::assert_snapshot!(json, @r#"
    {
      "variable": "__ISOMORPHIC_ENV__",
      "envKeys": [
        "BAR",
        "FOO"
      ]
    }
    "#);
    assert_eq!(ClientManifest::from_json(&json).unwrap(), client);
}

#[test]
fn test_client_manifest_json_empty() {
    let client = ClientManifest::new("__ENV__", &EnvManifest::new());
    insta::assert_snapshot!(client.to_json("env.json").unwrap(), @r#"
    {
      "variable": "__ENV__",
      "envKeys": []
    }
    "#);
}
