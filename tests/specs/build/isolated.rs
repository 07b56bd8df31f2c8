//! Per-bundle (isolated) build specs

use crate::prelude::*;

fn three_bundles(lake: &Lake) {
    lake.bundle("a");
    lake.bundle("a/b");
    lake.bundle("c");
}

#[test]
fn isolated_builds_deepest_bundles_first() {
    let temp = Lake::acme();
    three_bundles(&temp);
    temp.protolake()
        .args(&["build", "--isolate"])
        .passes()
        .stderr_has("Found 3 bundle targets")
        .stdout_has("Targets: 3 total, 3 succeeded, 0 failed, 0 skipped");
    assert_eq!(temp.built_patterns(), vec!["//a/b/...", "//a/...", "//c/..."]);
}

#[test]
fn partial_failure_exits_with_two() {
    let temp = Lake::acme().failing("//a/...");
    three_bundles(&temp);
    temp.protolake()
        .args(&["build", "--isolate", "--continue-on-failure"])
        .exits(2)
        .stdout_has("Build PARTIAL_SUCCESS")
        .stdout_has("Targets: 3 total, 2 succeeded, 1 failed, 0 skipped")
        .stderr_has("(continuing)");
    assert_eq!(temp.built_patterns(), vec!["//a/b/...", "//a/...", "//c/..."]);
}

#[test]
fn first_failure_stops_without_continue() {
    let temp = Lake::acme().failing("//a/b/...");
    three_bundles(&temp);
    temp.protolake()
        .args(&["build", "--isolate"])
        .exits(1)
        .stderr_has("Bazel build failed for target a/b");
    assert_eq!(temp.built_patterns(), vec!["//a/b/..."]);
}

#[test]
fn lake_without_bundles_skips_build() {
    let temp = Lake::acme();
    temp.protolake()
        .args(&["build", "--isolate"])
        .passes()
        .stdout_has("Targets: 0 total");
}
