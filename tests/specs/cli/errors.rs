//! CLI error handling specs

use crate::prelude::*;

#[test]
fn build_outside_a_lake_fails() {
    let temp = Lake::empty();
    temp.protolake()
        .args(&["build"])
        .exits(1)
        .stderr_has("Error: no lake.toml found");
}

#[test]
fn malformed_lake_config_fails() {
    let temp = Lake::empty();
    temp.file("lake.toml", "name = [");
    temp.protolake()
        .args(&["build"])
        .exits(1)
        .stderr_has("invalid lake configuration");
}

#[test]
fn unknown_flag_is_rejected() {
    cli()
        .args(&["build", "--bogus"])
        .fails()
        .stderr_has("unexpected argument '--bogus'");
}

#[test]
fn uninitialized_lake_fails_in_codegen() {
    let temp = Lake::empty();
    temp.file("lake.toml", MINIMAL_LAKE);
    temp.protolake()
        .args(&["build"])
        .exits(1)
        .stderr_has("Error: Build failed: Code generation failed")
        .stderr_has("BUILD.bazel");
    assert!(temp.built_patterns().is_empty());
}

#[test]
fn target_outside_lake_fails() {
    let temp = Lake::acme();
    let elsewhere = tempfile::tempdir().unwrap();
    temp.protolake()
        .args(&["build", elsewhere.path().to_str().unwrap()])
        .exits(1)
        .stderr_has("Error: Build failed");
}
