//! Whole-lake build specs

use crate::prelude::*;

#[test]
fn lake_build_succeeds() {
    let temp = Lake::acme();
    temp.protolake()
        .args(&["build"])
        .passes()
        .stdout_has("Build SUCCEEDED for ")
        .stdout_has("on main")
        .stdout_has("Targets: 1 total, 1 succeeded, 0 failed, 0 skipped")
        .stderr_has("==> Generating BUILD files")
        .stderr_has("==> Validating protos")
        .stderr_has("No buf.yaml found, skipping validation")
        .stderr_has("==> Building")
        .stderr_has("Successfully built: .");

    assert_eq!(temp.built_patterns(), vec!["//..."]);
    let build = temp
        .bazel_calls()
        .into_iter()
        .find(|c| c.starts_with("build "))
        .unwrap();
    assert!(build.contains("--jobs=4"));
    assert!(build.contains("--keep_going"));
    assert!(build.contains("--action_env=PROTOLAKE_VERSION=1.0.0-main"));
    assert!(temp.log().contains("pipeline completed"));
}

#[test]
fn codegen_runs_gazelle_wrapper_first() {
    let temp = Lake::acme();
    temp.protolake().args(&["build"]).passes();
    assert_eq!(temp.bazel_calls()[0], "run //tools:gazelle_wrapper");
}

#[test]
fn nested_target_builds_its_subtree() {
    let temp = Lake::acme();
    temp.file("com/acme/user/user.proto", "syntax = \"proto3\";\n");
    temp.protolake()
        .args(&["build", "com/acme"])
        .passes()
        .stdout_has("built      com/acme 1.0.0-main");
    assert_eq!(temp.built_patterns(), vec!["//com/acme/..."]);
}

#[test]
fn failed_build_exits_nonzero() {
    let temp = Lake::acme().failing("//...");
    temp.protolake()
        .args(&["build"])
        .exits(1)
        .stderr_has("Error: Build failed: Bazel build failed for target .")
        .stderr_has("build failed: ");
}

#[test]
fn failed_build_with_continue_prints_summary() {
    let temp = Lake::acme().failing("//...");
    temp.protolake()
        .args(&["build", "--continue-on-failure"])
        .exits(1)
        .stdout_has("Build FAILED")
        .stdout_has("Targets: 1 total, 0 succeeded, 1 failed, 0 skipped");
}

#[test]
fn clean_expunges_before_building() {
    let temp = Lake::acme();
    temp.protolake()
        .args(&["build", "--clean"])
        .passes()
        .stderr_has("Build cache cleaned");
    let calls = temp.bazel_calls();
    let clean = calls.iter().position(|c| c == "clean --expunge").unwrap();
    let build = calls.iter().position(|c| c.starts_with("build ")).unwrap();
    assert!(clean < build);
}

#[test]
fn install_local_publishes_artifacts() {
    let temp = Lake::acme().publishing("//:acme_java_publish");
    temp.protolake()
        .args(&["build", "--install-local"])
        .passes()
        .stderr_has("==> Publishing")
        .stdout_has("Artifacts:\n  com.acme.protos:acme:1.0.0-main\n");
    assert!(temp
        .bazel_calls()
        .contains(&"run //:acme_java_publish".to_string()));
}

#[test]
fn json_output_carries_the_response() {
    let temp = Lake::acme();
    temp.protolake()
        .args(&["build", "-o", "json"])
        .passes()
        .stdout_has("\"status\": \"SUCCEEDED\"")
        .stdout_has("\"current_phase\": \"COMPLETED\"");
}
