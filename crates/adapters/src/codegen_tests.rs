// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::bazel::FakeBuildTool;

fn initialized_lake() -> (tempfile::TempDir, RepoConfig) {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("BUILD.bazel"), "").unwrap();
    let repo = RepoConfig::new("acme", dir.path());
    (dir, repo)
}

#[tokio::test]
async fn missing_root_build_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let repo = RepoConfig::new("acme", dir.path());
    let tool = FakeBuildTool::new();
    let mut status = PhaseStatus::default();

    let err = GazelleRunner::new(tool.clone())
        .run(&repo, &mut status)
        .await
        .unwrap_err();
    assert!(matches!(err, CodegenError::NotInitialized(_)));
    assert!(tool.calls().is_empty());
}

#[tokio::test]
async fn wrapper_success_runs_nothing_else() {
    let (_dir, repo) = initialized_lake();
    let tool = FakeBuildTool::new();
    let mut status = PhaseStatus::default();

    GazelleRunner::new(tool.clone())
        .run(&repo, &mut status)
        .await
        .unwrap();
    assert_eq!(tool.run_targets(), vec![GAZELLE_WRAPPER]);
    assert_eq!(status.log_lines.last().map(String::as_str), Some("Gazelle completed"));
}

#[tokio::test]
async fn wrapper_failure_falls_back_to_gazelle() {
    let (_dir, repo) = initialized_lake();
    let tool = FakeBuildTool::new();
    tool.fail_run(GAZELLE_WRAPPER);
    tool.fail_run(GAZELLE_PROTOLAKE);
    let mut status = PhaseStatus::default();

    GazelleRunner::new(tool.clone())
        .run(&repo, &mut status)
        .await
        .unwrap();
    assert_eq!(
        tool.run_targets(),
        vec![GAZELLE_WRAPPER, GAZELLE, GAZELLE_PROTOLAKE]
    );
    assert!(status.log_lines.iter().any(|l| l.starts_with("Gazelle wrapper failed")));
    assert!(status.log_lines.iter().any(|l| l.starts_with("protolake-gazelle failed")));
}

#[tokio::test]
async fn fallback_failure_is_an_error() {
    let (_dir, repo) = initialized_lake();
    let tool = FakeBuildTool::new();
    tool.fail_run(GAZELLE_WRAPPER);
    tool.fail_run(GAZELLE);
    let mut status = PhaseStatus::default();

    let err = GazelleRunner::new(tool.clone())
        .run(&repo, &mut status)
        .await
        .unwrap_err();
    assert!(matches!(err, CodegenError::Gazelle(_)));
    assert_eq!(tool.run_targets(), vec![GAZELLE_WRAPPER, GAZELLE]);
}
