// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tokio::process::Command;

#[tokio::test]
async fn run_tool_success() {
    let mut cmd = Command::new("echo");
    cmd.arg("hello");
    let output = run_tool(cmd, Some(Duration::from_secs(5)), "echo")
        .await
        .unwrap();
    assert!(output.success());
    assert_eq!(output.output.trim(), "hello");
}

#[tokio::test]
async fn run_tool_nonzero_exit_is_not_an_error() {
    let cmd = Command::new("false");
    let output = run_tool(cmd, None, "false").await.unwrap();
    assert!(!output.success());
    assert_eq!(output.exit_code, 1);
}

#[tokio::test]
async fn run_tool_combines_stdout_and_stderr() {
    let mut cmd = Command::new("sh");
    cmd.args(["-c", "echo out; echo err >&2; exit 3"]);
    let output = run_tool(cmd, None, "sh").await.unwrap();
    assert_eq!(output.exit_code, 3);
    assert_eq!(output.output, "out\nerr\n");
}

#[tokio::test]
async fn run_tool_spawn_error() {
    let cmd = Command::new("/nonexistent/binary");
    let err = run_tool(cmd, None, "nonexistent").await.unwrap_err();
    assert!(matches!(err, ToolError::Spawn { .. }));
    assert!(err.to_string().starts_with("nonexistent failed to start:"), "got: {}", err);
}

#[tokio::test]
async fn run_tool_timeout_elapsed() {
    let mut cmd = Command::new("sleep");
    cmd.arg("10");
    let err = run_tool(cmd, Some(Duration::from_millis(100)), "test sleep")
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::TimedOut { .. }));
    assert!(err.to_string().contains("test sleep"), "got: {}", err);
}

#[test]
fn check_converts_failure() {
    let err = ToolOutput::new(2, "ERROR: no such package")
        .check("bazel query")
        .unwrap_err();
    assert_eq!(err.to_string(), "bazel query exited with code 2");
    assert_eq!(err.output(), Some("ERROR: no such package"));
}

#[test]
fn tail_keeps_last_lines() {
    let output = ToolOutput::new(1, "a\n\nb\nc\nd\n");
    assert_eq!(output.tail(2), "c\nd");
    assert_eq!(output.tail(10), "a\nb\nc\nd");
}
