// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the adapters crate.

use std::time::Duration;

fn non_empty(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn split_words(var: &str) -> Option<Vec<String>> {
    non_empty(var).map(|s| s.split_whitespace().map(str::to_string).collect())
}

/// Build tool binary (default: `bazel`).
pub fn bazel_command() -> String {
    non_empty("PL_BAZEL_COMMAND").unwrap_or_else(|| "bazel".to_string())
}

/// Startup options placed before the build tool subcommand (default: none).
pub fn bazel_startup_options() -> Vec<String> {
    split_words("PL_BAZEL_STARTUP_OPTIONS").unwrap_or_default()
}

/// Options added to every build (default: `--jobs=4`).
pub fn bazel_options() -> Vec<String> {
    split_words("PL_BAZEL_OPTIONS").unwrap_or_else(|| vec!["--jobs=4".to_string()])
}

/// Remote cache endpoint, if one is configured.
pub fn remote_cache_url() -> Option<String> {
    non_empty("PL_REMOTE_CACHE_URL")
}

/// Per-invocation tool timeout. Unset means tool calls may run indefinitely.
pub fn tool_timeout() -> Option<Duration> {
    non_empty("PL_TOOL_TIMEOUT_SECS")
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}

/// Validation tool binary (default: `buf`).
pub fn buf_command() -> String {
    non_empty("PL_BUF_COMMAND").unwrap_or_else(|| "buf".to_string())
}

/// Git binary (default: `git`).
pub fn git_command() -> String {
    non_empty("PL_GIT_COMMAND").unwrap_or_else(|| "git".to_string())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
