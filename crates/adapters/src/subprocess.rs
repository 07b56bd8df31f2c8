// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess execution helpers

use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

/// Captured result of one external tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    /// Process exit code, or `-1` when terminated by a signal
    pub exit_code: i32,
    /// stdout followed by stderr
    pub output: String,
}

impl ToolOutput {
    pub fn new(exit_code: i32, output: impl Into<String>) -> Self {
        Self {
            exit_code,
            output: output.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Turn a non-zero exit into [`ToolError::Failed`].
    pub fn check(self, description: &str) -> Result<Self, ToolError> {
        if self.success() {
            Ok(self)
        } else {
            Err(ToolError::Failed {
                description: description.to_string(),
                exit_code: self.exit_code,
                output: self.output,
            })
        }
    }

    /// Non-empty, trimmed output lines.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.output.lines().map(str::trim).filter(|l| !l.is_empty())
    }

    /// Last `n` output lines, for error messages.
    pub fn tail(&self, n: usize) -> String {
        let lines: Vec<&str> = self.lines().collect();
        lines[lines.len().saturating_sub(n)..].join("\n")
    }
}

/// Errors from running an external tool
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{description} failed to start: {source}")]
    Spawn {
        description: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{description} timed out after {secs}s")]
    TimedOut { description: String, secs: u64 },
    #[error("{description} exited with code {exit_code}")]
    Failed {
        description: String,
        exit_code: i32,
        output: String,
    },
}

impl ToolError {
    /// Captured output, when the tool got far enough to produce any.
    pub fn output(&self) -> Option<&str> {
        match self {
            ToolError::Failed { output, .. } => Some(output),
            _ => None,
        }
    }
}

/// Run a subprocess and capture its combined output.
///
/// A non-zero exit is not an error here; callers decide what it means.
/// With a timeout, the child is killed when it elapses (the command is
/// configured with `kill_on_drop`). Without one, the call waits for as
/// long as the tool runs.
pub async fn run_tool(
    mut cmd: Command,
    timeout: Option<Duration>,
    description: &str,
) -> Result<ToolOutput, ToolError> {
    cmd.kill_on_drop(true);
    let output = cmd.output();
    let result = match timeout {
        Some(limit) => match tokio::time::timeout(limit, output).await {
            Ok(result) => result,
            Err(_elapsed) => {
                return Err(ToolError::TimedOut {
                    description: description.to_string(),
                    secs: limit.as_secs(),
                })
            }
        },
        None => output.await,
    };
    let output = result.map_err(|source| ToolError::Spawn {
        description: description.to_string(),
        source,
    })?;

    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.is_empty() {
        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&stderr);
    }
    Ok(ToolOutput {
        exit_code: output.status.code().unwrap_or(-1),
        output: text,
    })
}

#[cfg(test)]
#[path = "subprocess_tests.rs"]
mod tests;
