// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! External build tool adapters

mod cli;

pub use cli::BazelCli;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{BuildToolCall, FakeBuildTool};

use crate::subprocess::{ToolError, ToolOutput};
use async_trait::async_trait;
use std::path::Path;

/// Adapter for the external build tool.
///
/// Every call is a synchronous tool invocation from the pipeline's point
/// of view: it returns only when the process exits.
#[async_trait]
pub trait BuildTool: Clone + Send + Sync + 'static {
    /// `build <args> -- <pattern>`.
    ///
    /// Returns the captured output whatever the exit code, since a
    /// non-zero exit under `--keep_going` may still be a partial success.
    async fn build(
        &self,
        workdir: &Path,
        args: &[String],
        pattern: &str,
    ) -> Result<ToolOutput, ToolError>;

    /// `query <expression>`, returning one label per non-empty line.
    async fn query(&self, workdir: &Path, expression: &str) -> Result<Vec<String>, ToolError>;

    /// `clean --expunge`.
    async fn clean(&self, workdir: &Path) -> Result<(), ToolError>;

    /// `run <target> [-- <args>]`. A non-zero exit is an error.
    async fn run(
        &self,
        workdir: &Path,
        target: &str,
        args: &[String],
    ) -> Result<ToolOutput, ToolError>;
}
