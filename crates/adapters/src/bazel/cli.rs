// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build tool adapter that shells out to the `bazel` binary.

use super::BuildTool;
use crate::env;
use crate::subprocess::{run_tool, ToolError, ToolOutput};
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;

#[derive(Clone, Debug)]
pub struct BazelCli {
    command: String,
    startup_options: Vec<String>,
    build_options: Vec<String>,
    remote_cache_url: Option<String>,
    timeout: Option<Duration>,
}

impl BazelCli {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            startup_options: Vec::new(),
            build_options: Vec::new(),
            remote_cache_url: None,
            timeout: None,
        }
    }

    /// Configure from `PL_BAZEL_*`, `PL_REMOTE_CACHE_URL` and
    /// `PL_TOOL_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        Self {
            command: env::bazel_command(),
            startup_options: env::bazel_startup_options(),
            build_options: env::bazel_options(),
            remote_cache_url: env::remote_cache_url(),
            timeout: env::tool_timeout(),
        }
    }

    pub fn with_build_options(mut self, options: Vec<String>) -> Self {
        self.build_options = options;
        self
    }

    pub fn with_remote_cache(mut self, url: impl Into<String>) -> Self {
        self.remote_cache_url = Some(url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Full argument vector (after the binary) for `build`.
    pub fn build_args(&self, args: &[String], pattern: &str) -> Vec<String> {
        let mut full = vec!["build".to_string()];
        full.extend(self.build_options.iter().cloned());
        if let Some(url) = &self.remote_cache_url {
            full.push(format!("--remote_cache={}", url));
            full.push("--remote_upload_local_results=true".to_string());
        }
        full.extend(args.iter().cloned());
        full.push("--".to_string());
        full.push(pattern.to_string());
        full
    }

    fn command(&self, workdir: &Path, args: &[String]) -> Command {
        let mut cmd = Command::new(&self.command);
        cmd.args(&self.startup_options).args(args).current_dir(workdir);
        cmd
    }

    async fn invoke(
        &self,
        workdir: &Path,
        args: Vec<String>,
        description: &str,
    ) -> Result<ToolOutput, ToolError> {
        tracing::debug!(command = %self.command, args = ?args, workdir = %workdir.display(), "invoking build tool");
        run_tool(self.command(workdir, &args), self.timeout, description).await
    }
}

impl Default for BazelCli {
    fn default() -> Self {
        Self::from_env()
    }
}

#[async_trait]
impl BuildTool for BazelCli {
    async fn build(
        &self,
        workdir: &Path,
        args: &[String],
        pattern: &str,
    ) -> Result<ToolOutput, ToolError> {
        let description = format!("bazel build {}", pattern);
        self.invoke(workdir, self.build_args(args, pattern), &description)
            .await
    }

    async fn query(&self, workdir: &Path, expression: &str) -> Result<Vec<String>, ToolError> {
        let args = vec!["query".to_string(), expression.to_string()];
        let output = self
            .invoke(workdir, args, "bazel query")
            .await?
            .check("bazel query")?;
        Ok(output.lines().map(str::to_string).collect())
    }

    async fn clean(&self, workdir: &Path) -> Result<(), ToolError> {
        let args = vec!["clean".to_string(), "--expunge".to_string()];
        self.invoke(workdir, args, "bazel clean")
            .await?
            .check("bazel clean")?;
        Ok(())
    }

    async fn run(
        &self,
        workdir: &Path,
        target: &str,
        args: &[String],
    ) -> Result<ToolOutput, ToolError> {
        let mut full = vec!["run".to_string(), target.to_string()];
        if !args.is_empty() {
            full.push("--".to_string());
            full.extend(args.iter().cloned());
        }
        let description = format!("bazel run {}", target);
        self.invoke(workdir, full, &description)
            .await?
            .check(&description)
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
