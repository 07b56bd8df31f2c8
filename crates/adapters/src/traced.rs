// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::bazel::BuildTool;
use crate::subprocess::{ToolError, ToolOutput};
use async_trait::async_trait;
use std::path::Path;
use tracing::Instrument;

/// Wrapper that adds tracing to any BuildTool
#[derive(Clone)]
pub struct TracedBuildTool<T> {
    inner: T,
}

impl<T> TracedBuildTool<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<T: BuildTool> BuildTool for TracedBuildTool<T> {
    async fn build(
        &self,
        workdir: &Path,
        args: &[String],
        pattern: &str,
    ) -> Result<ToolOutput, ToolError> {
        async {
            tracing::info!(arg_count = args.len(), "starting");
            let start = std::time::Instant::now();
            let result = self.inner.build(workdir, args, pattern).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(out) => tracing::info!(exit_code = out.exit_code, elapsed_ms, "build exited"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "build failed to run"),
            }
            result
        }
        .instrument(tracing::info_span!("bazel.build", pattern, workdir = %workdir.display()))
        .await
    }

    async fn query(&self, workdir: &Path, expression: &str) -> Result<Vec<String>, ToolError> {
        let result = self.inner.query(workdir, expression).await;
        tracing::info_span!("bazel.query", expression).in_scope(|| match &result {
            Ok(labels) => tracing::debug!(count = labels.len(), "query returned"),
            Err(e) => tracing::warn!(error = %e, "query failed"),
        });
        result
    }

    async fn clean(&self, workdir: &Path) -> Result<(), ToolError> {
        let result = self.inner.clean(workdir).await;
        tracing::info_span!("bazel.clean", workdir = %workdir.display()).in_scope(|| match &result {
            Ok(()) => tracing::info!("cache expunged"),
            Err(e) => tracing::error!(error = %e, "clean failed"),
        });
        result
    }

    async fn run(
        &self,
        workdir: &Path,
        target: &str,
        args: &[String],
    ) -> Result<ToolOutput, ToolError> {
        async {
            let start = std::time::Instant::now();
            let result = self.inner.run(workdir, target, args).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(_) => tracing::info!(elapsed_ms, "run completed"),
                Err(e) => tracing::warn!(elapsed_ms, error = %e, "run failed"),
            }
            result
        }
        .instrument(tracing::info_span!("bazel.run", target))
        .await
    }
}
