// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Code generation adapters.
//!
//! Code generation regenerates build descriptors from proto sources. It is
//! idempotent, so it runs on every build.

use crate::bazel::BuildTool;
use crate::subprocess::ToolError;
use async_trait::async_trait;
use pl_core::{PhaseStatus, RepoConfig};
use std::path::PathBuf;
use thiserror::Error;

/// Lines of tool output copied into the phase log.
const LOG_TAIL_LINES: usize = 20;

const GAZELLE_WRAPPER: &str = "//tools:gazelle_wrapper";
const GAZELLE: &str = "//:gazelle";
const GAZELLE_PROTOLAKE: &str = "//:gazelle-protolake";

/// Errors from code generation
#[derive(Debug, Error)]
pub enum CodegenError {
    #[error("lake not properly initialized: missing {}", .0.display())]
    NotInitialized(PathBuf),
    #[error("gazelle failed: {0}")]
    Gazelle(#[source] ToolError),
    #[error("{0}")]
    Other(String),
}

/// Adapter that runs code generation for a lake.
///
/// Implementations record progress into `status` (sub-phase and log lines)
/// but leave its lifecycle to the caller.
#[async_trait]
pub trait CodegenRunner: Clone + Send + Sync + 'static {
    async fn run(&self, repo: &RepoConfig, status: &mut PhaseStatus) -> Result<(), CodegenError>;
}

/// Runs gazelle through the build tool.
///
/// Prefers the lake's `//tools:gazelle_wrapper`; when that fails it falls
/// back to plain `//:gazelle` followed by a best-effort bundle-detection
/// pass.
#[derive(Clone)]
pub struct GazelleRunner<T> {
    tool: T,
}

impl<T: BuildTool> GazelleRunner<T> {
    pub fn new(tool: T) -> Self {
        Self { tool }
    }
}

#[async_trait]
impl<T: BuildTool> CodegenRunner for GazelleRunner<T> {
    async fn run(&self, repo: &RepoConfig, status: &mut PhaseStatus) -> Result<(), CodegenError> {
        let build_file = repo.root.join("BUILD.bazel");
        if !tokio::fs::try_exists(&build_file).await.unwrap_or(false) {
            return Err(CodegenError::NotInitialized(build_file));
        }

        status.set_sub_phase("Running gazelle wrapper");
        match self.tool.run(&repo.root, GAZELLE_WRAPPER, &[]).await {
            Ok(output) => {
                status.log(output.tail(LOG_TAIL_LINES));
                status.log("Gazelle completed");
                tracing::info!(lake = %repo.name, "gazelle wrapper completed");
                return Ok(());
            }
            Err(e) => {
                tracing::warn!(lake = %repo.name, error = %e, "gazelle wrapper failed, trying standard gazelle");
                status.log(format!("Gazelle wrapper failed: {}", e));
            }
        }

        status.set_sub_phase("Running standard gazelle");
        let output = self
            .tool
            .run(&repo.root, GAZELLE, &[])
            .await
            .map_err(CodegenError::Gazelle)?;
        status.log(output.tail(LOG_TAIL_LINES));

        status.set_sub_phase("Running protolake-gazelle");
        if let Err(e) = self.tool.run(&repo.root, GAZELLE_PROTOLAKE, &[]).await {
            tracing::warn!(lake = %repo.name, error = %e, "bundle detection pass failed");
            status.log(format!("protolake-gazelle failed: {}", e));
        }
        status.log("Gazelle completed");
        Ok(())
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeCodegen;

#[cfg(any(test, feature = "test-support"))]
mod fake {
    #![cfg_attr(coverage_nightly, coverage(off))]

    use super::{CodegenError, CodegenRunner};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use pl_core::{PhaseStatus, RepoConfig};
    use std::sync::Arc;

    #[derive(Default)]
    struct FakeCodegenState {
        runs: Vec<String>,
        failure: Option<String>,
    }

    /// Fake code generator that records which lakes it ran for
    #[derive(Clone, Default)]
    pub struct FakeCodegen {
        inner: Arc<Mutex<FakeCodegenState>>,
    }

    impl FakeCodegen {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn fail_with(&self, message: &str) {
            self.inner.lock().failure = Some(message.to_string());
        }

        /// Lake names passed to `run`, in call order
        pub fn runs(&self) -> Vec<String> {
            self.inner.lock().runs.clone()
        }
    }

    #[async_trait]
    impl CodegenRunner for FakeCodegen {
        async fn run(
            &self,
            repo: &RepoConfig,
            status: &mut PhaseStatus,
        ) -> Result<(), CodegenError> {
            let mut state = self.inner.lock();
            state.runs.push(repo.name.clone());
            status.set_sub_phase("Running gazelle wrapper");
            match &state.failure {
                Some(message) => Err(CodegenError::Other(message.clone())),
                None => {
                    status.log("Gazelle completed");
                    Ok(())
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "codegen_tests.rs"]
mod tests;
