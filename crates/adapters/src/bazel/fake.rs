// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake build tool for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::BuildTool;
use crate::subprocess::{ToolError, ToolOutput};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Recorded build tool invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildToolCall {
    Build {
        workdir: PathBuf,
        args: Vec<String>,
        pattern: String,
    },
    Query {
        expression: String,
    },
    Clean,
    Run {
        target: String,
        args: Vec<String>,
    },
}

type BuildHook = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Default)]
struct FakeBuildToolState {
    calls: Vec<BuildToolCall>,
    build_outputs: HashMap<String, ToolOutput>,
    spawn_failures: HashSet<String>,
    query_results: Vec<(String, Vec<String>)>,
    failing_runs: HashSet<String>,
    clean_fails: bool,
    build_hook: Option<BuildHook>,
}

/// Fake build tool for testing.
///
/// Builds succeed unless scripted otherwise, queries return nothing unless
/// a matching result was registered, and runs succeed unless marked failing.
#[derive(Clone, Default)]
pub struct FakeBuildTool {
    inner: Arc<Mutex<FakeBuildToolState>>,
}

impl FakeBuildTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the output of building `pattern`.
    pub fn set_build_output(&self, pattern: &str, exit_code: i32, output: &str) {
        self.inner
            .lock()
            .build_outputs
            .insert(pattern.to_string(), ToolOutput::new(exit_code, output));
    }

    /// Make building `pattern` fail with a hard error.
    pub fn fail_build(&self, pattern: &str) {
        self.set_build_output(pattern, 1, "ERROR: Build did NOT complete successfully");
    }

    /// Make building `pattern` fail to start at all.
    pub fn fail_spawn(&self, pattern: &str) {
        self.inner.lock().spawn_failures.insert(pattern.to_string());
    }

    /// Return `labels` for any query whose expression contains `needle`.
    pub fn set_query_result(&self, needle: &str, labels: &[&str]) {
        self.inner.lock().query_results.push((
            needle.to_string(),
            labels.iter().map(|l| l.to_string()).collect(),
        ));
    }

    pub fn fail_run(&self, target: &str) {
        self.inner.lock().failing_runs.insert(target.to_string());
    }

    pub fn fail_clean(&self) {
        self.inner.lock().clean_fails = true;
    }

    /// Invoke `hook` with the pattern at the start of every build.
    pub fn on_build(&self, hook: impl Fn(&str) + Send + Sync + 'static) {
        self.inner.lock().build_hook = Some(Arc::new(hook));
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<BuildToolCall> {
        self.inner.lock().calls.clone()
    }

    /// Patterns passed to `build`, in call order
    pub fn built_patterns(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                BuildToolCall::Build { pattern, .. } => Some(pattern),
                _ => None,
            })
            .collect()
    }

    /// Targets passed to `run`, in call order
    pub fn run_targets(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                BuildToolCall::Run { target, .. } => Some(target),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl BuildTool for FakeBuildTool {
    async fn build(
        &self,
        workdir: &Path,
        args: &[String],
        pattern: &str,
    ) -> Result<ToolOutput, ToolError> {
        let hook = {
            let mut state = self.inner.lock();
            state.calls.push(BuildToolCall::Build {
                workdir: workdir.to_path_buf(),
                args: args.to_vec(),
                pattern: pattern.to_string(),
            });
            state.build_hook.clone()
        };
        if let Some(hook) = hook {
            hook(pattern);
        }

        let state = self.inner.lock();
        if state.spawn_failures.contains(pattern) {
            return Err(ToolError::Spawn {
                description: format!("bazel build {}", pattern),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "bazel not found"),
            });
        }
        Ok(state
            .build_outputs
            .get(pattern)
            .cloned()
            .unwrap_or_else(|| ToolOutput::new(0, "INFO: Build completed successfully")))
    }

    async fn query(&self, _workdir: &Path, expression: &str) -> Result<Vec<String>, ToolError> {
        let mut state = self.inner.lock();
        state.calls.push(BuildToolCall::Query {
            expression: expression.to_string(),
        });
        Ok(state
            .query_results
            .iter()
            .filter(|(needle, _)| expression.contains(needle.as_str()))
            .flat_map(|(_, labels)| labels.iter().cloned())
            .collect())
    }

    async fn clean(&self, _workdir: &Path) -> Result<(), ToolError> {
        let mut state = self.inner.lock();
        state.calls.push(BuildToolCall::Clean);
        if state.clean_fails {
            return Err(ToolError::Failed {
                description: "bazel clean".to_string(),
                exit_code: 1,
                output: "clean failed".to_string(),
            });
        }
        Ok(())
    }

    async fn run(
        &self,
        _workdir: &Path,
        target: &str,
        args: &[String],
    ) -> Result<ToolOutput, ToolError> {
        let mut state = self.inner.lock();
        state.calls.push(BuildToolCall::Run {
            target: target.to_string(),
            args: args.to_vec(),
        });
        if state.failing_runs.contains(target) {
            return Err(ToolError::Failed {
                description: format!("bazel run {}", target),
                exit_code: 1,
                output: format!("ERROR: {} failed", target),
            });
        }
        Ok(ToolOutput::new(0, format!("ran {}", target)))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
