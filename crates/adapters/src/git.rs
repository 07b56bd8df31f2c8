// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Git inspection adapters

use crate::env;
use crate::subprocess::{run_tool, ToolError};
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

/// Bound on any single git call; git inspection is never long-running.
const GIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from git operations
#[derive(Debug, Error)]
pub enum GitError {
    #[error(transparent)]
    Tool(#[from] ToolError),
    #[error("repository at {0} has a detached HEAD")]
    DetachedHead(String),
}

/// Adapter for reading repository state
#[async_trait]
pub trait GitAdapter: Clone + Send + Sync + 'static {
    /// Name of the checked-out branch.
    async fn current_branch(&self, repo: &Path) -> Result<String, GitError>;

    /// Whether the repository has at least one commit before HEAD.
    async fn has_history(&self, repo: &Path) -> bool;
}

/// Git adapter that shells out to the `git` binary
#[derive(Clone, Debug)]
pub struct GitCli {
    command: String,
}

impl GitCli {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(env::git_command())
    }

    fn command(&self, repo: &Path, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.command);
        cmd.arg("-C").arg(repo).args(args);
        cmd
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::from_env()
    }
}

#[async_trait]
impl GitAdapter for GitCli {
    async fn current_branch(&self, repo: &Path) -> Result<String, GitError> {
        let cmd = self.command(repo, &["rev-parse", "--abbrev-ref", "HEAD"]);
        let output = run_tool(cmd, Some(GIT_TIMEOUT), "git rev-parse")
            .await?
            .check("git rev-parse")?;
        let branch = output.output.trim().to_string();
        if branch.is_empty() || branch == "HEAD" {
            return Err(GitError::DetachedHead(repo.display().to_string()));
        }
        Ok(branch)
    }

    async fn has_history(&self, repo: &Path) -> bool {
        let cmd = self.command(repo, &["rev-parse", "--verify", "--quiet", "HEAD~1"]);
        matches!(
            run_tool(cmd, Some(GIT_TIMEOUT), "git rev-parse").await,
            Ok(output) if output.success()
        )
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeGit;

#[cfg(any(test, feature = "test-support"))]
mod fake {
    #![cfg_attr(coverage_nightly, coverage(off))]

    use super::{GitAdapter, GitError};
    use crate::subprocess::ToolError;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::path::Path;
    use std::sync::Arc;

    struct FakeGitState {
        branch: Option<String>,
        has_history: bool,
    }

    /// Fake git adapter with a fixed branch
    #[derive(Clone)]
    pub struct FakeGit {
        inner: Arc<Mutex<FakeGitState>>,
    }

    impl FakeGit {
        pub fn on_branch(branch: &str) -> Self {
            Self {
                inner: Arc::new(Mutex::new(FakeGitState {
                    branch: Some(branch.to_string()),
                    has_history: true,
                })),
            }
        }

        /// A repository where every branch lookup fails.
        pub fn broken() -> Self {
            Self {
                inner: Arc::new(Mutex::new(FakeGitState {
                    branch: None,
                    has_history: false,
                })),
            }
        }

        pub fn set_history(&self, has_history: bool) {
            self.inner.lock().has_history = has_history;
        }
    }

    impl Default for FakeGit {
        fn default() -> Self {
            Self::on_branch("main")
        }
    }

    #[async_trait]
    impl GitAdapter for FakeGit {
        async fn current_branch(&self, _repo: &Path) -> Result<String, GitError> {
            self.inner.lock().branch.clone().ok_or_else(|| {
                GitError::Tool(ToolError::Failed {
                    description: "git rev-parse".to_string(),
                    exit_code: 128,
                    output: "fatal: not a git repository".to_string(),
                })
            })
        }

        async fn has_history(&self, _repo: &Path) -> bool {
            self.inner.lock().has_history
        }
    }
}

#[cfg(test)]
#[path = "git_tests.rs"]
mod tests;
