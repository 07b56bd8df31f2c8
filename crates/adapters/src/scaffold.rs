// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Environment-dependent scaffolding regenerated before every build

use async_trait::async_trait;
use pl_core::RepoConfig;
use thiserror::Error;

/// Errors from scaffolding
#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error("scaffolding failed for {lake}: {message}")]
    Failed { lake: String, message: String },
}

/// Adapter that regenerates a lake's environment-dependent files.
///
/// Must be idempotent: it runs at the start of every build.
#[async_trait]
pub trait Scaffolder: Clone + Send + Sync + 'static {
    async fn prepare(&self, repo: &RepoConfig) -> Result<(), ScaffoldError>;
}

/// Scaffolder that leaves the lake as-is
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpScaffolder;

#[async_trait]
impl Scaffolder for NoOpScaffolder {
    async fn prepare(&self, _repo: &RepoConfig) -> Result<(), ScaffoldError> {
        Ok(())
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeScaffolder;

#[cfg(any(test, feature = "test-support"))]
mod fake {
    #![cfg_attr(coverage_nightly, coverage(off))]

    use super::{ScaffoldError, Scaffolder};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use pl_core::RepoConfig;
    use std::sync::Arc;

    #[derive(Default)]
    struct FakeScaffolderState {
        prepared: Vec<String>,
        fail: bool,
    }

    /// Fake scaffolder recording which lakes were prepared
    #[derive(Clone, Default)]
    pub struct FakeScaffolder {
        inner: Arc<Mutex<FakeScaffolderState>>,
    }

    impl FakeScaffolder {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn fail(&self) {
            self.inner.lock().fail = true;
        }

        pub fn prepared(&self) -> Vec<String> {
            self.inner.lock().prepared.clone()
        }
    }

    #[async_trait]
    impl Scaffolder for FakeScaffolder {
        async fn prepare(&self, repo: &RepoConfig) -> Result<(), ScaffoldError> {
            let mut state = self.inner.lock();
            state.prepared.push(repo.name.clone());
            if state.fail {
                return Err(ScaffoldError::Failed {
                    lake: repo.name.clone(),
                    message: "template rendering failed".to_string(),
                });
            }
            Ok(())
        }
    }
}
