// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Protolake build engine: pipeline orchestration and operation tracking

pub mod cancel;
pub mod classify;
pub mod env;
mod error;
pub mod listener;
pub mod operations;
mod orchestrator;
pub mod resolve;
mod runner;
pub mod summary;

#[cfg(test)]
mod test_helpers;

pub use cancel::{CancellationExt, CancellationToken};
pub use classify::{classify, BuildOutcome};
pub use error::{ManagerError, PipelineError};
pub use listener::{NoOpListener, OperationListener, ProgressListener};
pub use operations::{ListFilter, ListOperationsPage, OperationManager, DEFAULT_PAGE_SIZE};
pub use orchestrator::{BuildOptions, BuildOrchestrator, PipelineDeps};
pub use resolve::ResolutionMode;
pub use runner::{artifact_for, BuildRunner, RunOptions};
pub use summary::{build_response, overall_status, summarize};
