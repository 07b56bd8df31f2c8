// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cooperative cancellation.
//!
//! A token is created per build request and shared between the pipeline
//! and the operation manager. Cancelling is idempotent and only takes
//! effect at the pipeline's phase checkpoints.

use crate::error::PipelineError;
pub use tokio_util::sync::CancellationToken;

pub trait CancellationExt {
    /// `Err(PipelineError::Cancelled)` once the token has been cancelled.
    fn throw_if_cancelled(&self) -> Result<(), PipelineError>;
}

impl CancellationExt for CancellationToken {
    fn throw_if_cancelled(&self) -> Result<(), PipelineError> {
        if self.is_cancelled() {
            Err(PipelineError::Cancelled)
        } else {
            Ok(())
        }
    }
}
