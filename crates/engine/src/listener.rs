// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Progress notifications emitted by the pipeline.

use crate::operations::OperationManager;
use pl_core::{BuildOperationMetadata, BuildResponse, Clock, OperationName, PhaseKind};
use std::sync::Arc;

/// Observer of a single pipeline run. All methods default to no-ops.
pub trait ProgressListener: Send + Sync {
    fn on_phase_start(&self, _phase: PhaseKind) {}

    fn on_phase_complete(&self, _phase: PhaseKind, _success: bool, _message: Option<&str>) {}

    /// A fresh metadata snapshot, pushed after every phase and unit change.
    fn on_metadata_update(&self, _metadata: &BuildOperationMetadata) {}

    fn on_build_complete(&self, _response: &BuildResponse) {}

    fn on_build_failed(&self, _error: &str) {}
}

pub struct NoOpListener;

impl ProgressListener for NoOpListener {}

/// Mirrors pipeline progress into the operation manager.
pub struct OperationListener<C: Clock> {
    operations: Arc<OperationManager<C>>,
    name: OperationName,
}

impl<C: Clock> OperationListener<C> {
    pub fn new(operations: Arc<OperationManager<C>>, name: OperationName) -> Self {
        Self { operations, name }
    }
}

impl<C: Clock> ProgressListener for OperationListener<C> {
    fn on_metadata_update(&self, metadata: &BuildOperationMetadata) {
        self.operations.update_metadata(&self.name, metadata.clone());
    }

    fn on_build_complete(&self, response: &BuildResponse) {
        if let Err(e) = self
            .operations
            .complete_operation(&self.name, response.clone())
        {
            tracing::warn!(operation = %self.name, error = %e, "could not record completion");
        }
    }
}
