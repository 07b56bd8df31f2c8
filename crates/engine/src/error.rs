// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the build pipeline

use pl_adapters::{CodegenError, DiscoveryError, ScaffoldError, ToolError, ValidateError};
use pl_core::{OperationName, RepoConfigError, ValidationFinding};
use thiserror::Error;

/// Errors that end a pipeline run
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Cancellation was observed at a checkpoint. Not a failure.
    #[error("Operation cancelled")]
    Cancelled,
    #[error("{}", validation_message(.errors))]
    Validation { errors: Vec<ValidationFinding> },
    #[error("Bazel build failed for target {target}: {message}")]
    UnitFailed { target: String, message: String },
    #[error("Code generation failed: {0}")]
    Codegen(#[from] CodegenError),
    #[error("Validation could not run: {0}")]
    Validate(#[from] ValidateError),
    #[error(transparent)]
    Tool(#[from] ToolError),
    #[error("Unit discovery failed: {0}")]
    Discovery(#[from] DiscoveryError),
    #[error("Workspace preparation failed: {0}")]
    Scaffold(#[from] ScaffoldError),
    #[error(transparent)]
    InvalidTarget(#[from] RepoConfigError),
}

impl PipelineError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, PipelineError::Cancelled)
    }
}

fn validation_message(errors: &[ValidationFinding]) -> String {
    match errors.first() {
        Some(first) if errors.len() == 1 => format!("Validation failed: {}", first),
        Some(first) => format!(
            "Validation failed with {} errors, first: {}",
            errors.len(),
            first
        ),
        None => "Validation failed".to_string(),
    }
}

/// Errors from operation manager calls
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ManagerError {
    #[error("operation not found: {0}")]
    NotFound(OperationName),
    #[error("operation already done: {0}")]
    AlreadyDone(OperationName),
    #[error("invalid filter: {0}")]
    InvalidFilter(String),
}
