// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Long-running operation handles and their terminal payloads.

use crate::id::{OperationName, ResourceName};
use crate::metadata::BuildOperationMetadata;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical status codes attached to a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    Cancelled,
    NotFound,
    Aborted,
    Internal,
}

impl ErrorCode {
    /// Numeric value in the canonical RPC code space.
    pub fn as_i32(self) -> i32 {
        match self {
            ErrorCode::Cancelled => 1,
            ErrorCode::NotFound => 5,
            ErrorCode::Aborted => 10,
            ErrorCode::Internal => 13,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::Cancelled => write!(f, "CANCELLED"),
            ErrorCode::NotFound => write!(f, "NOT_FOUND"),
            ErrorCode::Aborted => write!(f, "ABORTED"),
            ErrorCode::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// Structured error recorded on a done operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{code}: {message}")]
pub struct OperationError {
    pub code: ErrorCode,
    pub message: String,
}

impl OperationError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Overall classification of a finished build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverallStatus {
    Succeeded,
    PartialSuccess,
    Failed,
    Cancelled,
}

impl fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverallStatus::Succeeded => write!(f, "SUCCEEDED"),
            OverallStatus::PartialSuccess => write!(f, "PARTIAL_SUCCESS"),
            OverallStatus::Failed => write!(f, "FAILED"),
            OverallStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// Unit-level counts and artifacts of a finished build
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSummary {
    pub total_targets: usize,
    pub successful_targets: usize,
    pub failed_targets: usize,
    pub skipped_targets: usize,
    pub published_artifacts: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_error: Option<String>,
}

/// Result payload of a completed build operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildResponse {
    pub metadata: BuildOperationMetadata,
    pub status: OverallStatus,
    pub completion_time_ms: u64,
    pub summary: BuildSummary,
}

/// A pollable handle for asynchronous build work.
///
/// Once `done` is true exactly one of `result` or `error` is set and
/// neither changes again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub name: OperationName,
    pub resource_name: ResourceName,
    pub metadata: BuildOperationMetadata,
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<BuildResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<OperationError>,
}

impl Operation {
    /// A freshly admitted, non-done operation.
    pub fn pending(
        name: OperationName,
        resource_name: ResourceName,
        metadata: BuildOperationMetadata,
    ) -> Self {
        Self {
            name,
            resource_name,
            metadata,
            done: false,
            result: None,
            error: None,
        }
    }

    /// An already-done operation rejected by admission control.
    pub fn aborted(
        name: OperationName,
        resource_name: ResourceName,
        metadata: BuildOperationMetadata,
        active: &OperationName,
    ) -> Self {
        let message = format!(
            "Resource {} already has an active build operation: {}",
            resource_name, active
        );
        Self {
            name,
            resource_name,
            metadata,
            done: true,
            result: None,
            error: Some(OperationError::new(ErrorCode::Aborted, message)),
        }
    }

    pub fn error_code(&self) -> Option<ErrorCode> {
        self.error.as_ref().map(|e| e.code)
    }
}

#[cfg(test)]
#[path = "operation_tests.rs"]
mod tests;
