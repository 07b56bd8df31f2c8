// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use pl_core::OverallStatus;

/// Error carrying a specific process exit code.
///
/// An empty message means the details were already printed.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Process exit code for a finished build.
pub fn exit_code(status: OverallStatus) -> i32 {
    match status {
        OverallStatus::Succeeded => 0,
        OverallStatus::Failed => 1,
        OverallStatus::PartialSuccess => 2,
        OverallStatus::Cancelled => 130,
    }
}
