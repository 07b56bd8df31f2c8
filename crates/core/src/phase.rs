// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline phases and per-phase progress status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a build operation currently is.
///
/// The declaration order is the pipeline's total order: non-terminal phases
/// only ever move forward, and any non-terminal phase may jump to a
/// terminal one.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationPhase {
    #[default]
    Initializing,
    RunningCodegen,
    Validating,
    Building,
    Publishing,
    Completed,
    Cancelled,
    Failed,
}

impl OperationPhase {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            OperationPhase::Completed | OperationPhase::Cancelled | OperationPhase::Failed
        )
    }

    /// Whether moving from `self` to `next` keeps the phase sequence monotonic.
    ///
    /// Re-entering the current phase is allowed (it is a no-op).
    pub fn can_advance_to(self, next: OperationPhase) -> bool {
        if self.is_terminal() {
            return self == next;
        }
        next.is_terminal() || next >= self
    }
}

impl fmt::Display for OperationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OperationPhase::Initializing => "INITIALIZING",
            OperationPhase::RunningCodegen => "RUNNING_CODEGEN",
            OperationPhase::Validating => "VALIDATING",
            OperationPhase::Building => "BUILDING",
            OperationPhase::Publishing => "PUBLISHING",
            OperationPhase::Completed => "COMPLETED",
            OperationPhase::Cancelled => "CANCELLED",
            OperationPhase::Failed => "FAILED",
        };
        write!(f, "{}", s)
    }
}

/// The four delegated phases that carry a [`PhaseStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    Codegen,
    Validation,
    Build,
    Publish,
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhaseKind::Codegen => write!(f, "codegen"),
            PhaseKind::Validation => write!(f, "validation"),
            PhaseKind::Build => write!(f, "build"),
            PhaseKind::Publish => write!(f, "publish"),
        }
    }
}

/// Lifecycle of a single phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhaseState {
    #[default]
    NotStarted,
    Running,
    Succeeded,
    Failed,
    Skipped,
}

impl PhaseState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            PhaseState::Succeeded | PhaseState::Failed | PhaseState::Skipped
        )
    }
}

impl fmt::Display for PhaseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhaseState::NotStarted => write!(f, "not_started"),
            PhaseState::Running => write!(f, "running"),
            PhaseState::Succeeded => write!(f, "succeeded"),
            PhaseState::Failed => write!(f, "failed"),
            PhaseState::Skipped => write!(f, "skipped"),
        }
    }
}

/// Progress of one phase.
///
/// Once `status` is terminal the record is frozen: later transitions and
/// log appends are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseStatus {
    pub status: PhaseState,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sub_phase: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default)]
    pub log_lines: Vec<String>,
}

impl PhaseStatus {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Mark the phase running. Returns false if it already started.
    pub fn start(&mut self, epoch_ms: u64) -> bool {
        if self.status != PhaseState::NotStarted {
            return false;
        }
        self.status = PhaseState::Running;
        self.start_time_ms = Some(epoch_ms);
        true
    }

    pub fn set_sub_phase(&mut self, sub_phase: impl Into<String>) {
        if !self.is_terminal() {
            self.sub_phase = sub_phase.into();
        }
    }

    pub fn log(&mut self, line: impl Into<String>) {
        if !self.is_terminal() {
            self.log_lines.push(line.into());
        }
    }

    pub fn succeed(&mut self, epoch_ms: u64) -> bool {
        self.finish(PhaseState::Succeeded, epoch_ms, None)
    }

    pub fn fail(&mut self, epoch_ms: u64, message: impl Into<String>) -> bool {
        self.finish(PhaseState::Failed, epoch_ms, Some(message.into()))
    }

    /// Skipping records the reason as a log line, not as an error.
    pub fn skip(&mut self, epoch_ms: u64, reason: impl Into<String>) -> bool {
        self.log(reason);
        self.finish(PhaseState::Skipped, epoch_ms, None)
    }

    fn finish(&mut self, state: PhaseState, epoch_ms: u64, error: Option<String>) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.status = state;
        self.start_time_ms.get_or_insert(epoch_ms);
        self.end_time_ms = Some(epoch_ms);
        if error.is_some() {
            self.error_message = error;
        }
        true
    }
}

/// One [`PhaseStatus`] per delegated phase
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseStatuses {
    pub codegen: PhaseStatus,
    pub validation: PhaseStatus,
    pub build: PhaseStatus,
    pub publish: PhaseStatus,
}

impl PhaseStatuses {
    pub fn get(&self, kind: PhaseKind) -> &PhaseStatus {
        match kind {
            PhaseKind::Codegen => &self.codegen,
            PhaseKind::Validation => &self.validation,
            PhaseKind::Build => &self.build,
            PhaseKind::Publish => &self.publish,
        }
    }

    pub fn get_mut(&mut self, kind: PhaseKind) -> &mut PhaseStatus {
        match kind {
            PhaseKind::Codegen => &mut self.codegen,
            PhaseKind::Validation => &mut self.validation,
            PhaseKind::Build => &mut self.build,
            PhaseKind::Publish => &mut self.publish,
        }
    }

    /// First error message among failed phases, in pipeline order.
    pub fn first_error(&self) -> Option<&str> {
        [&self.codegen, &self.validation, &self.build, &self.publish]
            .into_iter()
            .filter(|p| p.status == PhaseState::Failed)
            .find_map(|p| p.error_message.as_deref())
    }
}

#[cfg(test)]
#[path = "phase_tests.rs"]
mod tests;
