// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The progress document pollers observe while a build runs.

use crate::phase::{OperationPhase, PhaseStatuses};
use crate::repo::RepoConfig;
use crate::target::TargetBuildInfo;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Phase-aware progress of one build operation.
///
/// The pipeline owns its copy exclusively and hands snapshots to the
/// operation manager after every phase transition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildOperationMetadata {
    pub requested_target: String,
    pub branch: String,
    pub start_time_ms: u64,
    pub current_phase: OperationPhase,
    pub phase_statuses: PhaseStatuses,
    /// Keyed by lake-relative unit path, e.g. `com/acme` or `.` for the root
    #[serde(default)]
    pub target_builds: BTreeMap<String, TargetBuildInfo>,
    /// Repository configuration captured at admission time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<RepoConfig>,
}

impl BuildOperationMetadata {
    pub fn new(requested_target: impl Into<String>, branch: impl Into<String>, epoch_ms: u64) -> Self {
        Self {
            requested_target: requested_target.into(),
            branch: branch.into(),
            start_time_ms: epoch_ms,
            ..Self::default()
        }
    }

    pub fn with_repo(mut self, repo: RepoConfig) -> Self {
        self.repo = Some(repo);
        self
    }

    /// Move `current_phase` forward. Backward moves and moves out of a
    /// terminal phase are refused and return false.
    pub fn advance(&mut self, phase: OperationPhase) -> bool {
        if !self.current_phase.can_advance_to(phase) {
            return false;
        }
        self.current_phase = phase;
        true
    }

    pub fn is_terminal(&self) -> bool {
        self.current_phase.is_terminal()
    }
}

#[cfg(test)]
#[path = "metadata_tests.rs"]
mod tests;
