// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-unit build tracking.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Status of one concrete build unit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetStatus {
    #[default]
    Pending,
    Building,
    Built,
    Published,
    Failed,
    Skipped,
}

impl TargetStatus {
    /// Statuses that stamp `end_time_ms` on first entry.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TargetStatus::Built
                | TargetStatus::Published
                | TargetStatus::Failed
                | TargetStatus::Skipped
        )
    }

    pub fn is_success(self) -> bool {
        matches!(self, TargetStatus::Built | TargetStatus::Published)
    }

    /// Allowed edges: PENDING → BUILDING → {BUILT | FAILED | SKIPPED},
    /// BUILT → {PUBLISHED | FAILED}, and PENDING may be skipped or failed
    /// without ever building. Nothing returns to PENDING.
    pub fn can_transition_to(self, next: TargetStatus) -> bool {
        use TargetStatus::*;
        matches!(
            (self, next),
            (Pending, Building | Failed | Skipped)
                | (Building, Built | Failed | Skipped)
                | (Built, Published | Failed)
        )
    }
}

impl fmt::Display for TargetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetStatus::Pending => write!(f, "pending"),
            TargetStatus::Building => write!(f, "building"),
            TargetStatus::Built => write!(f, "built"),
            TargetStatus::Published => write!(f, "published"),
            TargetStatus::Failed => write!(f, "failed"),
            TargetStatus::Skipped => write!(f, "skipped"),
        }
    }
}

/// Coordinates of a published language package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Artifact {
    Maven {
        group_id: String,
        artifact_id: String,
        version: String,
    },
    Python {
        package_name: String,
        version: String,
    },
    Npm {
        package_name: String,
        version: String,
    },
}

impl Artifact {
    /// Key under which the artifact is stored in [`TargetBuildInfo::artifacts`].
    pub fn language(&self) -> &'static str {
        match self {
            Artifact::Maven { .. } => "java",
            Artifact::Python { .. } => "python",
            Artifact::Npm { .. } => "typescript",
        }
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Artifact::Maven {
                group_id,
                artifact_id,
                version,
            } => write!(f, "{}:{}:{}", group_id, artifact_id, version),
            Artifact::Python {
                package_name,
                version,
            } => write!(f, "{}=={}", package_name, version),
            Artifact::Npm {
                package_name,
                version,
            } => write!(f, "{}@{}", package_name, version),
        }
    }
}

/// Build record for one concrete unit, keyed by its lake-relative path
/// (e.g. `com/acme/user`). The unit builds `//<path>/...`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetBuildInfo {
    pub target: String,
    pub version: String,
    pub status: TargetStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time_ms: Option<u64>,
    #[serde(default)]
    pub artifacts: BTreeMap<String, Artifact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default)]
    pub build_logs: Vec<String>,
}

impl TargetBuildInfo {
    pub fn new(target: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            version: version.into(),
            status: TargetStatus::Pending,
            start_time_ms: None,
            end_time_ms: None,
            artifacts: BTreeMap::new(),
            error_message: None,
            build_logs: Vec::new(),
        }
    }

    /// Move to `next` if the edge is allowed, stamping start/end times on
    /// first entry. Returns false (and changes nothing) otherwise.
    pub fn transition(&mut self, next: TargetStatus, epoch_ms: u64) -> bool {
        if !self.status.can_transition_to(next) {
            return false;
        }
        self.status = next;
        if next == TargetStatus::Building && self.start_time_ms.is_none() {
            self.start_time_ms = Some(epoch_ms);
        }
        if next.is_terminal() && self.end_time_ms.is_none() {
            self.end_time_ms = Some(epoch_ms);
        }
        true
    }

    pub fn fail(&mut self, message: impl Into<String>, epoch_ms: u64) -> bool {
        if !self.transition(TargetStatus::Failed, epoch_ms) {
            return false;
        }
        self.error_message = Some(message.into());
        true
    }

    pub fn add_artifact(&mut self, artifact: Artifact) {
        self.artifacts
            .insert(artifact.language().to_string(), artifact);
    }
}

#[cfg(test)]
#[path = "target_tests.rs"]
mod tests;
