// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! pl-core: data model for protolake build operations

pub mod clock;
pub mod id;
pub mod metadata;
pub mod operation;
pub mod phase;
pub mod repo;
pub mod target;
pub mod time_fmt;
pub mod validation;
pub mod version;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use clock::{Clock, FakeClock, SystemClock};
pub use id::{IdGen, OperationName, ResourceName, SequentialIdGen, UuidIdGen};
pub use metadata::BuildOperationMetadata;
pub use operation::{
    BuildResponse, BuildSummary, ErrorCode, Operation, OperationError, OverallStatus,
};
pub use phase::{OperationPhase, PhaseKind, PhaseState, PhaseStatus, PhaseStatuses};
pub use repo::{
    unit_pattern, BuildSettings, JavaSettings, LanguageSettings, NpmSettings,
    PythonSettings, RepoConfig, RepoConfigError, ValidationSettings, LAKE_CONFIG_FILE,
};
pub use target::{Artifact, TargetBuildInfo, TargetStatus};
pub use time_fmt::{format_duration_ms, format_elapsed, span_ms};
pub use validation::{Severity, ValidationFinding, ValidationKind, ValidationReport};
pub use version::{version_with_branch, DEFAULT_BRANCH};
