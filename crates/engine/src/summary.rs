// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Final build summary and overall status.

use pl_core::{
    BuildOperationMetadata, BuildResponse, BuildSummary, OperationPhase, OverallStatus,
    PhaseState, TargetStatus,
};

pub fn summarize(metadata: &BuildOperationMetadata) -> BuildSummary {
    let units = metadata.target_builds.values();
    let mut summary = BuildSummary {
        total_targets: metadata.target_builds.len(),
        ..BuildSummary::default()
    };
    for unit in units {
        match unit.status {
            s if s.is_success() => summary.successful_targets += 1,
            TargetStatus::Failed => {
                summary.failed_targets += 1;
                if summary.first_error.is_none() {
                    summary.first_error = unit.error_message.clone();
                }
            }
            TargetStatus::Skipped => summary.skipped_targets += 1,
            _ => {}
        }
        summary
            .published_artifacts
            .extend(unit.artifacts.values().map(|a| a.to_string()));
    }
    if summary.first_error.is_none() {
        summary.first_error = metadata.phase_statuses.first_error().map(str::to_string);
    }
    summary
}

/// Overall status, highest priority first: cancellation, a failed
/// codegen/validation/publish phase, unit failures, success.
pub fn overall_status(metadata: &BuildOperationMetadata, summary: &BuildSummary) -> OverallStatus {
    if metadata.current_phase == OperationPhase::Cancelled {
        return OverallStatus::Cancelled;
    }
    let phases = &metadata.phase_statuses;
    if [&phases.codegen, &phases.validation, &phases.publish]
        .iter()
        .any(|p| p.status == PhaseState::Failed)
    {
        return OverallStatus::Failed;
    }
    match (summary.failed_targets, summary.successful_targets) {
        (0, _) => OverallStatus::Succeeded,
        (_, 0) => OverallStatus::Failed,
        _ => OverallStatus::PartialSuccess,
    }
}

pub fn build_response(metadata: BuildOperationMetadata, completion_time_ms: u64) -> BuildResponse {
    let summary = summarize(&metadata);
    let status = overall_status(&metadata, &summary);
    BuildResponse {
        metadata,
        status,
        completion_time_ms,
        summary,
    }
}

#[cfg(test)]
#[path = "summary_tests.rs"]
mod tests;
