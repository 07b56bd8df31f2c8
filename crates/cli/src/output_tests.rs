// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use pl_core::test_support::{acme_repo, metadata_for, with_units, TEST_EPOCH_MS};
use pl_core::{Artifact, BuildSummary, OverallStatus};
use std::path::Path;

fn response() -> BuildResponse {
    let mut metadata = with_units(
        metadata_for(&acme_repo(Path::new("/lake")), "/lake"),
        &[("a", TargetStatus::Published), ("b", TargetStatus::Failed)],
    );
    if let Some(a) = metadata.target_builds.get_mut("a") {
        a.add_artifact(Artifact::Python {
            package_name: "acme_a".to_string(),
            version: "1.0.0-main".to_string(),
        });
    }
    BuildResponse {
        metadata,
        status: OverallStatus::PartialSuccess,
        completion_time_ms: TEST_EPOCH_MS + 4_200,
        summary: BuildSummary {
            total_targets: 2,
            successful_targets: 1,
            failed_targets: 1,
            skipped_targets: 0,
            published_artifacts: vec!["acme_a==1.0.0-main".to_string()],
            first_error: Some("build failed".to_string()),
        },
    }
}

#[test]
fn text_report_lists_units_counts_and_artifacts() {
    let text = render_response(&response(), &Painter::new(false));
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "Build PARTIAL_SUCCESS for /lake on main in 4.2s");
    assert!(lines[1].starts_with("  published  a 1.0.0-main"));
    assert!(lines[2].starts_with("  failed     b 1.0.0-main"));
    assert_eq!(lines[3].trim(), "build failed");
    assert!(text.contains("Targets: 2 total, 1 succeeded, 1 failed, 0 skipped"));
    assert!(text.contains("Artifacts:\n  acme_a==1.0.0-main\n"));
    assert!(text.ends_with("First error: build failed\n"));
}

#[test]
fn json_report_round_trips_status() {
    let json = serde_json::to_value(response()).unwrap();
    assert_eq!(json["status"], "PARTIAL_SUCCESS");
    assert_eq!(json["summary"]["failed_targets"], 1);
}
