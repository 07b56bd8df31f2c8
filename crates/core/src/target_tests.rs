// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    pending_to_building   = { TargetStatus::Pending, TargetStatus::Building, true },
    building_to_built     = { TargetStatus::Building, TargetStatus::Built, true },
    building_to_failed    = { TargetStatus::Building, TargetStatus::Failed, true },
    built_to_published    = { TargetStatus::Built, TargetStatus::Published, true },
    building_to_pending   = { TargetStatus::Building, TargetStatus::Pending, false },
    failed_to_pending     = { TargetStatus::Failed, TargetStatus::Pending, false },
    failed_to_building    = { TargetStatus::Failed, TargetStatus::Building, false },
    pending_to_published  = { TargetStatus::Pending, TargetStatus::Published, false },
    published_to_built    = { TargetStatus::Published, TargetStatus::Built, false },
)]
fn target_status_edges(from: TargetStatus, to: TargetStatus, allowed: bool) {
    assert_eq!(from.can_transition_to(to), allowed);
}

#[test]
fn transition_stamps_times_once() {
    let mut info = TargetBuildInfo::new("//a/...", "1.0.0-main");
    assert!(info.transition(TargetStatus::Building, 100));
    assert!(info.transition(TargetStatus::Built, 200));
    assert!(info.transition(TargetStatus::Published, 300));

    assert_eq!(info.start_time_ms, Some(100));
    assert_eq!(info.end_time_ms, Some(200));
    assert_eq!(info.status, TargetStatus::Published);
}

#[test]
fn rejected_transition_changes_nothing() {
    let mut info = TargetBuildInfo::new("//a/...", "1.0.0");
    info.transition(TargetStatus::Building, 100);
    info.fail("compile error", 150);

    assert!(!info.transition(TargetStatus::Pending, 200));
    assert!(!info.fail("again", 200));
    assert_eq!(info.status, TargetStatus::Failed);
    assert_eq!(info.error_message.as_deref(), Some("compile error"));
    assert_eq!(info.end_time_ms, Some(150));
}

#[yare::parameterized(
    maven  = { Artifact::Maven { group_id: "com.acme".into(), artifact_id: "user".into(), version: "1.0.0".into() }, "com.acme:user:1.0.0", "java" },
    python = { Artifact::Python { package_name: "acme_user".into(), version: "1.0.0".into() }, "acme_user==1.0.0", "python" },
    npm    = { Artifact::Npm { package_name: "@acme/user".into(), version: "1.0.0".into() }, "@acme/user@1.0.0", "typescript" },
)]
fn artifact_formatting(artifact: Artifact, display: &str, language: &str) {
    assert_eq!(artifact.to_string(), display);
    assert_eq!(artifact.language(), language);
}
