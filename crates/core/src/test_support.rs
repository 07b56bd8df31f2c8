// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{
    BuildOperationMetadata, JavaSettings, NpmSettings, PythonSettings, RepoConfig,
    TargetBuildInfo, TargetStatus,
};
use std::path::Path;

/// Base epoch used by builders below.
pub const TEST_EPOCH_MS: u64 = 1_700_000_000_000;

/// A lake named `acme` with every language configured.
pub fn acme_repo(root: &Path) -> RepoConfig {
    let mut repo = RepoConfig::new("acme", root);
    repo.version = "1.0.0".to_string();
    repo.languages.java = Some(JavaSettings {
        group_id: "com.acme.protos".to_string(),
    });
    repo.languages.python = Some(PythonSettings {
        package_prefix: "acme_".to_string(),
    });
    repo.languages.npm = Some(NpmSettings {
        scope: "@acme".to_string(),
    });
    repo
}

/// Metadata for `target` on branch `main`, carrying a repo snapshot.
pub fn metadata_for(repo: &RepoConfig, target: &str) -> BuildOperationMetadata {
    BuildOperationMetadata::new(target, "main", TEST_EPOCH_MS).with_repo(repo.clone())
}

/// A unit that went PENDING → BUILDING → `status`.
pub fn unit(target: &str, status: TargetStatus) -> TargetBuildInfo {
    let mut info = TargetBuildInfo::new(target, "1.0.0-main");
    match status {
        TargetStatus::Pending => {}
        TargetStatus::Skipped => {
            info.transition(TargetStatus::Skipped, TEST_EPOCH_MS);
        }
        TargetStatus::Failed => {
            info.transition(TargetStatus::Building, TEST_EPOCH_MS);
            info.fail("build failed", TEST_EPOCH_MS + 10);
        }
        TargetStatus::Published => {
            info.transition(TargetStatus::Building, TEST_EPOCH_MS);
            info.transition(TargetStatus::Built, TEST_EPOCH_MS + 10);
            info.transition(TargetStatus::Published, TEST_EPOCH_MS + 20);
        }
        other => {
            info.transition(TargetStatus::Building, TEST_EPOCH_MS);
            info.transition(other, TEST_EPOCH_MS + 10);
        }
    }
    info
}

/// Insert `units` into `meta.target_builds`.
pub fn with_units(
    mut meta: BuildOperationMetadata,
    units: &[(&str, TargetStatus)],
) -> BuildOperationMetadata {
    for (target, status) in units {
        meta.target_builds
            .insert(target.to_string(), unit(target, *status));
    }
    meta
}
