// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Locating and loading the lake configuration.

use pl_core::{RepoConfig, RepoConfigError, LAKE_CONFIG_FILE};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LakeError {
    #[error("no lake.toml found in {} or any parent directory", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid lake configuration: {0}")]
    Config(#[from] RepoConfigError),
}

/// Walk up from `start` to the first directory holding `lake.toml`.
pub fn find_lake_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(LAKE_CONFIG_FILE).is_file())
        .map(Path::to_path_buf)
}

/// Absolute form of `path`, without requiring it to exist.
pub fn absolute(path: &Path) -> PathBuf {
    std::fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

pub fn load_lake(start: &Path) -> Result<RepoConfig, LakeError> {
    let start = absolute(start);
    let root = find_lake_root(&start).ok_or_else(|| LakeError::NotFound(start.clone()))?;
    let path = root.join(LAKE_CONFIG_FILE);
    let content = std::fs::read_to_string(&path).map_err(|source| LakeError::Read {
        path: path.clone(),
        source,
    })?;
    let repo = RepoConfig::parse(&root, &content)?;
    tracing::debug!(lake = %repo.name, root = %root.display(), "loaded lake");
    Ok(repo)
}
