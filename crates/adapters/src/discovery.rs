// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build unit discovery.
//!
//! A build unit (bundle) is any directory holding a `bundle.yaml` marker.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Marker file identifying an independently publishable unit.
pub const BUNDLE_MARKER: &str = "bundle.yaml";

/// Errors from unit discovery
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("search path {} does not exist", .0.display())]
    NotFound(PathBuf),
    #[error("failed to walk {}: {message}", path.display())]
    Walk { path: PathBuf, message: String },
}

/// Adapter that finds the build units nested under a lake path
#[async_trait]
pub trait UnitDiscovery: Clone + Send + Sync + 'static {
    /// Lake-relative paths (`/`-separated) of every unit at or beneath
    /// `search`, itself lake-relative (`"."` for the whole lake).
    async fn discover(&self, lake_root: &Path, search: &str) -> Result<Vec<String>, DiscoveryError>;
}

/// Discovery by walking the filesystem for [`BUNDLE_MARKER`] files
#[derive(Clone, Copy, Debug, Default)]
pub struct FsDiscovery;

impl FsDiscovery {
    fn walk(lake_root: &Path, search: &str) -> Result<Vec<String>, DiscoveryError> {
        let start = if search == "." {
            lake_root.to_path_buf()
        } else {
            lake_root.join(search)
        };
        if !start.is_dir() {
            return Err(DiscoveryError::NotFound(start));
        }

        let mut units = Vec::new();
        let walker = WalkDir::new(&start).into_iter().filter_entry(|e| {
            // Skip VCS metadata and the build tool's output symlinks
            let name = e.file_name().to_string_lossy();
            e.depth() == 0 || !(name.starts_with('.') || name.starts_with("bazel-"))
        });
        for entry in walker {
            let entry = entry.map_err(|e| DiscoveryError::Walk {
                path: start.clone(),
                message: e.to_string(),
            })?;
            if !entry.file_type().is_file() || entry.file_name() != BUNDLE_MARKER {
                continue;
            }
            let Some(dir) = entry.path().parent() else {
                continue;
            };
            if let Ok(rel) = dir.strip_prefix(lake_root) {
                let parts: Vec<String> = rel
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect();
                units.push(if parts.is_empty() {
                    ".".to_string()
                } else {
                    parts.join("/")
                });
            }
        }
        units.sort();
        Ok(units)
    }
}

#[async_trait]
impl UnitDiscovery for FsDiscovery {
    async fn discover(&self, lake_root: &Path, search: &str) -> Result<Vec<String>, DiscoveryError> {
        let lake_root = lake_root.to_path_buf();
        let search = search.to_string();
        tokio::task::spawn_blocking(move || Self::walk(&lake_root, &search))
            .await
            .map_err(|e| DiscoveryError::Walk {
                path: PathBuf::new(),
                message: e.to_string(),
            })?
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeDiscovery;

#[cfg(any(test, feature = "test-support"))]
mod fake {
    #![cfg_attr(coverage_nightly, coverage(off))]

    use super::{DiscoveryError, UnitDiscovery};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::path::Path;
    use std::sync::Arc;

    /// Fake discovery returning a fixed unit list, in the given order
    #[derive(Clone, Default)]
    pub struct FakeDiscovery {
        units: Arc<Mutex<Vec<String>>>,
    }

    impl FakeDiscovery {
        pub fn with_units(units: &[&str]) -> Self {
            Self {
                units: Arc::new(Mutex::new(units.iter().map(|u| u.to_string()).collect())),
            }
        }
    }

    #[async_trait]
    impl UnitDiscovery for FakeDiscovery {
        async fn discover(
            &self,
            _lake_root: &Path,
            search: &str,
        ) -> Result<Vec<String>, DiscoveryError> {
            let prefix = format!("{}/", search);
            Ok(self
                .units
                .lock()
                .iter()
                .filter(|u| search == "." || u.as_str() == search || u.starts_with(&prefix))
                .cloned()
                .collect())
        }
    }
}

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod tests;
