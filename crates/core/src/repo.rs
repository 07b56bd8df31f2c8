// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lake configuration snapshot (`lake.toml`).
//!
//! ```toml
//! name = "acme"
//! version = "1.2.0"
//!
//! [build]
//! isolate_units = true
//! keep_going = true
//! env = { PROTOC_VERSION = "27.1" }
//!
//! [validation]
//! breaking = false
//!
//! [languages.java]
//! group_id = "com.acme.protos"
//! ```

use crate::id::ResourceName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

/// File name of the lake configuration at the lake root.
pub const LAKE_CONFIG_FILE: &str = "lake.toml";

#[derive(Debug, thiserror::Error)]
pub enum RepoConfigError {
    #[error("invalid {LAKE_CONFIG_FILE}: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("lake name is empty and cannot be derived from {0}")]
    MissingName(PathBuf),
    #[error("target {target} is not inside lake {lake}")]
    OutsideLake { target: PathBuf, lake: PathBuf },
}

/// Repository configuration needed by every pipeline phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    /// Lake root on disk. Filled in by [`RepoConfig::parse`].
    #[serde(default)]
    pub root: PathBuf,
    #[serde(default)]
    pub build: BuildSettings,
    #[serde(default)]
    pub validation: ValidationSettings,
    #[serde(default)]
    pub languages: LanguageSettings,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

fn yes() -> bool {
    true
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSettings {
    /// Version-pinning overrides passed to the build tool as `--action_env`
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    #[serde(default)]
    pub isolate_units: bool,
    #[serde(default)]
    pub keep_going: bool,
    #[serde(default)]
    pub clean: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSettings {
    #[serde(default = "yes")]
    pub enabled: bool,
    #[serde(default = "yes")]
    pub compilation: bool,
    #[serde(default = "yes")]
    pub lint: bool,
    #[serde(default = "yes")]
    pub breaking: bool,
    #[serde(default)]
    pub format: bool,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            compilation: true,
            lint: true,
            breaking: true,
            format: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub java: Option<JavaSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub python: Option<PythonSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub npm: Option<NpmSettings>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JavaSettings {
    pub group_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PythonSettings {
    #[serde(default)]
    pub package_prefix: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpmSettings {
    pub scope: String,
}

impl RepoConfig {
    /// Minimal configuration for a lake rooted at `root`.
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            version: default_version(),
            root: root.into(),
            build: BuildSettings::default(),
            validation: ValidationSettings::default(),
            languages: LanguageSettings::default(),
        }
    }

    /// Parse `lake.toml` content for the lake rooted at `root`.
    ///
    /// An empty `name` falls back to the root directory's name.
    pub fn parse(root: &Path, content: &str) -> Result<Self, RepoConfigError> {
        let mut config: RepoConfig = toml::from_str(content)?;
        config.root = root.to_path_buf();
        if config.name.trim().is_empty() {
            config.name = root
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| RepoConfigError::MissingName(root.to_path_buf()))?;
        }
        Ok(config)
    }

    pub fn resource_name(&self) -> ResourceName {
        ResourceName::lake(&self.name)
    }

    /// Convert a requested target into a lake-relative path.
    ///
    /// Relative targets are taken relative to the lake root. The lake root
    /// itself becomes `"."`; anything outside the lake is rejected.
    pub fn to_lake_relative(&self, target: &Path) -> Result<String, RepoConfigError> {
        let absolute = if target.is_absolute() {
            target.to_path_buf()
        } else {
            self.root.join(target)
        };
        let outside = || RepoConfigError::OutsideLake {
            target: target.to_path_buf(),
            lake: self.root.clone(),
        };

        let root = normalize(&self.root).ok_or_else(outside)?;
        let absolute = normalize(&absolute).ok_or_else(outside)?;
        let rel = absolute.strip_prefix(&root).map_err(|_| outside())?;

        let parts: Vec<String> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        if parts.is_empty() {
            Ok(".".to_string())
        } else {
            Ok(parts.join("/"))
        }
    }
}

/// Lexically resolve `.` and `..` components. Returns `None` when `..`
/// climbs above the first component.
fn normalize(path: &Path) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    return None;
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    Some(out)
}

/// Build pattern covering everything beneath a lake-relative path:
/// `"."` → `//...`, `"a/b"` → `//a/b/...`.
pub fn unit_pattern(lake_relative: &str) -> String {
    let trimmed = lake_relative.trim_matches('/');
    if trimmed.is_empty() || trimmed == "." {
        "//...".to_string()
    } else {
        format!("//{}/...", trimmed)
    }
}

#[cfg(test)]
#[path = "repo_tests.rs"]
mod tests;
