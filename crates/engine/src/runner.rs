// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build and publish phase execution.
//!
//! The runner owns the build and publish [`PhaseStatus`](pl_core::PhaseStatus)
//! once the orchestrator has started them: it records per-unit progress in
//! `target_builds` and finishes the phase itself.

use crate::cancel::{CancellationExt, CancellationToken};
use crate::classify::{classify, BuildOutcome};
use crate::error::PipelineError;
use crate::listener::ProgressListener;
use crate::resolve::{depth, resolve_units, ResolutionMode};
use pl_adapters::{BuildTool, ToolOutput, UnitDiscovery};
use pl_core::{
    unit_pattern, version_with_branch, Artifact, BuildOperationMetadata, Clock, RepoConfig,
    TargetBuildInfo, TargetStatus,
};

/// Lines of tool output kept per unit.
const LOG_TAIL_LINES: usize = 50;

/// Effective per-run build settings, after merging request options with
/// the lake's `[build]` table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub mode: ResolutionMode,
    pub continue_on_failure: bool,
    pub clean: bool,
}

#[derive(Clone)]
pub struct BuildRunner<T, D, K> {
    tool: T,
    discovery: D,
    clock: K,
}

impl<T: BuildTool, D: UnitDiscovery, K: Clock> BuildRunner<T, D, K> {
    pub fn new(tool: T, discovery: D, clock: K) -> Self {
        Self {
            tool,
            discovery,
            clock,
        }
    }

    /// Fixed arguments for every unit build.
    pub fn build_args(repo: &RepoConfig, version: &str) -> Vec<String> {
        let mut args = vec![
            "--keep_going".to_string(),
            "--show_progress".to_string(),
            "--progress_report_interval=10".to_string(),
            format!("--action_env=PROTOLAKE_VERSION={}", version),
        ];
        args.extend(
            repo.build
                .env
                .iter()
                .map(|(k, v)| format!("--action_env={}={}", k, v)),
        );
        args
    }

    /// Build `target` (lake-relative) and record every unit.
    ///
    /// Without `continue_on_failure` the first failed unit ends the phase
    /// with [`PipelineError::UnitFailed`]; units not yet attempted stay
    /// PENDING. Cancellation is checked before each unit; once observed,
    /// the units not yet attempted are SKIPPED and
    /// [`PipelineError::Cancelled`] is returned.
    pub async fn build(
        &self,
        repo: &RepoConfig,
        target: &str,
        options: &RunOptions,
        cancel: &CancellationToken,
        metadata: &mut BuildOperationMetadata,
        listener: &dyn ProgressListener,
    ) -> Result<(), PipelineError> {
        if options.clean {
            metadata.phase_statuses.build.set_sub_phase("Cleaning build cache");
            listener.on_metadata_update(metadata);
            self.tool.clean(&repo.root).await?;
            metadata.phase_statuses.build.log("Build cache cleaned");
        }

        if options.mode == ResolutionMode::Isolated {
            metadata
                .phase_statuses
                .build
                .set_sub_phase("Discovering bundle targets");
        }
        let units = resolve_units(options.mode, &self.discovery, &repo.root, target).await?;
        if options.mode == ResolutionMode::Isolated {
            metadata
                .phase_statuses
                .build
                .log(format!("Found {} bundle targets", units.len()));
        }
        if units.is_empty() {
            metadata
                .phase_statuses
                .build
                .skip(self.clock.epoch_ms(), format!("No build units found under {}", target));
            return Ok(());
        }

        let version = version_with_branch(&repo.version, &metadata.branch);
        let args = Self::build_args(repo, &version);
        for unit in &units {
            metadata
                .target_builds
                .insert(unit.clone(), TargetBuildInfo::new(unit.clone(), version.clone()));
        }
        listener.on_metadata_update(metadata);

        let mut failed = 0usize;
        for (i, unit) in units.iter().enumerate() {
            if let Err(e) = cancel.throw_if_cancelled() {
                self.skip_remaining(&units[i..], metadata);
                listener.on_metadata_update(metadata);
                return Err(e);
            }
            match self.build_unit(repo, unit, &args, metadata).await {
                Ok(()) => {}
                Err(message) if options.continue_on_failure => {
                    failed += 1;
                    metadata
                        .phase_statuses
                        .build
                        .log(format!("Failed to build {}: {} (continuing)", unit, message));
                    tracing::warn!(unit = %unit, "unit failed, continuing");
                }
                Err(message) => {
                    let err = PipelineError::UnitFailed {
                        target: unit.clone(),
                        message,
                    };
                    metadata
                        .phase_statuses
                        .build
                        .fail(self.clock.epoch_ms(), err.to_string());
                    listener.on_metadata_update(metadata);
                    return Err(err);
                }
            }
            listener.on_metadata_update(metadata);
        }

        let now = self.clock.epoch_ms();
        let status = &mut metadata.phase_statuses.build;
        if failed == units.len() {
            status.fail(now, format!("All {} build units failed", units.len()));
        } else {
            status.log(format!("Built {}/{} units", units.len() - failed, units.len()));
            status.succeed(now);
        }
        Ok(())
    }

    fn skip_remaining(&self, units: &[String], metadata: &mut BuildOperationMetadata) {
        let now = self.clock.epoch_ms();
        for unit in units {
            if let Some(info) = metadata.target_builds.get_mut(unit) {
                info.transition(TargetStatus::Skipped, now);
            }
        }
        metadata
            .phase_statuses
            .build
            .skip(now, format!("Build cancelled, skipped {} units", units.len()));
        tracing::info!(skipped = units.len(), "build cancelled between units");
    }

    /// Build one unit, leaving it BUILT or FAILED. The error is the
    /// unit's failure message.
    async fn build_unit(
        &self,
        repo: &RepoConfig,
        unit: &str,
        args: &[String],
        metadata: &mut BuildOperationMetadata,
    ) -> Result<(), String> {
        let pattern = unit_pattern(unit);
        let status = &mut metadata.phase_statuses.build;
        status.set_sub_phase(format!("Building {}", unit));
        status.log(format!("Building: {}", unit));
        if let Some(info) = metadata.target_builds.get_mut(unit) {
            info.transition(TargetStatus::Building, self.clock.epoch_ms());
        }

        let result = self.tool.build(&repo.root, args, &pattern).await;
        let now = self.clock.epoch_ms();
        let Some(info) = metadata.target_builds.get_mut(unit) else {
            return Err(format!("unit {} vanished from metadata", unit));
        };

        let output = match result {
            Ok(output) => output,
            Err(e) => {
                let message = e.to_string();
                if let Some(out) = e.output() {
                    info.build_logs.push(ToolOutput::new(-1, out).tail(LOG_TAIL_LINES));
                }
                info.fail(message.clone(), now);
                return Err(message);
            }
        };
        info.build_logs.push(output.tail(LOG_TAIL_LINES));

        let outcome = classify(output.exit_code, &output.output);
        if !outcome.is_usable() {
            let message = format!("exit code {}\n{}", output.exit_code, output.tail(5));
            info.fail(message.clone(), now);
            return Err(message);
        }

        info.transition(TargetStatus::Built, now);
        let status = &mut metadata.phase_statuses.build;
        if outcome == BuildOutcome::PartialSuccess {
            status.log(format!(
                "Partial success for {} (exit code {})",
                unit, output.exit_code
            ));
        }
        status.log(format!("Successfully built: {}", unit));
        Ok(())
    }

    /// Run every discovered publish action owned by a BUILT unit.
    ///
    /// Publish is best-effort: failures are logged and the phase only
    /// fails when every attempted publish failed.
    pub async fn publish(
        &self,
        repo: &RepoConfig,
        target: &str,
        metadata: &mut BuildOperationMetadata,
        listener: &dyn ProgressListener,
    ) -> Result<(), PipelineError> {
        metadata
            .phase_statuses
            .publish
            .set_sub_phase("Discovering publish targets");
        let expression = format!("filter(\"_publish$\", {})", unit_pattern(target));
        let labels = self.tool.query(&repo.root, &expression).await?;

        let built: Vec<String> = metadata
            .target_builds
            .values()
            .filter(|u| u.status == TargetStatus::Built)
            .map(|u| u.target.clone())
            .collect();
        let plan: Vec<(String, String)> = labels
            .iter()
            .filter_map(|label| owning_unit(&built, label).map(|u| (label.clone(), u)))
            .collect();

        if plan.is_empty() {
            metadata
                .phase_statuses
                .publish
                .skip(self.clock.epoch_ms(), "No publish targets found");
            return Ok(());
        }

        let mut published = 0usize;
        for (label, unit) in &plan {
            metadata
                .phase_statuses
                .publish
                .set_sub_phase(format!("Publishing {}", label));
            match self.tool.run(&repo.root, label, &[]).await {
                Ok(_) => {
                    published += 1;
                    let now = self.clock.epoch_ms();
                    if let Some(info) = metadata.target_builds.get_mut(unit) {
                        if let Some(artifact) = artifact_for(repo, unit, label, &info.version) {
                            info.add_artifact(artifact);
                        }
                        if info.status == TargetStatus::Built {
                            info.transition(TargetStatus::Published, now);
                        }
                    }
                    metadata
                        .phase_statuses
                        .publish
                        .log(format!("Published {}", label));
                }
                Err(e) => {
                    tracing::warn!(label = %label, error = %e, "publish failed");
                    metadata
                        .phase_statuses
                        .publish
                        .log(format!("Failed to publish {}: {}", label, e));
                    if let Some(info) = metadata.target_builds.get_mut(unit) {
                        info.build_logs.push(format!("publish of {} failed: {}", label, e));
                    }
                }
            }
            listener.on_metadata_update(metadata);
        }

        let now = self.clock.epoch_ms();
        let status = &mut metadata.phase_statuses.publish;
        if published == 0 {
            status.fail(now, format!("All {} publish targets failed", plan.len()));
        } else {
            status.log(format!("Published {}/{} targets", published, plan.len()));
            status.succeed(now);
        }
        Ok(())
    }
}

/// Split `//pkg/path:name` into (`pkg/path`, `name`).
fn split_label(label: &str) -> (&str, &str) {
    let label = label.trim_start_matches('@').trim_start_matches("//");
    match label.rsplit_once(':') {
        Some((pkg, name)) => (pkg, name),
        None => (label, label.rsplit('/').next().unwrap_or(label)),
    }
}

/// The deepest unit whose directory contains the label's package.
fn owning_unit(units: &[String], label: &str) -> Option<String> {
    let (pkg, _) = split_label(label);
    units
        .iter()
        .filter(|u| {
            u.as_str() == "." || pkg == u.as_str() || pkg.starts_with(&format!("{}/", u))
        })
        .max_by_key(|u| depth(u))
        .cloned()
}

/// Artifact coordinates for a publish action, chosen by the language
/// suffix of its rule name (`<base>_<lang>_publish`).
pub fn artifact_for(repo: &RepoConfig, unit: &str, label: &str, version: &str) -> Option<Artifact> {
    let (_, name) = split_label(label);
    let stem = name.strip_suffix("_publish").unwrap_or(name);
    let lang = stem.rsplit('_').next().unwrap_or(stem);
    let path = if unit == "." { repo.name.as_str() } else { unit };
    let version = version.to_string();

    match lang {
        "java" | "maven" => Some(Artifact::Maven {
            group_id: repo
                .languages
                .java
                .as_ref()
                .map(|j| j.group_id.clone())
                .unwrap_or_else(|| format!("com.{}", repo.name)),
            artifact_id: path.replace('/', "-"),
            version,
        }),
        "py" | "python" => {
            let prefix = repo
                .languages
                .python
                .as_ref()
                .map(|p| p.package_prefix.as_str())
                .unwrap_or_default();
            Some(Artifact::Python {
                package_name: format!("{}{}", prefix, path.replace('/', "_")),
                version,
            })
        }
        "js" | "ts" | "npm" => {
            let name = path.replace('/', "-");
            let package_name = match repo.languages.npm.as_ref() {
                Some(npm) if !npm.scope.is_empty() => format!("{}/{}", npm.scope, name),
                _ => name,
            };
            Some(Artifact::Npm {
                package_name,
                version,
            })
        }
        _ => None,
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
