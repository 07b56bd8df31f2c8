// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Proto validation adapters (compile, lint, breaking-change, format).

use crate::env;
use crate::git::GitAdapter;
use crate::subprocess::{run_tool, ToolError, ToolOutput};
use async_trait::async_trait;
use pl_core::{
    PhaseStatus, RepoConfig, Severity, ValidationFinding, ValidationKind, ValidationReport,
};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

const BUF_TIMEOUT: Duration = Duration::from_secs(60);

/// Reference the breaking-change check compares against.
pub const BREAKING_AGAINST: &str = ".git#branch=HEAD~1";

/// Errors that prevent validation from producing a report
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error("validation tool failed: {0}")]
    Tool(#[from] ToolError),
}

/// Adapter that validates a lake's proto sources.
///
/// A report with `success == false` is a normal outcome; `Err` means the
/// checks themselves could not run.
#[async_trait]
pub trait ValidationRunner: Clone + Send + Sync + 'static {
    async fn validate(
        &self,
        repo: &RepoConfig,
        status: &mut PhaseStatus,
    ) -> Result<ValidationReport, ValidateError>;
}

/// `file:line:column:message`
#[allow(clippy::expect_used)]
static LOCATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?):(\d+):(\d+):(.+)$").expect("constant regex pattern is valid")
});

/// Parse tool output into one finding per line, attaching locations where
/// a line has the `file:line:column:message` shape.
pub fn parse_findings(
    output: &str,
    kind: ValidationKind,
    severity: Severity,
) -> Vec<ValidationFinding> {
    output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|line| match LOCATION_PATTERN.captures(line) {
            Some(caps) => {
                let line_no = caps[2].parse().unwrap_or(0);
                let column = caps[3].parse().unwrap_or(0);
                ValidationFinding::new(kind, severity, caps[4].trim()).at(&caps[1], line_no, column)
            }
            None => ValidationFinding::new(kind, severity, line),
        })
        .collect()
}

/// Validation adapter that shells out to `buf`
#[derive(Clone)]
pub struct BufValidator<G> {
    command: String,
    git: G,
}

impl<G: GitAdapter> BufValidator<G> {
    pub fn new(command: impl Into<String>, git: G) -> Self {
        Self {
            command: command.into(),
            git,
        }
    }

    pub fn from_env(git: G) -> Self {
        Self::new(env::buf_command(), git)
    }

    async fn buf(&self, root: &Path, args: &[&str]) -> Result<ToolOutput, ToolError> {
        let mut cmd = Command::new(&self.command);
        cmd.args(args).current_dir(root);
        let description = format!("buf {}", args.first().copied().unwrap_or_default());
        run_tool(cmd, Some(BUF_TIMEOUT), &description).await
    }
}

#[async_trait]
impl<G: GitAdapter> ValidationRunner for BufValidator<G> {
    async fn validate(
        &self,
        repo: &RepoConfig,
        status: &mut PhaseStatus,
    ) -> Result<ValidationReport, ValidateError> {
        let settings = &repo.validation;
        if !settings.enabled {
            return Ok(ValidationReport::skipped("Validation disabled for this lake"));
        }
        if !tokio::fs::try_exists(repo.root.join("buf.yaml"))
            .await
            .unwrap_or(false)
        {
            tracing::warn!(lake = %repo.name, "no buf.yaml found, skipping validation");
            return Ok(ValidationReport::skipped("No buf.yaml found, skipping validation"));
        }

        let mut findings = Vec::new();

        if settings.compilation {
            status.set_sub_phase("Running proto compilation checks");
            let output = self.buf(&repo.root, &["build"]).await?;
            if !output.success() {
                status.log(format!("Compilation errors found:\n{}", output.output.trim()));
                findings.extend(parse_findings(
                    &output.output,
                    ValidationKind::Compilation,
                    Severity::Error,
                ));
            }
        }

        if settings.lint {
            status.set_sub_phase("Running lint checks");
            let output = self.buf(&repo.root, &["lint"]).await?;
            if !output.success() {
                let lint = parse_findings(&output.output, ValidationKind::Lint, Severity::Warning);
                status.log(format!("Lint validation found {} issues", lint.len()));
                findings.extend(lint);
            }
        }

        if settings.breaking {
            if self.git.has_history(&repo.root).await {
                status.set_sub_phase("Running breaking change detection");
                let output = self
                    .buf(&repo.root, &["breaking", "--against", BREAKING_AGAINST])
                    .await?;
                if !output.success() {
                    let breaking =
                        parse_findings(&output.output, ValidationKind::Breaking, Severity::Error);
                    status.log(format!(
                        "Breaking change detection found {} issues",
                        breaking.len()
                    ));
                    findings.extend(breaking);
                }
            } else {
                status.log("No previous commit, skipping breaking change detection");
            }
        }

        if settings.format {
            status.set_sub_phase("Running format checks");
            let output = self
                .buf(&repo.root, &["format", "--diff", "--exit-code"])
                .await?;
            if !output.success() {
                status.log("Format check found issues. Run 'buf format' to fix.");
                findings.push(ValidationFinding::new(
                    ValidationKind::Format,
                    Severity::Warning,
                    "Format issues found. Run 'buf format' to fix.",
                ));
            }
        }

        let report = ValidationReport::from_findings(findings);
        tracing::info!(
            lake = %repo.name,
            errors = report.errors().count(),
            warnings = report.warnings().count(),
            "validation finished"
        );
        Ok(report)
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeValidator;

#[cfg(any(test, feature = "test-support"))]
mod fake {
    #![cfg_attr(coverage_nightly, coverage(off))]

    use super::{ValidateError, ValidationRunner};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use pl_core::{PhaseStatus, RepoConfig, ValidationReport};
    use std::sync::Arc;

    type ValidateHook = Arc<dyn Fn() + Send + Sync>;

    #[derive(Default)]
    struct FakeValidatorState {
        report: Option<ValidationReport>,
        calls: usize,
        hook: Option<ValidateHook>,
    }

    /// Fake validator returning a scripted report (passing by default)
    #[derive(Clone, Default)]
    pub struct FakeValidator {
        inner: Arc<Mutex<FakeValidatorState>>,
    }

    impl FakeValidator {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_report(&self, report: ValidationReport) {
            self.inner.lock().report = Some(report);
        }

        /// Invoke `hook` while validation runs, e.g. to request cancellation
        /// between phases.
        pub fn on_validate(&self, hook: impl Fn() + Send + Sync + 'static) {
            self.inner.lock().hook = Some(Arc::new(hook));
        }

        pub fn calls(&self) -> usize {
            self.inner.lock().calls
        }
    }

    #[async_trait]
    impl ValidationRunner for FakeValidator {
        async fn validate(
            &self,
            _repo: &RepoConfig,
            status: &mut PhaseStatus,
        ) -> Result<ValidationReport, ValidateError> {
            let (report, hook) = {
                let mut state = self.inner.lock();
                state.calls += 1;
                (
                    state.report.clone().unwrap_or_else(ValidationReport::passed),
                    state.hook.clone(),
                )
            };
            if let Some(hook) = hook {
                hook();
            }
            status.set_sub_phase("Running proto compilation checks");
            Ok(report)
        }
    }
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
