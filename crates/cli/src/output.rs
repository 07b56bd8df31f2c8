// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::color::Painter;
use clap::ValueEnum;
use pl_core::{format_duration_ms, span_ms, BuildResponse, TargetStatus};
use std::fmt::Write;

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Human-readable build report: headline, one line per unit, counts,
/// artifacts and the first error.
pub fn render_response(response: &BuildResponse, painter: &Painter) -> String {
    let mut buf = String::new();
    let summary = &response.summary;
    let meta = &response.metadata;
    let elapsed = response
        .completion_time_ms
        .saturating_sub(meta.start_time_ms);

    let _ = writeln!(
        buf,
        "Build {} for {} on {} in {}",
        painter.status(response.status),
        meta.requested_target,
        meta.branch,
        format_duration_ms(elapsed)
    );

    for unit in meta.target_builds.values() {
        let duration = span_ms(unit.start_time_ms, unit.end_time_ms)
            .map(|ms| format!(" ({})", format_duration_ms(ms)))
            .unwrap_or_default();
        let _ = writeln!(
            buf,
            "  {:<10} {} {}{}",
            unit.status.to_string(),
            unit.target,
            painter.muted(&unit.version),
            duration
        );
        if unit.status == TargetStatus::Failed {
            if let Some(first) = unit.error_message.as_deref().and_then(|m| m.lines().next()) {
                let _ = writeln!(buf, "             {}", first);
            }
        }
    }

    let _ = writeln!(
        buf,
        "Targets: {} total, {} succeeded, {} failed, {} skipped",
        summary.total_targets,
        summary.successful_targets,
        summary.failed_targets,
        summary.skipped_targets
    );
    if !summary.published_artifacts.is_empty() {
        let _ = writeln!(buf, "Artifacts:");
        for artifact in &summary.published_artifacts {
            let _ = writeln!(buf, "  {}", artifact);
        }
    }
    if let Some(err) = &summary.first_error {
        let _ = writeln!(buf, "First error: {}", err.lines().next().unwrap_or(err));
    }
    buf
}

pub fn print_response(response: &BuildResponse, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            let painter = Painter::new(crate::color::should_colorize());
            print!("{}", render_response(response, &painter));
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(response)?);
        }
    }
    Ok(())
}
