// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File logging for CLI runs.

use anyhow::{Context, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;

pub const LOG_FILE: &str = "protolake.log";

/// Append structured logs to `<state_dir>/protolake.log`.
///
/// The filter comes from `RUST_LOG` (default `info`). The returned guard
/// must be held until exit so buffered lines are flushed.
pub fn setup_logging(state_dir: &Path) -> Result<WorkerGuard> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    std::fs::create_dir_all(state_dir)
        .with_context(|| format!("cannot create state directory {}", state_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(state_dir, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
        .try_init()
        .context("logging already initialized")?;

    Ok(guard)
}
