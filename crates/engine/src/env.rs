// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the engine crate.

use std::time::Duration;
use tokio::sync::Semaphore;

/// How often finished operations are swept.
pub const CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

fn parse_u64(var: &str) -> Option<u64> {
    std::env::var(var).ok().and_then(|s| s.trim().parse::<u64>().ok())
}

/// Largest worker pool the semaphore can represent.
pub const MAX_BUILD_WORKERS: usize = Semaphore::MAX_PERMITS;

/// Size of the build worker pool (default: 4, clamped to
/// `1..=MAX_BUILD_WORKERS`).
pub fn build_workers() -> usize {
    parse_u64("PL_BUILD_WORKERS")
        .map(|n| usize::try_from(n).unwrap_or(usize::MAX).clamp(1, MAX_BUILD_WORKERS))
        .unwrap_or(4)
}

/// How long finished operations stay pollable (default: 10 minutes).
pub fn operation_ttl() -> Duration {
    parse_u64("PL_OPERATION_TTL_MINUTES")
        .map(|m| Duration::from_secs(m.saturating_mul(60)))
        .unwrap_or(Duration::from_secs(10 * 60))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
