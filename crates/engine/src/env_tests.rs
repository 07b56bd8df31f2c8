// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;
use yare::parameterized;

#[test]
#[serial]
fn defaults() {
    std::env::remove_var("PL_BUILD_WORKERS");
    std::env::remove_var("PL_OPERATION_TTL_MINUTES");
    assert_eq!(build_workers(), 4);
    assert_eq!(operation_ttl(), Duration::from_secs(600));
}

#[parameterized(
    zero = { "0", 1 },
    eight = { "8", 8 },
    padded = { " 2 ", 2 },
    garbage = { "many", 4 },
    u64_max = { "18446744073709551615", MAX_BUILD_WORKERS },
)]
#[serial]
fn build_workers_from_env(value: &str, expected: usize) {
    std::env::set_var("PL_BUILD_WORKERS", value);
    assert_eq!(build_workers(), expected);
    std::env::remove_var("PL_BUILD_WORKERS");
}

#[test]
#[serial]
fn huge_worker_count_still_builds_a_pool() {
    std::env::set_var("PL_BUILD_WORKERS", "18446744073709551615");
    let pool = Semaphore::new(build_workers());
    assert_eq!(pool.available_permits(), Semaphore::MAX_PERMITS);
    std::env::remove_var("PL_BUILD_WORKERS");
}

#[parameterized(
    two = { "2", 120 },
    zero = { "0", 0 },
    u64_max = { "18446744073709551615", u64::MAX },
)]
#[serial]
fn operation_ttl_from_env(value: &str, expected_secs: u64) {
    std::env::set_var("PL_OPERATION_TTL_MINUTES", value);
    assert_eq!(operation_ttl(), Duration::from_secs(expected_secs));
    std::env::remove_var("PL_OPERATION_TTL_MINUTES");
}
