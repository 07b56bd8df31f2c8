// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build outcome classification from exit code and tool output.

/// Output markers the build tool prints when a `--keep_going` build
/// finished some targets but not others.
const PARTIAL_MARKERS: &[&str] = &[
    "Build succeeded for only",
    "command succeeded, but there were errors parsing the target pattern",
    "command succeeded, but not all targets were analyzed",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    Success,
    /// Non-zero exit, but some targets were produced. Counts as success
    /// for the unit.
    PartialSuccess,
    Failure,
}

impl BuildOutcome {
    pub fn is_usable(self) -> bool {
        !matches!(self, BuildOutcome::Failure)
    }
}

pub fn classify(exit_code: i32, output: &str) -> BuildOutcome {
    if exit_code == 0 {
        BuildOutcome::Success
    } else if PARTIAL_MARKERS.iter().any(|m| output.contains(m)) {
        BuildOutcome::PartialSuccess
    } else {
        BuildOutcome::Failure
    }
}
