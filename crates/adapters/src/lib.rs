// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for the external tools a build drives

pub mod bazel;
pub mod codegen;
pub mod discovery;
mod env;
pub mod git;
pub mod scaffold;
pub mod subprocess;
pub mod traced;
pub mod validate;

pub use bazel::{BazelCli, BuildTool};
pub use codegen::{CodegenError, CodegenRunner, GazelleRunner};
pub use discovery::{DiscoveryError, FsDiscovery, UnitDiscovery, BUNDLE_MARKER};
pub use git::{GitAdapter, GitCli, GitError};
pub use scaffold::{NoOpScaffolder, ScaffoldError, Scaffolder};
pub use subprocess::{run_tool, ToolError, ToolOutput};
pub use traced::TracedBuildTool;
pub use validate::{BufValidator, ValidateError, ValidationRunner};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use bazel::{BuildToolCall, FakeBuildTool};
#[cfg(any(test, feature = "test-support"))]
pub use codegen::FakeCodegen;
#[cfg(any(test, feature = "test-support"))]
pub use discovery::FakeDiscovery;
#[cfg(any(test, feature = "test-support"))]
pub use git::FakeGit;
#[cfg(any(test, feature = "test-support"))]
pub use scaffold::FakeScaffolder;
#[cfg(any(test, feature = "test-support"))]
pub use validate::FakeValidator;
