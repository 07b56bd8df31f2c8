// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for the engine crate.

use crate::listener::ProgressListener;
use crate::operations::OperationManager;
use crate::orchestrator::{BuildOrchestrator, PipelineDeps};
use parking_lot::Mutex;
use pl_adapters::{
    FakeBuildTool, FakeCodegen, FakeDiscovery, FakeGit, FakeScaffolder, FakeValidator,
};
use pl_core::test_support::{acme_repo, TEST_EPOCH_MS};
use pl_core::{
    BuildOperationMetadata, BuildResponse, FakeClock, OperationPhase, PhaseKind, RepoConfig,
    SequentialIdGen,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Convenience alias for the fully-typed test orchestrator.
pub(crate) type TestOrchestrator = BuildOrchestrator<
    FakeBuildTool,
    FakeGit,
    FakeCodegen,
    FakeValidator,
    FakeDiscovery,
    FakeScaffolder,
    FakeClock,
    SequentialIdGen,
>;

/// Test context holding the orchestrator and its fakes.
pub(crate) struct TestContext {
    pub orchestrator: TestOrchestrator,
    pub operations: Arc<OperationManager<FakeClock>>,
    pub clock: FakeClock,
    pub repo: RepoConfig,
    pub tool: FakeBuildTool,
    pub codegen: FakeCodegen,
    pub validator: FakeValidator,
    pub scaffolder: FakeScaffolder,
}

pub(crate) fn setup() -> TestContext {
    setup_with_units(&[])
}

/// Context whose discovery reports `units`.
pub(crate) fn setup_with_units(units: &[&str]) -> TestContext {
    let clock = FakeClock::at(TEST_EPOCH_MS);
    let tool = FakeBuildTool::new();
    let codegen = FakeCodegen::new();
    let validator = FakeValidator::new();
    let scaffolder = FakeScaffolder::new();
    let operations = Arc::new(OperationManager::new(
        clock.clone(),
        Duration::from_secs(600),
    ));
    let orchestrator = BuildOrchestrator::with_id_gen(
        PipelineDeps {
            tool: tool.clone(),
            git: FakeGit::on_branch("main"),
            codegen: codegen.clone(),
            validator: validator.clone(),
            discovery: FakeDiscovery::with_units(units),
            scaffolder: scaffolder.clone(),
        },
        operations.clone(),
        clock.clone(),
        2,
        SequentialIdGen::new("op"),
    );

    TestContext {
        orchestrator,
        operations,
        clock,
        repo: acme_repo(Path::new("/lake")),
        tool,
        codegen,
        validator,
        scaffolder,
    }
}

/// Listener recording every callback, in order.
#[derive(Default)]
pub(crate) struct RecordingListener {
    pub events: Mutex<Vec<String>>,
    pub snapshots: Mutex<Vec<BuildOperationMetadata>>,
    pub response: Mutex<Option<BuildResponse>>,
}

impl RecordingListener {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }

    pub fn phases(&self) -> Vec<OperationPhase> {
        let mut phases: Vec<OperationPhase> = Vec::new();
        for snapshot in self.snapshots.lock().iter() {
            if phases.last() != Some(&snapshot.current_phase) {
                phases.push(snapshot.current_phase);
            }
        }
        phases
    }

    pub fn last_snapshot(&self) -> Option<BuildOperationMetadata> {
        self.snapshots.lock().last().cloned()
    }
}

impl ProgressListener for RecordingListener {
    fn on_phase_start(&self, phase: PhaseKind) {
        self.events.lock().push(format!("start:{:?}", phase));
    }

    fn on_phase_complete(&self, phase: PhaseKind, success: bool, _message: Option<&str>) {
        self.events
            .lock()
            .push(format!("complete:{:?}:{}", phase, success));
    }

    fn on_metadata_update(&self, metadata: &BuildOperationMetadata) {
        self.snapshots.lock().push(metadata.clone());
    }

    fn on_build_complete(&self, response: &BuildResponse) {
        self.events.lock().push("build_complete".to_string());
        *self.response.lock() = Some(response.clone());
    }

    fn on_build_failed(&self, error: &str) {
        self.events.lock().push(format!("build_failed:{}", error));
    }
}
