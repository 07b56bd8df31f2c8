// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build pipeline orchestration.
//!
//! Sequences INITIALIZING → RUNNING_CODEGEN → VALIDATING → BUILDING →
//! PUBLISHING → COMPLETED, pushing a metadata snapshot after every phase
//! and checking for cancellation before entering each one.

use crate::cancel::{CancellationExt, CancellationToken};
use crate::error::PipelineError;
use crate::listener::{OperationListener, ProgressListener};
use crate::operations::OperationManager;
use crate::resolve::ResolutionMode;
use crate::runner::{BuildRunner, RunOptions};
use crate::summary::build_response;
use pl_adapters::{
    BuildTool, CodegenRunner, GitAdapter, Scaffolder, UnitDiscovery, ValidationRunner,
};
use pl_core::{
    BuildOperationMetadata, BuildResponse, Clock, IdGen, Operation, OperationName,
    OperationPhase, PhaseKind, PhaseState, RepoConfig, ResourceName, UuidIdGen, DEFAULT_BRANCH,
};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::Instrument;

/// Per-request options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    pub skip_validation: bool,
    /// Run the publish phase after building.
    pub install_local: bool,
    /// Expand the target into every nested unit.
    pub isolate: bool,
    pub continue_on_failure: bool,
    pub clean: bool,
}

impl BuildOptions {
    /// Merge with the lake's `[build]` defaults; either side can enable.
    pub fn run_options(&self, repo: &RepoConfig) -> RunOptions {
        RunOptions {
            mode: if self.isolate || repo.build.isolate_units {
                ResolutionMode::Isolated
            } else {
                ResolutionMode::Direct
            },
            continue_on_failure: self.continue_on_failure || repo.build.keep_going,
            clean: self.clean || repo.build.clean,
        }
    }
}

/// External collaborators of the pipeline
#[derive(Clone)]
pub struct PipelineDeps<T, G, C, V, D, S> {
    pub tool: T,
    pub git: G,
    pub codegen: C,
    pub validator: V,
    pub discovery: D,
    pub scaffolder: S,
}

#[derive(Clone)]
pub struct BuildOrchestrator<T, G, C, V, D, S, K: Clock, I = UuidIdGen> {
    git: G,
    codegen: C,
    validator: V,
    scaffolder: S,
    runner: BuildRunner<T, D, K>,
    operations: Arc<OperationManager<K>>,
    workers: Arc<Semaphore>,
    clock: K,
    id_gen: I,
}

impl<T, G, C, V, D, S, K> BuildOrchestrator<T, G, C, V, D, S, K, UuidIdGen>
where
    T: BuildTool,
    G: GitAdapter,
    C: CodegenRunner,
    V: ValidationRunner,
    D: UnitDiscovery,
    S: Scaffolder,
    K: Clock,
{
    pub fn new(
        deps: PipelineDeps<T, G, C, V, D, S>,
        operations: Arc<OperationManager<K>>,
        clock: K,
        workers: usize,
    ) -> Self {
        Self::with_id_gen(deps, operations, clock, workers, UuidIdGen)
    }
}

impl<T, G, C, V, D, S, K, I> BuildOrchestrator<T, G, C, V, D, S, K, I>
where
    T: BuildTool,
    G: GitAdapter,
    C: CodegenRunner,
    V: ValidationRunner,
    D: UnitDiscovery,
    S: Scaffolder,
    K: Clock,
    I: IdGen + 'static,
{
    pub fn with_id_gen(
        deps: PipelineDeps<T, G, C, V, D, S>,
        operations: Arc<OperationManager<K>>,
        clock: K,
        workers: usize,
        id_gen: I,
    ) -> Self {
        Self {
            git: deps.git,
            codegen: deps.codegen,
            validator: deps.validator,
            scaffolder: deps.scaffolder,
            runner: BuildRunner::new(deps.tool, deps.discovery, clock.clone()),
            operations,
            workers: Arc::new(Semaphore::new(workers.clamp(1, Semaphore::MAX_PERMITS))),
            clock,
            id_gen,
        }
    }

    pub fn operations(&self) -> &Arc<OperationManager<K>> {
        &self.operations
    }

    /// Current git branch of the lake, or `main` when it cannot be read.
    pub async fn get_current_branch(&self, repo_root: &Path) -> String {
        match self.git.current_branch(repo_root).await {
            Ok(branch) => branch,
            Err(e) => {
                tracing::warn!(error = %e, "could not determine branch, using {}", DEFAULT_BRANCH);
                DEFAULT_BRANCH.to_string()
            }
        }
    }

    /// Metadata for a new request, with the repo snapshot attached.
    pub async fn initial_metadata(
        &self,
        repo: &RepoConfig,
        target: &str,
    ) -> BuildOperationMetadata {
        let branch = self.get_current_branch(&repo.root).await;
        BuildOperationMetadata::new(target, branch, self.clock.epoch_ms()).with_repo(repo.clone())
    }

    /// Admit and start a build for `resource`.
    ///
    /// Returns immediately. A busy resource yields a done ABORTED
    /// operation and nothing is started.
    pub async fn submit_build(
        &self,
        repo: RepoConfig,
        resource: ResourceName,
        target: String,
        options: BuildOptions,
    ) -> Operation {
        let metadata = self.initial_metadata(&repo, &target).await;
        let name = OperationName::generate(&resource, &self.id_gen);
        let cancel = CancellationToken::new();
        let operation = self
            .operations
            .create_operation(name, resource, metadata, cancel.clone());
        if !operation.done {
            self.build_target_async(repo, target, options, operation.name.clone(), cancel);
        }
        operation
    }

    /// Run the pipeline for an admitted operation on the worker pool.
    ///
    /// The operation is finished exactly once: completed by the listener,
    /// cancelled, or failed with `Build failed: <reason>`.
    pub fn build_target_async(
        &self,
        repo: RepoConfig,
        target: String,
        options: BuildOptions,
        name: OperationName,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        let this = self.clone();
        let span = tracing::info_span!("build", operation = %name, target = %target);
        tokio::spawn(
            async move {
                let _permit = match this.workers.clone().acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        if let Err(e) = this
                            .operations
                            .fail_operation(&name, "Build failed: worker pool closed")
                        {
                            tracing::warn!(error = %e, "could not record failure");
                        }
                        return;
                    }
                };
                let Some(metadata) = this.operations.metadata(&name) else {
                    tracing::warn!("operation vanished before it started");
                    return;
                };
                let listener = OperationListener::new(this.operations.clone(), name.clone());
                match this
                    .build_target_sync(&repo, &target, &options, &cancel, &listener, metadata)
                    .await
                {
                    Ok(response) => {
                        tracing::info!(status = ?response.status, "build finished");
                    }
                    Err(PipelineError::Cancelled) => {
                        tracing::info!("build cancelled");
                        this.operations.cancel_operation(&name);
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "build failed");
                        if let Err(e) = this
                            .operations
                            .fail_operation(&name, &format!("Build failed: {}", e))
                        {
                            tracing::warn!(error = %e, "could not record failure");
                        }
                    }
                }
            }
            .instrument(span),
        )
    }

    /// Run every phase in the calling task.
    pub async fn build_target_sync(
        &self,
        repo: &RepoConfig,
        target: &str,
        options: &BuildOptions,
        cancel: &CancellationToken,
        listener: &dyn ProgressListener,
        metadata: BuildOperationMetadata,
    ) -> Result<BuildResponse, PipelineError> {
        let mut meta = metadata;
        if meta.repo.is_none() {
            meta.repo = Some(repo.clone());
        }
        let started = std::time::Instant::now();

        // INITIALIZING
        self.checkpoint(cancel, &mut meta, listener)?;
        if let Err(e) = self.scaffolder.prepare(repo).await {
            return Err(self.abort(&mut meta, None, e.into(), listener));
        }

        // RUNNING_CODEGEN
        self.enter_phase(
            OperationPhase::RunningCodegen,
            PhaseKind::Codegen,
            cancel,
            &mut meta,
            listener,
        )?;
        if let Err(e) = self
            .codegen
            .run(repo, &mut meta.phase_statuses.codegen)
            .instrument(tracing::info_span!("phase", name = "codegen"))
            .await
        {
            return Err(self.abort(&mut meta, Some(PhaseKind::Codegen), e.into(), listener));
        }
        meta.phase_statuses.codegen.succeed(self.clock.epoch_ms());
        self.finish_phase(PhaseKind::Codegen, &meta, listener);

        // VALIDATING
        self.enter_phase(
            OperationPhase::Validating,
            PhaseKind::Validation,
            cancel,
            &mut meta,
            listener,
        )?;
        if options.skip_validation {
            meta.phase_statuses
                .validation
                .skip(self.clock.epoch_ms(), "Validation skipped by request");
        } else {
            let report = match self
                .validator
                .validate(repo, &mut meta.phase_statuses.validation)
                .instrument(tracing::info_span!("phase", name = "validation"))
                .await
            {
                Ok(report) => report,
                Err(e) => {
                    let err = e.into();
                    return Err(self.abort(&mut meta, Some(PhaseKind::Validation), err, listener));
                }
            };
            let now = self.clock.epoch_ms();
            let status = &mut meta.phase_statuses.validation;
            for finding in &report.findings {
                status.log(finding.to_string());
            }
            if let Some(reason) = &report.skipped {
                status.skip(now, reason.clone());
            } else if report.success {
                status.succeed(now);
            } else {
                let errors = report.errors().cloned().collect();
                let err = PipelineError::Validation { errors };
                return Err(self.abort(&mut meta, Some(PhaseKind::Validation), err, listener));
            }
        }
        self.finish_phase(PhaseKind::Validation, &meta, listener);

        // BUILDING
        self.enter_phase(
            OperationPhase::Building,
            PhaseKind::Build,
            cancel,
            &mut meta,
            listener,
        )?;
        let lake_target = match repo.to_lake_relative(Path::new(target)) {
            Ok(t) => t,
            Err(e) => {
                return Err(self.abort(&mut meta, Some(PhaseKind::Build), e.into(), listener));
            }
        };
        let run_options = options.run_options(repo);
        if let Err(e) = self
            .runner
            .build(repo, &lake_target, &run_options, cancel, &mut meta, listener)
            .instrument(tracing::info_span!("phase", name = "build"))
            .await
        {
            if e.is_cancelled() {
                self.mark_cancelled(&mut meta, listener);
                return Err(e);
            }
            return Err(self.abort(&mut meta, Some(PhaseKind::Build), e, listener));
        }
        self.finish_phase(PhaseKind::Build, &meta, listener);

        // PUBLISHING
        if options.install_local {
            self.enter_phase(
                OperationPhase::Publishing,
                PhaseKind::Publish,
                cancel,
                &mut meta,
                listener,
            )?;
            if let Err(e) = self
                .runner
                .publish(repo, &lake_target, &mut meta, listener)
                .instrument(tracing::info_span!("phase", name = "publish"))
                .await
            {
                return Err(self.abort(&mut meta, Some(PhaseKind::Publish), e, listener));
            }
            self.finish_phase(PhaseKind::Publish, &meta, listener);
        }

        meta.advance(OperationPhase::Completed);
        listener.on_metadata_update(&meta);
        let response = build_response(meta, self.clock.epoch_ms());
        tracing::info!(
            status = ?response.status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "pipeline completed"
        );
        listener.on_build_complete(&response);
        Ok(response)
    }

    /// Stop the worker pool and cancel all running operations.
    pub fn shutdown(&self) {
        self.workers.close();
        self.operations.shutdown();
    }

    fn checkpoint(
        &self,
        cancel: &CancellationToken,
        meta: &mut BuildOperationMetadata,
        listener: &dyn ProgressListener,
    ) -> Result<(), PipelineError> {
        cancel
            .throw_if_cancelled()
            .inspect_err(|_| self.mark_cancelled(meta, listener))
    }

    fn mark_cancelled(&self, meta: &mut BuildOperationMetadata, listener: &dyn ProgressListener) {
        tracing::info!(phase = ?meta.current_phase, "cancellation observed");
        meta.advance(OperationPhase::Cancelled);
        listener.on_metadata_update(meta);
    }

    fn enter_phase(
        &self,
        phase: OperationPhase,
        kind: PhaseKind,
        cancel: &CancellationToken,
        meta: &mut BuildOperationMetadata,
        listener: &dyn ProgressListener,
    ) -> Result<(), PipelineError> {
        self.checkpoint(cancel, meta, listener)?;
        meta.advance(phase);
        meta.phase_statuses.get_mut(kind).start(self.clock.epoch_ms());
        tracing::info!(phase = ?phase, "entering phase");
        listener.on_metadata_update(meta);
        listener.on_phase_start(kind);
        Ok(())
    }

    fn finish_phase(
        &self,
        kind: PhaseKind,
        meta: &BuildOperationMetadata,
        listener: &dyn ProgressListener,
    ) {
        let status = meta.phase_statuses.get(kind);
        listener.on_metadata_update(meta);
        listener.on_phase_complete(
            kind,
            status.status != PhaseState::Failed,
            status.error_message.as_deref(),
        );
    }

    /// Record `err` against the phase, move to FAILED and notify.
    fn abort(
        &self,
        meta: &mut BuildOperationMetadata,
        kind: Option<PhaseKind>,
        err: PipelineError,
        listener: &dyn ProgressListener,
    ) -> PipelineError {
        let message = err.to_string();
        if let Some(kind) = kind {
            meta.phase_statuses
                .get_mut(kind)
                .fail(self.clock.epoch_ms(), message.clone());
            listener.on_phase_complete(kind, false, Some(&message));
        }
        meta.advance(OperationPhase::Failed);
        listener.on_metadata_update(meta);
        listener.on_build_failed(&message);
        tracing::error!(error = %message, "pipeline failed");
        err
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
