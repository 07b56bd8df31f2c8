// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `protolake build`

use crate::color::{should_colorize, Painter};
use crate::console::ConsoleListener;
use crate::exit_error::{exit_code, ExitError};
use crate::lake::{absolute, load_lake};
use crate::output::{print_response, OutputFormat};
use anyhow::Result;
use clap::Args;
use pl_adapters::{
    BazelCli, BufValidator, FsDiscovery, GazelleRunner, GitCli, NoOpScaffolder, TracedBuildTool,
};
use pl_core::{OverallStatus, SystemClock};
use pl_engine::env::CLEANUP_INTERVAL;
use pl_engine::{
    BuildOptions, BuildOrchestrator, CancellationToken, OperationManager, PipelineDeps,
    PipelineError,
};
use std::path::PathBuf;
use std::sync::Arc;

type Tool = TracedBuildTool<BazelCli>;

/// Orchestrator wired to the real tools.
pub type CliOrchestrator = BuildOrchestrator<
    Tool,
    GitCli,
    GazelleRunner<Tool>,
    BufValidator<GitCli>,
    FsDiscovery,
    NoOpScaffolder,
    SystemClock,
>;

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Directory to build (default: the whole lake). Relative paths are
    /// taken from the lake root.
    pub target: Option<PathBuf>,

    /// Lake directory, or any directory inside it
    #[arg(long, default_value = ".")]
    pub lake_path: PathBuf,

    /// Skip proto validation
    #[arg(long)]
    pub skip_validation: bool,

    /// Publish built packages to the local repositories
    #[arg(long)]
    pub install_local: bool,

    /// Build every bundle under the target separately, deepest first
    #[arg(long)]
    pub isolate: bool,

    /// Keep building remaining bundles after a failure
    #[arg(long)]
    pub continue_on_failure: bool,

    /// Expunge the build cache first
    #[arg(long)]
    pub clean: bool,
}

impl BuildArgs {
    pub fn options(&self) -> BuildOptions {
        BuildOptions {
            skip_validation: self.skip_validation,
            install_local: self.install_local,
            isolate: self.isolate,
            continue_on_failure: self.continue_on_failure,
            clean: self.clean,
        }
    }
}

pub fn orchestrator() -> CliOrchestrator {
    let tool = TracedBuildTool::new(BazelCli::from_env());
    let git = GitCli::from_env();
    let operations = Arc::new(OperationManager::new(
        SystemClock,
        pl_engine::env::operation_ttl(),
    ));
    BuildOrchestrator::new(
        PipelineDeps {
            codegen: GazelleRunner::new(tool.clone()),
            validator: BufValidator::from_env(git.clone()),
            tool,
            git,
            discovery: FsDiscovery,
            scaffolder: NoOpScaffolder,
        },
        operations,
        SystemClock,
        pl_engine::env::build_workers(),
    )
}

pub async fn handle(args: BuildArgs, format: OutputFormat) -> Result<()> {
    let repo = load_lake(&args.lake_path)?;
    let target = match &args.target {
        Some(t) if t.is_absolute() => t.clone(),
        Some(t) => repo.root.join(t),
        None => repo.root.clone(),
    };
    let target = absolute(&target).display().to_string();
    tracing::info!(lake = %repo.name, target = %target, "build requested");

    let orchestrator = orchestrator();
    let _sweeper = orchestrator.operations().spawn_cleanup(CLEANUP_INTERVAL);
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("Interrupted, stopping after the current step...");
            tracing::info!("interrupt received, cancelling build");
            on_interrupt.cancel();
        }
    });

    let listener = ConsoleListener::stderr(Painter::new(should_colorize()));
    let metadata = orchestrator.initial_metadata(&repo, &target).await;
    let result = orchestrator
        .build_target_sync(&repo, &target, &args.options(), &cancel, &listener, metadata)
        .await;

    match result {
        Ok(response) => {
            print_response(&response, format)?;
            match response.status {
                OverallStatus::Succeeded => Ok(()),
                status => Err(ExitError::new(exit_code(status), "").into()),
            }
        }
        Err(PipelineError::Cancelled) => {
            Err(ExitError::new(exit_code(OverallStatus::Cancelled), "Build cancelled").into())
        }
        Err(e) => Err(anyhow::anyhow!("Build failed: {}", e)),
    }
}
