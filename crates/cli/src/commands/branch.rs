// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `protolake branch`

use crate::lake::{absolute, find_lake_root, load_lake};
use crate::output::OutputFormat;
use anyhow::Result;
use clap::Args;
use pl_adapters::{GitAdapter, GitCli};
use pl_core::{version_with_branch, DEFAULT_BRANCH};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct BranchArgs {
    /// Lake directory, or any directory inside it
    #[arg(long, default_value = ".")]
    pub lake_path: PathBuf,
}

pub async fn handle(args: BranchArgs, format: OutputFormat) -> Result<()> {
    let start = absolute(&args.lake_path);
    let root = find_lake_root(&start).unwrap_or(start);

    let branch = match GitCli::from_env().current_branch(&root).await {
        Ok(branch) => branch,
        Err(e) => {
            tracing::warn!(error = %e, "could not determine branch, using {}", DEFAULT_BRANCH);
            DEFAULT_BRANCH.to_string()
        }
    };
    // Only meaningful inside a lake
    let version = load_lake(&root)
        .ok()
        .map(|repo| version_with_branch(&repo.version, &branch));

    match format {
        OutputFormat::Text => println!("{}", branch),
        OutputFormat::Json => {
            let value = serde_json::json!({ "branch": branch, "version": version });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }
    Ok(())
}
