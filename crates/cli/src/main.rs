// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! protolake - proto lake build CLI

mod color;
mod commands;
mod console;
mod env;
mod exit_error;
mod lake;
mod logging;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{branch, build};
use output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "protolake",
    version,
    about = "Protolake - build proto lakes into language packages"
)]
struct Cli {
    /// Output format
    #[arg(
        short = 'o',
        long = "output",
        value_enum,
        default_value_t,
        global = true
    )]
    output: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate, validate and build a lake or part of it
    Build(build::BuildArgs),
    /// Print the git branch used for artifact versions
    Branch(branch::BranchArgs),
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        let code = e
            .downcast_ref::<exit_error::ExitError>()
            .map_or(1, |c| c.code);
        let msg = format_error(&e);
        if !msg.is_empty() {
            eprintln!("Error: {}", msg);
        }
        std::process::exit(code);
    }
}

/// Format an anyhow error, deduplicating the chain.
///
/// If the top-level Display already contains the source error text, the
/// "Caused by" chain is skipped. Otherwise the full chain is rendered so
/// context isn't lost.
fn format_error(err: &anyhow::Error) -> String {
    let top = err.to_string();

    let chain_redundant = err
        .chain()
        .skip(1)
        .all(|cause| top.contains(&cause.to_string()));

    if chain_redundant {
        return top;
    }

    let mut buf = top;
    for (i, cause) in err.chain().skip(1).enumerate() {
        buf.push_str(&format!("\n\nCaused by:\n    {}: {}", i, cause));
    }
    buf
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let format = cli.output;

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            // No subcommand provided: print help and exit 0
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
            return Ok(());
        }
    };

    // Held until exit so buffered log lines are flushed
    let _log_guard = match env::state_dir() {
        Some(dir) => Some(logging::setup_logging(&dir)?),
        None => None,
    };

    match command {
        Commands::Build(args) => build::handle(args, format).await,
        Commands::Branch(args) => branch::handle(args, format).await,
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
