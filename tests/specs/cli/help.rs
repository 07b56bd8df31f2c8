//! CLI help specs

use crate::prelude::*;

#[test]
fn no_command_prints_help() {
    cli()
        .passes()
        .stdout_has("Usage: protolake")
        .stdout_has("build")
        .stdout_has("branch");
}

#[test]
fn build_help_lists_pipeline_flags() {
    cli()
        .args(&["build", "--help"])
        .passes()
        .stdout_has("--skip-validation")
        .stdout_has("--install-local")
        .stdout_has("--isolate")
        .stdout_has("--continue-on-failure")
        .stdout_has("--clean")
        .stdout_has("--lake-path");
}
