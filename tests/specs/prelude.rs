//! Test helpers for behavioral specifications.
//!
//! Provides high-level DSL for testing protolake CLI behavior.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Stand-in for `bazel`: appends each invocation to `$FAKE_BAZEL_LOG` and
/// fails `build` for any pattern listed in `$FAKE_BAZEL_FAIL`.
const FAKE_BAZEL: &str = r#"#!/bin/sh
echo "$*" >> "$FAKE_BAZEL_LOG"
case "$1" in
  build)
    for pattern; do :; done
    for failing in $FAKE_BAZEL_FAIL; do
      if [ "$pattern" = "$failing" ]; then
        echo "ERROR: Build did NOT complete successfully"
        exit 1
      fi
    done
    echo "INFO: Build completed successfully"
    ;;
  query)
    printf '%s\n' $FAKE_BAZEL_PUBLISH
    ;;
esac
exit 0
"#;

/// Returns the path to the protolake binary, checking the llvm-cov target
/// directory first.
fn binary_path(name: &str) -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));

    let llvm_cov_path = manifest_dir.join("target/llvm-cov-target/debug").join(name);
    if llvm_cov_path.exists() {
        return llvm_cov_path;
    }

    let standard = manifest_dir.join("target/debug").join(name);
    if standard.exists() {
        return standard;
    }

    assert_cmd::cargo::cargo_bin(name)
}

/// Create a CLI builder for protolake commands
pub fn cli() -> CliBuilder {
    CliBuilder::new()
}

/// High-level CLI builder for fluent test assertions
pub struct CliBuilder {
    args: Vec<String>,
    dir: Option<PathBuf>,
    envs: Vec<(String, String)>,
}

impl CliBuilder {
    fn new() -> Self {
        Self {
            args: Vec::new(),
            dir: None,
            envs: vec![
                ("NO_COLOR".into(), "1".into()),
                // No repository: branch detection falls back to main
                ("PL_GIT_COMMAND".into(), "false".into()),
                ("PL_BUF_COMMAND".into(), "false".into()),
            ],
        }
    }

    /// Add CLI arguments
    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    /// Set working directory
    pub fn pwd(mut self, path: impl Into<PathBuf>) -> Self {
        self.dir = Some(path.into());
        self
    }

    /// Set environment variable
    pub fn env(mut self, key: &str, value: impl AsRef<Path>) -> Self {
        self.envs.push((
            key.to_string(),
            value.as_ref().to_string_lossy().to_string(),
        ));
        self
    }

    /// Build the command without running it
    pub fn command(self) -> Command {
        let mut cmd = Command::new(binary_path("protolake"));
        cmd.args(&self.args);

        if let Some(dir) = self.dir {
            cmd.current_dir(dir);
        }

        // Keep the caller's tool configuration out of the specs
        for var in [
            "PL_BAZEL_STARTUP_OPTIONS",
            "PL_BAZEL_OPTIONS",
            "PL_REMOTE_CACHE_URL",
            "PL_TOOL_TIMEOUT_SECS",
            "RUST_LOG",
        ] {
            cmd.env_remove(var);
        }

        for (key, value) in self.envs {
            cmd.env(key, value);
        }

        cmd
    }

    fn run(self) -> Output {
        self.command().output().expect("command should run")
    }

    /// Run and expect success (exit code 0)
    pub fn passes(self) -> RunAssert {
        self.exits(0)
    }

    /// Run and expect failure (non-zero exit code)
    pub fn fails(self) -> RunAssert {
        let output = self.run();
        assert!(
            !output.status.success(),
            "expected command to fail, but it passed\nstdout: {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }

    /// Run and expect a specific exit code
    pub fn exits(self, code: i32) -> RunAssert {
        let output = self.run();
        assert_eq!(
            output.status.code(),
            Some(code),
            "unexpected exit code\nstdout: {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }
}

/// Result of a CLI run for chaining assertions
pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    /// Get stdout as string
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    /// Get stderr as string
    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    /// Assert stdout equals expected exactly (with diff on failure).
    pub fn stdout_eq(self, expected: &str) -> Self {
        let stdout = self.stdout();
        similar_asserts::assert_eq!(stdout, expected);
        self
    }

    /// Assert stdout contains substring.
    pub fn stdout_has(self, expected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            stdout.contains(expected),
            "stdout does not contain '{}'\nstdout: {}",
            expected,
            stdout
        );
        self
    }

    /// Assert stderr contains substring.
    pub fn stderr_has(self, expected: &str) -> Self {
        let stderr = self.stderr();
        assert!(
            stderr.contains(expected),
            "stderr does not contain '{}'\nstderr: {}",
            expected,
            stderr
        );
        self
    }

    /// Assert stderr does not contain substring.
    pub fn stderr_lacks(self, unexpected: &str) -> Self {
        let stderr = self.stderr();
        assert!(
            !stderr.contains(unexpected),
            "stderr should not contain '{}'\nstderr: {}",
            unexpected,
            stderr
        );
        self
    }
}

// =============================================================================
// Lake
// =============================================================================

/// Temporary lake directory with a fake build tool.
pub struct Lake {
    dir: tempfile::TempDir,
    /// Isolated state directory for this test (PL_STATE_DIR)
    state_dir: tempfile::TempDir,
    fail: Vec<String>,
    publish: Vec<String>,
}

impl Lake {
    /// A directory with no lake.toml
    pub fn empty() -> Self {
        let lake = Self {
            dir: tempfile::tempdir().unwrap(),
            state_dir: tempfile::tempdir().unwrap(),
            fail: Vec::new(),
            publish: Vec::new(),
        };
        lake.install_fake_bazel();
        lake
    }

    /// An initialized lake named `acme` at version 1.0.0
    pub fn acme() -> Self {
        let lake = Self::empty();
        lake.file("lake.toml", MINIMAL_LAKE);
        lake.file("BUILD.bazel", "");
        lake
    }

    fn install_fake_bazel(&self) {
        let script = self.state_path().join("bazel");
        std::fs::write(&script, FAKE_BAZEL).unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        }
    }

    /// Make `bazel build` fail for `pattern`
    pub fn failing(mut self, pattern: &str) -> Self {
        self.fail.push(pattern.to_string());
        self
    }

    /// Make `bazel query` report `label` as a publish action
    pub fn publishing(mut self, label: &str) -> Self {
        self.publish.push(label.to_string());
        self
    }

    /// Get the lake path
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file at the given path (parent directories created automatically)
    pub fn file(&self, path: impl AsRef<Path>, content: &str) {
        let full_path = self.dir.path().join(path.as_ref());
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(full_path, content).unwrap();
    }

    /// Mark `dir` as a bundle
    pub fn bundle(&self, dir: &str) {
        self.file(format!("{}/bundle.yaml", dir), "name: bundle\n");
    }

    /// Get the isolated state directory path
    pub fn state_path(&self) -> &Path {
        self.state_dir.path()
    }

    /// Run protolake in this lake's context
    pub fn protolake(&self) -> CliBuilder {
        cli()
            .pwd(self.path())
            .env("PL_STATE_DIR", self.state_path())
            .env("PL_BAZEL_COMMAND", self.state_path().join("bazel"))
            .env("FAKE_BAZEL_LOG", self.state_path().join("bazel.log"))
            .env("FAKE_BAZEL_FAIL", self.fail.join(" "))
            .env("FAKE_BAZEL_PUBLISH", self.publish.join(" "))
    }

    /// Every fake bazel invocation so far, one per line
    pub fn bazel_calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.state_path().join("bazel.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Patterns passed to `bazel build`, in order
    pub fn built_patterns(&self) -> Vec<String> {
        self.bazel_calls()
            .iter()
            .filter(|c| c.starts_with("build "))
            .filter_map(|c| c.rsplit(' ').next().map(str::to_string))
            .collect()
    }

    /// Read the CLI log file contents
    pub fn log(&self) -> String {
        std::fs::read_to_string(self.state_path().join("protolake.log"))
            .unwrap_or_else(|_| "(no log)".to_string())
    }
}

/// Minimal lake configuration
pub const MINIMAL_LAKE: &str = r#"
name = "acme"
version = "1.0.0"

[languages.java]
group_id = "com.acme.protos"
"#;
