// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Live progress on stderr for synchronous builds.

use crate::color::Painter;
use parking_lot::Mutex;
use pl_core::{BuildOperationMetadata, PhaseKind};
use pl_engine::ProgressListener;
use std::io::Write;

const PHASES: [PhaseKind; 4] = [
    PhaseKind::Codegen,
    PhaseKind::Validation,
    PhaseKind::Build,
    PhaseKind::Publish,
];

fn title(kind: PhaseKind) -> &'static str {
    match kind {
        PhaseKind::Codegen => "Generating BUILD files",
        PhaseKind::Validation => "Validating protos",
        PhaseKind::Build => "Building",
        PhaseKind::Publish => "Publishing",
    }
}

/// Prints phase headers and each phase's new log lines as they appear.
pub struct ConsoleListener<W: Write + Send> {
    painter: Painter,
    out: Mutex<W>,
    /// Log lines already printed, per phase in [`PHASES`] order.
    printed: Mutex<[usize; 4]>,
}

impl ConsoleListener<std::io::Stderr> {
    pub fn stderr(painter: Painter) -> Self {
        Self::new(painter, std::io::stderr())
    }
}

impl<W: Write + Send> ConsoleListener<W> {
    pub fn new(painter: Painter, out: W) -> Self {
        Self {
            painter,
            out: Mutex::new(out),
            printed: Mutex::new([0; 4]),
        }
    }

    fn line(&self, text: &str) {
        let _ = writeln!(self.out.lock(), "{}", text);
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl<W: Write + Send> ProgressListener for ConsoleListener<W> {
    fn on_phase_start(&self, phase: PhaseKind) {
        self.line(&format!("{} {}", self.painter.header("==>"), title(phase)));
    }

    fn on_phase_complete(&self, phase: PhaseKind, success: bool, message: Option<&str>) {
        if !success {
            let message = message.unwrap_or("unknown error");
            self.line(&format!("    {} failed: {}", phase, message));
        }
    }

    fn on_metadata_update(&self, metadata: &BuildOperationMetadata) {
        let mut printed = self.printed.lock();
        for (i, kind) in PHASES.iter().enumerate() {
            let lines = &metadata.phase_statuses.get(*kind).log_lines;
            for line in lines.iter().skip(printed[i]) {
                self.line(&format!("    {}", self.painter.muted(line)));
            }
            printed[i] = printed[i].max(lines.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pl_core::test_support::{acme_repo, metadata_for};
    use std::path::Path;

    #[test]
    fn prints_only_new_log_lines() {
        let listener = ConsoleListener::new(Painter::new(false), Vec::new());
        let mut meta = metadata_for(&acme_repo(Path::new("/lake")), ".");

        listener.on_phase_start(PhaseKind::Build);
        meta.phase_statuses.build.log("Building: a");
        listener.on_metadata_update(&meta);
        meta.phase_statuses.build.log("Successfully built: a");
        listener.on_metadata_update(&meta);
        listener.on_metadata_update(&meta);
        listener.on_phase_complete(PhaseKind::Build, false, Some("boom"));

        let out = String::from_utf8(listener.into_inner()).unwrap();
        assert_eq!(
            out,
            "==> Building\n    Building: a\n    Successfully built: a\n    build failed: boom\n"
        );
    }
}
