// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use pl_core::OverallStatus;
use std::io::IsTerminal;

pub mod codes {
    /// Phase headers: pastel cyan / steel blue
    pub const HEADER: u8 = 74;
    /// Tool log lines: darker grey
    pub const MUTED: u8 = 240;
    pub const GREEN: u8 = 114;
    pub const YELLOW: u8 = 179;
    pub const RED: u8 = 167;
}

/// Determine if color output should be enabled.
///
/// Priority: `NO_COLOR=1` disables → `COLOR=1` forces → TTY check on stderr,
/// where progress is written.
pub fn should_colorize() -> bool {
    if crate::env::no_color() {
        return false;
    }
    if crate::env::force_color() {
        return true;
    }
    std::io::stderr().is_terminal()
}

/// Wraps text in 256-color escapes when enabled.
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    enabled: bool,
}

impl Painter {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn paint(&self, code: u8, text: &str) -> String {
        if self.enabled {
            format!("\x1b[38;5;{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    pub fn header(&self, text: &str) -> String {
        self.paint(codes::HEADER, text)
    }

    pub fn muted(&self, text: &str) -> String {
        self.paint(codes::MUTED, text)
    }

    pub fn status(&self, status: OverallStatus) -> String {
        let code = match status {
            OverallStatus::Succeeded => codes::GREEN,
            OverallStatus::PartialSuccess | OverallStatus::Cancelled => codes::YELLOW,
            OverallStatus::Failed => codes::RED,
        };
        self.paint(code, &status.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_painter_is_identity() {
        let p = Painter::new(false);
        assert_eq!(p.header("Build"), "Build");
        assert_eq!(p.status(OverallStatus::Failed), "FAILED");
    }

    #[test]
    fn enabled_painter_wraps_text() {
        let p = Painter::new(true);
        assert_eq!(p.muted("x"), "\x1b[38;5;240mx\x1b[0m");
    }
}
