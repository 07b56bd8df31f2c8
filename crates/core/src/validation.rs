// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structured results of the validation phase.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which check produced a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationKind {
    Compilation,
    Lint,
    Breaking,
    Format,
}

impl fmt::Display for ValidationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationKind::Compilation => write!(f, "compilation"),
            ValidationKind::Lint => write!(f, "lint"),
            ValidationKind::Breaking => write!(f, "breaking"),
            ValidationKind::Format => write!(f, "format"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Warning,
    Error,
}

/// One problem reported by a validation check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFinding {
    pub kind: ValidationKind,
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

impl ValidationFinding {
    pub fn new(kind: ValidationKind, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            message: message.into(),
            file: None,
            line: None,
            column: None,
        }
    }

    pub fn at(mut self, file: impl Into<String>, line: u32, column: u32) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, self.line, self.column) {
            (Some(file), Some(line), Some(col)) => {
                write!(f, "[{}] {}:{}:{}: {}", self.kind, file, line, col, self.message)
            }
            (Some(file), _, _) => write!(f, "[{}] {}: {}", self.kind, file, self.message),
            _ => write!(f, "[{}] {}", self.kind, self.message),
        }
    }
}

/// Outcome of the validation phase.
///
/// `success` is false iff at least one ERROR-severity finding exists.
/// A skipped validation is successful and carries the reason.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub success: bool,
    pub findings: Vec<ValidationFinding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skipped: Option<String>,
}

impl ValidationReport {
    pub fn passed() -> Self {
        Self::from_findings(Vec::new())
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        Self {
            success: true,
            findings: Vec::new(),
            skipped: Some(reason.into()),
        }
    }

    pub fn from_findings(findings: Vec<ValidationFinding>) -> Self {
        let success = !findings.iter().any(ValidationFinding::is_error);
        Self {
            success,
            findings,
            skipped: None,
        }
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationFinding> {
        self.findings.iter().filter(|f| f.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationFinding> {
        self.findings.iter().filter(|f| !f.is_error())
    }
}
