//! The error returned when a compilation checkpoint fails.

use std::fmt;

use thiserror::Error;

use crate::error::Severity;

/// The pipeline checkpoint at which compilation was abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Tokenizing and parsing.
    Parse,
    /// The three semantic passes.
    Analysis,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Parse => write!(f, "parsing"),
            Stage::Analysis => write!(f, "semantic analysis"),
        }
    }
}

/// Compilation stopped because the accumulated severity reached
/// [`Severity::Error`].
///
/// The individual problems were already reported through the
/// [`DiagnosticContext`](crate::error::DiagnosticContext).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("compilation failed during {stage} ({severity} reported)")]
pub struct CompileError {
    stage: Stage,
    severity: Severity,
}

impl CompileError {
    pub fn new(stage: Stage, severity: Severity) -> Self {
        Self { stage, severity }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }
}
