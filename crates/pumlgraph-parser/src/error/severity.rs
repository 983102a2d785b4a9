//! Severity levels for diagnostics.

use std::fmt;

/// The severity level of a diagnostic, ordered from least to most severe.
///
/// Compilation output is suppressed once the accumulated severity of a
/// context reaches [`Severity::Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Severity {
    /// Context for an earlier diagnostic, never actionable on its own.
    #[default]
    Note,

    /// An advisory issue that does not prevent compilation.
    Warning,

    /// A problem that makes the compilation result unusable.
    Error,

    /// A problem the tokenizer could only partially recover from.
    Fatal,
}

impl Severity {
    /// Returns the label written in front of every diagnostic line.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Note => "Note",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
            Severity::Fatal => "Fatal",
        }
    }

    /// Returns `true` for [`Severity::Error`] and [`Severity::Fatal`].
    pub fn is_error(&self) -> bool {
        *self >= Severity::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
