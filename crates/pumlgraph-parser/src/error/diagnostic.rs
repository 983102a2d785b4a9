//! The core diagnostic type.
//!
//! A [`Diagnostic`] is a single reported event: a severity, an optional
//! error code, a fully expanded message and, when known, the location of
//! the construct it concerns.

use std::fmt;

use crate::{
    error::{ErrorCode, Severity},
    source::SourceRef,
};

/// A single diagnostic message.
///
/// The [`Display`](fmt::Display) form is the exact line written by text
/// sinks: `"<SeverityLabel>: <message>"`.
///
/// # Example
///
/// ```
/// # use pumlgraph_parser::error::{Diagnostic, ErrorCode};
/// let diag = Diagnostic::error("An unresolved object reference: 'db'").with_code(ErrorCode::E204);
///
/// assert_eq!(diag.to_string(), "Error: An unresolved object reference: 'db'");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    source_ref: Option<SourceRef>,
}

impl Diagnostic {
    /// Create a diagnostic with the given severity and message.
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            source_ref: None,
        }
    }

    /// Create a note diagnostic.
    pub fn note(message: impl Into<String>) -> Self {
        Self::new(Severity::Note, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Create an error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a fatal diagnostic.
    pub fn fatal(message: impl Into<String>) -> Self {
        Self::new(Severity::Fatal, message)
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Attach the location the diagnostic refers to.
    pub fn with_source_ref(mut self, source_ref: SourceRef) -> Self {
        self.source_ref = Some(source_ref);
        self
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_ref(&self) -> Option<&SourceRef> {
        self.source_ref.as_ref()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

impl std::error::Error for Diagnostic {}
