//! Hierarchical diagnostic contexts.

use std::{cell::Cell, fmt};

use log::trace;

use crate::error::{Diagnostic, DiagnosticSink, Severity};

/// A severity-tracking scope for diagnostics.
///
/// A root context owns nothing but a reference to its sink. A nested
/// context additionally borrows a base context and captures a severity and
/// message at construction. Reporting on a nested context:
///
/// 1. raises its own maximum severity,
/// 2. writes the diagnostic to the sink,
/// 3. raises the base's maximum severity to its own, then reports its
///    captured message at its captured severity on the base.
///
/// Step 3 recurses, so every diagnostic is followed by one breadcrumb line
/// per enclosing scope, and every ancestor sees the highest severity
/// reported anywhere below it.
pub struct DiagnosticContext<'a> {
    base: Option<&'a DiagnosticContext<'a>>,
    severity: Severity,
    message: String,
    sink: &'a dyn DiagnosticSink,
    max_severity: Cell<Severity>,
}

impl<'a> DiagnosticContext<'a> {
    /// Create a root context writing to `sink`.
    pub fn new(sink: &'a dyn DiagnosticSink) -> Self {
        Self {
            base: None,
            severity: Severity::Note,
            message: String::new(),
            sink,
            max_severity: Cell::new(Severity::Note),
        }
    }

    /// Create a context nested in `base`, sharing its sink.
    ///
    /// `severity` and `message` are what this context announces on `base`
    /// each time something is reported through it.
    pub fn nested(
        base: &'a DiagnosticContext<'a>,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            base: Some(base),
            severity,
            message: message.into(),
            sink: base.sink,
            max_severity: Cell::new(Severity::Note),
        }
    }

    /// Report a diagnostic in this context.
    pub fn report(&self, diagnostic: Diagnostic) {
        self.raise(diagnostic.severity());
        trace!(severity:% = diagnostic.severity(), message = diagnostic.message(); "Diagnostic reported");
        self.sink.emit(&diagnostic);

        if let Some(base) = self.base {
            base.raise(self.max_severity());
            base.report(Diagnostic::new(self.severity, self.message.clone()));
        }
    }

    /// The highest severity reported in this context or any context nested in it.
    pub fn max_severity(&self) -> Severity {
        self.max_severity.get()
    }

    /// Returns `true` once the accumulated severity reaches [`Severity::Error`].
    pub fn has_errors(&self) -> bool {
        self.max_severity().is_error()
    }

    fn raise(&self, severity: Severity) {
        if severity > self.max_severity.get() {
            self.max_severity.set(severity);
        }
    }
}

impl fmt::Debug for DiagnosticContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticContext")
            .field("severity", &self.severity)
            .field("message", &self.message)
            .field("max_severity", &self.max_severity.get())
            .field("nested", &self.base.is_some())
            .finish()
    }
}
