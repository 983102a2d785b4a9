//! Destinations for reported diagnostics.

use std::{cell::RefCell, io::Write};

use log::warn;

use crate::error::Diagnostic;

/// Receives every diagnostic reported through a context hierarchy.
///
/// Sinks are shared by reference between nested contexts, so `emit` takes
/// `&self`; implementations use interior mutability.
pub trait DiagnosticSink {
    fn emit(&self, diagnostic: &Diagnostic);
}

/// Collects diagnostics in memory, in reporting order.
#[derive(Debug, Default)]
pub struct MemorySink {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every collected diagnostic.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    /// Returns the collected diagnostics formatted as output lines.
    pub fn lines(&self) -> Vec<String> {
        self.diagnostics
            .borrow()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.borrow().is_empty()
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&self, diagnostic: &Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic.clone());
    }
}

/// Writes one line per diagnostic to an [`io::Write`](std::io::Write).
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: RefCell<W>,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: RefCell::new(writer),
        }
    }

    /// Consume the sink and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write> DiagnosticSink for WriterSink<W> {
    fn emit(&self, diagnostic: &Diagnostic) {
        let mut writer = self.writer.borrow_mut();
        if let Err(err) = writeln!(writer, "{diagnostic}") {
            warn!(err:%; "Failed to write diagnostic");
        }
    }
}
