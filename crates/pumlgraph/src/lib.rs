//! Pumlgraph - compile PlantUML-style deployment diagrams into an object/link
//! graph.
//!
//! The [`Compiler`] runs the `pumlgraph-parser` front end over a [`Source`]
//! and serializes the resulting [`semantic::Graph`] as JSON. Diagnostics are
//! written to a caller-supplied [`DiagnosticSink`] as they are found.

pub mod config;

mod error;
mod export;

pub use pumlgraph_core::semantic;
pub use pumlgraph_parser::{
    Source, SourceRef,
    error::{
        CompileError, Diagnostic, DiagnosticSink, MemorySink, Severity, Stage, WriterSink,
    },
};

pub use error::PumlGraphError;

use std::{fs, path::Path};

use log::{debug, info, trace};

use pumlgraph_parser::error::DiagnosticContext;

use config::AppConfig;

/// Compiles diagram sources and serializes the results.
///
/// # Examples
///
/// ```rust
/// use pumlgraph::{Compiler, MemorySink, Source, config::AppConfig};
///
/// let source = Source::new("@startuml\nmap db {\n}\n@enduml", Some("db.puml"));
/// let sink = MemorySink::new();
///
/// let compiler = Compiler::new(AppConfig::default());
/// let json = compiler
///     .compile_to_json(&source, &sink)
///     .expect("Failed to compile");
///
/// assert!(json.contains("\"program_system\""));
/// assert!(sink.is_empty());
/// ```
#[derive(Default)]
pub struct Compiler {
    config: AppConfig,
}

impl Compiler {
    /// Create a new compiler with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Compile `source` into a graph.
    ///
    /// # Errors
    ///
    /// Returns [`PumlGraphError::Compile`] when an error was reported on
    /// `sink` by the time parsing or semantic analysis finished.
    pub fn compile(
        &self,
        source: &Source,
        sink: &dyn DiagnosticSink,
    ) -> Result<semantic::Graph, PumlGraphError> {
        let ctx = DiagnosticContext::new(sink);
        let graph = pumlgraph_parser::compile(source, &ctx)?;
        trace!(graph:?; "Compiled graph");
        Ok(graph)
    }

    /// Serialize a graph as configured in the `[output]` section.
    pub fn to_json(&self, graph: &semantic::Graph) -> Result<String, PumlGraphError> {
        let json = export::json::to_string(graph, self.config.output())?;
        debug!(bytes = json.len(); "Serialized graph");
        Ok(json)
    }

    /// Compile `source` and serialize the graph.
    pub fn compile_to_json(
        &self,
        source: &Source,
        sink: &dyn DiagnosticSink,
    ) -> Result<String, PumlGraphError> {
        let graph = self.compile(source, sink)?;
        self.to_json(&graph)
    }

    /// Read a UTF-8 file and compile it, naming it by `path` in diagnostics.
    pub fn compile_file(
        &self,
        path: impl AsRef<Path>,
        sink: &dyn DiagnosticSink,
    ) -> Result<semantic::Graph, PumlGraphError> {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Reading source");
        let text = fs::read_to_string(path)?;
        let name = path.to_string_lossy();
        let source = Source::new(&text, Some(name.as_ref()));
        self.compile(&source, sink)
    }
}
