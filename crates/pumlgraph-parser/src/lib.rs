//! # Pumlgraph Parser
//!
//! Compiler front end for a PlantUML-style deployment-diagram dialect. This
//! crate turns source text into the normalized object/link [`Graph`] of
//! `pumlgraph-core`.
//!
//! Problems are reported through a [`DiagnosticContext`] as they are found;
//! compilation is only abandoned at two checkpoints, after parsing and after
//! semantic analysis.
//!
//! ## Usage
//!
//! ```
//! # use pumlgraph_parser::{compile, Source, error::{CompileError, DiagnosticContext, MemorySink}};
//! fn main() -> Result<(), CompileError> {
//!     let source = Source::new(
//!         "@startuml\n\
//!          map \"Billing\" as billing {\n\
//!            Info => Issues invoices\n\
//!          }\n\
//!          rectangle bank {\n\
//!          }\n\
//!          billing -> bank : settle\n\
//!          @enduml",
//!         Some("billing.puml"),
//!     );
//!     let sink = MemorySink::new();
//!     let ctx = DiagnosticContext::new(&sink);
//!
//!     let graph = compile(&source, &ctx)?;
//!     assert_eq!(graph.objects().len(), 2);
//!     assert_eq!(graph.links()[0].info(), Some("settle"));
//!     Ok(())
//! }
//! ```

pub mod analyze;
pub mod error;
pub mod escape;
pub mod lexer;
pub mod parser;
mod source;
mod span;
pub mod tokens;
pub mod tree;
pub mod visit;

pub use source::{PositionDecoder, Source, SourceRef};
pub use span::Span;

use log::{debug, info};
use pumlgraph_core::semantic::Graph;

use error::{CompileError, DiagnosticContext, Stage};

/// Compile `source` into an object/link graph.
///
/// The pipeline is:
///
/// 1. **Tokenize** - split the text into tokens, reporting lexical errors
/// 2. **Parse** - build the document tree, reporting syntax errors and
///    invalid ids or names
/// 3. **Checkpoint** - stop if an error has been reported so far
/// 4. **Analyze** - register names, resolve links and classify nodes
/// 5. **Checkpoint** - stop if an error has been reported so far
/// 6. **Extract** - produce the [`Graph`]
///
/// Every diagnostic goes to `ctx`. The returned [`CompileError`] only says
/// where compilation stopped.
pub fn compile(source: &Source, ctx: &DiagnosticContext<'_>) -> Result<Graph, CompileError> {
    info!(file = source.name(); "Compiling");

    let tokens = lexer::tokenize(source, ctx);
    let tree = parser::parse(source, &tokens, ctx);
    let mut tree = match tree {
        Some(tree) if !ctx.has_errors() => tree,
        _ => return Err(checkpoint_failed(Stage::Parse, ctx)),
    };

    let symbols = analyze::analyze(&mut tree, ctx);
    if ctx.has_errors() {
        return Err(checkpoint_failed(Stage::Analysis, ctx));
    }

    let graph = analyze::extract(&tree);
    debug!(
        symbols = symbols.len(),
        objects = graph.objects().len(),
        links = graph.links().len();
        "Extracted graph"
    );
    info!(file = source.name(), severity:% = ctx.max_severity(); "Compiled");
    Ok(graph)
}

fn checkpoint_failed(stage: Stage, ctx: &DiagnosticContext<'_>) -> CompileError {
    let severity = ctx.max_severity();
    info!(stage:% = stage, severity:% = severity; "Compilation stopped");
    CompileError::new(stage, severity)
}
