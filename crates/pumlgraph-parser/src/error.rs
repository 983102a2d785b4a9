//! Error and diagnostic system for the pumlgraph front end.
//!
//! Every phase reports problems through a [`DiagnosticContext`] instead of
//! returning early. A context tracks the highest [`Severity`] it has seen and
//! forwards each [`Diagnostic`] to a [`DiagnosticSink`]. Contexts can be
//! stacked; a nested context re-announces its own registration message on
//! its base for every diagnostic it receives.
//!
//! # Example
//!
//! ```
//! # use pumlgraph_parser::error::{Diagnostic, DiagnosticContext, MemorySink, Severity};
//! let sink = MemorySink::new();
//! let root = DiagnosticContext::new(&sink);
//! let nested = DiagnosticContext::nested(&root, Severity::Note, "while compiling a.puml");
//!
//! nested.report(Diagnostic::error("something broke"));
//!
//! assert_eq!(root.max_severity(), Severity::Error);
//! assert_eq!(sink.lines(), ["Error: something broke", "Note: while compiling a.puml"]);
//! ```

mod compile_error;
mod context;
mod diagnostic;
mod error_code;
mod severity;
mod sink;

pub use compile_error::{CompileError, Stage};
pub use context::DiagnosticContext;
pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use severity::Severity;
pub use sink::{DiagnosticSink, MemorySink, WriterSink};
