//! Error types for pumlgraph operations.
//!
//! [`PumlGraphError`] wraps everything that can stop a compilation run.
//! Problems in the diagram source itself are not errors here: they are
//! reported through a diagnostic sink, and only the failed checkpoint
//! surfaces as [`PumlGraphError::Compile`].

use std::io;

use thiserror::Error;

use pumlgraph_parser::error::CompileError;

/// The main error type for pumlgraph operations.
#[derive(Debug, Error)]
pub enum PumlGraphError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
