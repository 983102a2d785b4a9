//! Pumlgraph CLI library
//!
//! This module contains the core CLI logic for the pumlgraph compiler.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;
pub use error_adapter::ErrorAdapter;

use std::{
    fs,
    io::{self, Write},
    path::Path,
};

use log::info;

use pumlgraph::{Compiler, PumlGraphError, WriterSink};

/// Run the pumlgraph CLI application
///
/// Compiles the input file with diagnostics written to standard error, then
/// writes the JSON graph to the output file, or to standard output when no
/// output path is given. Nothing is written if compilation fails.
///
/// # Errors
///
/// Returns `PumlGraphError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Compilation errors reported in the input
pub fn run(args: &Args) -> Result<(), PumlGraphError> {
    info!(
        input_path = args.input,
        output_path:? = args.output;
        "Processing diagram"
    );

    let app_config = config::load_config(args.config.as_deref().map(Path::new))?;
    let compiler = Compiler::new(app_config);

    let sink = WriterSink::new(io::stderr());
    let graph = compiler.compile_file(&args.input, &sink)?;
    let json = compiler.to_json(&graph)?;

    match &args.output {
        Some(path) => {
            fs::write(path, json + "\n")?;
            info!(output_file = path; "JSON exported successfully");
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{json}")?;
            stdout.flush()?;
        }
    }

    Ok(())
}
