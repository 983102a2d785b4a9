//! Error adapter for converting PumlGraphError to miette diagnostics.
//!
//! Problems in the diagram source are already written to standard error as
//! diagnostic lines while compiling; the adapter only renders the final
//! error that stopped the run.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use pumlgraph::PumlGraphError;

/// Adapter for [`PumlGraphError`].
pub struct ErrorAdapter(pub PumlGraphError);

impl fmt::Debug for ErrorAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            PumlGraphError::Io(_) => "pumlgraph::io",
            PumlGraphError::Compile(_) => "pumlgraph::compile",
            PumlGraphError::Serialize(_) => "pumlgraph::serialize",
            PumlGraphError::Config(_) => "pumlgraph::config",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            PumlGraphError::Compile(_) => Some(Box::new("see the diagnostics reported above")),
            PumlGraphError::Config(_) => Some(Box::new(
                "check the file passed with --config or pumlgraph/config.toml",
            )),
            _ => None,
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pumlgraph::{CompileError, Severity, Stage};

    #[test]
    fn test_codes() {
        let adapter = ErrorAdapter(PumlGraphError::Config("bad".to_string()));
        assert_eq!(adapter.code().unwrap().to_string(), "pumlgraph::config");
        assert_eq!(adapter.to_string(), "Configuration error: bad");

        let adapter = ErrorAdapter(PumlGraphError::Compile(CompileError::new(
            Stage::Analysis,
            Severity::Error,
        )));
        assert_eq!(adapter.code().unwrap().to_string(), "pumlgraph::compile");
        assert_eq!(
            adapter.to_string(),
            "compilation failed during semantic analysis (Error reported)"
        );
        assert!(adapter.help().is_some());
    }

    #[test]
    fn test_io_has_no_help() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let adapter = ErrorAdapter(PumlGraphError::Io(err));
        assert_eq!(adapter.code().unwrap().to_string(), "pumlgraph::io");
        assert!(adapter.help().is_none());
    }

    #[test]
    fn test_renders_with_miette() {
        let adapter = ErrorAdapter(PumlGraphError::Config("bad".to_string()));
        let mut out = String::new();
        miette::GraphicalReportHandler::new()
            .render_report(&mut out, &adapter)
            .unwrap();
        assert!(out.contains("Configuration error: bad"));
    }
}
