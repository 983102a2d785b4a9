//! Command-line argument definitions for the pumlgraph CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`].

use clap::Parser;

/// Command-line arguments for the pumlgraph compiler
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input diagram file
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output JSON file; standard output when omitted
    #[arg(short, long)]
    pub output: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["pumlgraph", "in.puml"]);
        assert_eq!(args.input, "in.puml");
        assert_eq!(args.output, None);
        assert_eq!(args.config, None);
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_all_flags() {
        let args = Args::parse_from([
            "pumlgraph",
            "in.puml",
            "-o",
            "out.json",
            "--config",
            "cfg.toml",
            "--log-level",
            "debug",
        ]);
        assert_eq!(args.output.as_deref(), Some("out.json"));
        assert_eq!(args.config.as_deref(), Some("cfg.toml"));
        assert_eq!(args.log_level, "debug");
    }
}
