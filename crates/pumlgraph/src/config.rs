//! Configuration types for pumlgraph output.
//!
//! All types implement [`serde::Deserialize`] with every field defaulted, so
//! an empty document is a valid configuration.
//!
//! # Example
//!
//! ```
//! # use pumlgraph::config::AppConfig;
//! let config: AppConfig = toml::from_str("[output]\nindent = 2\n").unwrap();
//! assert_eq!(config.output().indent(), 2);
//! assert!(config.output().sort_keys());
//! ```

use serde::Deserialize;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// JSON output section.
    #[serde(default)]
    output: OutputConfig,
}

impl AppConfig {
    pub fn new(output: OutputConfig) -> Self {
        Self { output }
    }

    /// Returns the output configuration.
    pub fn output(&self) -> &OutputConfig {
        &self.output
    }
}

/// Layout of the JSON document.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Indentation width; `0` writes a single line.
    #[serde(default = "default_indent")]
    indent: usize,

    /// Emit record keys in lexicographic order instead of field order.
    #[serde(default = "default_sort_keys")]
    sort_keys: bool,
}

fn default_indent() -> usize {
    1
}

fn default_sort_keys() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            indent: default_indent(),
            sort_keys: default_sort_keys(),
        }
    }
}

impl OutputConfig {
    pub fn new(indent: usize, sort_keys: bool) -> Self {
        Self { indent, sort_keys }
    }

    pub fn indent(&self) -> usize {
        self.indent
    }

    pub fn sort_keys(&self) -> bool {
        self.sort_keys
    }
}
