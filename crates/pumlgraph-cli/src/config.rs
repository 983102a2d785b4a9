//! Configuration discovery for the CLI.
//!
//! An explicit `--config` path always wins. Without one, the first existing
//! file among [`SearchPath`]s is used, and the built-in defaults otherwise.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use pumlgraph::{PumlGraphError, config::AppConfig};

const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration file: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse TOML configuration {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
}

impl From<ConfigError> for PumlGraphError {
    fn from(err: ConfigError) -> Self {
        PumlGraphError::Config(err.to_string())
    }
}

/// A place searched for a configuration file when none is given.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SearchPath {
    /// `pumlgraph/config.toml` below the working directory
    Project(PathBuf),
    /// The per-user configuration directory of the platform
    User(PathBuf),
}

impl SearchPath {
    fn path(&self) -> &Path {
        match self {
            SearchPath::Project(path) | SearchPath::User(path) => path,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            SearchPath::Project(_) => "project",
            SearchPath::User(_) => "user",
        }
    }
}

/// Candidate locations in priority order.
fn search_paths() -> Vec<SearchPath> {
    let mut paths = vec![SearchPath::Project(Path::new("pumlgraph").join(CONFIG_FILE))];
    match ProjectDirs::from("com", "pumlgraph", "pumlgraph") {
        Some(dirs) => paths.push(SearchPath::User(dirs.config_dir().join(CONFIG_FILE))),
        None => debug!("No platform configuration directory"),
    }
    paths
}

/// Resolve the configuration for a run.
///
/// # Errors
///
/// Fails when the explicit file is missing, or when the chosen file cannot
/// be read or parsed. A missing discovered file is never an error.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig, PumlGraphError> {
    if let Some(path) = explicit {
        info!(path:? = path; "Using configuration from --config");
        return Ok(read_config(path)?);
    }

    let found = search_paths().into_iter().find(|candidate| {
        let exists = candidate.path().is_file();
        debug!(path:? = candidate.path(), exists = exists; "Checked configuration location");
        exists
    });

    match found {
        Some(candidate) => {
            info!(path:? = candidate.path(), origin = candidate.label(); "Using configuration");
            Ok(read_config(candidate.path())?)
        }
        None => {
            debug!("No configuration file, using defaults");
            Ok(AppConfig::default())
        }
    }
}

fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ConfigError::MissingFile(path.to_path_buf()),
        _ => ConfigError::Read {
            path: path.to_path_buf(),
            source,
        },
    })?;

    toml::from_str(&text).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.message().to_string(),
    })
}
