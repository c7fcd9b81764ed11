//! `.fnspec.toml` configuration.
//!
//! The file is looked up from the input directory upwards. Every field is
//! optional; command-line flags take precedence over it.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const CONFIG_FILE_NAME: &str = ".fnspec.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Serialization format of the handoff document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FnspecConfig {
    /// Target output name for generated declarations
    #[serde(default)]
    pub target_name: Option<String>,

    /// Module path used when no go.mod is found
    #[serde(default)]
    pub module_path: Option<String>,

    /// Directory names skipped during package discovery
    #[serde(default)]
    pub exclude_dirs: Option<Vec<String>>,

    #[serde(default)]
    pub format: Option<OutputFormat>,
}

impl FnspecConfig {
    pub fn exclude_dirs(&self) -> Vec<String> {
        self.exclude_dirs
            .clone()
            .unwrap_or_else(default_exclude_dirs)
    }
}

pub fn default_exclude_dirs() -> Vec<String> {
    vec!["vendor".to_string(), "testdata".to_string()]
}

/// Parse config from a TOML string
pub fn parse_config(contents: &str) -> Result<FnspecConfig> {
    let config: FnspecConfig = toml::from_str(contents)?;
    if let Some(path) = &config.module_path {
        if path.trim().is_empty() || path.contains(char::is_whitespace) {
            return Err(Error::Configuration(format!(
                "module_path must be a non-empty import path, got {path:?}"
            )));
        }
    }
    Ok(config)
}

/// Ancestors of `start`, nearest first, up to `max_depth` directories.
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Load a config file from an explicit path.
pub fn load_config_file(path: &Path) -> Result<FnspecConfig> {
    let contents = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let config = parse_config(&contents)?;
    debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Find and load the nearest `.fnspec.toml` above `start`.
///
/// A missing file yields the default configuration; an unreadable or
/// invalid one is an error.
pub fn load_config(start: &Path) -> Result<FnspecConfig> {
    let start = match start.canonicalize() {
        Ok(dir) => dir,
        Err(e) => {
            warn!(path = %start.display(), error = %e, "cannot canonicalize input path");
            start.to_path_buf()
        }
    };

    match directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|path| path.is_file())
    {
        Some(path) => load_config_file(&path),
        None => {
            debug!(
                "no {} found after checking {} directories; using defaults",
                CONFIG_FILE_NAME, MAX_TRAVERSAL_DEPTH
            );
            Ok(FnspecConfig::default())
        }
    }
}
