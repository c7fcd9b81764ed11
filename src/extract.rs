//! End-to-end extraction: locate a contract under a directory and build its
//! specification.

use crate::config::{default_exclude_dirs, FnspecConfig};
use crate::errors::Result;
use crate::frontend::{locate_contract, LoadOptions};
use crate::observability::ExtractionPhase;
use crate::spec::{assemble, Extraction};
use std::path::{Path, PathBuf};
use tracing::{info, info_span, warn};

#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Directory searched recursively for the contract.
    pub path: PathBuf,
    pub contract: String,
    /// Defaults to the declaring package's name.
    pub target_name: Option<String>,
    pub module_path: Option<String>,
    pub exclude_dirs: Vec<String>,
}

impl ExtractOptions {
    pub fn new(path: impl Into<PathBuf>, contract: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contract: contract.into(),
            target_name: None,
            module_path: None,
            exclude_dirs: default_exclude_dirs(),
        }
    }

    /// Fill every option still unset from `config`.
    pub fn with_config(mut self, config: &FnspecConfig) -> Self {
        if self.target_name.is_none() {
            self.target_name = config.target_name.clone();
        }
        if self.module_path.is_none() {
            self.module_path = config.module_path.clone();
        }
        if config.exclude_dirs.is_some() {
            self.exclude_dirs = config.exclude_dirs();
        }
        self
    }
}

/// Absolute form of the input directory, so `go.mod` lookup can climb past
/// a relative path such as `.`.
fn input_root(path: &Path) -> PathBuf {
    match path.canonicalize() {
        Ok(dir) => dir,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot canonicalize input path");
            path.to_path_buf()
        }
    }
}

/// Run one extraction.
pub fn extract(options: &ExtractOptions) -> Result<Extraction> {
    let root = input_root(&options.path);
    let span = info_span!("extract", contract = %options.contract, path = %root.display());
    let _enter = span.enter();

    let load = LoadOptions {
        module_path: options.module_path.clone(),
        exclude_dirs: options.exclude_dirs.clone(),
    };

    let located = {
        let _phase = info_span!("phase", phase = %ExtractionPhase::Locating).entered();
        locate_contract(&root, &options.contract, &load)?
    };

    let target_name = options
        .target_name
        .clone()
        .unwrap_or_else(|| located.decl.module_name.clone());

    let extraction = {
        let _phase = info_span!("phase", phase = %ExtractionPhase::Resolving).entered();
        assemble(&located.decl, &target_name, &located.oracle)?
    };

    info!(
        functions = extraction.specification.functions.len(),
        imports = extraction.imports.len(),
        "extraction complete"
    );
    Ok(extraction)
}
