//! Go front end.
//!
//! Loads the packages under a directory with tree-sitter, finds the named
//! interface and hands it over as a [`ContractDecl`] together with a
//! [`PackageOracle`] for its declaring file.

pub mod locate;
pub mod oracle;
pub mod package;
pub mod parser;

pub use locate::{find_contract, lower_contract, ContractSite};
pub use oracle::{default_package_name, PackageOracle, PREDECLARED_TYPES};
pub use package::{find_module, load_package, GoModule, GoPackage};

use crate::errors::{Error, Result};
use crate::observability::ExtractionPhase;
use crate::spec::ContractDecl;
use std::path::{Path, PathBuf};
use tracing::{debug, info_span, warn};

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Module path to assume when no `go.mod` is found.
    pub module_path: Option<String>,
    /// Directory names never descended into.
    pub exclude_dirs: Vec<String>,
}

/// A contract declaration plus the oracle able to classify its identifiers.
#[derive(Debug, Clone)]
pub struct LocatedContract {
    pub decl: ContractDecl,
    pub oracle: PackageOracle,
}

fn module_for(dir: &Path, root: &Path, options: &LoadOptions) -> Result<GoModule> {
    if let Some(module) = find_module(dir)? {
        return Ok(module);
    }
    package::resolve_module(root, options.module_path.as_deref())
}

/// Find the interface `name` in the packages under `root`.
///
/// Packages are searched in sorted directory order and the first match
/// wins. Packages failing to load are skipped; if the contract is not found
/// the first such failure is returned instead of `UnresolvedContract`.
pub fn locate_contract(root: &Path, name: &str, options: &LoadOptions) -> Result<LocatedContract> {
    let mut first_failure: Option<Error> = None;

    let dirs = {
        let _phase = info_span!("phase", phase = %ExtractionPhase::Discovery).entered();
        package::discover_package_dirs(root, &options.exclude_dirs)?
    };

    for dir in dirs {
        let loaded = {
            let _phase = info_span!("phase", phase = %ExtractionPhase::Parsing).entered();
            module_for(&dir, root, options)
                .and_then(|module| load_package(&dir, &module).map(|pkg| (module, pkg)))
        };
        let (module, pkg) = match loaded {
            Ok(loaded) => loaded,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "skipping package");
                first_failure.get_or_insert(e);
                continue;
            }
        };

        let Some(site) = find_contract(&pkg, name) else {
            continue;
        };
        debug!(package = %pkg.import_path, dir = %pkg.dir.display(), line = site.line, "contract located");

        let decl = lower_contract(&pkg, name, site).ok_or_else(|| unresolved(name, root))?;
        let oracle = PackageOracle::for_file(&pkg, site.file_index, &module);
        return Ok(LocatedContract { decl, oracle });
    }

    Err(first_failure.unwrap_or_else(|| unresolved(name, root)))
}

fn unresolved(name: &str, root: &Path) -> Error {
    Error::UnresolvedContract {
        name: name.to_string(),
        searched: PathBuf::from(root),
    }
}
