//! Package discovery and loading.
//!
//! A package is a directory of non-test `.go` files. Its import path is the
//! owning module's path joined with the directory relative to the module
//! root.

use super::parser::{package_name, parse_source, GoSource};
use crate::errors::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

const GO_MOD: &str = "go.mod";

/// A Go module: root directory and declared module path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoModule {
    pub root: PathBuf,
    pub path: String,
}

impl GoModule {
    /// Import path of the package living in `dir`, or `None` when `dir` is
    /// outside the module root.
    pub fn import_path_for(&self, dir: &Path) -> Option<String> {
        let rel = dir.strip_prefix(&self.root).ok()?;
        let segments: Vec<_> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        if segments.is_empty() {
            Some(self.path.clone())
        } else {
            Some(format!("{}/{}", self.path, segments.join("/")))
        }
    }

    /// Directory of the in-module package with `import_path`, if any.
    pub fn dir_for(&self, import_path: &str) -> Option<PathBuf> {
        if import_path == self.path {
            return Some(self.root.clone());
        }
        let rel = import_path.strip_prefix(&self.path)?.strip_prefix('/')?;
        Some(rel.split('/').fold(self.root.clone(), |dir, seg| dir.join(seg)))
    }
}

#[derive(Debug)]
pub struct GoPackage {
    pub dir: PathBuf,
    pub import_path: String,
    pub name: String,
    pub files: Vec<GoSource>,
}

/// Extract the module path from `go.mod` contents.
pub fn parse_module_path(contents: &str) -> Option<String> {
    contents.lines().find_map(|line| {
        let line = line.split("//").next().unwrap_or("").trim();
        let rest = line.strip_prefix("module")?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let path = rest.trim().trim_matches('"');
        (!path.is_empty()).then(|| path.to_string())
    })
}

/// Find the module owning `start` by searching it and its ancestors for a
/// `go.mod` file.
pub fn find_module(start: &Path) -> Result<Option<GoModule>> {
    for dir in start.ancestors() {
        let candidate = dir.join(GO_MOD);
        if !candidate.is_file() {
            continue;
        }
        let contents = fs::read_to_string(&candidate).map_err(|e| Error::io(&candidate, e))?;
        return match parse_module_path(&contents) {
            Some(path) => {
                debug!(module = %path, root = %dir.display(), "found go.mod");
                Ok(Some(GoModule {
                    root: dir.to_path_buf(),
                    path,
                }))
            }
            None => Err(Error::parse(&candidate, 1, 1, "missing module directive")),
        };
    }
    Ok(None)
}

/// Resolve the module for a load rooted at `root`, falling back to a
/// configured module path anchored at `root`.
pub fn resolve_module(root: &Path, configured: Option<&str>) -> Result<GoModule> {
    if let Some(module) = find_module(root)? {
        return Ok(module);
    }
    match configured {
        Some(path) => Ok(GoModule {
            root: root.to_path_buf(),
            path: path.to_string(),
        }),
        None => Err(Error::ModuleResolution {
            dir: root.to_path_buf(),
        }),
    }
}

fn is_excluded(entry: &DirEntry, exclude_dirs: &[String]) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || name.starts_with('_') || exclude_dirs.iter().any(|d| *d == name)
}

fn is_package_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.ends_with(".go") && !name.ends_with("_test.go")
}

/// Directories under `root` holding at least one package file, sorted.
pub fn discover_package_dirs(root: &Path, exclude_dirs: &[String]) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_excluded(e, exclude_dirs));

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
            Error::io(path, source)
        })?;
        if entry.file_type().is_dir() && has_package_files(entry.path())? {
            dirs.push(entry.path().to_path_buf());
        }
    }

    debug!(count = dirs.len(), root = %root.display(), "discovered package directories");
    Ok(dirs)
}

fn package_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let path = entry.map_err(|e| Error::io(dir, e))?.path();
        if path.is_file() && is_package_file(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn has_package_files(dir: &Path) -> Result<bool> {
    Ok(!package_files(dir)?.is_empty())
}

/// Parse every package file in `dir`.
///
/// Files declaring a different package than the first one are skipped.
pub fn load_package(dir: &Path, module: &GoModule) -> Result<GoPackage> {
    let import_path = module.import_path_for(dir).ok_or_else(|| Error::ModuleResolution {
        dir: dir.to_path_buf(),
    })?;

    let mut name: Option<String> = None;
    let mut files = Vec::new();
    for path in package_files(dir)? {
        let content = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        let file = parse_source(&content, &path)?;
        let Some(declared) = package_name(&file) else {
            return Err(Error::parse(&path, 1, 1, "missing package clause"));
        };
        let expected = name.get_or_insert_with(|| declared.clone());
        if *expected != declared {
            warn!(file = %path.display(), expected = %expected, found = %declared, "skipping file from another package");
            continue;
        }
        files.push(file);
    }

    let name = name.ok_or_else(|| Error::parse(dir, 0, 0, "no Go files in package directory"))?;
    debug!(package = %import_path, files = files.len(), "loaded package");

    Ok(GoPackage {
        dir: dir.to_path_buf(),
        import_path,
        name,
        files,
    })
}

/// Declared package name of an in-module package, read from the package
/// clause of its first file.
pub fn read_package_name(dir: &Path) -> Result<Option<String>> {
    let Some(path) = package_files(dir)?.into_iter().next() else {
        return Ok(None);
    };
    let content = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
    let file = parse_source(&content, &path)?;
    Ok(package_name(&file))
}
