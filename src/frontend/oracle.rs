//! Identifier classification for Go sources.
//!
//! Scoping follows the language: package-level type declarations shadow
//! predeclared identifiers, and qualified identifiers resolve through the
//! imports of the file declaring the contract.

use super::locate::type_specs;
use super::package::{read_package_name, GoModule, GoPackage};
use super::parser::{named_children, node_text, GoSource};
use crate::spec::{ModuleRef, OracleError, TypeClass, TypeName, TypeOracle};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Predeclared Go type identifiers.
pub const PREDECLARED_TYPES: &[&str] = &[
    "any",
    "bool",
    "byte",
    "comparable",
    "complex64",
    "complex128",
    "error",
    "float32",
    "float64",
    "int",
    "int8",
    "int16",
    "int32",
    "int64",
    "rune",
    "string",
    "uint",
    "uint8",
    "uint16",
    "uint32",
    "uint64",
    "uintptr",
];

/// One import of a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    /// Explicit import name (`p2 "x/y"`), `.` or `_` when present.
    pub name: Option<String>,
    pub path: String,
}

/// Imports declared by `file`, in source order.
pub fn file_imports(file: &GoSource) -> Vec<ImportSpec> {
    let root = file.tree.root_node();
    let mut specs = Vec::new();
    for decl in named_children(&root) {
        if decl.kind() != "import_declaration" {
            continue;
        }
        for child in named_children(&decl) {
            let nodes = match child.kind() {
                "import_spec" => vec![child],
                "import_spec_list" => named_children(&child)
                    .into_iter()
                    .filter(|n| n.kind() == "import_spec")
                    .collect(),
                _ => continue,
            };
            for spec in nodes {
                let Some(path) = spec.child_by_field_name("path") else {
                    continue;
                };
                specs.push(ImportSpec {
                    name: spec
                        .child_by_field_name("name")
                        .map(|n| node_text(&n, &file.source).to_string()),
                    path: node_text(&path, &file.source)
                        .trim_matches(|c| c == '"' || c == '`')
                        .to_string(),
                });
            }
        }
    }
    specs
}

/// Package name conventionally declared by the package at `import_path`:
/// the last path segment, skipping a `/vN` major version suffix and a
/// gopkg-style `.vN` suffix.
pub fn default_package_name(import_path: &str) -> String {
    let segments: Vec<&str> = import_path.split('/').filter(|s| !s.is_empty()).collect();
    let is_major_version = |s: &str| {
        s.len() > 1 && s.starts_with('v') && s[1..].chars().all(|c| c.is_ascii_digit())
    };

    let last = match segments.as_slice() {
        [.., prev, last] if is_major_version(*last) => *prev,
        [.., last] => *last,
        [] => import_path,
    };

    match last.rsplit_once(".v") {
        Some((base, version)) if !version.is_empty() && version.chars().all(|c| c.is_ascii_digit()) => {
            base.to_string()
        }
        _ => last.to_string(),
    }
}

/// Type oracle for the file declaring a contract.
#[derive(Debug, Clone)]
pub struct PackageOracle {
    home: ModuleRef,
    locals: HashSet<String>,
    imports: HashMap<String, ModuleRef>,
    has_dot_imports: bool,
}

impl PackageOracle {
    /// Build the oracle for `package.files[file_index]`.
    ///
    /// In-module imports get their short name from their package clause;
    /// anything else falls back to [`default_package_name`].
    pub fn for_file(package: &GoPackage, file_index: usize, module: &GoModule) -> Self {
        let locals = package
            .files
            .iter()
            .flat_map(|file| {
                type_specs(&file.tree.root_node())
                    .into_iter()
                    .filter_map(|spec| spec.child_by_field_name("name"))
                    .map(|n| node_text(&n, &file.source).to_string())
                    .collect::<Vec<_>>()
            })
            .collect();

        let mut imports = HashMap::new();
        let mut has_dot_imports = false;
        if let Some(file) = package.files.get(file_index) {
            for spec in file_imports(file) {
                let declared = declared_name(&spec.path, module);
                let qualifier = match spec.name.as_deref() {
                    Some(".") => {
                        has_dot_imports = true;
                        continue;
                    }
                    Some("_") => continue,
                    Some(explicit) => explicit.to_string(),
                    None => declared.clone(),
                };
                debug!(qualifier = %qualifier, path = %spec.path, name = %declared, "file import");
                imports.insert(
                    qualifier,
                    ModuleRef {
                        path: spec.path,
                        name: declared,
                    },
                );
            }
        }

        Self {
            home: ModuleRef {
                path: package.import_path.clone(),
                name: package.name.clone(),
            },
            locals,
            imports,
            has_dot_imports,
        }
    }
}

fn declared_name(import_path: &str, module: &GoModule) -> String {
    if let Some(dir) = module.dir_for(import_path) {
        match read_package_name(&dir) {
            Ok(Some(name)) => return name,
            Ok(None) => debug!(path = import_path, "in-module import has no package files"),
            Err(e) => warn!(path = import_path, error = %e, "cannot read in-module import"),
        }
    }
    default_package_name(import_path)
}

impl TypeOracle for PackageOracle {
    fn classify(&self, name: &TypeName) -> Result<TypeClass, OracleError> {
        match &name.qualifier {
            None if self.locals.contains(&name.name) => Ok(TypeClass::Declared(self.home.clone())),
            None if PREDECLARED_TYPES.contains(&name.name.as_str()) => Ok(TypeClass::Primitive),
            None if self.has_dot_imports => Err(OracleError(format!(
                "`{}` is not declared in package {}; dot imports are not resolved",
                name.name, self.home.path
            ))),
            None => Err(OracleError(format!(
                "`{}` is not declared in package {}",
                name.name, self.home.path
            ))),
            Some(q) => self
                .imports
                .get(q)
                .cloned()
                .map(TypeClass::Declared)
                .ok_or_else(|| OracleError(format!("no import named `{q}`"))),
        }
    }
}
