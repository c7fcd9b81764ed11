//! The specification handed to an emitter.

use super::imports::ImportAliasEntry;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Resolved, printable form of one parameter or result type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamDescriptor {
    #[serde(rename = "type")]
    pub ty: String,
    /// Empty for primitives and types of the home module.
    #[serde(default)]
    pub import_alias: String,
}

impl ParamDescriptor {
    pub fn new(ty: impl Into<String>, import_alias: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            import_alias: import_alias.into(),
        }
    }

    pub fn local(ty: impl Into<String>) -> Self {
        Self::new(ty, "")
    }

    /// Type string with the alias spliced in front of the named leaf,
    /// after any pointer/slice prefix: `*T` with alias `m` gives `*m.T`.
    pub fn qualified(&self) -> String {
        if self.import_alias.is_empty() {
            return self.ty.clone();
        }
        let leaf = self.ty.trim_start_matches(['*', '[', ']']);
        let prefix = &self.ty[..self.ty.len() - leaf.len()];
        format!("{prefix}{}.{leaf}", self.import_alias)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSignature {
    pub name: String,
    pub params: Vec<ParamDescriptor>,
    pub returns: Vec<ParamDescriptor>,
}

/// Where a contract was declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginLocation {
    pub module_path: String,
    pub file: PathBuf,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractSpecification {
    pub name: String,
    pub target_name: String,
    pub origin: OriginLocation,
    pub functions: Vec<MethodSignature>,
}

/// Result of one extraction run: the specification plus the imports it
/// needs, in the order they must be declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    pub specification: ContractSpecification,
    pub imports: Vec<ImportAliasEntry>,
}
