//! Extraction of function-type specifications from Go interfaces.
//!
//! The core lives in [`spec`]: a contract declaration is walked method by
//! method, every parameter and result type is resolved into a printable
//! descriptor, and foreign modules receive deterministic, collision-free
//! import aliases. [`frontend`] supplies declarations from Go sources.

pub mod cli;
pub mod config;
pub mod errors;
pub mod extract;
pub mod frontend;
pub mod observability;
pub mod output;
pub mod spec;

pub use crate::errors::{Error, FieldRole, FieldSite, Result};
pub use crate::extract::{extract, ExtractOptions};
pub use crate::spec::{
    assemble, ContractDecl, ContractSpecification, Extraction, FieldDecl, ImportAliasEntry,
    ImportAliasTracker, MethodDecl, MethodSignature, ModuleRef, OriginLocation, ParamDescriptor,
    RawType, StaticOracle, TypeClass, TypeExpr, TypeName, TypeOracle,
};
