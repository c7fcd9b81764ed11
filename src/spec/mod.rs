//! Type descriptor resolution and import aliasing.
//!
//! Front ends hand over a [`ContractDecl`] plus a [`TypeOracle`];
//! [`assemble`] turns them into an [`Extraction`] ready for emission.

pub mod assembler;
pub mod contract;
pub mod descriptor;
pub mod imports;
pub mod model;

pub use assembler::assemble;
pub use contract::{
    ContractDecl, FieldDecl, MethodDecl, ModuleRef, OracleError, RawType, StaticOracle, TypeClass,
    TypeName, TypeOracle,
};
pub use descriptor::{resolve_raw, ResolveError, TypeExpr};
pub use imports::{ImportAliasEntry, ImportAliasTracker};
pub use model::{ContractSpecification, Extraction, MethodSignature, OriginLocation, ParamDescriptor};
