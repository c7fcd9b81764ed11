//! Signature assembly: drives the resolver over a contract's methods in
//! declaration order and builds the final specification.

use super::contract::{ContractDecl, FieldDecl, MethodDecl, TypeOracle};
use super::descriptor::{resolve_raw, ResolveError};
use super::imports::ImportAliasTracker;
use super::model::{ContractSpecification, Extraction, MethodSignature, OriginLocation, ParamDescriptor};
use crate::errors::{Error, FieldRole, FieldSite, Result};
use tracing::{debug, info_span};

/// Extract the specification of `contract`.
///
/// Methods, then params, then results are visited strictly left to right so
/// alias numbering is stable across runs. The first failing field aborts the
/// whole extraction.
pub fn assemble<O>(contract: &ContractDecl, target_name: &str, oracle: &O) -> Result<Extraction>
where
    O: TypeOracle + ?Sized,
{
    let span = info_span!("assemble", contract = %contract.name, module = %contract.module_path);
    let _enter = span.enter();

    let mut tracker = ImportAliasTracker::new(contract.module_path.clone());
    let mut functions = Vec::with_capacity(contract.methods.len());

    for method in &contract.methods {
        let Some(name) = method.name.as_deref() else {
            debug!("skipping embedded contract reference");
            continue;
        };
        functions.push(assemble_method(name, method, oracle, &mut tracker)?);
    }

    let specification = ContractSpecification {
        name: contract.name.clone(),
        target_name: target_name.to_string(),
        origin: OriginLocation {
            module_path: contract.module_path.clone(),
            file: contract.file.clone(),
            line: contract.line,
        },
        functions,
    };

    debug!(
        functions = specification.functions.len(),
        imports = tracker.entries().len(),
        "contract assembled"
    );

    Ok(Extraction {
        specification,
        imports: tracker.into_entries(),
    })
}

fn assemble_method<O>(
    name: &str,
    method: &MethodDecl,
    oracle: &O,
    tracker: &mut ImportAliasTracker,
) -> Result<MethodSignature>
where
    O: TypeOracle + ?Sized,
{
    let params = resolve_fields(name, FieldRole::Param, &method.params, oracle, tracker)?;
    let returns = resolve_fields(name, FieldRole::Result, &method.results, oracle, tracker)?;

    Ok(MethodSignature {
        name: name.to_string(),
        params,
        returns,
    })
}

fn resolve_fields<O>(
    method: &str,
    role: FieldRole,
    fields: &[FieldDecl],
    oracle: &O,
    tracker: &mut ImportAliasTracker,
) -> Result<Vec<ParamDescriptor>>
where
    O: TypeOracle + ?Sized,
{
    fields
        .iter()
        .enumerate()
        .map(|(position, field)| {
            resolve_raw(&field.ty, oracle, tracker).map_err(|e| {
                let site = FieldSite {
                    method: method.to_string(),
                    role,
                    position,
                    name: field.name.clone(),
                };
                lift(site, e)
            })
        })
        .collect()
}

fn lift(site: FieldSite, err: ResolveError) -> Error {
    match err {
        ResolveError::Unsupported(detail) => Error::UnsupportedTypeExpression { site, detail },
        ResolveError::Oracle { identifier, reason } => Error::TypeOracleFailure {
            site,
            identifier,
            reason,
        },
    }
}
