//! Type descriptor resolution.
//!
//! A raw type tree is first lowered into [`TypeExpr`], which only admits the
//! shapes a function-type declaration can be regenerated from, then resolved
//! variant by variant into a [`ParamDescriptor`].
//!
//! Accepted grammar:
//!
//! ```text
//! top      := map | wrapped
//! map      := "map[" wrapped "]" wrapped
//! wrapped  := named | "*" wrapped | "[]" wrapped
//! named    := ident | qualifier "." ident
//! ```

use super::contract::{RawType, TypeClass, TypeName, TypeOracle};
use super::imports::ImportAliasTracker;
use super::model::ParamDescriptor;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("{0}")]
    Unsupported(String),

    #[error("cannot classify `{identifier}`: {reason}")]
    Oracle { identifier: String, reason: String },
}

/// Resolver input: one variant per wrapping rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    Named(TypeName),
    Pointer(Box<TypeExpr>),
    Slice(Box<TypeExpr>),
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
}

/// Where a shape sits relative to its parent, for grammar checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Top,
    Wrapped,
    MapSide,
}

impl TypeExpr {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(TypeName {
            qualifier: None,
            name: name.into(),
        })
    }

    pub fn qualified(qualifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Named(TypeName {
            qualifier: Some(qualifier.into()),
            name: name.into(),
        })
    }

    /// Lower a raw source type into the resolver grammar.
    pub fn lower(raw: &RawType) -> Result<Self, ResolveError> {
        Self::lower_at(raw, Position::Top)
    }

    fn lower_at(raw: &RawType, position: Position) -> Result<Self, ResolveError> {
        let inner = if position == Position::Top {
            Position::Wrapped
        } else {
            position
        };

        match raw {
            RawType::Ident(name) => Ok(Self::named(name.clone())),
            RawType::Qualified { qualifier, name } => {
                Ok(Self::qualified(qualifier.clone(), name.clone()))
            }
            RawType::Pointer(elem) => Ok(Self::Pointer(Box::new(Self::lower_at(elem, inner)?))),
            RawType::Slice(elem) => Ok(Self::Slice(Box::new(Self::lower_at(elem, inner)?))),
            RawType::Map { key, value } => match position {
                Position::Top => Ok(Self::Map {
                    key: Box::new(Self::lower_at(key, Position::MapSide)?),
                    value: Box::new(Self::lower_at(value, Position::MapSide)?),
                }),
                Position::Wrapped => Err(unsupported(
                    "map type",
                    raw,
                    "cannot be wrapped by a pointer or slice",
                )),
                Position::MapSide => Err(unsupported("map type", raw, "cannot be nested in a map")),
            },
            RawType::Array { .. } => Err(unsupported("fixed-size array", raw, "is not supported")),
            RawType::Chan(_) => Err(unsupported("channel type", raw, "is not supported")),
            RawType::Func(_) => Err(unsupported("function type", raw, "is not supported")),
            RawType::Struct(_) => Err(unsupported("inline struct", raw, "is not supported")),
            RawType::Interface(_) => Err(unsupported("inline interface", raw, "is not supported")),
            RawType::Generic { .. } => Err(unsupported("generic type", raw, "is not supported")),
            RawType::Variadic(_) => Err(unsupported("variadic parameter", raw, "is not supported")),
            RawType::Other(_) => Err(unsupported("type expression", raw, "is not supported")),
        }
    }

    /// Resolve into a printable descriptor, registering any foreign module
    /// with `tracker`. Map keys resolve before map values.
    pub fn resolve<O>(
        &self,
        oracle: &O,
        tracker: &mut ImportAliasTracker,
    ) -> Result<ParamDescriptor, ResolveError>
    where
        O: TypeOracle + ?Sized,
    {
        match self {
            Self::Named(name) => resolve_named(name, oracle, tracker),
            Self::Pointer(inner) => {
                let sp = inner.resolve(oracle, tracker)?;
                Ok(ParamDescriptor::new(format!("*{}", sp.ty), sp.import_alias))
            }
            Self::Slice(inner) => {
                let sp = inner.resolve(oracle, tracker)?;
                Ok(ParamDescriptor::new(format!("[]{}", sp.ty), sp.import_alias))
            }
            Self::Map { key, value } => {
                let sp_key = key.resolve(oracle, tracker)?;
                let sp_value = value.resolve(oracle, tracker)?;
                Ok(ParamDescriptor::local(format!(
                    "map[{}]{}",
                    sp_key.qualified(),
                    sp_value.qualified()
                )))
            }
        }
    }
}

fn resolve_named<O>(
    name: &TypeName,
    oracle: &O,
    tracker: &mut ImportAliasTracker,
) -> Result<ParamDescriptor, ResolveError>
where
    O: TypeOracle + ?Sized,
{
    match oracle.classify(name) {
        Ok(TypeClass::Primitive) => Ok(ParamDescriptor::local(name.name.clone())),
        Ok(TypeClass::Declared(module)) => {
            let alias = tracker.resolve_alias(&module.name, &module.path);
            Ok(ParamDescriptor::new(name.name.clone(), alias))
        }
        Err(e) => Err(ResolveError::Oracle {
            identifier: name.to_string(),
            reason: e.0,
        }),
    }
}

fn unsupported(what: &str, raw: &RawType, why: &str) -> ResolveError {
    ResolveError::Unsupported(format!("{what} `{raw}` {why}"))
}

/// Lower and resolve in one step.
pub fn resolve_raw<O>(
    raw: &RawType,
    oracle: &O,
    tracker: &mut ImportAliasTracker,
) -> Result<ParamDescriptor, ResolveError>
where
    O: TypeOracle + ?Sized,
{
    TypeExpr::lower(raw)?.resolve(oracle, tracker)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::contract::{ModuleRef, StaticOracle};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    const HOME: &str = "example.com/c";

    fn module(path: &str, name: &str) -> ModuleRef {
        ModuleRef {
            path: path.into(),
            name: name.into(),
        }
    }

    fn oracle() -> StaticOracle {
        StaticOracle::new()
            .primitive("int")
            .primitive("string")
            .primitive("error")
            .primitive("V")
            .declared(None, "Req", module(HOME, "c"))
            .declared(Some("m1"), "K", module("example.com/m1", "m1"))
            .declared(Some("ctxmod"), "Context", module("example.com/ctxmod", "ctxmod"))
    }

    fn resolve(raw: &RawType) -> (Result<ParamDescriptor, ResolveError>, ImportAliasTracker) {
        let mut tracker = ImportAliasTracker::new(HOME);
        let result = resolve_raw(raw, &oracle(), &mut tracker);
        (result, tracker)
    }

    #[test]
    fn test_primitive_has_no_alias() {
        let (result, tracker) = resolve(&RawType::ident("int"));
        assert_eq!(result.unwrap(), ParamDescriptor::local("int"));
        assert!(tracker.entries().is_empty());
    }

    #[test]
    fn test_local_declared_type_has_no_alias() {
        let (result, tracker) = resolve(&RawType::ident("Req"));
        assert_eq!(result.unwrap(), ParamDescriptor::local("Req"));
        assert!(tracker.entries().is_empty());
    }

    #[test]
    fn test_foreign_type_carries_alias() {
        let (result, tracker) = resolve(&RawType::qualified("ctxmod", "Context"));
        assert_eq!(result.unwrap(), ParamDescriptor::new("Context", "ctxmod"));
        assert_eq!(tracker.entries().len(), 1);
        assert_eq!(tracker.entries()[0].module_path, "example.com/ctxmod");
    }

    #[test]
    fn test_pointer_and_slice_carry_inner_alias() {
        let raw = RawType::slice(RawType::pointer(RawType::qualified("m1", "K")));
        let (result, _) = resolve(&raw);
        assert_eq!(result.unwrap(), ParamDescriptor::new("[]*K", "m1"));
    }

    #[test]
    fn test_map_is_self_qualified() {
        let raw = RawType::map(RawType::qualified("m1", "K"), RawType::ident("V"));
        let (result, tracker) = resolve(&raw);
        assert_eq!(result.unwrap(), ParamDescriptor::local("map[m1.K]V"));
        assert_eq!(tracker.entries().len(), 1);
    }

    #[test]
    fn test_map_qualifies_inside_modifiers() {
        let raw = RawType::map(
            RawType::ident("string"),
            RawType::slice(RawType::pointer(RawType::qualified("m1", "K"))),
        );
        let (result, _) = resolve(&raw);
        assert_eq!(result.unwrap().ty, "map[string][]*m1.K");
    }

    #[test]
    fn test_map_in_pointer_is_rejected() {
        let raw = RawType::pointer(RawType::map(RawType::ident("int"), RawType::ident("int")));
        let err = TypeExpr::lower(&raw).unwrap_err();
        assert_eq!(
            err,
            ResolveError::Unsupported(
                "map type `map[int]int` cannot be wrapped by a pointer or slice".into()
            )
        );
    }

    #[test]
    fn test_nested_map_is_rejected() {
        let raw = RawType::map(
            RawType::ident("int"),
            RawType::map(RawType::ident("int"), RawType::ident("int")),
        );
        let err = TypeExpr::lower(&raw).unwrap_err();
        assert!(err.to_string().contains("cannot be nested in a map"));
    }

    #[test]
    fn test_function_type_is_rejected() {
        let (result, tracker) = resolve(&RawType::Func("func(int) error".into()));
        assert_eq!(
            result.unwrap_err(),
            ResolveError::Unsupported("function type `func(int) error` is not supported".into())
        );
        assert!(tracker.entries().is_empty());
    }

    #[test]
    fn test_channel_and_literals_are_rejected() {
        for raw in [
            RawType::Chan(Box::new(RawType::ident("int"))),
            RawType::Struct("struct{}".into()),
            RawType::Interface("interface{}".into()),
            RawType::Variadic(Box::new(RawType::ident("int"))),
        ] {
            assert!(matches!(
                TypeExpr::lower(&raw),
                Err(ResolveError::Unsupported(_))
            ));
        }
    }

    #[test]
    fn test_unknown_identifier_is_oracle_failure() {
        let (result, _) = resolve(&RawType::ident("Mystery"));
        assert!(matches!(
            result,
            Err(ResolveError::Oracle { ref identifier, .. }) if identifier == "Mystery"
        ));
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Modifier {
        Pointer,
        Slice,
    }

    fn leaf() -> impl Strategy<Value = (TypeExpr, &'static str)> {
        prop_oneof![
            Just((TypeExpr::named("int"), "")),
            Just((TypeExpr::named("string"), "")),
            Just((TypeExpr::named("Req"), "")),
            Just((TypeExpr::qualified("m1", "K"), "m1")),
            Just((TypeExpr::qualified("ctxmod", "Context"), "ctxmod")),
        ]
    }

    fn modifiers_of(expr: &TypeExpr) -> (Vec<Modifier>, String) {
        match expr {
            TypeExpr::Pointer(inner) => {
                let (mut mods, leaf) = modifiers_of(inner);
                mods.insert(0, Modifier::Pointer);
                (mods, leaf)
            }
            TypeExpr::Slice(inner) => {
                let (mut mods, leaf) = modifiers_of(inner);
                mods.insert(0, Modifier::Slice);
                (mods, leaf)
            }
            TypeExpr::Named(name) => (Vec::new(), name.name.clone()),
            TypeExpr::Map { .. } => unreachable!("maps are not generated"),
        }
    }

    fn reparse(printed: &str) -> (Vec<Modifier>, String) {
        let mut mods = Vec::new();
        let mut rest = printed;
        loop {
            if let Some(r) = rest.strip_prefix('*') {
                mods.push(Modifier::Pointer);
                rest = r;
            } else if let Some(r) = rest.strip_prefix("[]") {
                mods.push(Modifier::Slice);
                rest = r;
            } else {
                return (mods, rest.to_string());
            }
        }
    }

    proptest! {
        #[test]
        fn prop_modifiers_round_trip(
            (base, alias) in leaf(),
            mods in prop::collection::vec(prop::bool::ANY, 0..5)
        ) {
            let expr = mods.iter().fold(base, |acc, is_pointer| {
                if *is_pointer {
                    TypeExpr::Pointer(Box::new(acc))
                } else {
                    TypeExpr::Slice(Box::new(acc))
                }
            });

            let mut tracker = ImportAliasTracker::new(HOME);
            let sp = expr.resolve(&oracle(), &mut tracker).unwrap();

            prop_assert_eq!(reparse(&sp.ty), modifiers_of(&expr));
            prop_assert_eq!(sp.import_alias.as_str(), alias);
        }
    }
}
