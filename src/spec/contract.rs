//! Declarations handed over by a front end.
//!
//! A front end locates a contract, lowers its method list into these plain
//! types and supplies a [`TypeOracle`] able to classify every identifier the
//! contract mentions. Nothing here is resolved yet.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

/// A located contract declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractDecl {
    pub name: String,
    /// Import path of the module declaring the contract.
    pub module_path: String,
    /// Declared short name of that module.
    pub module_name: String,
    pub file: PathBuf,
    /// 1-based line of the declaration.
    pub line: usize,
    pub methods: Vec<MethodDecl>,
}

/// One entry of a contract's method list.
///
/// `name` is `None` for embedded contract references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    pub name: Option<String>,
    pub params: Vec<FieldDecl>,
    pub results: Vec<FieldDecl>,
}

impl MethodDecl {
    pub fn named(name: impl Into<String>, params: Vec<FieldDecl>, results: Vec<FieldDecl>) -> Self {
        Self {
            name: Some(name.into()),
            params,
            results,
        }
    }

    pub fn embedded() -> Self {
        Self {
            name: None,
            params: Vec::new(),
            results: Vec::new(),
        }
    }
}

/// A single parameter or result. Grouped declarations such as `a, b int`
/// arrive as one `FieldDecl` per name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: Option<String>,
    pub ty: RawType,
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, ty: RawType) -> Self {
        Self {
            name: Some(name.into()),
            ty,
        }
    }

    pub fn unnamed(ty: RawType) -> Self {
        Self { name: None, ty }
    }
}

/// Raw type-expression tree, as written in source.
///
/// Covers every shape a front end may encounter; the resolver decides which
/// of them it accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawType {
    Ident(String),
    Qualified { qualifier: String, name: String },
    Pointer(Box<RawType>),
    Slice(Box<RawType>),
    Array { len: String, elem: Box<RawType> },
    Map { key: Box<RawType>, value: Box<RawType> },
    Chan(Box<RawType>),
    Func(String),
    Struct(String),
    Interface(String),
    Generic { base: Box<RawType>, args: String },
    Variadic(Box<RawType>),
    /// Any other shape, kept verbatim for diagnostics.
    Other(String),
}

impl RawType {
    pub fn ident(name: impl Into<String>) -> Self {
        Self::Ident(name.into())
    }

    pub fn qualified(qualifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Qualified {
            qualifier: qualifier.into(),
            name: name.into(),
        }
    }

    pub fn pointer(inner: RawType) -> Self {
        Self::Pointer(Box::new(inner))
    }

    pub fn slice(inner: RawType) -> Self {
        Self::Slice(Box::new(inner))
    }

    pub fn map(key: RawType, value: RawType) -> Self {
        Self::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }
}

impl fmt::Display for RawType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident(name) => write!(f, "{name}"),
            Self::Qualified { qualifier, name } => write!(f, "{qualifier}.{name}"),
            Self::Pointer(inner) => write!(f, "*{inner}"),
            Self::Slice(inner) => write!(f, "[]{inner}"),
            Self::Array { len, elem } => write!(f, "[{len}]{elem}"),
            Self::Map { key, value } => write!(f, "map[{key}]{value}"),
            Self::Chan(inner) => write!(f, "chan {inner}"),
            Self::Generic { base, args } => write!(f, "{base}[{args}]"),
            Self::Variadic(inner) => write!(f, "...{inner}"),
            Self::Func(text) | Self::Struct(text) | Self::Interface(text) | Self::Other(text) => {
                write!(f, "{text}")
            }
        }
    }
}

/// An identifier as it appears at the core of a type expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeName {
    pub qualifier: Option<String>,
    pub name: String,
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Some(q) => write!(f, "{q}.{}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Identity of the module owning a declared type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleRef {
    pub path: String,
    pub name: String,
}

/// The oracle's answer for one identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeClass {
    Primitive,
    Declared(ModuleRef),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct OracleError(pub String);

/// Answers, for any identifier in the contract's scope, whether it is
/// predeclared or declared by some module.
pub trait TypeOracle {
    fn classify(&self, name: &TypeName) -> Result<TypeClass, OracleError>;
}

/// Oracle backed by an explicit table, for front ends that already know
/// every identifier's classification up front.
#[derive(Debug, Clone, Default)]
pub struct StaticOracle {
    entries: HashMap<TypeName, TypeClass>,
}

impl StaticOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn primitive(mut self, name: &str) -> Self {
        self.entries.insert(
            TypeName {
                qualifier: None,
                name: name.to_string(),
            },
            TypeClass::Primitive,
        );
        self
    }

    /// Register `qualifier.name` (or bare `name`) as declared by `module`.
    pub fn declared(mut self, qualifier: Option<&str>, name: &str, module: ModuleRef) -> Self {
        self.entries.insert(
            TypeName {
                qualifier: qualifier.map(str::to_string),
                name: name.to_string(),
            },
            TypeClass::Declared(module),
        );
        self
    }
}

impl TypeOracle for StaticOracle {
    fn classify(&self, name: &TypeName) -> Result<TypeClass, OracleError> {
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| OracleError(format!("undeclared identifier `{name}`")))
    }
}
