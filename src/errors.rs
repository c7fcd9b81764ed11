//! Shared error types for contract extraction.
//!
//! Every failure is fatal to the run it occurs in: extraction is a pure
//! function of its inputs, so nothing here is retryable.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which side of a method signature a field sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    Param,
    Result,
}

impl fmt::Display for FieldRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Param => write!(f, "param"),
            Self::Result => write!(f, "result"),
        }
    }
}

/// Location of a failing field inside a contract, enough for one diagnostic line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSite {
    pub method: String,
    pub role: FieldRole,
    /// 0-based position within the param or result list.
    pub position: usize,
    pub name: Option<String>,
}

impl fmt::Display for FieldSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} #{}", self.method, self.role, self.position)?;
        if let Some(name) = &self.name {
            write!(f, " ({name})")?;
        }
        Ok(())
    }
}

/// Main error type for fnspec operations
#[derive(Debug, Error)]
pub enum Error {
    /// The named contract does not exist in any loaded package
    #[error("invalid contract specified or not found: {name}")]
    UnresolvedContract { name: String, searched: PathBuf },

    /// A parameter or result uses a type shape outside the supported grammar
    #[error("unsupported type expression at {site}: {detail}")]
    UnsupportedTypeExpression { site: FieldSite, detail: String },

    /// The type oracle could not classify an identifier
    #[error("cannot classify `{identifier}` at {site}: {reason}")]
    TypeOracleFailure {
        site: FieldSite,
        identifier: String,
        reason: String,
    },

    /// File system related errors
    #[error("file system error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Parsing errors
    #[error("parse error in {}:{line}:{column}: {message}", file.display())]
    Parse {
        file: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    /// No module path could be determined for a package directory
    #[error("cannot determine module path for {}: no go.mod found and no module_path configured", dir.display())]
    ModuleResolution { dir: PathBuf },

    /// Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// TOML errors
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Create a file system error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a parse error with location
    pub fn parse(
        file: impl Into<PathBuf>,
        line: usize,
        column: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::Parse {
            file: file.into(),
            line,
            column,
            message: message.into(),
        }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;
