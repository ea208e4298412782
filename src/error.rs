//! Error taxonomy for configuration resolution.
//!
//! Everything here is fatal. The one recoverable condition, a configured location
//! that does not exist, is logged as a warning by discovery and never surfaces as
//! an error.

use crate::formats::FormatError;
use crate::value::ValueType;
use serde::Serialize;
use std::path::PathBuf;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Configuration errors
    UnknownSource,
    UnknownFormat,
    InvalidConfigFile,

    // Lookup errors
    MissingRequiredKey,
    TypeMismatch,

    // Source errors
    FileRead,
    ParseError,
    DeserializeError,
}

/// Error raised by the resolver.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("unrecognized source '{token}' in priority list")]
    UnknownSource { token: String },

    #[error("unrecognized file format '{name}'")]
    UnknownFormat { name: String },

    #[error("required configuration key '{key}' was not found in any source")]
    MissingKey { key: String },

    #[error("configuration key '{key}' resolved to a {actual} but only {} are allowed", join_types(.allowed))]
    TypeMismatch {
        key: String,
        actual: ValueType,
        allowed: Vec<ValueType>,
    },

    #[error("failed to read {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: FormatError,
    },

    #[error("failed to convert resolved configuration: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("invalid resolver configuration file {}: {message}", .path.display())]
    ConfigFile { path: PathBuf, message: String },
}

impl ResolveError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ResolveError::UnknownSource { .. } => ErrorCode::UnknownSource,
            ResolveError::UnknownFormat { .. } => ErrorCode::UnknownFormat,
            ResolveError::MissingKey { .. } => ErrorCode::MissingRequiredKey,
            ResolveError::TypeMismatch { .. } => ErrorCode::TypeMismatch,
            ResolveError::FileRead { .. } => ErrorCode::FileRead,
            ResolveError::Parse { .. } => ErrorCode::ParseError,
            ResolveError::Deserialize(_) => ErrorCode::DeserializeError,
            ResolveError::ConfigFile { .. } => ErrorCode::InvalidConfigFile,
        }
    }

    // Convenience constructors

    pub fn unknown_source(token: &str) -> Self {
        ResolveError::UnknownSource {
            token: token.to_string(),
        }
    }

    pub fn missing_key(key: &str) -> Self {
        ResolveError::MissingKey {
            key: key.to_string(),
        }
    }

    pub fn type_mismatch(key: &str, actual: ValueType, allowed: &[ValueType]) -> Self {
        ResolveError::TypeMismatch {
            key: key.to_string(),
            actual,
            allowed: allowed.to_vec(),
        }
    }
}

fn join_types(types: &[ValueType]) -> String {
    types
        .iter()
        .map(ValueType::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Structured form of an error, for machine-readable output.
#[derive(Debug, Serialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub message: String,
}

impl From<&ResolveError> for ErrorReport {
    fn from(err: &ResolveError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
        }
    }
}

/// Result type for resolver operations.
pub type Result<T> = std::result::Result<T, ResolveError>;
