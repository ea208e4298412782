//! Unified configuration resolution.
//!
//! Looks up configuration keys across command-line arguments, environment variables
//! and JSON/YAML/TOML/HCL/INI/XML/dotenv files in a declared priority order, with
//! type estimation of string values.

pub mod cli;
pub mod config;
pub mod error;
pub mod escape;
pub mod estimate;
pub mod format;
pub mod formats;
pub mod sources;
pub mod value;

pub use config::{BulkLookup, Lookup, Resolver, ResolverConfig};
pub use error::{ResolveError, Result};
pub use sources::ProcessContext;
pub use value::ValueType;
