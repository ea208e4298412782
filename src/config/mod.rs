//! Configuration resolution.
//!
//! A [`Resolver`] is built from a [`ResolverConfig`] and answers lookups from the
//! sources named in its priority list:
//! - `cli_args` - `--key value` pairs from the invocation arguments
//! - `env_vars` (or `envvars`) - environment variables, optionally prefixed and nested
//! - a file suffix such as `json`, `yml` or `cfg` - files discovered under the location
//!
//! ## Precedence
//! - Single-key lookups stop at the first source holding the key
//! - Bulk reads overlay sources from lowest to highest priority, top-level keys only
//! - Within one suffix, files are consulted in sorted order and the first one wins

mod files;
mod loader;
pub(crate) mod merge;
mod types;

pub use files::{DiscoveredFileSet, LocationKind, discover, strip_trailing_slash};
pub use loader::{BulkLookup, Lookup, Resolver};
pub use merge::{deep_merge, overlay_shallow};
pub use types::*;
