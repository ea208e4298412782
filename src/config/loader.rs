//! Priority-ordered resolution across cli args, envvars and configuration files.
//!
//! A single-key lookup walks the priority list and stops at the first source that
//! has the key. A bulk read walks the list in reverse and overlays every source, so
//! both agree on which source wins.

use super::files::{DiscoveredFileSet, discover};
use super::merge::overlay_shallow;
use super::types::{ResolverConfig, SourceToken};
use crate::error::{ResolveError, Result};
use crate::estimate::estimate;
use crate::formats::{FileFormat, FormatParser, ParserRegistry, SuffixMap};
use crate::sources::{ProcessContext, cli_args, envvars};
use crate::value::ValueType;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, trace, warn};

/// Options for a single-key lookup.
#[derive(Debug, Clone, Default)]
pub struct Lookup {
    /// Used when no source has the key; a null default falls through to the global one
    pub default: Option<Value>,
    /// Fail instead of defaulting when no source has the key
    pub required: bool,
    /// Accepted types of the final value; empty accepts anything
    pub allowed: Vec<ValueType>,
}

impl Lookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn allow(mut self, value_type: ValueType) -> Self {
        self.allowed.push(value_type);
        self
    }
}

/// Options for a bulk read of every key.
#[derive(Debug, Clone, Default)]
pub struct BulkLookup {
    pub defaults: Map<String, Value>,
    pub required: Vec<String>,
    pub allowed: BTreeMap<String, Vec<ValueType>>,
}

impl BulkLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default(mut self, key: impl Into<String>, value: Value) -> Self {
        self.defaults.insert(key.into(), value);
        self
    }

    pub fn require(mut self, key: impl Into<String>) -> Self {
        self.required.push(key.into());
        self
    }

    pub fn allow(mut self, key: impl Into<String>, value_type: ValueType) -> Self {
        self.allowed.entry(key.into()).or_default().push(value_type);
        self
    }
}

/// The resolution engine.
///
/// Discovery runs once in the constructor; later filesystem changes are not seen.
#[derive(Debug)]
pub struct Resolver {
    config: ResolverConfig,
    priority: Vec<String>,
    suffixes: SuffixMap,
    parsers: ParserRegistry,
    files: DiscoveredFileSet,
    context: ProcessContext,
}

impl Resolver {
    /// Build a resolver reading the current process' arguments and environment.
    pub fn new(config: ResolverConfig) -> Result<Self> {
        Self::with_context(config, ProcessContext::from_env())
    }

    /// Build a resolver over an explicit process context.
    pub fn with_context(config: ResolverConfig, context: ProcessContext) -> Result<Self> {
        let suffixes = SuffixMap::with_custom(&config.custom_suffixes)?;
        if !config.custom_suffixes.is_empty() && config.priority.is_none() {
            warn!(
                "Custom suffixes are registered but the default priority is in use, \
                 files with those suffixes will not be read"
            );
        }

        let priority = config.effective_priority();
        let mut file_tokens: Vec<&str> = Vec::new();
        for token in &priority {
            if suffixes.contains(token) && !file_tokens.contains(&token.as_str()) {
                file_tokens.push(token);
            }
        }
        let files = discover(&config.effective_location(), &file_tokens, config.recurse)?;

        Ok(Self {
            config,
            priority,
            suffixes,
            parsers: ParserRegistry::new(),
            files,
            context,
        })
    }

    /// Replace the parser used for its format.
    pub fn with_parser(mut self, parser: Box<dyn FormatParser>) -> Self {
        self.parsers.register(parser);
        self
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn discovered_files(&self) -> &DiscoveredFileSet {
        &self.files
    }

    /// Resolve `key` with no default, requirement or type check.
    pub fn get(&self, key: &str) -> Result<Value> {
        self.resolve_one(key, &Lookup::default())
    }

    /// Resolve a single key.
    pub fn resolve_one(&self, key: &str, lookup: &Lookup) -> Result<Value> {
        let value = match self.find(key)? {
            Some((source, value)) => {
                debug!(key, source = %source, "Resolved configuration key");
                value
            }
            None if lookup.required => return Err(ResolveError::missing_key(key)),
            None => {
                debug!(key, "Configuration key not found, using default");
                lookup
                    .default
                    .clone()
                    .filter(|v| !v.is_null())
                    .unwrap_or_else(|| self.config.global_default_value.clone())
            }
        };

        let value = self.estimate(value);
        check_allowed(key, &value, &lookup.allowed)?;
        Ok(value)
    }

    /// Resolve each of `keys` independently with the same options.
    pub fn resolve_many<I, S>(&self, keys: I, lookup: &Lookup) -> Result<Map<String, Value>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut resolved = Map::new();
        for key in keys {
            let key = key.as_ref();
            resolved.insert(key.to_string(), self.resolve_one(key, lookup)?);
        }
        Ok(resolved)
    }

    /// Read every key from every source, the highest priority source winning per key.
    pub fn resolve_all(&self, lookup: &BulkLookup) -> Result<Map<String, Value>> {
        let mut merged = Map::new();
        for token in self.priority.iter().rev() {
            let token = SourceToken::parse(token, &self.suffixes)?;
            let layer = self.materialize(&token)?;
            debug!(source = %token.name(), keys = layer.len(), "Merged configuration source");
            overlay_shallow(&mut merged, layer);
        }

        for (key, value) in &lookup.defaults {
            if !merged.contains_key(key) {
                merged.insert(key.clone(), value.clone());
            }
        }

        let merged = match self.estimate(Value::Object(merged)) {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        for key in &lookup.required {
            if !merged.contains_key(key) {
                return Err(ResolveError::missing_key(key));
            }
        }

        for (key, allowed) in &lookup.allowed {
            let value = merged.get(key).unwrap_or(&Value::Null);
            check_allowed(key, value, allowed)?;
        }

        Ok(merged)
    }

    /// Resolve `key` and deserialize it into `T`.
    pub fn resolve_as<T: DeserializeOwned>(&self, key: &str, lookup: &Lookup) -> Result<T> {
        let value = self.resolve_one(key, lookup)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Read every key and deserialize the whole mapping into `T`.
    pub fn resolve_all_as<T: DeserializeOwned>(&self, lookup: &BulkLookup) -> Result<T> {
        let merged = self.resolve_all(lookup)?;
        Ok(serde_json::from_value(Value::Object(merged))?)
    }

    fn estimate(&self, value: Value) -> Value {
        if self.config.type_estimate {
            estimate(value, &self.config.none_values)
        } else {
            value
        }
    }

    /// The first source in priority order holding `key`, with its raw value.
    fn find(&self, key: &str) -> Result<Option<(String, Value)>> {
        for token in &self.priority {
            let token = SourceToken::parse(token, &self.suffixes)?;
            trace!(key, source = %token.name(), "Consulting configuration source");
            let found = match &token {
                SourceToken::CliArgs => {
                    cli_args::read_arg(self.context.args(), key).map(Value::String)
                }
                SourceToken::EnvVars => self.read_envvar(key),
                SourceToken::File { suffix, format } => self.find_in_files(key, suffix, *format)?,
            };
            if let Some(value) = found {
                return Ok(Some((token.name().to_string(), value)));
            }
        }
        Ok(None)
    }

    fn read_envvar(&self, key: &str) -> Option<Value> {
        let name = format!("{}{}", self.config.envvar_prefix, key);
        let raw = envvars::read_var(
            self.context.vars(),
            &name,
            self.config.force_envvars_uppercase,
        )?;
        let value = Value::String(raw);
        Some(match &self.config.envvar_divider {
            Some(divider) => envvars::split_var(key, value, divider),
            None => value,
        })
    }

    fn find_in_files(&self, key: &str, suffix: &str, format: FileFormat) -> Result<Option<Value>> {
        for entry in self.files.files_for(suffix) {
            let mut mapping = self.parse_file(entry, format)?;
            if let Some(value) = mapping.remove(key) {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    /// The full key/value mapping contributed by one source.
    fn materialize(&self, token: &SourceToken) -> Result<Map<String, Value>> {
        match token {
            SourceToken::CliArgs => Ok(cli_args::read_all_args(self.context.args())
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect()),
            SourceToken::EnvVars => {
                let pairs = envvars::read_all_vars(
                    self.context.vars(),
                    self.config.force_envvars_uppercase,
                    &self.config.envvar_prefix,
                );
                Ok(match &self.config.envvar_divider {
                    Some(divider) => envvars::nest_all(pairs, divider),
                    None => pairs
                        .into_iter()
                        .map(|(k, v)| (k, Value::String(v)))
                        .collect(),
                })
            }
            SourceToken::File { suffix, format } => {
                // reversed so the first file in lookup order lands last and wins
                let mut layer = Map::new();
                for entry in self.files.files_for(suffix).iter().rev() {
                    overlay_shallow(&mut layer, self.parse_file(entry, *format)?);
                }
                Ok(layer)
            }
        }
    }

    fn parse_file(&self, entry: &Path, format: FileFormat) -> Result<Map<String, Value>> {
        let path = self.files.full_path(entry);
        trace!(path = %path.display(), format = %format, "Parsing configuration file");

        let raw = std::fs::read_to_string(&path).map_err(|e| ResolveError::FileRead {
            path: path.clone(),
            source: e,
        })?;
        let parser = self
            .parsers
            .get(format)
            .ok_or_else(|| ResolveError::UnknownFormat {
                name: format.to_string(),
            })?;
        parser
            .parse(&raw)
            .map_err(|source| ResolveError::Parse { path, source })
    }
}

fn check_allowed(key: &str, value: &Value, allowed: &[ValueType]) -> Result<()> {
    if allowed.is_empty() || ValueType::matches_any(value, allowed) {
        Ok(())
    } else {
        Err(ResolveError::type_mismatch(key, ValueType::of(value), allowed))
    }
}
