//! Resolver configuration.
//!
//! Captured once when a [`Resolver`](super::Resolver) is built. Every field has a
//! serde default, so a resolver config file only needs the fields it changes.

use crate::error::{ResolveError, Result};
use crate::estimate::default_none_literals;
use crate::formats::{FileFormat, SuffixMap};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Source token for command-line arguments.
pub const CLI_ARGS: &str = "cli_args";
/// Source token for environment variables. `envvars` is accepted as well.
pub const ENV_VARS: &str = "env_vars";
pub const ENV_VARS_ALIAS: &str = "envvars";

/// Priority used when none is configured.
pub const DEFAULT_PRIORITY: [&str; 14] = [
    CLI_ARGS, ENV_VARS, "env", "json", "yaml", "yml", "toml", "tml", "hcl", "tf", "conf", "cfg",
    "ini", "xml",
];

/// One entry of the priority list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceToken {
    CliArgs,
    EnvVars,
    /// Files ending in `.{suffix}`, parsed as `format`
    File { suffix: String, format: FileFormat },
}

impl SourceToken {
    pub fn parse(token: &str, suffixes: &SuffixMap) -> Result<Self> {
        match token {
            CLI_ARGS => Ok(SourceToken::CliArgs),
            ENV_VARS | ENV_VARS_ALIAS => Ok(SourceToken::EnvVars),
            suffix => suffixes
                .format_of(suffix)
                .map(|format| SourceToken::File {
                    suffix: suffix.to_string(),
                    format,
                })
                .ok_or_else(|| ResolveError::unknown_source(token)),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            SourceToken::CliArgs => CLI_ARGS,
            SourceToken::EnvVars => ENV_VARS,
            SourceToken::File { suffix, .. } => suffix,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Ordered source tokens, highest priority first. `None` means [`DEFAULT_PRIORITY`].
    #[serde(default)]
    pub priority: Option<Vec<String>>,

    /// Value returned for keys found nowhere when the lookup has no default.
    #[serde(default)]
    pub global_default_value: Value,

    /// Run type estimation on resolved values (default: true).
    #[serde(default = "default_true")]
    pub type_estimate: bool,

    /// Scan subdirectories of a directory location (default: false).
    #[serde(default)]
    pub recurse: bool,

    /// Uppercase envvar names before lookup (default: true).
    #[serde(default = "default_true")]
    pub force_envvars_uppercase: bool,

    /// A config file or a directory of config files. `None` means the working directory.
    #[serde(default)]
    pub location: Option<PathBuf>,

    /// Prepended to every key before envvar lookup.
    #[serde(default)]
    pub envvar_prefix: String,

    /// Extra suffixes per format name, e.g. `{"json": ["custom_json"]}`.
    #[serde(default)]
    pub custom_suffixes: BTreeMap<String, Vec<String>>,

    /// Divider that nests envvars into mappings; nesting is off when unset.
    #[serde(default)]
    pub envvar_divider: Option<String>,

    /// Case-insensitive strings estimated to null.
    #[serde(default = "default_none_literals")]
    pub none_values: BTreeSet<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            priority: None,
            global_default_value: Value::Null,
            type_estimate: true,
            recurse: false,
            force_envvars_uppercase: true,
            location: None,
            envvar_prefix: String::new(),
            custom_suffixes: BTreeMap::new(),
            envvar_divider: None,
            none_values: default_none_literals(),
        }
    }
}

fn default_true() -> bool {
    true
}

impl ResolverConfig {
    /// Load a resolver configuration from a YAML (or JSON) file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ResolveError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_yaml::from_str(&content).map_err(|e| ResolveError::ConfigFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn with_priority<I, S>(mut self, priority: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.priority = Some(priority.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_global_default(mut self, value: Value) -> Self {
        self.global_default_value = value;
        self
    }

    pub fn with_type_estimate(mut self, enabled: bool) -> Self {
        self.type_estimate = enabled;
        self
    }

    pub fn with_recurse(mut self, recurse: bool) -> Self {
        self.recurse = recurse;
        self
    }

    pub fn with_force_envvars_uppercase(mut self, force: bool) -> Self {
        self.force_envvars_uppercase = force;
        self
    }

    pub fn with_location(mut self, location: impl Into<PathBuf>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_envvar_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.envvar_prefix = prefix.into();
        self
    }

    /// Register an extra suffix for the format named `format`.
    pub fn with_custom_suffix(mut self, format: impl Into<String>, suffix: impl Into<String>) -> Self {
        self.custom_suffixes
            .entry(format.into())
            .or_default()
            .push(suffix.into());
        self
    }

    pub fn with_envvar_divider(mut self, divider: impl Into<String>) -> Self {
        self.envvar_divider = Some(divider.into());
        self
    }

    pub fn with_none_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.none_values = values.into_iter().map(Into::into).collect();
        self
    }

    /// The configured priority, or [`DEFAULT_PRIORITY`].
    pub fn effective_priority(&self) -> Vec<String> {
        match &self.priority {
            Some(priority) => priority.clone(),
            None => DEFAULT_PRIORITY.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// The configured location, or the working directory.
    pub fn effective_location(&self) -> PathBuf {
        self.location.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ResolverConfig::default();
        assert_eq!(config.effective_priority()[0], "cli_args");
        assert_eq!(config.effective_priority().len(), 14);
        assert_eq!(config.effective_location(), PathBuf::from("."));
        assert!(config.type_estimate);
        assert!(config.force_envvars_uppercase);
        assert!(!config.recurse);
        assert!(config.none_values.contains(""));
        assert_eq!(config.global_default_value, Value::Null);
    }

    #[test]
    fn test_builder() {
        let config = ResolverConfig::default()
            .with_priority(["json", "env_vars"])
            .with_custom_suffix("json", "custom_json")
            .with_envvar_divider("__")
            .with_global_default(json!("fallback"));
        assert_eq!(config.effective_priority(), vec!["json", "env_vars"]);
        assert_eq!(config.custom_suffixes["json"], vec!["custom_json"]);
        assert_eq!(config.envvar_divider.as_deref(), Some("__"));
        assert_eq!(config.global_default_value, json!("fallback"));
    }

    #[test]
    fn test_source_token_parse() {
        let suffixes = SuffixMap::new();
        assert_eq!(SourceToken::parse("cli_args", &suffixes).unwrap(), SourceToken::CliArgs);
        assert_eq!(SourceToken::parse("envvars", &suffixes).unwrap(), SourceToken::EnvVars);
        assert_eq!(
            SourceToken::parse("yml", &suffixes).unwrap(),
            SourceToken::File {
                suffix: "yml".to_string(),
                format: FileFormat::Yaml
            }
        );
        let err = SourceToken::parse("redis", &suffixes).unwrap_err();
        assert!(matches!(err, ResolveError::UnknownSource { token } if token == "redis"));
    }

    #[test]
    fn test_load_partial_yaml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("resolver.yaml");
        std::fs::write(
            &path,
            "priority: [env_vars, yaml]\nenvvar_prefix: app_\nnone_values: [nil]\n",
        )
        .unwrap();

        let config = ResolverConfig::load(&path).unwrap();
        assert_eq!(config.effective_priority(), vec!["env_vars", "yaml"]);
        assert_eq!(config.envvar_prefix, "app_");
        assert!(config.none_values.contains("nil"));
        // untouched fields keep their defaults
        assert!(config.type_estimate);
        assert!(config.force_envvars_uppercase);
    }

    #[test]
    fn test_load_invalid_yaml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("resolver.yaml");
        std::fs::write(&path, "recurse: [not, a, bool]\n").unwrap();

        let err = ResolverConfig::load(&path).unwrap_err();
        assert!(matches!(err, ResolveError::ConfigFile { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = ResolverConfig::load("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ResolveError::FileRead { .. }));
    }
}
