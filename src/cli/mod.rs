//! CLI command definitions for parse-it
//!
//! This module defines the CLI structure using clap's derive macros.
//! Arguments after `--` are handed to the resolver as its `cli_args` source.

use crate::config::ResolverConfig;
use crate::format::OutputFormat;
use crate::value::ValueType;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Resolve configuration keys across cli args, envvars and configuration files
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a resolver configuration file (YAML or JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Source priority, highest first (e.g. cli_args,env_vars,json)
    #[arg(short, long, value_delimiter = ',', global = true)]
    pub priority: Option<Vec<String>>,

    /// Configuration file or directory to read files from
    #[arg(long, global = true)]
    pub location: Option<PathBuf>,

    /// Scan subdirectories of the location
    #[arg(short, long, global = true)]
    pub recurse: bool,

    /// Return values as read, without type estimation
    #[arg(long, global = true)]
    pub no_type_estimate: bool,

    /// Prefix prepended to keys for envvar lookup
    #[arg(long, global = true)]
    pub envvar_prefix: Option<String>,

    /// Look up envvars by the exact key case instead of uppercasing
    #[arg(long, global = true)]
    pub keep_envvar_case: bool,

    /// Divider that nests envvars into mappings (e.g. __)
    #[arg(long, global = true)]
    pub divider: Option<String>,

    /// String treated as null by type estimation (repeatable, replaces the defaults)
    #[arg(long = "none-value", global = true)]
    pub none_values: Vec<String>,

    /// Extra file suffix for a format, as FORMAT=SUFFIX (repeatable)
    #[arg(long = "suffix", global = true)]
    pub suffixes: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json, global = true)]
    pub format: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve one or more keys
    Get(GetArgs),

    /// Read every key from every source
    All(AllArgs),

    /// Show the discovered configuration files
    Files,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Keys to resolve
    #[arg(required = true)]
    pub keys: Vec<String>,

    /// Value used when a key is found nowhere (type-estimated like any other value)
    #[arg(short, long)]
    pub default: Option<String>,

    /// Fail when a key is found nowhere
    #[arg(long)]
    pub required: bool,

    /// Accepted value type (repeatable): string, bool, int, float, list, map, null
    #[arg(short, long = "allow")]
    pub allow: Vec<ValueType>,

    /// Arguments making up the cli_args source
    #[arg(last = true)]
    pub args: Vec<String>,
}

#[derive(Args, Debug)]
pub struct AllArgs {
    /// Key that must be present (repeatable)
    #[arg(long = "require")]
    pub require: Vec<String>,

    /// Default for a key found nowhere, as KEY=VALUE (repeatable)
    #[arg(short, long = "default")]
    pub defaults: Vec<String>,

    /// Arguments making up the cli_args source
    #[arg(last = true)]
    pub args: Vec<String>,
}

/// Split a `NAME=VALUE` flag value.
pub fn split_pair(raw: &str) -> Option<(&str, &str)> {
    raw.split_once('=').filter(|(name, _)| !name.is_empty())
}

impl Cli {
    /// Resolver configuration: the `--config` file (or defaults) with flag overrides applied.
    pub fn resolver_config(&self) -> anyhow::Result<ResolverConfig> {
        let mut config = match &self.config {
            Some(path) => ResolverConfig::load(path)?,
            None => ResolverConfig::default(),
        };

        if let Some(priority) = &self.priority {
            config.priority = Some(priority.clone());
        }
        if let Some(location) = &self.location {
            config.location = Some(location.clone());
        }
        if self.recurse {
            config.recurse = true;
        }
        if self.no_type_estimate {
            config.type_estimate = false;
        }
        if let Some(prefix) = &self.envvar_prefix {
            config.envvar_prefix = prefix.clone();
        }
        if self.keep_envvar_case {
            config.force_envvars_uppercase = false;
        }
        if let Some(divider) = &self.divider {
            config.envvar_divider = Some(divider.clone());
        }
        if !self.none_values.is_empty() {
            config.none_values = self.none_values.iter().cloned().collect();
        }
        for raw in &self.suffixes {
            let (format, suffix) = split_pair(raw)
                .ok_or_else(|| anyhow::anyhow!("invalid --suffix '{}', expected FORMAT=SUFFIX", raw))?;
            config = config.with_custom_suffix(format, suffix);
        }

        Ok(config)
    }

    /// Arguments after `--` for the subcommand.
    pub fn passthrough_args(&self) -> &[String] {
        match &self.command {
            Command::Get(args) => &args.args,
            Command::All(args) => &args.args,
            Command::Files => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_get_with_passthrough() {
        let cli = Cli::try_parse_from([
            "parse-it",
            "get",
            "port",
            "host",
            "--allow",
            "int",
            "--priority",
            "cli_args,json",
            "--",
            "--port",
            "80",
        ])
        .unwrap();

        let Command::Get(args) = &cli.command else {
            panic!("expected get");
        };
        assert_eq!(args.keys, vec!["port", "host"]);
        assert_eq!(args.allow, vec![ValueType::Int]);
        assert_eq!(cli.passthrough_args(), &["--port".to_string(), "80".to_string()]);
        assert_eq!(
            cli.priority.as_deref(),
            Some(&["cli_args".to_string(), "json".to_string()][..])
        );
    }

    #[test]
    fn test_flag_overrides() {
        let cli = Cli::try_parse_from([
            "parse-it",
            "--keep-envvar-case",
            "--divider",
            "__",
            "--suffix",
            "json=custom_json",
            "--none-value",
            "nil",
            "files",
        ])
        .unwrap();

        let config = cli.resolver_config().unwrap();
        assert!(!config.force_envvars_uppercase);
        assert_eq!(config.envvar_divider.as_deref(), Some("__"));
        assert_eq!(config.custom_suffixes["json"], vec!["custom_json"]);
        assert_eq!(config.none_values.len(), 1);
        assert!(config.priority.is_none());
    }

    #[test]
    fn test_invalid_suffix_flag() {
        let cli = Cli::try_parse_from(["parse-it", "--suffix", "json", "files"]).unwrap();
        assert!(cli.resolver_config().is_err());
    }

    #[test]
    fn test_split_pair() {
        assert_eq!(split_pair("timeout=30"), Some(("timeout", "30")));
        assert_eq!(split_pair("url=a=b"), Some(("url", "a=b")));
        assert_eq!(split_pair("=x"), None);
        assert_eq!(split_pair("plain"), None);
    }
}
