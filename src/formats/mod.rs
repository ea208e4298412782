//! Configuration file formats.
//!
//! Each canonical [`FileFormat`] has one [`FormatParser`] in the [`ParserRegistry`] and
//! any number of file suffixes in the [`SuffixMap`]. Dispatch goes
//! suffix token → format → parser; registering a custom suffix never touches dispatch.

mod dotenv;
mod ini;
mod structured;
mod xml;

pub use dotenv::DotenvParser;
pub use ini::IniParser;
pub use structured::{HclParser, JsonParser, TomlParser, YamlParser};
pub use xml::XmlParser;

use crate::error::{ResolveError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Canonical configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileFormat {
    Json,
    Yaml,
    Toml,
    Hcl,
    Ini,
    Xml,
    Env,
}

impl FileFormat {
    pub const ALL: [FileFormat; 7] = [
        FileFormat::Env,
        FileFormat::Json,
        FileFormat::Yaml,
        FileFormat::Toml,
        FileFormat::Hcl,
        FileFormat::Ini,
        FileFormat::Xml,
    ];

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(FileFormat::Json),
            "yaml" => Some(FileFormat::Yaml),
            "toml" => Some(FileFormat::Toml),
            "hcl" => Some(FileFormat::Hcl),
            "ini" => Some(FileFormat::Ini),
            "xml" => Some(FileFormat::Xml),
            "env" | "dotenv" => Some(FileFormat::Env),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileFormat::Json => "json",
            FileFormat::Yaml => "yaml",
            FileFormat::Toml => "toml",
            FileFormat::Hcl => "hcl",
            FileFormat::Ini => "ini",
            FileFormat::Xml => "xml",
            FileFormat::Env => "env",
        }
    }

    /// Built-in suffixes, in default priority order.
    pub fn default_suffixes(&self) -> &'static [&'static str] {
        match self {
            FileFormat::Json => &["json"],
            FileFormat::Yaml => &["yaml", "yml"],
            FileFormat::Toml => &["toml", "tml"],
            FileFormat::Hcl => &["hcl", "tf"],
            FileFormat::Ini => &["conf", "cfg", "ini"],
            FileFormat::Xml => &["xml"],
            FileFormat::Env => &["env"],
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file's content could not be read as its format.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid {format} content: {message}")]
pub struct FormatError {
    pub format: FileFormat,
    pub message: String,
}

impl FormatError {
    pub fn new(format: FileFormat, err: impl fmt::Display) -> Self {
        Self {
            format,
            message: err.to_string(),
        }
    }
}

/// Parses raw file content into a top-level key/value mapping.
pub trait FormatParser: Send + Sync {
    fn format(&self) -> FileFormat;
    fn parse(&self, raw: &str) -> std::result::Result<Map<String, Value>, FormatError>;
}

/// Require a parsed document to be a mapping at the top level.
pub(crate) fn into_mapping(
    format: FileFormat,
    value: Value,
) -> std::result::Result<Map<String, Value>, FormatError> {
    match value {
        Value::Object(map) => Ok(map),
        // an empty yaml document
        Value::Null => Ok(Map::new()),
        other => Err(FormatError::new(
            format,
            format!("expected a mapping at the top level, found {}", kind(&other)),
        )),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Array(_) => "a list",
        Value::String(_) => "a string",
        Value::Number(_) => "a number",
        Value::Bool(_) => "a boolean",
        Value::Null => "null",
        Value::Object(_) => "a mapping",
    }
}

/// Format → parser registry.
pub struct ParserRegistry {
    parsers: HashMap<FileFormat, Box<dyn FormatParser>>,
}

impl ParserRegistry {
    /// A registry with the built-in parser for every format.
    pub fn new() -> Self {
        let mut registry = Self {
            parsers: HashMap::new(),
        };
        registry.register(Box::new(JsonParser));
        registry.register(Box::new(YamlParser));
        registry.register(Box::new(TomlParser));
        registry.register(Box::new(HclParser));
        registry.register(Box::new(IniParser));
        registry.register(Box::new(XmlParser));
        registry.register(Box::new(DotenvParser));
        registry
    }

    /// Install a parser, replacing any previous parser for its format.
    pub fn register(&mut self, parser: Box<dyn FormatParser>) {
        self.parsers.insert(parser.format(), parser);
    }

    pub fn get(&self, format: FileFormat) -> Option<&dyn FormatParser> {
        self.parsers.get(&format).map(|p| p.as_ref())
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut formats: Vec<_> = self.parsers.keys().collect();
        formats.sort();
        f.debug_struct("ParserRegistry")
            .field("formats", &formats)
            .finish()
    }
}

/// Suffix token → canonical format translation table.
#[derive(Debug, Clone)]
pub struct SuffixMap {
    suffixes: BTreeMap<String, FileFormat>,
}

impl SuffixMap {
    /// The built-in suffixes of every format.
    pub fn new() -> Self {
        let suffixes = FileFormat::ALL
            .iter()
            .flat_map(|format| {
                format
                    .default_suffixes()
                    .iter()
                    .map(move |suffix| (suffix.to_string(), *format))
            })
            .collect();
        Self { suffixes }
    }

    /// Built-in suffixes plus `custom` registrations (format name → suffixes).
    pub fn with_custom(custom: &BTreeMap<String, Vec<String>>) -> Result<Self> {
        let mut map = Self::new();
        for (name, suffixes) in custom {
            let format = FileFormat::from_str(name)
                .ok_or_else(|| ResolveError::UnknownFormat { name: name.clone() })?;
            for suffix in suffixes {
                map.register(suffix, format);
            }
        }
        Ok(map)
    }

    pub fn register(&mut self, suffix: &str, format: FileFormat) {
        let suffix = suffix.trim_start_matches('.');
        self.suffixes.insert(suffix.to_string(), format);
    }

    pub fn format_of(&self, suffix: &str) -> Option<FileFormat> {
        self.suffixes.get(suffix).copied()
    }

    pub fn contains(&self, suffix: &str) -> bool {
        self.suffixes.contains_key(suffix)
    }
}

impl Default for SuffixMap {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_suffix_table() {
        let map = SuffixMap::new();
        assert_eq!(map.format_of("yml"), Some(FileFormat::Yaml));
        assert_eq!(map.format_of("tf"), Some(FileFormat::Hcl));
        assert_eq!(map.format_of("cfg"), Some(FileFormat::Ini));
        assert_eq!(map.format_of("env"), Some(FileFormat::Env));
        assert_eq!(map.format_of("txt"), None);
        assert_eq!(map.format_of("conf"), Some(FileFormat::Ini));
    }

    #[test]
    fn test_custom_suffixes() {
        let mut custom = BTreeMap::new();
        custom.insert("json".to_string(), vec!["custom_json".to_string()]);
        custom.insert("yaml".to_string(), vec![".settings".to_string()]);
        let map = SuffixMap::with_custom(&custom).unwrap();
        assert_eq!(map.format_of("custom_json"), Some(FileFormat::Json));
        assert_eq!(map.format_of("settings"), Some(FileFormat::Yaml));
        assert!(map.contains("json"));
    }

    #[test]
    fn test_custom_suffix_unknown_format() {
        let mut custom = BTreeMap::new();
        custom.insert("properties".to_string(), vec!["props".to_string()]);
        let err = SuffixMap::with_custom(&custom).unwrap_err();
        assert!(matches!(err, ResolveError::UnknownFormat { name } if name == "properties"));
    }

    #[test]
    fn test_registry_has_every_format() {
        let registry = ParserRegistry::new();
        for format in FileFormat::ALL {
            assert_eq!(registry.get(format).unwrap().format(), format);
        }
    }

    #[test]
    fn test_top_level_must_be_mapping() {
        let err = JsonParser.parse("[1, 2]").unwrap_err();
        assert_eq!(err.format, FileFormat::Json);
        assert!(err.message.contains("a list"));
    }
}
