//! Formats with a native serde deserializer: JSON, YAML, TOML and HCL.

use super::{FileFormat, FormatError, FormatParser, into_mapping};
use serde_json::{Map, Value};

pub struct JsonParser;

impl FormatParser for JsonParser {
    fn format(&self) -> FileFormat {
        FileFormat::Json
    }

    fn parse(&self, raw: &str) -> Result<Map<String, Value>, FormatError> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| FormatError::new(FileFormat::Json, e))?;
        into_mapping(FileFormat::Json, value)
    }
}

pub struct YamlParser;

impl FormatParser for YamlParser {
    fn format(&self) -> FileFormat {
        FileFormat::Yaml
    }

    fn parse(&self, raw: &str) -> Result<Map<String, Value>, FormatError> {
        let value: Value =
            serde_yaml::from_str(raw).map_err(|e| FormatError::new(FileFormat::Yaml, e))?;
        into_mapping(FileFormat::Yaml, value)
    }
}

pub struct TomlParser;

impl FormatParser for TomlParser {
    fn format(&self) -> FileFormat {
        FileFormat::Toml
    }

    fn parse(&self, raw: &str) -> Result<Map<String, Value>, FormatError> {
        let table: toml::Table =
            toml::from_str(raw).map_err(|e| FormatError::new(FileFormat::Toml, e))?;
        let value = toml_to_json(toml::Value::Table(table));
        into_mapping(FileFormat::Toml, value)
    }
}

/// TOML datetimes become strings; everything else maps one to one.
fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(f.to_string())),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

pub struct HclParser;

impl FormatParser for HclParser {
    fn format(&self) -> FileFormat {
        FileFormat::Hcl
    }

    fn parse(&self, raw: &str) -> Result<Map<String, Value>, FormatError> {
        let value: Value = hcl::from_str(raw).map_err(|e| FormatError::new(FileFormat::Hcl, e))?;
        into_mapping(FileFormat::Hcl, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json() {
        let map = JsonParser
            .parse(r#"{"file_type": "json", "test_int": 123, "test_json": {"k": "v"}}"#)
            .unwrap();
        assert_eq!(map["file_type"], json!("json"));
        assert_eq!(map["test_int"], json!(123));
        assert_eq!(map["test_json"], json!({"k": "v"}));
    }

    #[test]
    fn test_yaml() {
        let raw = "file_type: yaml\ntest_bool_true: true\ntest_list:\n  - test1\n  - test2\n";
        let map = YamlParser.parse(raw).unwrap();
        assert_eq!(map["file_type"], json!("yaml"));
        assert_eq!(map["test_bool_true"], json!(true));
        assert_eq!(map["test_list"], json!(["test1", "test2"]));
    }

    #[test]
    fn test_empty_yaml_is_empty_mapping() {
        assert!(YamlParser.parse("").unwrap().is_empty());
    }

    #[test]
    fn test_toml() {
        let raw = r#"
file_type = "toml"
test_float = 123.123
when = 1979-05-27T07:32:00Z

[test_toml]
test_toml_key = "test_toml_value"
"#;
        let map = TomlParser.parse(raw).unwrap();
        assert_eq!(map["file_type"], json!("toml"));
        assert_eq!(map["test_float"], json!(123.123));
        assert_eq!(map["when"], json!("1979-05-27T07:32:00Z"));
        assert_eq!(map["test_toml"], json!({"test_toml_key": "test_toml_value"}));
    }

    #[test]
    fn test_hcl() {
        let raw = r#"
file_type = "hcl"
test_int = 123
test_hcl {
  test_hcl_key = "test_hcl_value"
}
"#;
        let map = HclParser.parse(raw).unwrap();
        assert_eq!(map["file_type"], json!("hcl"));
        assert_eq!(map["test_int"], json!(123));
        assert_eq!(map["test_hcl"]["test_hcl_key"], json!("test_hcl_value"));
    }

    #[test]
    fn test_malformed_content() {
        assert!(JsonParser.parse("{not json").is_err());
        assert!(TomlParser.parse("= nope").is_err());
    }
}
