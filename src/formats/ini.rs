//! INI / conf / cfg files.
//!
//! Keys outside any section land at the top level; each named section becomes a
//! nested mapping. All values stay strings for the estimator to type.

use super::{FileFormat, FormatError, FormatParser};
use ini::Ini;
use serde_json::{Map, Value};

pub struct IniParser;

impl FormatParser for IniParser {
    fn format(&self) -> FileFormat {
        FileFormat::Ini
    }

    fn parse(&self, raw: &str) -> Result<Map<String, Value>, FormatError> {
        let ini = Ini::load_from_str(raw).map_err(|e| FormatError::new(FileFormat::Ini, e))?;

        let mut map = Map::new();
        for (section, properties) in ini.iter() {
            let entries: Map<String, Value> = properties
                .iter()
                .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
                .collect();
            match section {
                None => map.extend(entries),
                Some(name) => {
                    map.insert(name.to_string(), Value::Object(entries));
                }
            }
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sections_become_mappings() {
        let raw = "\
top_level = here

[DEFAULT]
file_type = ini
test_int = 123.0

[test_ini]
test_ini_key = test_ini_value
";
        let map = IniParser.parse(raw).unwrap();
        assert_eq!(map["top_level"], json!("here"));
        assert_eq!(
            map["DEFAULT"],
            json!({"file_type": "ini", "test_int": "123.0"})
        );
        assert_eq!(map["test_ini"], json!({"test_ini_key": "test_ini_value"}));
    }

    #[test]
    fn test_comments_are_skipped() {
        let map = IniParser.parse("; comment\n# other\nport = 8080\n").unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["port"], json!("8080"));
    }
}
