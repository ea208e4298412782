//! dotenv-style `KEY=value` files.

use super::{FileFormat, FormatError, FormatParser};
use serde_json::{Map, Value};

pub struct DotenvParser;

impl FormatParser for DotenvParser {
    fn format(&self) -> FileFormat {
        FileFormat::Env
    }

    fn parse(&self, raw: &str) -> Result<Map<String, Value>, FormatError> {
        let mut map = Map::new();
        for item in dotenvy::from_read_iter(raw.as_bytes()) {
            let (key, value) = item.map_err(|e| FormatError::new(FileFormat::Env, e))?;
            map.insert(key, Value::String(value));
        }
        Ok(map)
    }
}
