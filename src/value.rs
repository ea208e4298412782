//! Coarse type tags for resolved values.
//!
//! Resolved values are plain [`serde_json::Value`]s. `Value::Null` doubles as the
//! absent marker. [`ValueType`] is what `allowed_types` checks compare against.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// The concrete type of a resolved value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    String,
    Bool,
    Int,
    Float,
    List,
    Map,
    Null,
}

impl ValueType {
    /// Classify a value. Numbers representable as `i64`/`u64` are ints.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::String(_) => ValueType::String,
            Value::Bool(_) => ValueType::Bool,
            Value::Number(n) if n.is_i64() || n.is_u64() => ValueType::Int,
            Value::Number(_) => ValueType::Float,
            Value::Array(_) => ValueType::List,
            Value::Object(_) => ValueType::Map,
            Value::Null => ValueType::Null,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Bool => "bool",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::List => "list",
            ValueType::Map => "map",
            ValueType::Null => "null",
        }
    }

    /// True when `value`'s type is one of `allowed`.
    pub fn matches_any(value: &Value, allowed: &[ValueType]) -> bool {
        allowed.contains(&ValueType::of(value))
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "str" | "string" => Ok(ValueType::String),
            "bool" | "boolean" => Ok(ValueType::Bool),
            "int" | "integer" => Ok(ValueType::Int),
            "float" => Ok(ValueType::Float),
            "list" | "array" => Ok(ValueType::List),
            "map" | "dict" | "object" => Ok(ValueType::Map),
            "null" | "none" => Ok(ValueType::Null),
            other => Err(format!("unknown value type: {}", other)),
        }
    }
}
