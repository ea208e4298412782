//! Best-effort type estimation for string-typed configuration values.
//!
//! Environment variables, cli args, ini and xml files only ever produce strings.
//! [`estimate`] turns `"8080"` into `8080`, `"TRUE"` into `true`, `"['a', 1]"` into a
//! list and so on. Estimation is total: anything it cannot read is returned unchanged.
//!
//! Order matters. The case-insensitive boolean and none-literal checks run before
//! the literal grammar, which only knows `True`/`False`/`None` (and the JSON
//! spellings) case-sensitively.

mod literal;

pub use literal::{LiteralError, MAX_DEPTH, parse_literal};

use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Tokens treated as the absent marker when no explicit set is configured.
pub const DEFAULT_NONE_LITERALS: [&str; 3] = ["", "null", "none"];

pub fn default_none_literals() -> BTreeSet<String> {
    DEFAULT_NONE_LITERALS.iter().map(|s| s.to_string()).collect()
}

/// Estimate the type of `value`.
///
/// - strings go through the boolean, none-literal and literal-grammar rules
/// - mappings have each value estimated, keys untouched
/// - every other value is returned as is
pub fn estimate(value: Value, none_literals: &BTreeSet<String>) -> Value {
    match value {
        Value::String(s) => estimate_str(s, none_literals),
        Value::Object(map) => Value::Object(estimate_map(map, none_literals)),
        other => other,
    }
}

fn estimate_str(s: String, none_literals: &BTreeSet<String>) -> Value {
    let lowered = s.to_lowercase();
    match lowered.as_str() {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    if none_literals.iter().any(|n| n.to_lowercase() == lowered) {
        return Value::Null;
    }

    match parse_literal(&s) {
        Ok(Value::Array(items)) => Value::Array(
            items
                .into_iter()
                .map(|item| estimate(item, none_literals))
                .collect(),
        ),
        Ok(Value::Object(map)) => Value::Object(estimate_map(map, none_literals)),
        Ok(parsed) => parsed,
        Err(_) => Value::String(s),
    }
}

fn estimate_map(map: Map<String, Value>, none_literals: &BTreeSet<String>) -> Map<String, Value> {
    map.into_iter()
        .map(|(key, value)| (key, estimate(value, none_literals)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn est(s: &str) -> Value {
        estimate(json!(s), &default_none_literals())
    }

    #[test]
    fn test_plain_string_unchanged() {
        assert_eq!(est("this_is_a_string"), json!("this_is_a_string"));
    }

    #[test]
    fn test_booleans_any_case() {
        for s in ["true", "True", "TRUE", "tRuE"] {
            assert_eq!(est(s), json!(true));
        }
        for s in ["false", "False", "FALSE"] {
            assert_eq!(est(s), json!(false));
        }
    }

    #[test]
    fn test_none_literals() {
        for s in ["", "none", "null", "NONE", "None", "Null"] {
            assert_eq!(est(s), Value::Null, "{:?}", s);
        }
    }

    #[test]
    fn test_custom_none_literals() {
        let only_words: BTreeSet<String> = ["null", "none"].iter().map(|s| s.to_string()).collect();
        assert_eq!(estimate(json!(""), &only_words), json!(""));
        assert_eq!(estimate(json!("NULL"), &only_words), Value::Null);

        let with_nil: BTreeSet<String> = ["NIL"].iter().map(|s| s.to_string()).collect();
        assert_eq!(estimate(json!("nil"), &with_nil), Value::Null);
        assert_eq!(estimate(json!("none"), &with_nil), json!("none"));
    }

    #[test]
    fn test_numbers() {
        assert_eq!(est("123"), json!(123));
        assert_eq!(est("123.123"), json!(123.123));
        assert_eq!(est("-4"), json!(-4));
    }

    #[test]
    fn test_malformed_literal_falls_back() {
        assert_eq!(est("kafka:8082"), json!("kafka:8082"));
        assert_eq!(est("[unclosed"), json!("[unclosed"));
    }

    #[test]
    fn test_list_elements_are_estimated() {
        assert_eq!(est("['a', 1, 'True']"), json!(["a", 1, true]));
        assert_eq!(est("['8080', 'none']"), json!([8080, null]));
    }

    #[test]
    fn test_mapping_values_are_estimated() {
        assert_eq!(
            est("{'string': 'string', 'int': 1, 'flag': 'FALSE'}"),
            json!({"string": "string", "int": 1, "flag": false})
        );
    }

    #[test]
    fn test_non_string_inputs() {
        let none = default_none_literals();
        assert_eq!(estimate(json!(5), &none), json!(5));
        assert_eq!(estimate(json!(["1", "2"]), &none), json!(["1", "2"]));
        assert_eq!(
            estimate(json!({"port": "80", "nested": {"on": "true"}}), &none),
            json!({"port": 80, "nested": {"on": true}})
        );
    }

    #[test]
    fn test_deeply_nested_input_falls_back() {
        let open = "[".repeat(100_000);
        assert_eq!(est(&open), json!(open));

        let balanced = format!("{}1{}", "[".repeat(3000), "]".repeat(3000));
        assert_eq!(est(&balanced), json!(balanced));
    }

    #[test]
    fn test_quoted_string_loses_quotes() {
        assert_eq!(est("'8080'"), json!("8080"));
    }
}
