//! Environment variables.
//!
//! Values have their backslash escapes decoded, so a variable holding a literal `\n`
//! yields a real newline. With a nesting divider, `DB__HOST=x` and `DB__PORT=1`
//! become `{"db": {"host": "x", "port": "1"}}`.

use crate::config::merge::insert_path;
use crate::escape::unescape_lenient;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

fn lookup_name(name: &str, force_uppercase: bool) -> String {
    if force_uppercase {
        name.to_uppercase()
    } else {
        name.to_string()
    }
}

/// The decoded value of `name` (uppercased when forced).
pub fn read_var(
    vars: &BTreeMap<String, String>,
    name: &str,
    force_uppercase: bool,
) -> Option<String> {
    vars.get(&lookup_name(name, force_uppercase))
        .map(|raw| unescape_lenient(raw))
}

/// Every variable reachable through [`read_var`], keyed the way callers query it.
///
/// With `force_uppercase`, only all-uppercase names are reachable and they are
/// returned lowercased. A non-empty `prefix` keeps only prefixed variables and
/// strips the prefix from their keys.
pub fn read_all_vars(
    vars: &BTreeMap<String, String>,
    force_uppercase: bool,
    prefix: &str,
) -> Vec<(String, String)> {
    let prefix = lookup_name(prefix, force_uppercase);
    vars.iter()
        .filter(|(name, _)| !force_uppercase || name.to_uppercase() == **name)
        .filter_map(|(name, raw)| {
            let key = name.strip_prefix(prefix.as_str())?;
            if key.is_empty() {
                return None;
            }
            let key = if force_uppercase {
                key.to_lowercase()
            } else {
                key.to_string()
            };
            Some((key, unescape_lenient(raw)))
        })
        .collect()
}

/// Wrap `value` into nested mappings along `key` split on `divider`.
///
/// A key without the divider keeps its flat value.
pub fn split_var(key: &str, value: Value, divider: &str) -> Value {
    let segments: Vec<&str> = key.split(divider).collect();
    if divider.is_empty() || segments.len() < 2 {
        return value;
    }
    let mut map = Map::new();
    insert_path(&mut map, &segments, value);
    Value::Object(map)
}

/// Nest every pair on `divider` and deep-merge the results.
pub fn nest_all(pairs: Vec<(String, String)>, divider: &str) -> Map<String, Value> {
    let mut map = Map::new();
    for (key, value) in pairs {
        let segments: Vec<&str> = if divider.is_empty() {
            vec![key.as_str()]
        } else {
            key.split(divider).collect()
        };
        insert_path(&mut map, &segments, Value::String(value));
    }
    map
}
