//! Mapping merge helpers.
//!
//! Source layers in a bulk read are merged shallowly: a higher priority layer
//! replaces whole top-level keys. Deep merging is only used to assemble nested
//! environment variables.

use serde_json::{Map, Value};

/// Overlay `layer` onto `target`, replacing top-level keys.
pub fn overlay_shallow(target: &mut Map<String, Value>, layer: Map<String, Value>) {
    target.extend(layer);
}

/// Deep merge `overlay` into `base`, with `overlay` taking precedence.
///
/// - Mappings are merged recursively
/// - Any other overlay value replaces the base value
pub fn deep_merge(base: &mut Map<String, Value>, overlay: Map<String, Value>) {
    for (key, overlay_value) in overlay {
        match overlay_value {
            Value::Object(overlay_map) => {
                if let Some(Value::Object(base_map)) = base.get_mut(&key) {
                    deep_merge(base_map, overlay_map);
                } else {
                    base.insert(key, Value::Object(overlay_map));
                }
            }
            other => {
                base.insert(key, other);
            }
        }
    }
}

/// Insert `value` at the nested path `segments`, creating mappings on the way.
///
/// A non-mapping value sitting on the path is replaced by a mapping. An empty path
/// is a no-op.
pub fn insert_path(target: &mut Map<String, Value>, segments: &[&str], value: Value) {
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    let mut current = target;
    for segment in parents {
        let entry = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        let Value::Object(next) = entry else {
            return;
        };
        current = next;
    }

    let mut single = Map::new();
    single.insert(last.to_string(), value);
    deep_merge(current, single);
}
