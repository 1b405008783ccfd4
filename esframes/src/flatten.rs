//! Flatten nested documents into dotted-path keys

use serde_json::{Map, Value};

/// Flatten a document into `path.to.leaf -> value`.
///
/// Nested objects are joined with `.`, array elements use their index as the
/// path segment. Empty objects and arrays are kept as values under their own
/// path. A non-object document flattens to an empty map.
pub fn flatten(doc: &Value) -> Map<String, Value> {
    let mut out = Map::new();
    if let Value::Object(obj) = doc {
        for (key, value) in obj {
            step(value, key.clone(), &mut out);
        }
    }
    out
}

fn step(value: &Value, path: String, out: &mut Map<String, Value>) {
    match value {
        Value::Object(obj) if !obj.is_empty() => {
            for (key, child) in obj {
                step(child, format!("{}.{}", path, key), out);
            }
        }
        Value::Array(items) if !items.is_empty() => {
            for (i, child) in items.iter().enumerate() {
                step(child, format!("{}.{}", path, i), out);
            }
        }
        leaf => {
            out.insert(path, leaf.clone());
        }
    }
}
