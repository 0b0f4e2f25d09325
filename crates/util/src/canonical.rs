//! Canonical key ordering for JSON trees.
//!
//! Two trees that hold the same data with differently ordered objects become
//! identical once both are canonicalized.

use serde_json::{Map, Value};

use crate::obj_key_cmp::obj_key_cmp;

/// Recursively reorder every object's keys with [`obj_key_cmp`].
///
/// Arrays keep their element order; their elements are canonicalized.
///
/// # Examples
///
/// ```
/// use patchwork_util::canonical::sort_keys;
/// use serde_json::json;
///
/// let mut value = json!({"b": 1, "a": {"d": 2, "c": 3}});
/// sort_keys(&mut value);
/// let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
/// assert_eq!(keys, ["a", "b"]);
/// ```
pub fn sort_keys(value: &mut Value) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = std::mem::take(map).into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| obj_key_cmp(a, b));
            let mut sorted = Map::with_capacity(entries.len());
            for (key, mut child) in entries {
                sort_keys(&mut child);
                sorted.insert(key, child);
            }
            *map = sorted;
        }
        Value::Array(items) => items.iter_mut().for_each(sort_keys),
        _ => {}
    }
}

/// Owned variant of [`sort_keys`].
pub fn canonicalize(mut value: Value) -> Value {
    sort_keys(&mut value);
    value
}
