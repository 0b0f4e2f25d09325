use serde_json::Value;

/// Strict identity check between two JSON values.
///
/// Unlike `==` on `serde_json::Value`, object entries must appear in the same
/// order, and integers never equal floats (`1` is not identical to `1.0`).
/// Pair it with [`sort_keys`](crate::canonical::sort_keys) to compare content
/// regardless of key order.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use patchwork_util::json_equal::identical;
///
/// assert!(identical(&json!({"a": [1, 2]}), &json!({"a": [1, 2]})));
/// assert!(!identical(&json!({"a": 1, "b": 2}), &json!({"b": 2, "a": 1})));
/// assert!(!identical(&json!(1), &json!(1.0)));
/// ```
pub fn identical(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => {
            (a.is_f64() == b.is_f64()) && a == b
        }
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| identical(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a
                    .iter()
                    .zip(b)
                    .all(|((ka, va), (kb, vb))| ka == kb && identical(va, vb))
        }
        // Different types are never identical
        _ => false,
    }
}
