//! Shape validation for raw RFC 6902 documents.
//!
//! Works on the decoded `serde_json::Value` before any operation is built,
//! so untrusted input can be rejected as a whole before the host is touched.

use std::fmt;

use patchwork_json_pointer::validate_json_pointer;
use serde_json::{Map, Value};

use super::types::OpKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ValidationError {}

fn err(msg: &str) -> ValidationError {
    ValidationError(msg.to_string())
}

/// Validates a whole patch document: a non-empty array of operations.
///
/// Errors name the failing index: `"Error in operation [index = N] (reason)."`.
pub fn validate_operations(ops: &Value) -> Result<(), ValidationError> {
    let arr = ops.as_array().ok_or_else(|| err("Not an array."))?;
    if arr.is_empty() {
        return Err(err("Empty operation patch."));
    }
    for (i, op) in arr.iter().enumerate() {
        validate_operation(op).map_err(|e| {
            ValidationError(format!("Error in operation [index = {}] ({}).", i, e.0))
        })?;
    }
    Ok(())
}

/// Validates one operation object.
pub fn validate_operation(op: &Value) -> Result<(), ValidationError> {
    let map = op.as_object().ok_or_else(|| err("OP_INVALID"))?;

    map.get("path")
        .and_then(Value::as_str)
        .filter(|path| validate_json_pointer(path).is_ok())
        .ok_or_else(|| err("OP_PATH_INVALID"))?;

    let name = map
        .get("op")
        .and_then(Value::as_str)
        .ok_or_else(|| err("OP_UNKNOWN"))?;
    let kind: OpKind = name.parse().map_err(|_| err("OP_UNKNOWN"))?;

    if kind.requires_from() {
        validate_from(map)?;
    }
    if kind.requires_value() && !map.contains_key("value") {
        return Err(err("OP_VALUE_MISSING"));
    }
    Ok(())
}

fn validate_from(map: &Map<String, Value>) -> Result<(), ValidationError> {
    map.get("from")
        .and_then(Value::as_str)
        .filter(|from| validate_json_pointer(from).is_ok())
        .map(|_| ())
        .ok_or_else(|| err("OP_FROM_INVALID"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ops_throws_not_array() {
        assert_eq!(
            validate_operations(&json!(123)),
            Err(ValidationError("Not an array.".into()))
        );
        assert_eq!(
            validate_operations(&json!({"op": "add"})),
            Err(ValidationError("Not an array.".into()))
        );
    }

    #[test]
    fn ops_throws_empty_array() {
        assert_eq!(
            validate_operations(&json!([])),
            Err(ValidationError("Empty operation patch.".into()))
        );
    }

    #[test]
    fn ops_throws_invalid_operation_type() {
        assert_eq!(
            validate_operations(&json!([123])),
            Err(ValidationError(
                "Error in operation [index = 0] (OP_INVALID).".into()
            ))
        );
    }

    #[test]
    fn ops_throws_no_path() {
        assert_eq!(
            validate_operations(&json!([{"op": "remove"}])),
            Err(ValidationError(
                "Error in operation [index = 0] (OP_PATH_INVALID).".into()
            ))
        );
        assert!(validate_operation(&json!({"op": "remove", "path": 1})).is_err());
        assert_eq!(
            validate_operation(&json!({"op": "remove", "path": "a"})),
            Err(ValidationError("OP_PATH_INVALID".into()))
        );
    }

    #[test]
    fn ops_throws_unknown_op() {
        assert_eq!(
            validate_operations(&json!([{"op": "remove", "path": "/a"}, {"op": "inc", "path": ""}])),
            Err(ValidationError(
                "Error in operation [index = 1] (OP_UNKNOWN).".into()
            ))
        );
    }

    #[test]
    fn op_requires_from_and_value() {
        assert_eq!(
            validate_operation(&json!({"op": "move", "path": "/a"})),
            Err(err("OP_FROM_INVALID"))
        );
        assert_eq!(
            validate_operation(&json!({"op": "copy", "path": "/a", "from": 1})),
            Err(err("OP_FROM_INVALID"))
        );
        assert_eq!(
            validate_operation(&json!({"op": "test", "path": "/a"})),
            Err(err("OP_VALUE_MISSING"))
        );
        assert!(validate_operation(&json!({"op": "add", "path": "/a", "value": null})).is_ok());
    }
}
