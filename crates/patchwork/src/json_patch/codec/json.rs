//! JSON codec for patch operations.
//!
//! Converts operations to and from `serde_json::Value` in RFC 6902 format.
//! Values are decoded into plain host values (maps, lists, scalars).

use serde_json::{Map, Value as Json};

use crate::error::PatchError;
use crate::json_patch::types::{OpKind, OperationDescriptor};
use crate::value::Value;

fn invalid(msg: impl Into<String>) -> PatchError {
    PatchError::InvalidPatchDocument(msg.into())
}

fn decode_path(v: &Json, key: &str) -> Result<String, PatchError> {
    v.as_str()
        .map(str::to_string)
        .ok_or_else(|| invalid(format!("{key} must be a string")))
}

// ── Serialization ─────────────────────────────────────────────────────────

/// Serialize a descriptor to its RFC 6902 object form.
pub fn to_json(op: &OperationDescriptor) -> Json {
    let mut m = Map::new();
    m.insert("op".into(), Json::from(op.op.as_str()));
    m.insert("path".into(), Json::from(op.path.as_str()));
    if let Some(from) = &op.from {
        m.insert("from".into(), Json::from(from.as_str()));
    }
    if let Some(value) = &op.value {
        m.insert("value".into(), value.to_json());
    }
    Json::Object(m)
}

pub fn to_json_patch(ops: &[OperationDescriptor]) -> Json {
    Json::Array(ops.iter().map(to_json).collect())
}

// ── Deserialization ───────────────────────────────────────────────────────

/// Deserialize one operation object.
///
/// # Errors
///
/// `UnknownOperation` for an unrecognised `op`, `InvalidPatchDocument` for
/// any other malformed member.
pub fn from_json(v: &Json) -> Result<OperationDescriptor, PatchError> {
    let obj = v
        .as_object()
        .ok_or_else(|| invalid("operation must be an object"))?;
    let op: OpKind = obj
        .get("op")
        .and_then(Json::as_str)
        .ok_or_else(|| invalid("missing 'op' field"))?
        .parse()?;
    let path = decode_path(
        obj.get("path").ok_or_else(|| invalid("missing 'path' field"))?,
        "path",
    )?;

    let mut descriptor = OperationDescriptor::new(op, path);
    if op.requires_from() {
        let from = obj
            .get("from")
            .ok_or_else(|| invalid(format!("{op} requires 'from'")))?;
        descriptor.from = Some(decode_path(from, "from")?);
    }
    if op.requires_value() {
        let value = obj
            .get("value")
            .ok_or_else(|| invalid(format!("{op} requires 'value'")))?;
        descriptor.value = Some(Value::from(value));
    }
    Ok(descriptor)
}

pub fn from_json_patch(v: &Json) -> Result<Vec<OperationDescriptor>, PatchError> {
    let arr = v
        .as_array()
        .ok_or_else(|| invalid("patch must be an array"))?;
    arr.iter().map(from_json).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_rfc6902_patch() {
        let patch = json!([
            {"op": "test", "path": "/a/b/c", "value": "foo"},
            {"op": "remove", "path": "/a/b/c"},
            {"op": "add", "path": "/a/b/c", "value": ["foo", "bar"]},
            {"op": "replace", "path": "/a/b/c", "value": 42},
            {"op": "move", "from": "/a/b/c", "path": "/a/b/d"},
            {"op": "copy", "from": "/a/b/d", "path": "/a/b/e"}
        ]);
        let ops = from_json_patch(&patch).unwrap();
        let kinds: Vec<OpKind> = ops.iter().map(|op| op.op).collect();
        assert_eq!(
            kinds,
            [
                OpKind::Test,
                OpKind::Remove,
                OpKind::Add,
                OpKind::Replace,
                OpKind::Move,
                OpKind::Copy
            ]
        );
        assert_eq!(ops[4].from.as_deref(), Some("/a/b/c"));
        assert_eq!(ops[2].value, Some(Value::from(json!(["foo", "bar"]))));
        assert_eq!(ops[1].value, None);
    }

    #[test]
    fn encode_keeps_members() {
        let op = OperationDescriptor::copy_from("/x", "/y");
        assert_eq!(to_json(&op), json!({"op": "copy", "path": "/y", "from": "/x"}));
        let op = OperationDescriptor::add("/a", Value::from(json!({"k": [1]})));
        assert_eq!(
            to_json(&op),
            json!({"op": "add", "path": "/a", "value": {"k": [1]}})
        );
    }

    #[test]
    fn decode_errors() {
        assert_eq!(
            from_json(&json!({"op": "frobnicate", "path": "/a"})),
            Err(PatchError::UnknownOperation(
                "Unknown operation \"frobnicate\" has been requested.".into()
            ))
        );
        assert_eq!(
            from_json(&json!({"op": "add", "path": "/a"})),
            Err(invalid("add requires 'value'"))
        );
        assert_eq!(
            from_json(&json!({"op": "move", "path": "/a", "from": 3})),
            Err(invalid("from must be a string"))
        );
        assert!(from_json(&json!("add")).is_err());
        assert!(from_json_patch(&json!({})).is_err());
    }
}
