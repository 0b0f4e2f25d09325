//! Core types for the JSON Patch module.

use std::fmt;
use std::str::FromStr;

use crate::error::PatchError;
use crate::value::Value;

// ── Op kind ───────────────────────────────────────────────────────────────

/// The six RFC 6902 operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    Add,
    Remove,
    Replace,
    Move,
    Copy,
    Test,
}

impl OpKind {
    pub const ALL: [OpKind; 6] = [
        OpKind::Add,
        OpKind::Remove,
        OpKind::Replace,
        OpKind::Move,
        OpKind::Copy,
        OpKind::Test,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OpKind::Add => "add",
            OpKind::Remove => "remove",
            OpKind::Replace => "replace",
            OpKind::Move => "move",
            OpKind::Copy => "copy",
            OpKind::Test => "test",
        }
    }

    /// Operations that read a second location.
    pub fn requires_from(&self) -> bool {
        matches!(self, OpKind::Move | OpKind::Copy)
    }

    /// Operations that carry a `value` member.
    pub fn requires_value(&self) -> bool {
        matches!(self, OpKind::Add | OpKind::Replace | OpKind::Test)
    }
}

impl FromStr for OpKind {
    type Err = PatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OpKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                PatchError::UnknownOperation(format!(
                    "Unknown operation \"{s}\" has been requested."
                ))
            })
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Descriptor ────────────────────────────────────────────────────────────

/// One decoded operation. Paths stay in their textual form so failures can
/// quote them as written.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationDescriptor {
    pub op: OpKind,
    pub path: String,
    pub from: Option<String>,
    pub value: Option<Value>,
}

impl OperationDescriptor {
    pub fn new(op: OpKind, path: impl Into<String>) -> Self {
        Self {
            op,
            path: path.into(),
            from: None,
            value: None,
        }
    }

    pub fn add(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(OpKind::Add, path).with_value(value)
    }

    pub fn remove(path: impl Into<String>) -> Self {
        Self::new(OpKind::Remove, path)
    }

    pub fn replace(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(OpKind::Replace, path).with_value(value)
    }

    pub fn move_from(from: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(OpKind::Move, path).with_from(from)
    }

    pub fn copy_from(from: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(OpKind::Copy, path).with_from(from)
    }

    pub fn test(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(OpKind::Test, path).with_value(value)
    }

    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// The `from` member, or an error naming the operation.
    pub fn from_path(&self) -> Result<&str, PatchError> {
        self.from.as_deref().ok_or_else(|| {
            PatchError::InvalidPatchDocument(format!("{} requires 'from'", self.op))
        })
    }

    /// The `value` member; absent values read as `Null`.
    pub fn value_or_null(&self) -> Value {
        self.value.clone().unwrap_or_default()
    }
}
