//! Error types shared by the accessor, the operations and the manager.

use patchwork_json_pointer::PointerError;
use thiserror::Error;

// ── Host errors ───────────────────────────────────────────────────────────

/// Failure reported by host code (`Record` methods, `Container` storage).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The host vetoed this mutation.
    #[error("{0}")]
    NotAllowed(String),
    /// The member does not exist or could not be invoked.
    #[error("{0}")]
    Failed(String),
}

impl HostError {
    pub fn unknown_method(type_name: &str, method: &str) -> Self {
        HostError::Failed(format!(
            "Call to undefined method {type_name}::{method}()"
        ))
    }

    pub fn unknown_field(type_name: &str, field: &str) -> Self {
        HostError::Failed(format!("Undefined property: {type_name}::${field}"))
    }
}

// ── Patch errors ──────────────────────────────────────────────────────────

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PatchError {
    #[error("Invalid pointer syntax: {0}")]
    InvalidPointerSyntax(String),
    #[error("The index {index} is not within the property path (length {len})")]
    OutOfBounds { index: usize, len: usize },
    #[error("Expected a record or a container at token {index} of \"{path}\"")]
    UnexpectedType { path: String, index: usize },
    #[error("{0}")]
    NoSuchProperty(String),
    #[error("{0}")]
    InvalidArgument(String),
    #[error("Invalid index \"{0}\"")]
    InvalidIndex(String),
    #[error("{0}")]
    InvalidPatchDocument(String),
    #[error("{0}")]
    UnknownOperation(String),
    #[error("{0}")]
    OperationNotAllowed(String),
    #[error("Operation failed at path \"{path}\"")]
    OperationFailed {
        path: String,
        #[source]
        source: Box<PatchError>,
    },
    #[error("Resource cannot be merge patched.")]
    UnmergeablePatch,
}

impl PatchError {
    /// Misses that readable/writable probes answer with `false`.
    pub fn is_probe_miss(&self) -> bool {
        matches!(
            self,
            PatchError::UnexpectedType { .. } | PatchError::NoSuchProperty(_)
        )
    }
}

impl From<PointerError> for PatchError {
    fn from(e: PointerError) -> Self {
        match e {
            PointerError::OutOfBounds { index, len } => PatchError::OutOfBounds { index, len },
            other => PatchError::InvalidPointerSyntax(other.to_string()),
        }
    }
}

/// Host failures raised while invoking a resolved accessor.
impl From<HostError> for PatchError {
    fn from(e: HostError) -> Self {
        match e {
            HostError::NotAllowed(message) => PatchError::OperationNotAllowed(message),
            HostError::Failed(message) => PatchError::NoSuchProperty(message),
        }
    }
}
