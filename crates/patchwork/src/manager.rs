//! Whole-document patching.
//!
//! [`PatchManager`] takes a request body, checks its shape, applies every
//! operation in order to a [`Patchable`] target, validates the result and
//! commits. Merge-patch requests are handed to the target itself.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use patchwork_json_pointer::PointerPath;
use serde_json::Value as Json;
use tracing::{debug, warn};

use crate::accessor::PathAccessor;
use crate::error::PatchError;
use crate::json_patch::{from_json_patch, validate_operations, OperationDescriptor, OperationDispatcher};
use crate::value::Value;

const MERGE_PATCH_PREFIX: &str = "application/merge-patch+";

// ── Collaborators ─────────────────────────────────────────────────────────

/// A patch target: a host value plus a way to persist it.
pub trait Patchable {
    fn host(&mut self) -> &mut Value;

    /// Called once after every operation succeeded and validation passed.
    fn commit(&mut self) -> Result<(), PatchError>;

    /// Targets that accept merge patches return themselves here.
    fn as_mergeable(&mut self) -> Option<&mut dyn MergePatchable> {
        None
    }
}

pub trait MergePatchable {
    /// Applies a merge-patch document to the target's own state.
    fn merge(&mut self, document: &Json) -> Result<(), PatchError>;
}

/// A constraint violation reported by a [`Validator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Property path such as `name` or `children[0].name`; `None` for the
    /// whole object.
    pub property_path: Option<String>,
    pub message: String,
}

impl Violation {
    pub fn new(property_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            property_path: Some(property_path.into()),
            message: message.into(),
        }
    }

    pub fn root(message: impl Into<String>) -> Self {
        Self {
            property_path: None,
            message: message.into(),
        }
    }

    /// Top-level property the violation is about.
    pub fn first_element(&self) -> Option<&str> {
        self.property_path
            .as_deref()
            .and_then(|path| path.split(['.', '[']).next())
            .filter(|element| !element.is_empty())
    }
}

pub trait Validator: Send + Sync {
    fn validate(&self, host: &Value) -> Vec<Violation>;
}

// ── Request ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct PatchRequest {
    pub content_type: Option<String>,
    pub body: Json,
}

impl PatchRequest {
    pub fn new(content_type: Option<String>, body: Json) -> Self {
        Self { content_type, body }
    }

    /// `application/json-patch+json` request.
    pub fn json_patch(body: Json) -> Self {
        Self::new(Some("application/json-patch+json".into()), body)
    }

    /// `application/merge-patch+json` request.
    pub fn merge_patch(body: Json) -> Self {
        Self::new(Some("application/merge-patch+json".into()), body)
    }

    pub fn is_merge_patch(&self) -> bool {
        self.content_type.as_deref().is_some_and(|ct| {
            ct.get(..MERGE_PATCH_PREFIX.len())
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case(MERGE_PATCH_PREFIX))
        })
    }
}

// ── Manager ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct PatchManagerOptions {
    /// Reject documents that are not a non-empty array of well-formed
    /// operations before touching the target.
    pub validate_shape: bool,
}

impl Default for PatchManagerOptions {
    fn default() -> Self {
        Self {
            validate_shape: true,
        }
    }
}

#[derive(Default)]
pub struct PatchManager {
    dispatcher: OperationDispatcher,
    validator: Option<Box<dyn Validator>>,
    options: PatchManagerOptions,
}

impl fmt::Debug for PatchManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatchManager")
            .field("dispatcher", &self.dispatcher)
            .field("validator", &self.validator.is_some())
            .field("options", &self.options)
            .finish()
    }
}

impl PatchManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Manager sharing an existing accessor and its caches.
    pub fn with_accessor(accessor: Arc<PathAccessor>) -> Self {
        Self {
            dispatcher: OperationDispatcher::new(accessor),
            ..Self::default()
        }
    }

    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validator = Some(Box::new(validator));
        self
    }

    pub fn options(mut self, options: PatchManagerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn dispatcher(&self) -> &OperationDispatcher {
        &self.dispatcher
    }

    /// Applies `request` to `target` and commits it.
    ///
    /// Accessor failures are reported as [`PatchError::OperationFailed`]
    /// naming the operation path. Operations applied before a failure stay
    /// applied and nothing is committed.
    pub fn patch(&self, target: &mut dyn Patchable, request: &PatchRequest) -> Result<(), PatchError> {
        if request.is_merge_patch() {
            let Some(mergeable) = target.as_mergeable() else {
                return Err(PatchError::UnmergeablePatch);
            };
            debug!("applying merge patch");
            mergeable.merge(&request.body)?;
            return target.commit();
        }

        if self.options.validate_shape {
            validate_operations(&request.body).map_err(|e| {
                debug!(reason = %e, "rejected patch document");
                PatchError::InvalidPatchDocument("Invalid document.".into())
            })?;
        }
        let ops = from_json_patch(&request.body)?;

        for op in &ops {
            if let Err(e) = self.dispatcher.apply(target.host(), op) {
                if !is_accessor_failure(&e) {
                    return Err(e);
                }
                warn!(op = %op.op, path = %op.path, error = %e, "operation failed");
                return Err(PatchError::OperationFailed {
                    path: op.path.clone(),
                    source: Box::new(e),
                });
            }
        }

        self.validate(&ops, target.host())?;
        target.commit()
    }

    /// Keeps violations on the root or on a patched top-level property.
    fn validate(&self, ops: &[OperationDescriptor], host: &Value) -> Result<(), PatchError> {
        let Some(validator) = &self.validator else {
            return Ok(());
        };
        let violations = validator.validate(host);
        if violations.is_empty() {
            return Ok(());
        }

        let patched: HashSet<String> = ops
            .iter()
            .filter_map(|op| PointerPath::parse(&op.path).ok())
            .filter_map(|path| path.tokens().first().cloned())
            .collect();
        let kept = violations
            .iter()
            .filter(|v| v.first_element().map_or(true, |first| patched.contains(first)))
            .inspect(|v| debug!(path = ?v.property_path, message = %v.message, "violation"))
            .count();
        if kept == 0 {
            return Ok(());
        }
        Err(PatchError::InvalidPatchDocument("Invalid entity".into()))
    }
}

/// Failures raised while resolving or writing a path, as opposed to a
/// malformed or failed patch document.
fn is_accessor_failure(e: &PatchError) -> bool {
    matches!(
        e,
        PatchError::NoSuchProperty(_)
            | PatchError::UnexpectedType { .. }
            | PatchError::OperationNotAllowed(_)
            | PatchError::InvalidArgument(_)
            | PatchError::InvalidIndex(_)
            | PatchError::OutOfBounds { .. }
    )
}
