//! Operation lookup by name.

use std::sync::Arc;

use tracing::debug;

use super::ops::OperationEngine;
use super::types::{OpKind, OperationDescriptor};
use crate::accessor::PathAccessor;
use crate::error::PatchError;
use crate::value::Value;

/// Maps operation names to [`OperationEngine`] members.
#[derive(Debug, Clone, Default)]
pub struct OperationDispatcher {
    engine: OperationEngine,
}

impl OperationDispatcher {
    pub fn new(accessor: Arc<PathAccessor>) -> Self {
        Self {
            engine: OperationEngine::new(accessor),
        }
    }

    pub fn engine(&self) -> &OperationEngine {
        &self.engine
    }

    /// # Errors
    ///
    /// `UnknownOperation` for anything but the six RFC 6902 names.
    pub fn resolve(&self, name: &str) -> Result<Operation<'_>, PatchError> {
        Ok(self.operation(name.parse()?))
    }

    pub fn operation(&self, kind: OpKind) -> Operation<'_> {
        Operation {
            engine: &self.engine,
            kind,
        }
    }

    /// Runs a decoded descriptor.
    pub fn apply(&self, host: &mut Value, op: &OperationDescriptor) -> Result<(), PatchError> {
        self.operation(op.op).execute(host, op)
    }
}

/// A resolved operation bound to its engine.
#[derive(Debug, Clone, Copy)]
pub struct Operation<'a> {
    engine: &'a OperationEngine,
    kind: OpKind,
}

impl Operation<'_> {
    pub fn kind(&self) -> OpKind {
        self.kind
    }

    pub fn execute(&self, host: &mut Value, op: &OperationDescriptor) -> Result<(), PatchError> {
        debug!(op = %self.kind, path = %op.path, from = ?op.from, "applying operation");
        match self.kind {
            OpKind::Add => self.engine.add(host, op),
            OpKind::Remove => self.engine.remove(host, op),
            OpKind::Replace => self.engine.replace(host, op),
            OpKind::Move => self.engine.move_(host, op),
            OpKind::Copy => self.engine.copy(host, op),
            OpKind::Test => self.engine.test(host, op),
        }
    }
}
