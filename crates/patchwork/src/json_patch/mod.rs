//! JSON Patch (RFC 6902) over host values.
//!
//! # Operations
//!
//! `add`, `remove`, `replace`, `move`, `copy` and `test`, each built on
//! [`PathAccessor`](crate::accessor::PathAccessor) reads and writes.
//! Operations are applied one at a time; there is no rollback when a later
//! operation fails.

pub mod codec;
pub mod dispatch;
pub mod equality;
pub mod ops;
pub mod types;
pub mod validate;

pub use codec::json::{from_json, from_json_patch, to_json, to_json_patch};
pub use dispatch::{Operation, OperationDispatcher};
pub use equality::{loose_eq, test_equal, truthy};
pub use ops::OperationEngine;
pub use types::{OpKind, OperationDescriptor};
pub use validate::{validate_operation, validate_operations, ValidationError};
