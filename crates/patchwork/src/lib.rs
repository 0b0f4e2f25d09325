//! patchwork - JSON Patch (RFC 6902) over typed host values.
//!
//! Patches are applied to a [`Value`] tree whose nodes may be plain data
//! (maps, lists, scalars), shared collections or typed records. Records are
//! reached through the accessors they declare in their [`TypeInfo`]: getters
//! and setters, public fields, catch-all accessors, or adder/remover pairs
//! for collection properties.
//!
//! # Modules
//!
//! - [`value`]: the host value model, [`Record`] and [`Container`].
//! - [`accessor`]: [`PathAccessor`] and the [`CapabilityResolver`] behind it.
//! - [`json_patch`]: the six operations, their dispatcher and JSON codec.
//! - [`manager`]: [`PatchManager`], which applies whole request documents.
//!
//! # Example
//!
//! ```
//! use patchwork::json_patch::{from_json_patch, OperationDispatcher};
//! use patchwork::value::Value;
//! use serde_json::json;
//!
//! let mut doc = Value::from(json!({"a": {"b": {"c": "foo"}}}));
//! let patch = from_json_patch(&json!([
//!     {"op": "test", "path": "/a/b/c", "value": "foo"},
//!     {"op": "replace", "path": "/a/b/c", "value": 42},
//!     {"op": "move", "from": "/a/b/c", "path": "/a/b/d"},
//! ]))
//! .unwrap();
//!
//! let dispatcher = OperationDispatcher::default();
//! for op in &patch {
//!     dispatcher.apply(&mut doc, op).unwrap();
//! }
//! assert_eq!(doc.to_json(), json!({"a": {"b": {"d": 42}}}));
//! ```

pub mod accessor;
pub mod error;
pub mod json_patch;
pub mod manager;
pub mod value;

pub use accessor::{AccessorOptions, CapabilityResolver, DecisionCache, MemoryCache, NoopCache, PathAccessor};
pub use error::{HostError, PatchError};
pub use json_patch::{OpKind, OperationDescriptor, OperationDispatcher};
pub use manager::{
    MergePatchable, PatchManager, PatchManagerOptions, PatchRequest, Patchable, Validator, Violation,
};
pub use patchwork_json_pointer::PointerPath;
pub use value::{ArrayCollection, Container, DynamicRecord, Record, TypeInfo, Value};
