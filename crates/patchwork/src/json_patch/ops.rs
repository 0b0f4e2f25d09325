//! The six patch operations, built on [`PathAccessor`].

use std::sync::Arc;

use patchwork_json_pointer::PointerPath;
use tracing::trace;

use super::equality::test_equal;
use super::types::OperationDescriptor;
use crate::accessor::PathAccessor;
use crate::error::PatchError;
use crate::value::Value;

/// Applies single operations to a host value in place.
#[derive(Debug, Clone)]
pub struct OperationEngine {
    accessor: Arc<PathAccessor>,
}

impl Default for OperationEngine {
    fn default() -> Self {
        Self::new(Arc::new(PathAccessor::new()))
    }
}

impl OperationEngine {
    pub fn new(accessor: Arc<PathAccessor>) -> Self {
        Self { accessor }
    }

    pub fn accessor(&self) -> &PathAccessor {
        &self.accessor
    }

    pub fn add(&self, host: &mut Value, op: &OperationDescriptor) -> Result<(), PatchError> {
        self.accessor.set(host, &op.path, op.value_or_null())
    }

    /// Deletes the addressed element from its parent container. A `null`
    /// parent is left alone; a record property is reset to `null`.
    pub fn remove(&self, host: &mut Value, op: &OperationDescriptor) -> Result<(), PatchError> {
        let path = self.accessor.path(&op.path)?;
        let element = path.element(path.len().saturating_sub(1))?.to_string();
        let parent = path.parent();

        let mut target = match &parent {
            Some(parent) => self.accessor.get_at(host, parent)?,
            None => {
                return self.remove_from(host, &path, &element);
            }
        };
        if self.remove_from_detached(host, &path, &element, &mut target)? {
            if let Some(parent) = parent {
                self.accessor.set_at(host, &parent, target)?;
            }
        }
        Ok(())
    }

    /// Removal at the root: the host itself is the parent.
    fn remove_from(&self, host: &mut Value, path: &PointerPath, element: &str) -> Result<(), PatchError> {
        match host {
            Value::Null => Ok(()),
            Value::Map(_) | Value::List(_) | Value::Collection(_) => {
                trace!(element, "remove from root");
                host.delete(element).map(|_| ())
            }
            _ => self.reset_or_fail(host, path, element),
        }
    }

    /// Removal below the root. Returns whether `parent` must be stored back.
    fn remove_from_detached(
        &self,
        host: &mut Value,
        path: &PointerPath,
        element: &str,
        parent: &mut Value,
    ) -> Result<bool, PatchError> {
        match parent {
            Value::Null => Ok(false),
            Value::Map(_) | Value::List(_) | Value::Collection(_) => {
                trace!(element, "remove from container");
                parent.delete(element)?;
                Ok(true)
            }
            _ => self.reset_or_fail(host, path, element).map(|_| false),
        }
    }

    fn reset_or_fail(&self, host: &mut Value, path: &PointerPath, element: &str) -> Result<(), PatchError> {
        if self.accessor.is_writable_at(host, path)? {
            return self.accessor.set_at(host, path, Value::Null);
        }
        Err(PatchError::InvalidPatchDocument(format!(
            "Cannot remove \"{element}\": path does not represent a collection."
        )))
    }

    /// Overwrites an existing, non-null element.
    pub fn replace(&self, host: &mut Value, op: &OperationDescriptor) -> Result<(), PatchError> {
        let path = self.accessor.path(&op.path)?;
        let current = match self.accessor.get_at(host, &path) {
            Ok(value) => value,
            Err(PatchError::NoSuchProperty(_)) => Value::Null,
            Err(e) => return Err(e),
        };
        if current.is_null() {
            return Err(PatchError::InvalidPatchDocument(format!(
                "Element at path \"{path}\" does not exist."
            )));
        }
        self.accessor.set_at(host, &path, op.value_or_null())
    }

    /// Copy to `path`, then remove `from`.
    pub fn move_(&self, host: &mut Value, op: &OperationDescriptor) -> Result<(), PatchError> {
        self.copy(host, op)?;
        let mut removal = op.clone();
        removal.path = op.from_path()?.to_string();
        self.remove(host, &removal)
    }

    pub fn copy(&self, host: &mut Value, op: &OperationDescriptor) -> Result<(), PatchError> {
        let from = op.from_path()?;
        let value = match self.accessor.get(host, from) {
            Ok(value) => value,
            Err(PatchError::NoSuchProperty(_)) => {
                return Err(PatchError::InvalidPatchDocument(format!(
                    "Element at path \"{from}\" does not exist"
                )))
            }
            Err(e) => return Err(e),
        };
        self.accessor.set(host, &op.path, value)
    }

    pub fn test(&self, host: &mut Value, op: &OperationDescriptor) -> Result<(), PatchError> {
        let actual = self.accessor.get(host, &op.path)?;
        if test_equal(&actual, &op.value_or_null()) {
            Ok(())
        } else {
            Err(PatchError::InvalidPatchDocument(format!(
                "Test operation on \"{}\" failed.",
                op.path
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::DynamicRecord;
    use serde_json::json;

    fn engine() -> OperationEngine {
        OperationEngine::default()
    }

    #[test]
    fn test_add_and_append() {
        let mut host = Value::from(json!({"list": [1]}));
        let e = engine();
        e.add(&mut host, &OperationDescriptor::add("/list/-", 2)).unwrap();
        e.add(&mut host, &OperationDescriptor::add("/new", "x")).unwrap();
        assert_eq!(host.to_json(), json!({"list": [1, 2], "new": "x"}));
    }

    #[test]
    fn test_remove_from_nested_map_and_list() {
        let mut host = Value::from(json!({"a": {"b": 1, "c": 2}, "l": [1, 2, 3]}));
        let e = engine();
        e.remove(&mut host, &OperationDescriptor::remove("/a/b")).unwrap();
        e.remove(&mut host, &OperationDescriptor::remove("/l/0")).unwrap();
        e.remove(&mut host, &OperationDescriptor::remove("/missing")).unwrap();
        assert_eq!(host.to_json(), json!({"a": {"c": 2}, "l": [2, 3]}));
    }

    #[test]
    fn test_remove_under_null_parent_is_noop() {
        let mut host = Value::from(json!({"a": null}));
        engine()
            .remove(&mut host, &OperationDescriptor::remove("/a/b"))
            .unwrap();
        assert_eq!(host.to_json(), json!({"a": null}));
    }

    #[test]
    fn test_remove_record_property_resets_to_null() {
        let mut host = DynamicRecord::new().with("name", "x").into_value();
        engine()
            .remove(&mut host, &OperationDescriptor::remove("/name"))
            .unwrap();
        assert_eq!(host.to_json(), json!({"name": null}));
    }

    #[test]
    fn test_remove_from_scalar_fails() {
        let mut host = Value::from(json!({"a": 1}));
        let err = engine()
            .remove(&mut host, &OperationDescriptor::remove("/a/b"))
            .unwrap_err();
        assert_eq!(
            err,
            PatchError::InvalidPatchDocument(
                "Cannot remove \"b\": path does not represent a collection.".into()
            )
        );
    }

    #[test]
    fn test_replace_requires_existing_value() {
        let mut host = Value::from(json!({"a": 1, "n": null}));
        let e = engine();
        e.replace(&mut host, &OperationDescriptor::replace("/a", 2)).unwrap();
        assert_eq!(
            e.replace(&mut host, &OperationDescriptor::replace("/n", 2)),
            Err(PatchError::InvalidPatchDocument(
                "Element at path \"/n\" does not exist.".into()
            ))
        );
        assert_eq!(host.to_json(), json!({"a": 2, "n": null}));
    }

    #[test]
    fn test_copy_missing_source() {
        let mut host = DynamicRecord::new().into_value();
        assert_eq!(
            engine().copy(&mut host, &OperationDescriptor::copy_from("/nope", "/x")),
            Err(PatchError::InvalidPatchDocument(
                "Element at path \"/nope\" does not exist".into()
            ))
        );
    }

    #[test]
    fn test_move_leaves_descriptor_untouched() {
        let mut host = Value::from(json!({"a": {"x": 1}}));
        let op = OperationDescriptor::move_from("/a/x", "/b");
        engine().move_(&mut host, &op).unwrap();
        assert_eq!(host.to_json(), json!({"a": {}, "b": 1}));
        assert_eq!(op.path, "/b");
    }

    #[test]
    fn test_test_failure_message() {
        let mut host = Value::from(json!({"a": "foo"}));
        let e = engine();
        e.test(&mut host, &OperationDescriptor::test("/a", "foo")).unwrap();
        assert_eq!(
            e.test(&mut host, &OperationDescriptor::test("/a", "bar")),
            Err(PatchError::InvalidPatchDocument(
                "Test operation on \"/a\" failed.".into()
            ))
        );
    }
}
