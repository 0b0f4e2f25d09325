//! Traversal handles.
//!
//! Every visited path segment is wrapped in a [`ValueHandle`] holding a
//! snapshot of the value and, when the value can be written back, a [`Slot`]
//! describing where it lives. Shared values need no write-back; value-type
//! containers are reached again from their anchor.

use crate::error::PatchError;
use crate::value::{CollectionRef, RecordRef, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKind {
    Scalar,
    Keyed,
    Indexable,
    Record,
}

impl HandleKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Map(_) => HandleKind::Keyed,
            Value::List(_) | Value::Collection(_) => HandleKind::Indexable,
            Value::Record(_) => HandleKind::Record,
            _ => HandleKind::Scalar,
        }
    }

    /// Kinds a traversal can continue through.
    pub fn is_descendable(self) -> bool {
        self != HandleKind::Scalar
    }
}

// ── Slots ─────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub(crate) enum Anchor {
    Root,
    Field { owner: RecordRef, name: String },
    Element { owner: CollectionRef, key: String },
}

/// Location of a value-type container: an anchor plus keys below it.
#[derive(Clone)]
pub(crate) struct Place {
    anchor: Anchor,
    keys: Vec<String>,
}

impl Place {
    pub fn root() -> Self {
        Self {
            anchor: Anchor::Root,
            keys: Vec::new(),
        }
    }

    pub fn field(owner: RecordRef, name: &str) -> Self {
        Self {
            anchor: Anchor::Field {
                owner,
                name: name.to_string(),
            },
            keys: Vec::new(),
        }
    }

    pub fn element(owner: CollectionRef, key: &str) -> Self {
        Self {
            anchor: Anchor::Element {
                owner,
                key: key.to_string(),
            },
            keys: Vec::new(),
        }
    }

    pub fn child(&self, key: &str) -> Self {
        let mut keys = self.keys.clone();
        keys.push(key.to_string());
        Self {
            anchor: self.anchor.clone(),
            keys,
        }
    }

    /// Applies `write` to the container stored at this place.
    ///
    /// Root places are reached through `host`; field and element places are
    /// read out of their owner, modified and stored back.
    pub fn store<F>(&self, host: &mut Value, write: F) -> Result<(), PatchError>
    where
        F: FnOnce(&mut Value) -> Result<(), PatchError>,
    {
        match &self.anchor {
            Anchor::Root => write(descend_mut(host, &self.keys)?),
            Anchor::Field { owner, name } => {
                let stored = owner.borrow().get_field(name);
                let mut stored = stored.ok_or_else(|| {
                    PatchError::NoSuchProperty(format!("Field \"{name}\" is no longer set"))
                })?;
                write(descend_mut(&mut stored, &self.keys)?)?;
                owner.borrow_mut().set_field(name, stored)?;
                Ok(())
            }
            Anchor::Element { owner, key } => {
                let stored = owner.borrow().get(key);
                let mut stored = stored.ok_or_else(|| {
                    PatchError::NoSuchProperty(format!("Element \"{key}\" is no longer set"))
                })?;
                write(descend_mut(&mut stored, &self.keys)?)?;
                owner.borrow_mut().set(key, stored)?;
                Ok(())
            }
        }
    }
}

fn descend_mut<'a>(mut value: &'a mut Value, keys: &[String]) -> Result<&'a mut Value, PatchError> {
    for key in keys {
        value = value.child_mut(key).ok_or_else(|| {
            PatchError::NoSuchProperty(format!("Element \"{key}\" is no longer set"))
        })?;
    }
    Ok(value)
}

#[derive(Clone)]
pub(crate) enum Slot {
    /// Shared value; mutations through the snapshot are already visible.
    Identity,
    Place(Place),
}

// ── Handles ───────────────────────────────────────────────────────────────

pub(crate) struct ValueHandle {
    pub kind: HandleKind,
    pub value: Value,
    pub slot: Option<Slot>,
    pub ref_chained: bool,
}

impl ValueHandle {
    /// Root of a read traversal. Only shared values are slotted.
    pub fn detached(value: Value) -> Self {
        let slot = identity_slot(&value);
        Self {
            kind: HandleKind::of(&value),
            value,
            slot,
            ref_chained: false,
        }
    }

    /// Root of a write traversal; containers are written through the host.
    pub fn root(value: Value) -> Self {
        let kind = HandleKind::of(&value);
        let slot = identity_slot(&value).or(match kind {
            HandleKind::Keyed | HandleKind::Indexable => Some(Slot::Place(Place::root())),
            _ => None,
        });
        Self {
            kind,
            ref_chained: slot.is_some(),
            value,
            slot,
        }
    }

    /// Child of `parent`. `place` locates a value-type container result.
    pub fn child(parent: &ValueHandle, value: Value, place: Option<Place>) -> Self {
        let kind = HandleKind::of(&value);
        let slot = identity_slot(&value).or(match kind {
            HandleKind::Keyed | HandleKind::Indexable => place.map(Slot::Place),
            _ => None,
        });
        Self {
            kind,
            ref_chained: slot.is_some() && parent.ref_chained,
            value,
            slot,
        }
    }

    /// Where a keyed child of this container lives, if anywhere.
    pub fn place_of(&self, key: &str) -> Option<Place> {
        match (&self.value, &self.slot) {
            (Value::Collection(owner), _) => Some(Place::element(owner.clone(), key)),
            (_, Some(Slot::Place(place))) => Some(place.child(key)),
            _ => None,
        }
    }

    pub fn is_shared(&self) -> bool {
        matches!(self.value, Value::Record(_) | Value::Collection(_))
    }
}

fn identity_slot(value: &Value) -> Option<Slot> {
    match value {
        Value::Record(_) | Value::Collection(_) => Some(Slot::Identity),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{ArrayCollection, DynamicRecord};
    use serde_json::json;

    #[test]
    fn test_kinds() {
        assert_eq!(HandleKind::of(&Value::Null), HandleKind::Scalar);
        assert_eq!(HandleKind::of(&Value::from(json!({}))), HandleKind::Keyed);
        assert_eq!(HandleKind::of(&Value::from(json!([]))), HandleKind::Indexable);
        assert_eq!(
            HandleKind::of(&ArrayCollection::new().into_value()),
            HandleKind::Indexable
        );
        assert_eq!(
            HandleKind::of(&DynamicRecord::new().into_value()),
            HandleKind::Record
        );
    }

    #[test]
    fn test_chaining() {
        let root = ValueHandle::root(Value::from(json!({"a": {"b": 1}})));
        assert!(root.ref_chained);
        let a = ValueHandle::child(&root, Value::from(json!({"b": 1})), root.place_of("a"));
        assert!(a.ref_chained);
        let b = ValueHandle::child(&a, Value::from(1), a.place_of("b"));
        assert!(b.slot.is_none());
        assert!(!b.ref_chained);

        let detached = ValueHandle::detached(Value::from(json!({})));
        assert!(detached.slot.is_none());
        assert!(!detached.ref_chained);
    }

    #[test]
    fn test_store_through_root_place() {
        let mut host = Value::from(json!({"a": {"b": [1]}}));
        Place::root()
            .child("a")
            .child("b")
            .store(&mut host, |list| list.put(None, Value::from(2)))
            .unwrap();
        assert_eq!(host.to_json(), json!({"a": {"b": [1, 2]}}));
    }

    #[test]
    fn test_store_through_field_place() {
        let record = DynamicRecord::new().with("tags", Value::from(json!({"x": 1})));
        let value = record.into_value();
        let owner = value.as_record().unwrap().clone();
        let mut unused = Value::Null;
        Place::field(owner.clone(), "tags")
            .store(&mut unused, |map| map.put(Some("y"), Value::from(2)))
            .unwrap();
        assert_eq!(
            owner.borrow().get_field("tags").unwrap().to_json(),
            json!({"x": 1, "y": 2})
        );
    }

    #[test]
    fn test_store_missing_place_fails() {
        let mut host = Value::from(json!({}));
        let err = Place::root()
            .child("gone")
            .store(&mut host, |_| Ok(()))
            .unwrap_err();
        assert!(matches!(err, PatchError::NoSuchProperty(_)));
    }
}
