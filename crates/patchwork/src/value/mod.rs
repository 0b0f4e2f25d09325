//! Host value model.
//!
//! A patch target is a tree of [`Value`]s. Scalars, `List`s and `Map`s are
//! plain values: cloning them copies them. `Collection`s and `Record`s are
//! shared by identity: cloning one clones the handle, and a mutation through
//! any handle is observed by all of them.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use patchwork_json_pointer::is_valid_index;
use serde_json::Number;

use crate::error::PatchError;

pub mod collection;
pub mod record;

pub use collection::{ArrayCollection, Container};
pub use record::{DynamicRecord, FieldInfo, MethodInfo, Record, TypeInfo};

pub type RecordRef = Rc<RefCell<dyn Record>>;
pub type CollectionRef = Rc<RefCell<dyn Container>>;

#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    /// Indexable value container.
    List(Vec<Value>),
    /// Ordered keyed value container.
    Map(IndexMap<String, Value>),
    /// Shared indexable container.
    Collection(CollectionRef),
    /// Shared typed object.
    Record(RecordRef),
}

impl Value {
    pub fn record<R: Record + 'static>(record: R) -> Self {
        Value::Record(Rc::new(RefCell::new(record)))
    }

    pub fn collection<C: Container + 'static>(collection: C) -> Self {
        Value::Collection(Rc::new(RefCell::new(collection)))
    }

    pub fn empty_map() -> Self {
        Value::Map(IndexMap::new())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Values that adder/remover pairs can diff: lists, maps and collections.
    pub fn is_iterable(&self) -> bool {
        matches!(self, Value::List(_) | Value::Map(_) | Value::Collection(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&RecordRef> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&CollectionRef> {
        match self {
            Value::Collection(c) => Some(c),
            _ => None,
        }
    }

    /// Short type description for diagnostics.
    pub fn type_name(&self) -> String {
        match self {
            Value::Null => "null".into(),
            Value::Bool(_) => "bool".into(),
            Value::Number(n) if n.is_f64() => "float".into(),
            Value::Number(_) => "int".into(),
            Value::String(_) => "string".into(),
            Value::List(_) => "list".into(),
            Value::Map(_) => "map".into(),
            Value::Collection(c) => match c.try_borrow() {
                Ok(c) => c.type_name().to_string(),
                Err(_) => "collection".into(),
            },
            Value::Record(r) => match r.try_borrow() {
                Ok(r) => r.type_info().name().to_string(),
                Err(_) => "record".into(),
            },
        }
    }

    // ── Container access ──────────────────────────────────────────────────

    /// Reads `key` from a list, map or collection.
    ///
    /// List keys must be canonical indices below the length. Scalars and
    /// records have no keys.
    pub fn get_key(&self, key: &str) -> Option<Value> {
        match self {
            Value::Map(map) => map.get(key).cloned(),
            Value::List(items) => list_index(key).and_then(|i| items.get(i).cloned()),
            Value::Collection(c) => c.borrow().get(key),
            _ => None,
        }
    }

    /// True when [`put`](Self::put) would accept `key` without an index error.
    pub fn accepts_key(&self, key: &str) -> bool {
        match self {
            Value::Map(_) | Value::Collection(_) => true,
            Value::List(items) => list_index(key).is_some_and(|i| i <= items.len()),
            _ => false,
        }
    }

    /// Writes into a container. `None` appends at the natural next position.
    ///
    /// Lists replace an existing index and push at `len`; maps append under
    /// the next integer key.
    pub fn put(&mut self, key: Option<&str>, value: Value) -> Result<(), PatchError> {
        match (self, key) {
            (Value::Map(map), Some(key)) => {
                map.insert(key.to_string(), value);
            }
            (Value::Map(map), None) => {
                let next = next_index(map.keys());
                map.insert(next.to_string(), value);
            }
            (Value::List(items), Some(key)) => {
                let index = list_index(key).ok_or_else(|| PatchError::InvalidIndex(key.into()))?;
                match index.cmp(&items.len()) {
                    std::cmp::Ordering::Less => items[index] = value,
                    std::cmp::Ordering::Equal => items.push(value),
                    std::cmp::Ordering::Greater => {
                        return Err(PatchError::InvalidIndex(key.into()))
                    }
                }
            }
            (Value::List(items), None) => items.push(value),
            (Value::Collection(c), Some(key)) => c.borrow_mut().set(key, value)?,
            (Value::Collection(c), None) => c.borrow_mut().push(value)?,
            (other, key) => {
                return Err(PatchError::InvalidArgument(format!(
                    "Cannot write \"{}\" into a value of type {}",
                    key.unwrap_or("-"),
                    other.type_name()
                )))
            }
        }
        Ok(())
    }

    /// Deletes `key` from a container, returning the removed value.
    ///
    /// Missing keys are not an error. List removal shifts later elements.
    pub fn delete(&mut self, key: &str) -> Result<Option<Value>, PatchError> {
        match self {
            Value::Map(map) => Ok(map.shift_remove(key)),
            Value::List(items) => Ok(list_index(key)
                .filter(|&i| i < items.len())
                .map(|i| items.remove(i))),
            Value::Collection(c) => Ok(c.borrow_mut().remove(key)?),
            other => Err(PatchError::InvalidArgument(format!(
                "Cannot remove \"{key}\" from a value of type {}",
                other.type_name()
            ))),
        }
    }

    /// Mutable access to a child of a value container.
    pub fn child_mut(&mut self, key: &str) -> Option<&mut Value> {
        match self {
            Value::Map(map) => map.get_mut(key),
            Value::List(items) => list_index(key).and_then(move |i| items.get_mut(i)),
            _ => None,
        }
    }

    /// Members of an iterable value in order; empty for anything else.
    pub fn items(&self) -> Vec<Value> {
        match self {
            Value::List(items) => items.clone(),
            Value::Map(map) => map.values().cloned().collect(),
            Value::Collection(c) => c.borrow().entries().into_iter().map(|(_, v)| v).collect(),
            _ => Vec::new(),
        }
    }

    // ── Projection ────────────────────────────────────────────────────────

    /// Plain JSON projection.
    ///
    /// Records project their public state; collections become arrays when
    /// their keys are `0..n` in order and objects otherwise.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;
        match self {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Number(n) => Json::Number(n.clone()),
            Value::String(s) => Json::String(s.clone()),
            Value::List(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Value::Map(map) => Json::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Value::Collection(c) => {
                let entries = c.borrow().entries();
                let sequential = entries
                    .iter()
                    .enumerate()
                    .all(|(i, (key, _))| *key == i.to_string());
                if sequential {
                    Json::Array(entries.iter().map(|(_, v)| v.to_json()).collect())
                } else {
                    Json::Object(
                        entries
                            .iter()
                            .map(|(k, v)| (k.clone(), v.to_json()))
                            .collect(),
                    )
                }
            }
            Value::Record(r) => Json::Object(
                r.borrow()
                    .project()
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

fn list_index(key: &str) -> Option<usize> {
    if is_valid_index(key) {
        key.parse().ok()
    } else {
        None
    }
}

/// One past the largest integer key, or 0.
pub(crate) fn next_index<'a>(keys: impl Iterator<Item = &'a String>) -> usize {
    keys.filter(|k| is_valid_index(k))
        .filter_map(|k| k.parse::<usize>().ok())
        .max()
        .map_or(0, |max| max + 1)
}

fn same_rc<T: ?Sized>(a: &Rc<T>, b: &Rc<T>) -> bool {
    std::ptr::eq(Rc::as_ptr(a) as *const u8, Rc::as_ptr(b) as *const u8)
}

/// Strict equality: same types, same order, shared values by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a.is_f64() == b.is_f64() && a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => {
                a.len() == b.len()
                    && a
                        .iter()
                        .zip(b.iter())
                        .all(|((ka, va), (kb, vb))| ka == kb && va == vb)
            }
            (Value::Collection(a), Value::Collection(b)) => same_rc(a, b),
            (Value::Record(a), Value::Record(b)) => same_rc(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Map(map) => f.debug_tuple("Map").field(map).finish(),
            Value::Collection(c) => match c.try_borrow() {
                Ok(c) => f
                    .debug_tuple("Collection")
                    .field(&c.type_name())
                    .field(&c.entries())
                    .finish(),
                Err(_) => f.write_str("Collection(<borrowed>)"),
            },
            Value::Record(r) => match r.try_borrow() {
                Ok(r) => f.debug_tuple("Record").field(&r.type_info().name()).finish(),
                Err(_) => f.write_str("Record(<borrowed>)"),
            },
        }
    }
}

// ── Conversions ───────────────────────────────────────────────────────────

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        use serde_json::Value as Json;
        match v {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => Value::Number(n),
            Json::String(s) => Value::String(s),
            Json::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            Json::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&serde_json::Value> for Value {
    fn from(v: &serde_json::Value) -> Self {
        Value::from(v.clone())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n.into())
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(n.into())
    }
}

/// Non-finite floats have no JSON number form and become `Null`.
impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(map: IndexMap<String, Value>) -> Self {
        Value::Map(map)
    }
}
