//! Shared indexable containers.

use indexmap::IndexMap;

use super::{next_index, Value};
use crate::error::HostError;

/// Keyed storage shared by identity, addressed with string keys.
///
/// Implementations may refuse a mutation with [`HostError::NotAllowed`].
pub trait Container {
    fn type_name(&self) -> &str {
        "Collection"
    }

    fn contains_key(&self, key: &str) -> bool;

    fn get(&self, key: &str) -> Option<Value>;

    fn set(&mut self, key: &str, value: Value) -> Result<(), HostError>;

    /// Insert at the natural next position.
    fn push(&mut self, value: Value) -> Result<(), HostError>;

    fn remove(&mut self, key: &str) -> Result<Option<Value>, HostError>;

    /// All entries in iteration order.
    fn entries(&self) -> Vec<(String, Value)>;

    fn len(&self) -> usize {
        self.entries().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ordered collection with integer-keyed appends.
///
/// `push` stores the value under one past the largest integer key, so keys
/// are never reused after a removal:
///
/// ```
/// use patchwork::value::{ArrayCollection, Container, Value};
///
/// let mut c = ArrayCollection::from_values(vec![Value::from("a"), Value::from("b")]);
/// c.remove("1").unwrap();
/// c.push(Value::from("c")).unwrap();
/// let keys: Vec<String> = c.entries().into_iter().map(|(k, _)| k).collect();
/// assert_eq!(keys, ["0", "2"]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct ArrayCollection {
    items: IndexMap<String, Value>,
    next: usize,
}

impl ArrayCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values(values: impl IntoIterator<Item = Value>) -> Self {
        let items: IndexMap<String, Value> = values
            .into_iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect();
        let next = items.len();
        Self { items, next }
    }

    pub fn from_entries<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        let items: IndexMap<String, Value> = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v))
            .collect();
        let next = next_index(items.keys());
        Self { items, next }
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.items.values()
    }

    pub fn into_value(self) -> Value {
        Value::collection(self)
    }
}

impl Container for ArrayCollection {
    fn type_name(&self) -> &str {
        "ArrayCollection"
    }

    fn contains_key(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.items.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), HostError> {
        self.items.insert(key.to_string(), value);
        self.next = self.next.max(next_index(std::iter::once(&key.to_string())));
        Ok(())
    }

    fn push(&mut self, value: Value) -> Result<(), HostError> {
        self.items.insert(self.next.to_string(), value);
        self.next += 1;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<Option<Value>, HostError> {
        Ok(self.items.shift_remove(key))
    }

    fn entries(&self) -> Vec<(String, Value)> {
        self.items
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}
