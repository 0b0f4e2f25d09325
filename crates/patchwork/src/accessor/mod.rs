//! Path accessor: reads and writes host values at pointer paths.
//!
//! A traversal walks the path one token at a time. Containers are indexed,
//! records go through the accessor the [`CapabilityResolver`] picked for the
//! property. Writes then walk the visited handles backward, storing each
//! modified snapshot into its parent until a level is reached whose storage
//! is already live.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use patchwork_json_pointer::PointerPath;
use patchwork_util::{camelize, EnglishInflector, Inflector};
use tracing::trace;

use crate::error::PatchError;
use crate::value::{Record, RecordRef, Value};

pub mod cache;
mod handle;
pub mod resolver;

pub use cache::{cache_key, DecisionCache, Direction, MemoryCache, NoopCache};
pub use handle::HandleKind;
pub use resolver::{Access, CapabilityResolver, Decision};

use handle::{Place, Slot, ValueHandle};

const APPEND_ERROR: &str = "Cannot append to a non-array object";

// ── Configuration ─────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct AccessorOptions {
    /// Memoize parsed paths by their text.
    pub cache_paths: bool,
}

impl Default for AccessorOptions {
    fn default() -> Self {
        Self { cache_paths: true }
    }
}

#[derive(Default)]
pub struct PathAccessorBuilder {
    cache: Option<Arc<dyn DecisionCache>>,
    inflector: Option<Arc<dyn Inflector>>,
    options: AccessorOptions,
}

impl PathAccessorBuilder {
    /// External decision cache; defaults to a private [`MemoryCache`].
    pub fn cache(mut self, cache: Arc<dyn DecisionCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn inflector(mut self, inflector: Arc<dyn Inflector>) -> Self {
        self.inflector = Some(inflector);
        self
    }

    pub fn options(mut self, options: AccessorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn build(self) -> PathAccessor {
        let cache = self
            .cache
            .unwrap_or_else(|| Arc::new(MemoryCache::new()));
        let inflector = self
            .inflector
            .unwrap_or_else(|| Arc::new(EnglishInflector));
        PathAccessor {
            resolver: CapabilityResolver::new(cache, inflector),
            paths: DashMap::new(),
            options: self.options,
        }
    }
}

// ── Accessor ──────────────────────────────────────────────────────────────

/// Reads and writes host values by pointer path.
///
/// One accessor is meant to be shared: it is `Send + Sync` and its caches
/// only grow.
///
/// # Example
///
/// ```
/// use patchwork::accessor::PathAccessor;
/// use patchwork::value::Value;
/// use serde_json::json;
///
/// let accessor = PathAccessor::new();
/// let mut host = Value::from(json!({}));
/// accessor.set(&mut host, "/a/b", Value::from(1)).unwrap();
/// assert_eq!(host.to_json(), json!({"a": {"b": 1}}));
/// assert_eq!(accessor.get(&host, "/a/b").unwrap(), Value::from(1));
/// ```
pub struct PathAccessor {
    resolver: CapabilityResolver,
    paths: DashMap<String, Arc<PointerPath>>,
    options: AccessorOptions,
}

impl fmt::Debug for PathAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathAccessor")
            .field("resolver", &self.resolver)
            .field("paths", &self.paths.len())
            .field("options", &self.options)
            .finish()
    }
}

impl Default for PathAccessor {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl PathAccessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> PathAccessorBuilder {
        PathAccessorBuilder::default()
    }

    pub fn resolver(&self) -> &CapabilityResolver {
        &self.resolver
    }

    /// Parses `text`, memoized when path caching is on.
    pub fn path(&self, text: &str) -> Result<Arc<PointerPath>, PatchError> {
        if self.options.cache_paths {
            if let Some(hit) = self.paths.get(text) {
                return Ok(Arc::clone(hit.value()));
            }
        }
        let path = Arc::new(PointerPath::parse(text)?);
        if self.options.cache_paths {
            self.paths.insert(text.to_string(), Arc::clone(&path));
        }
        Ok(path)
    }

    pub fn get(&self, host: &Value, path: &str) -> Result<Value, PatchError> {
        let path = self.path(path)?;
        self.get_at(host, &path)
    }

    /// Value at `path`. Missing container keys read as `Null`.
    pub fn get_at(&self, host: &Value, path: &PointerPath) -> Result<Value, PatchError> {
        let chain = self.read_chain(ValueHandle::detached(host.clone()), path, path.len(), None)?;
        Ok(chain.into_iter().last().map(|h| h.value).unwrap_or_default())
    }

    pub fn set(&self, host: &mut Value, path: &str, value: Value) -> Result<(), PatchError> {
        let path = self.path(path)?;
        self.set_at(host, &path, value)
    }

    /// Writes `value` at `path`, creating missing intermediate maps.
    ///
    /// A final `-` token appends.
    pub fn set_at(&self, host: &mut Value, path: &PointerPath, value: Value) -> Result<(), PatchError> {
        if path.is_empty() {
            return Err(PatchError::OutOfBounds { index: 0, len: 0 });
        }
        trace!(path = %path, "write");
        let root = ValueHandle::root(host.clone());
        let mut chain = self.read_chain(root, path, path.len() - 1, Some(host))?;

        let count = chain.len();
        let mut pending_append = path.is_append();
        let mut value = value;
        for i in (0..count).rev() {
            let Some(mut handle) = chain.pop() else { break };
            let token = path.element(i)?;
            let deepest = i + 1 == count;
            let above_deepest = i + 2 == count;

            let written_through = match handle.kind {
                HandleKind::Record => {
                    if pending_append && deepest {
                        continue;
                    }
                    let Some(record) = handle.value.as_record().cloned() else {
                        break;
                    };
                    if pending_append && above_deepest {
                        let decision = {
                            let r = record.borrow();
                            self.resolver.write(r.type_info(), token, true)
                        };
                        let adder = decision
                            .adder()
                            .ok_or_else(|| PatchError::InvalidArgument(APPEND_ERROR.into()))?;
                        trace!(adder, "append through adder");
                        record.borrow_mut().call(adder, vec![value])?;
                        pending_append = false;
                    } else {
                        self.write_property(&handle, &record, token, value)?;
                    }
                    true
                }
                HandleKind::Keyed | HandleKind::Indexable => {
                    let key = if pending_append && deepest {
                        pending_append = false;
                        None
                    } else if pending_append && above_deepest {
                        return Err(PatchError::InvalidArgument(APPEND_ERROR.into()));
                    } else {
                        Some(token)
                    };
                    self.write_container(host, &mut handle, key, value)?
                }
                HandleKind::Scalar => {
                    return Err(PatchError::UnexpectedType {
                        path: path.serialize(),
                        index: i,
                    })
                }
            };

            if handle.is_shared() || handle.ref_chained || written_through {
                break;
            }
            value = handle.value;
        }

        if pending_append {
            return Err(PatchError::InvalidArgument(APPEND_ERROR.into()));
        }
        Ok(())
    }

    pub fn is_readable(&self, host: &Value, path: &str) -> Result<bool, PatchError> {
        let path = self.path(path)?;
        self.is_readable_at(host, &path)
    }

    /// Whether `get` would succeed. Missing properties and scalar
    /// intermediates answer `false`.
    pub fn is_readable_at(&self, host: &Value, path: &PointerPath) -> Result<bool, PatchError> {
        match self.get_at(host, path) {
            Ok(_) => Ok(true),
            Err(e) if e.is_probe_miss() => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub fn is_writable(&self, host: &Value, path: &str) -> Result<bool, PatchError> {
        let path = self.path(path)?;
        self.is_writable_at(host, &path)
    }

    /// Whether the parent of `path` accepts a write of its last token.
    pub fn is_writable_at(&self, host: &Value, path: &PointerPath) -> Result<bool, PatchError> {
        if path.is_empty() {
            return Ok(false);
        }
        let root = ValueHandle::detached(host.clone());
        let chain = match self.read_chain(root, path, path.len() - 1, None) {
            Ok(chain) => chain,
            Err(e) if e.is_probe_miss() => return Ok(false),
            Err(e) => return Err(e),
        };
        let Some(parent) = chain.last() else {
            return Ok(false);
        };
        match &parent.value {
            Value::Map(_) | Value::List(_) | Value::Collection(_) => Ok(true),
            Value::Record(record) => {
                let token = path.element(chain.len() - 1)?;
                let record = record.borrow();
                let decision = self.resolver.write(record.type_info(), token, true);
                Ok(decision.is_found()
                    || (!decision.has_explicit_field
                        && dynamic_field_name(&*record, token).is_some()))
            }
            _ => Ok(false),
        }
    }

    // ── Traversal ─────────────────────────────────────────────────────────

    /// Handles for the root and the first `until` tokens of `path`.
    ///
    /// With `storage`, missing intermediate keys are created in the host.
    fn read_chain(
        &self,
        root: ValueHandle,
        path: &PointerPath,
        until: usize,
        mut storage: Option<&mut Value>,
    ) -> Result<Vec<ValueHandle>, PatchError> {
        if !root.kind.is_descendable() {
            return Err(PatchError::UnexpectedType {
                path: path.serialize(),
                index: 0,
            });
        }
        let mut chain = vec![root];
        for i in 0..until {
            let token = path.element(i)?;
            let more = i + 1 < path.len();
            let Some(parent) = chain.last_mut() else {
                break;
            };
            let child = match parent.kind {
                HandleKind::Record => self.read_property(parent, token)?,
                HandleKind::Keyed | HandleKind::Indexable => {
                    read_index(parent, token, more, storage.as_deref_mut())?
                }
                HandleKind::Scalar => {
                    return Err(PatchError::UnexpectedType {
                        path: path.serialize(),
                        index: i,
                    })
                }
            };
            if more && !child.kind.is_descendable() {
                return Err(PatchError::UnexpectedType {
                    path: path.serialize(),
                    index: i + 1,
                });
            }
            chain.push(child);
        }
        Ok(chain)
    }

    fn read_property(&self, parent: &ValueHandle, token: &str) -> Result<ValueHandle, PatchError> {
        let Some(record) = parent.value.as_record() else {
            return Err(PatchError::NoSuchProperty(format!(
                "Cannot read property \"{token}\" of a {}",
                parent.value.type_name()
            )));
        };
        let decision = {
            let r = record.borrow();
            self.resolver.read(r.type_info(), token)
        };
        trace!(token, access = ?decision.access, "read property");

        match &decision.access {
            Access::Method { name } => {
                let value = record.borrow_mut().call(name, Vec::new())?;
                Ok(ValueHandle::child(parent, value, None))
            }
            Access::CatchAll { name } => {
                let value = record.borrow().get_dynamic(name)?;
                Ok(ValueHandle::child(parent, value, None))
            }
            Access::Field { name } => field_handle(parent, record, name),
            Access::NotFound { message } => {
                if !decision.has_explicit_field {
                    let name = dynamic_field_name(&*record.borrow(), token);
                    if let Some(name) = name {
                        return field_handle(parent, record, &name);
                    }
                }
                Err(PatchError::NoSuchProperty(message.clone()))
            }
            Access::AdderRemover { .. } => Err(PatchError::NoSuchProperty(format!(
                "Property \"{token}\" cannot be read"
            ))),
        }
    }

    // ── Writes ────────────────────────────────────────────────────────────

    /// Stores `value` under `key` in a container handle. Returns whether the
    /// write reached live storage.
    fn write_container(
        &self,
        host: &mut Value,
        handle: &mut ValueHandle,
        key: Option<&str>,
        value: Value,
    ) -> Result<bool, PatchError> {
        if handle.is_shared() {
            handle.value.put(key, value)?;
            return Ok(true);
        }
        handle.value.put(key, value.clone())?;
        match &handle.slot {
            Some(Slot::Place(place)) => {
                place.store(host, |target| target.put(key, value))?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn write_property(
        &self,
        handle: &ValueHandle,
        record: &RecordRef,
        token: &str,
        value: Value,
    ) -> Result<(), PatchError> {
        let decision = {
            let r = record.borrow();
            self.resolver.write(r.type_info(), token, value.is_iterable())
        };
        trace!(token, access = ?decision.access, "write property");

        match &decision.access {
            Access::AdderRemover { adder, remover } => {
                self.write_collection(handle, record, token, value, adder, remover)
            }
            Access::Method { name } => {
                record.borrow_mut().call(name, vec![value])?;
                Ok(())
            }
            Access::CatchAll { name } => Ok(record.borrow_mut().set_dynamic(name, value)?),
            Access::Field { name } => Ok(record.borrow_mut().set_field(name, value)?),
            Access::NotFound { message } => {
                if !decision.has_explicit_field {
                    let name = dynamic_field_name(&*record.borrow(), token);
                    if let Some(name) = name {
                        return Ok(record.borrow_mut().set_field(&name, value)?);
                    }
                }
                Err(PatchError::NoSuchProperty(format!(
                    "Could not determine access type for property \"{token}\": {message}"
                )))
            }
        }
    }

    /// Diffs the current collection against `value`: removes what is gone,
    /// then adds what is new.
    fn write_collection(
        &self,
        handle: &ValueHandle,
        record: &RecordRef,
        token: &str,
        value: Value,
        adder: &str,
        remover: &str,
    ) -> Result<(), PatchError> {
        let previous = self.read_property(handle, token)?.value;
        let incoming = value.items();
        let mut current = previous.items();
        let mut removed = Vec::new();
        current.retain(|item| {
            let keep = incoming.contains(item);
            if !keep {
                removed.push(item.clone());
            }
            keep
        });

        for item in removed {
            trace!(remover, "remove item");
            record.borrow_mut().call(remover, vec![item])?;
        }
        for item in incoming {
            if current.contains(&item) {
                continue;
            }
            trace!(adder, "add item");
            record.borrow_mut().call(adder, vec![item])?;
        }
        Ok(())
    }
}

/// Reads `token` from a container handle. A missing intermediate key is
/// always filled with an empty map in the handle's snapshot so traversal can
/// continue; the host itself is only touched when `storage` is passed, which
/// write traversals do.
fn read_index(
    parent: &mut ValueHandle,
    token: &str,
    more: bool,
    storage: Option<&mut Value>,
) -> Result<ValueHandle, PatchError> {
    let value = match parent.value.get_key(token) {
        Some(value) => value,
        None if more && parent.value.accepts_key(token) => {
            if let Some(host) = storage {
                trace!(token, "creating intermediate map");
                if parent.is_shared() {
                    parent.value.put(Some(token), Value::empty_map())?;
                } else if let Some(Slot::Place(place)) = &parent.slot {
                    place.store(host, |target| target.put(Some(token), Value::empty_map()))?;
                }
            }
            if !parent.is_shared() {
                parent.value.put(Some(token), Value::empty_map())?;
            }
            Value::empty_map()
        }
        None => Value::Null,
    };
    let place = parent.place_of(token);
    Ok(ValueHandle::child(parent, value, place))
}

fn field_handle(parent: &ValueHandle, record: &RecordRef, name: &str) -> Result<ValueHandle, PatchError> {
    let value = record.borrow().get_field(name);
    let value = value.ok_or_else(|| {
        PatchError::NoSuchProperty(format!("Field \"{name}\" is not readable"))
    })?;
    Ok(ValueHandle::child(parent, value, Some(Place::field(record.clone(), name))))
}

/// Runtime field matching `token` or its camelized form.
fn dynamic_field_name(record: &dyn Record, token: &str) -> Option<String> {
    let camel = camelize(token);
    if record.has_dynamic_field(&camel) {
        Some(camel)
    } else if record.has_dynamic_field(token) {
        Some(token.to_string())
    } else {
        None
    }
}
