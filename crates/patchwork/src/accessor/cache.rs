//! External decision caches.
//!
//! The resolver keeps its own in-process memo. A [`DecisionCache`] sits
//! behind it and lets several accessors, or a persistent store, share
//! resolved decisions. Keys are opaque strings built by [`cache_key`].

use dashmap::DashMap;
use tracing::{debug, warn};

use super::resolver::Decision;

/// Which decision a cache key addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Read,
    /// Write of a non-iterable value.
    Write,
    /// Write of a list, map or collection; may resolve to an adder/remover pair.
    WriteIterable,
}

impl Direction {
    pub fn prefix(self) -> &'static str {
        match self {
            Direction::Read => "r",
            Direction::Write => "w",
            Direction::WriteIterable => "wi",
        }
    }
}

/// Cache key for a `(direction, type, property)` triple.
///
/// The three parts are joined with `:`, which the percent-encoding of the
/// type and property never produces, so distinct triples get distinct keys.
///
/// # Example
///
/// ```
/// use patchwork::accessor::{cache_key, Direction};
///
/// assert_eq!(cache_key(Direction::Read, "app::Car", "axes"), "r:app%3A%3ACar:axes");
/// ```
pub fn cache_key(direction: Direction, type_name: &str, property: &str) -> String {
    format!(
        "{}:{}:{}",
        direction.prefix(),
        urlencoding::encode(type_name),
        urlencoding::encode(property)
    )
}

/// Pluggable store for resolved decisions.
///
/// Misses are always recomputed, so any eviction policy is acceptable.
pub trait DecisionCache: Send + Sync {
    fn get(&self, key: &str) -> Option<Decision>;
    fn put(&self, key: &str, decision: &Decision);
}

/// In-memory cache holding serialized decisions.
///
/// Entries are stored as JSON text, the way a persistent adapter would see
/// them, so a round trip through this cache exercises the same encoding.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: DashMap<String, String>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl DecisionCache for MemoryCache {
    fn get(&self, key: &str) -> Option<Decision> {
        let payload = self.entries.get(key)?.value().clone();
        match serde_json::from_str(&payload) {
            Ok(decision) => {
                debug!(key, "decision cache hit");
                Some(decision)
            }
            Err(e) => {
                warn!(key, error = %e, "dropping undecodable decision cache entry");
                self.entries.remove(key);
                None
            }
        }
    }

    fn put(&self, key: &str, decision: &Decision) {
        match serde_json::to_string(decision) {
            Ok(payload) => {
                self.entries.insert(key.to_string(), payload);
            }
            Err(e) => warn!(key, error = %e, "failed to encode decision"),
        }
    }
}

/// Cache that never stores anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCache;

impl DecisionCache for NoopCache {
    fn get(&self, _key: &str) -> Option<Decision> {
        None
    }

    fn put(&self, _key: &str, _decision: &Decision) {}
}
