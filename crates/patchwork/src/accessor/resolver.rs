//! Accessor resolution.
//!
//! Given a record type and a property name, decides how the property is read
//! or written: through a method, a catch-all accessor, a public field, or an
//! adder/remover pair. Decisions depend only on the [`TypeInfo`], so they are
//! memoized per `(type, property, direction)`.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use patchwork_util::{camelize, ucfirst, Inflector};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::cache::{cache_key, DecisionCache, Direction};
use crate::value::TypeInfo;

// ── Decisions ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Access {
    Method { name: String },
    CatchAll { name: String },
    Field { name: String },
    AdderRemover { adder: String, remover: String },
    NotFound { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// The type declares a field named after the property, public or not.
    pub has_explicit_field: bool,
    pub access: Access,
}

impl Decision {
    /// Only field reads can be written back through their origin.
    pub fn read_by_reference(&self) -> bool {
        matches!(self.access, Access::Field { .. })
    }

    pub fn adder(&self) -> Option<&str> {
        match &self.access {
            Access::AdderRemover { adder, .. } => Some(adder),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        !matches!(self.access, Access::NotFound { .. })
    }
}

// ── Resolver ──────────────────────────────────────────────────────────────

pub struct CapabilityResolver {
    reads: DashMap<String, Arc<Decision>>,
    writes: DashMap<String, Arc<Decision>>,
    cache: Arc<dyn DecisionCache>,
    inflector: Arc<dyn Inflector>,
}

impl fmt::Debug for CapabilityResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityResolver")
            .field("reads", &self.reads.len())
            .field("writes", &self.writes.len())
            .finish_non_exhaustive()
    }
}

impl CapabilityResolver {
    pub fn new(cache: Arc<dyn DecisionCache>, inflector: Arc<dyn Inflector>) -> Self {
        Self {
            reads: DashMap::new(),
            writes: DashMap::new(),
            cache,
            inflector,
        }
    }

    /// Memoized read decision.
    pub fn read(&self, info: &TypeInfo, property: &str) -> Arc<Decision> {
        let key = cache_key(Direction::Read, info.name(), property);
        self.memoized(&self.reads, key, || self.resolve_read(info, property))
    }

    /// Memoized write decision for a value of the given iterability.
    pub fn write(&self, info: &TypeInfo, property: &str, iterable: bool) -> Arc<Decision> {
        let direction = if iterable {
            Direction::WriteIterable
        } else {
            Direction::Write
        };
        let key = cache_key(direction, info.name(), property);
        self.memoized(&self.writes, key, || {
            self.resolve_write(info, property, iterable)
        })
    }

    fn memoized(
        &self,
        memo: &DashMap<String, Arc<Decision>>,
        key: String,
        compute: impl FnOnce() -> Decision,
    ) -> Arc<Decision> {
        if let Some(hit) = memo.get(&key) {
            return Arc::clone(hit.value());
        }
        let decision = match self.cache.get(&key) {
            Some(decision) => decision,
            None => {
                let decision = compute();
                debug!(key = %key, access = ?decision.access, "resolved accessor");
                self.cache.put(&key, &decision);
                decision
            }
        };
        let decision = Arc::new(decision);
        memo.insert(key, Arc::clone(&decision));
        decision
    }

    /// Read resolution without memoization.
    pub fn resolve_read(&self, info: &TypeInfo, property: &str) -> Decision {
        let camel = camelize(property);
        let upper = ucfirst(&camel);
        let has_explicit_field = explicit_field(info, property, &camel);

        let candidates = [
            format!("get{upper}"),
            camel.clone(),
            format!("is{upper}"),
            format!("has{upper}"),
        ];
        let access = if let Some(method) = candidates
            .iter()
            .filter_map(|name| info.find_method(name))
            .find(|m| m.accepts(0))
        {
            Access::Method {
                name: method.name.clone(),
            }
        } else if info.has_dynamic_getter() {
            Access::CatchAll {
                name: property.to_string(),
            }
        } else if let Some(name) = public_field(info, property, &camel) {
            Access::Field { name }
        } else {
            Access::NotFound {
                message: format!(
                    "Neither the property \"{property}\" nor one of the methods \"{}()\" exist and have public access in type \"{}\".",
                    candidates.join("()\", \""),
                    info.name()
                ),
            }
        };

        Decision {
            has_explicit_field,
            access,
        }
    }

    /// Write resolution without memoization.
    pub fn resolve_write(&self, info: &TypeInfo, property: &str, iterable: bool) -> Decision {
        let camel = camelize(property);
        let upper = ucfirst(&camel);
        let has_explicit_field = explicit_field(info, property, &camel);
        let pairs = self.adder_remover_pairs(info, &camel);

        let setters = [format!("set{upper}"), camel.clone()];
        let access = match pairs.first() {
            Some((adder, remover)) if iterable => Access::AdderRemover {
                adder: adder.clone(),
                remover: remover.clone(),
            },
            _ => {
                if let Some(method) = setters
                    .iter()
                    .filter_map(|name| info.find_method(name))
                    .find(|m| m.accepts(1))
                {
                    Access::Method {
                        name: method.name.clone(),
                    }
                } else if info.has_dynamic_setter() {
                    Access::CatchAll {
                        name: property.to_string(),
                    }
                } else if let Some(name) = public_field(info, property, &camel) {
                    Access::Field { name }
                } else if let Some((adder, remover)) = pairs.first() {
                    Access::NotFound {
                        message: format!(
                            "The property \"{property}\" in type \"{}\" can be defined with the methods \"{adder}()\", \"{remover}()\" but the new value must be iterable.",
                            info.name()
                        ),
                    }
                } else {
                    let tried: String = self
                        .inflector
                        .singularize(&camel)
                        .iter()
                        .map(|s| {
                            let s = ucfirst(s);
                            format!("\"add{s}()\"/\"remove{s}()\", ")
                        })
                        .collect();
                    Access::NotFound {
                        message: format!(
                            "Neither the property \"{property}\" nor one of the methods {tried}\"{}()\", \"{}()\" exist and have public access in type \"{}\".",
                            setters[0],
                            setters[1],
                            info.name()
                        ),
                    }
                }
            }
        };

        Decision {
            has_explicit_field,
            access,
        }
    }

    /// Public adder/remover pairs for every singular form, in inflector order.
    fn adder_remover_pairs(&self, info: &TypeInfo, camel: &str) -> Vec<(String, String)> {
        self.inflector
            .singularize(camel)
            .iter()
            .filter_map(|singular| {
                let singular = ucfirst(singular);
                let adder = info
                    .find_method(&format!("add{singular}"))
                    .filter(|m| m.accepts(1))?;
                let remover = info
                    .find_method(&format!("remove{singular}"))
                    .filter(|m| m.accepts(1))?;
                trace!(adder = %adder.name, remover = %remover.name, "found adder/remover pair");
                Some((adder.name.clone(), remover.name.clone()))
            })
            .collect()
    }
}

fn explicit_field(info: &TypeInfo, property: &str, camel: &str) -> bool {
    info.find_field(property).is_some() || info.find_field(camel).is_some()
}

fn public_field(info: &TypeInfo, property: &str, camel: &str) -> Option<String> {
    [property, camel]
        .into_iter()
        .filter_map(|name| info.find_field(name))
        .find(|f| f.public)
        .map(|f| f.name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessor::cache::{MemoryCache, NoopCache};
    use patchwork_util::EnglishInflector;

    fn resolver() -> CapabilityResolver {
        CapabilityResolver::new(Arc::new(NoopCache), Arc::new(EnglishInflector))
    }

    fn car() -> TypeInfo {
        TypeInfo::new("Car")
            .getter("getAxes")
            .method("addAxis", 1, 1)
            .method("removeAxis", 1, 1)
            .private_field("axes")
            .getter("isElectric")
            .setter("setElectric")
            .field("color")
    }

    #[test]
    fn test_read_prefers_getter() {
        let d = resolver().resolve_read(&car(), "axes");
        assert_eq!(
            d.access,
            Access::Method {
                name: "getAxes".into()
            }
        );
        assert!(d.has_explicit_field);
        assert!(!d.read_by_reference());
    }

    #[test]
    fn test_read_is_prefix_and_public_field() {
        let r = resolver();
        assert_eq!(
            r.resolve_read(&car(), "electric").access,
            Access::Method {
                name: "isElectric".into()
            }
        );
        let d = r.resolve_read(&car(), "color");
        assert_eq!(d.access, Access::Field { name: "color".into() });
        assert!(d.read_by_reference());
    }

    #[test]
    fn test_read_camelizes_snake_case() {
        let info = TypeInfo::new("T").getter("getFooBar");
        assert_eq!(
            resolver().resolve_read(&info, "foo_bar").access,
            Access::Method {
                name: "getFooBar".into()
            }
        );
    }

    #[test]
    fn test_read_not_found_message() {
        let d = resolver().resolve_read(&TypeInfo::new("Car"), "wheels");
        assert_eq!(
            d.access,
            Access::NotFound {
                message: "Neither the property \"wheels\" nor one of the methods \"getWheels()\", \"wheels()\", \"isWheels()\", \"hasWheels()\" exist and have public access in type \"Car\".".into()
            }
        );
        assert!(!d.has_explicit_field);
    }

    #[test]
    fn test_read_catch_all_keeps_original_name() {
        let info = TypeInfo::new("Magic").dynamic_getter();
        assert_eq!(
            resolver().resolve_read(&info, "foo_bar").access,
            Access::CatchAll {
                name: "foo_bar".into()
            }
        );
    }

    #[test]
    fn test_write_adder_remover_only_for_iterables() {
        let r = resolver();
        let d = r.resolve_write(&car(), "axes", true);
        assert_eq!(d.adder(), Some("addAxis"));

        let d = r.resolve_write(&car(), "axes", false);
        match d.access {
            Access::NotFound { message } => assert!(message.contains("must be iterable")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_write_needs_both_adder_and_remover() {
        let info = TypeInfo::new("Half").method("addAxis", 1, 1);
        let d = resolver().resolve_write(&info, "axes", true);
        match d.access {
            Access::NotFound { message } => {
                assert!(message.contains("\"addAx()\"/\"removeAx()\", "));
                assert!(message.contains("\"setAxes()\", \"axes()\""));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_write_setter_field_and_catch_all() {
        let r = resolver();
        assert_eq!(
            r.resolve_write(&car(), "electric", false).access,
            Access::Method {
                name: "setElectric".into()
            }
        );
        assert_eq!(
            r.resolve_write(&car(), "color", false).access,
            Access::Field { name: "color".into() }
        );
        let magic = TypeInfo::new("Magic").dynamic_setter();
        assert_eq!(
            r.resolve_write(&magic, "anything", true).access,
            Access::CatchAll {
                name: "anything".into()
            }
        );
    }

    #[test]
    fn test_private_setter_is_ignored() {
        let info = TypeInfo::new("T").private_method("setName", 1, 1);
        assert!(!resolver().resolve_write(&info, "name", false).is_found());
    }

    #[test]
    fn test_memo_and_external_cache() {
        let cache = Arc::new(MemoryCache::new());
        let r = CapabilityResolver::new(cache.clone(), Arc::new(EnglishInflector));
        let first = r.write(&car(), "axes", true);
        let second = r.write(&car(), "axes", true);
        assert!(Arc::ptr_eq(&first, &second));
        assert!(cache.contains_key("wi:Car:axes"));

        let non_iterable = r.write(&car(), "axes", false);
        assert!(!non_iterable.is_found());
        assert!(cache.contains_key("w:Car:axes"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_similar_type_names_get_their_own_decisions() {
        let r = resolver();
        let setter_only = TypeInfo::new("iFoo").setter("setItems");
        let pair = TypeInfo::new("Foo").setter("addItem").setter("removeItem");

        assert_eq!(
            r.write(&setter_only, "items", false).access,
            Access::Method {
                name: "setItems".into()
            }
        );
        assert_eq!(
            r.write(&pair, "items", true).access,
            Access::AdderRemover {
                adder: "addItem".into(),
                remover: "removeItem".into(),
            }
        );

        let dotted = TypeInfo::new("a..b").getter("getC");
        let plain = TypeInfo::new("a");
        assert!(r.read(&dotted, "c").is_found());
        assert!(!r.read(&plain, "b..c").is_found());
    }

    #[test]
    fn test_decision_serde_shape() {
        let d = Decision {
            has_explicit_field: false,
            access: Access::Method {
                name: "getAxes".into(),
            },
        };
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "has_explicit_field": false,
                "access": {"kind": "method", "name": "getAxes"}
            })
        );
    }
}
