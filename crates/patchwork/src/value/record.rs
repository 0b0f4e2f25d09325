//! Typed host objects and their introspection surface.
//!
//! Rust has no runtime reflection, so a record describes its members through
//! a [`TypeInfo`] and exposes them through the [`Record`] trait. Accessor
//! resolution only ever reads the `TypeInfo`; the traversal only ever calls
//! the trait methods.

use indexmap::IndexMap;
use once_cell::sync::Lazy;

use super::Value;
use crate::error::HostError;

// ── Type description ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodInfo {
    pub name: String,
    pub public: bool,
    /// Parameters without a default.
    pub required: usize,
    /// All parameters.
    pub total: usize,
}

impl MethodInfo {
    /// Public and callable with exactly `args` arguments.
    pub fn accepts(&self, args: usize) -> bool {
        self.public && self.required <= args && self.total >= args
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    pub name: String,
    pub public: bool,
}

/// Declared members of a record type.
///
/// Method lookups ignore ASCII case; field lookups are exact.
///
/// # Example
///
/// ```
/// use patchwork::value::TypeInfo;
///
/// let info = TypeInfo::new("Car")
///     .getter("getAxes")
///     .method("addAxis", 1, 1)
///     .method("removeAxis", 1, 1)
///     .private_field("axes");
/// assert!(info.find_method("getaxes").is_some());
/// assert!(!info.find_field("axes").unwrap().public);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeInfo {
    name: String,
    methods: Vec<MethodInfo>,
    fields: Vec<FieldInfo>,
    dynamic_getter: bool,
    dynamic_setter: bool,
}

impl TypeInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn method(mut self, name: impl Into<String>, required: usize, total: usize) -> Self {
        self.methods.push(MethodInfo {
            name: name.into(),
            public: true,
            required,
            total,
        });
        self
    }

    pub fn private_method(mut self, name: impl Into<String>, required: usize, total: usize) -> Self {
        self.methods.push(MethodInfo {
            name: name.into(),
            public: false,
            required,
            total,
        });
        self
    }

    /// Public method without parameters.
    pub fn getter(self, name: impl Into<String>) -> Self {
        self.method(name, 0, 0)
    }

    /// Public method with one required parameter.
    pub fn setter(self, name: impl Into<String>) -> Self {
        self.method(name, 1, 1)
    }

    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.fields.push(FieldInfo {
            name: name.into(),
            public: true,
        });
        self
    }

    pub fn private_field(mut self, name: impl Into<String>) -> Self {
        self.fields.push(FieldInfo {
            name: name.into(),
            public: false,
        });
        self
    }

    /// The type answers reads of undeclared names through [`Record::get_dynamic`].
    pub fn dynamic_getter(mut self) -> Self {
        self.dynamic_getter = true;
        self
    }

    /// The type answers writes of undeclared names through [`Record::set_dynamic`].
    pub fn dynamic_setter(mut self) -> Self {
        self.dynamic_setter = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn methods(&self) -> &[MethodInfo] {
        &self.methods
    }

    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    pub fn has_dynamic_getter(&self) -> bool {
        self.dynamic_getter
    }

    pub fn has_dynamic_setter(&self) -> bool {
        self.dynamic_setter
    }

    pub fn find_method(&self, name: &str) -> Option<&MethodInfo> {
        self.methods
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name))
    }

    pub fn find_field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|f| f.name == name)
    }
}

// ── Record trait ──────────────────────────────────────────────────────────

/// A typed host object.
///
/// `call` receives declared method names exactly as written in the
/// [`TypeInfo`]. Field access covers declared fields and, for untyped
/// records, fields created at runtime (see [`Record::has_dynamic_field`]).
pub trait Record {
    fn type_info(&self) -> &TypeInfo;

    fn call(&mut self, method: &str, args: Vec<Value>) -> Result<Value, HostError>;

    fn get_field(&self, _name: &str) -> Option<Value> {
        None
    }

    fn set_field(&mut self, name: &str, _value: Value) -> Result<(), HostError> {
        Err(HostError::unknown_field(self.type_info().name(), name))
    }

    /// A field that exists on this instance without being declared.
    fn has_dynamic_field(&self, _name: &str) -> bool {
        false
    }

    /// Catch-all getter, used when the type declares a dynamic getter.
    fn get_dynamic(&self, name: &str) -> Result<Value, HostError> {
        Err(HostError::unknown_field(self.type_info().name(), name))
    }

    /// Catch-all setter, used when the type declares a dynamic setter.
    fn set_dynamic(&mut self, name: &str, _value: Value) -> Result<(), HostError> {
        Err(HostError::unknown_field(self.type_info().name(), name))
    }

    /// Public state, used when a record is compared or projected to JSON.
    fn project(&self) -> IndexMap<String, Value> {
        self.type_info()
            .fields()
            .iter()
            .filter(|f| f.public)
            .filter_map(|f| self.get_field(&f.name).map(|v| (f.name.clone(), v)))
            .collect()
    }
}

// ── Untyped record ────────────────────────────────────────────────────────

static DYNAMIC_RECORD_TYPE: Lazy<TypeInfo> =
    Lazy::new(|| TypeInfo::new("DynamicRecord").dynamic_setter());

/// Record whose fields are created at runtime.
///
/// Existing fields are read and written directly; writing an unknown name
/// creates it.
#[derive(Debug, Default, Clone)]
pub struct DynamicRecord {
    fields: IndexMap<String, Value>,
}

impl DynamicRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn into_value(self) -> Value {
        Value::record(self)
    }
}

impl Record for DynamicRecord {
    fn type_info(&self) -> &TypeInfo {
        &DYNAMIC_RECORD_TYPE
    }

    fn call(&mut self, method: &str, _args: Vec<Value>) -> Result<Value, HostError> {
        Err(HostError::unknown_method(self.type_info().name(), method))
    }

    fn get_field(&self, name: &str) -> Option<Value> {
        self.fields.get(name).cloned()
    }

    fn set_field(&mut self, name: &str, value: Value) -> Result<(), HostError> {
        self.fields.insert(name.to_string(), value);
        Ok(())
    }

    fn has_dynamic_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    fn set_dynamic(&mut self, name: &str, value: Value) -> Result<(), HostError> {
        self.set_field(name, value)
    }

    fn project(&self) -> IndexMap<String, Value> {
        self.fields.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_accepts() {
        let info = TypeInfo::new("T")
            .setter("setName")
            .method("setPair", 2, 2)
            .method("setOptional", 0, 1)
            .private_method("setHidden", 1, 1);
        assert!(info.find_method("setName").unwrap().accepts(1));
        assert!(!info.find_method("setPair").unwrap().accepts(1));
        assert!(info.find_method("setOptional").unwrap().accepts(1));
        assert!(!info.find_method("setHidden").unwrap().accepts(1));
    }

    #[test]
    fn test_method_lookup_ignores_case() {
        let info = TypeInfo::new("T").getter("getFooBar");
        assert_eq!(info.find_method("getfooBar").unwrap().name, "getFooBar");
        assert!(info.find_field("fooBar").is_none());
    }

    #[test]
    fn test_dynamic_record_fields() {
        let mut record = DynamicRecord::new().with("a", 1);
        assert!(record.has_dynamic_field("a"));
        assert!(!record.has_dynamic_field("b"));
        record.set_dynamic("b", Value::from("x")).unwrap();
        assert_eq!(record.get_field("b"), Some(Value::from("x")));
        assert_eq!(record.project().len(), 2);
        assert!(record.call("anything", vec![]).is_err());
    }

    #[test]
    fn test_default_projection_uses_public_fields() {
        struct Point {
            x: i64,
            secret: i64,
        }
        static POINT: Lazy<TypeInfo> =
            Lazy::new(|| TypeInfo::new("Point").field("x").private_field("secret"));
        impl Record for Point {
            fn type_info(&self) -> &TypeInfo {
                &POINT
            }
            fn call(&mut self, method: &str, _args: Vec<Value>) -> Result<Value, HostError> {
                Err(HostError::unknown_method("Point", method))
            }
            fn get_field(&self, name: &str) -> Option<Value> {
                match name {
                    "x" => Some(Value::from(self.x)),
                    "secret" => Some(Value::from(self.secret)),
                    _ => None,
                }
            }
        }

        let p = Point { x: 3, secret: 9 };
        let projected = p.project();
        assert_eq!(projected.len(), 1);
        assert_eq!(projected["x"], Value::from(3));
    }
}
