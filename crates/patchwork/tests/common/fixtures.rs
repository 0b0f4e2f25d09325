use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use patchwork::value::{ArrayCollection, CollectionRef, Container, Record, TypeInfo, Value};
use patchwork::{HostError, MergePatchable, PatchError, Patchable, Validator, Violation};

fn first_arg(args: Vec<Value>) -> Value {
    args.into_iter().next().unwrap_or_default()
}

pub fn shared<R: Record + 'static>(record: R) -> (Rc<RefCell<R>>, Value) {
    let rc = Rc::new(RefCell::new(record));
    let value = Value::Record(rc.clone());
    (rc, value)
}

// ── Car: getter, adder/remover pair, setter, public field ────────────────

static CAR: Lazy<TypeInfo> = Lazy::new(|| {
    TypeInfo::new("Car")
        .getter("getAxes")
        .setter("addAxis")
        .setter("removeAxis")
        .private_field("axes")
        .getter("getName")
        .setter("setName")
        .getter("getSpecs")
        .setter("setSpecs")
        .getter("getOwner")
        .field("color")
});

#[derive(Debug, Default)]
pub struct Car {
    pub axes: Vec<Value>,
    pub name: String,
    pub specs: Value,
    pub color: Value,
    pub owner: Value,
    pub locked: bool,
    pub calls: Vec<String>,
}

impl Car {
    pub fn new() -> Self {
        Self {
            specs: Value::empty_map(),
            ..Self::default()
        }
    }

    pub fn with_axes<V: Into<Value>>(mut self, axes: impl IntoIterator<Item = V>) -> Self {
        self.axes = axes.into_iter().map(Into::into).collect();
        self
    }
}

impl Record for Car {
    fn type_info(&self) -> &TypeInfo {
        &CAR
    }

    fn call(&mut self, method: &str, args: Vec<Value>) -> Result<Value, HostError> {
        match method {
            "getAxes" => Ok(Value::List(self.axes.clone())),
            "addAxis" => {
                let axis = first_arg(args);
                self.calls.push(format!("addAxis({})", axis.to_json()));
                self.axes.push(axis);
                Ok(Value::Null)
            }
            "removeAxis" => {
                if self.locked {
                    return Err(HostError::NotAllowed("Axes are locked".into()));
                }
                let axis = first_arg(args);
                self.calls.push(format!("removeAxis({})", axis.to_json()));
                self.axes.retain(|a| *a != axis);
                Ok(Value::Null)
            }
            "getName" => Ok(Value::from(self.name.as_str())),
            "setName" => match first_arg(args) {
                Value::String(name) => {
                    self.name = name;
                    Ok(Value::Null)
                }
                other => Err(HostError::Failed(format!(
                    "Car::setName() expects a string, {} given",
                    other.type_name()
                ))),
            },
            "getSpecs" => Ok(self.specs.clone()),
            "setSpecs" => {
                self.calls.push("setSpecs".into());
                self.specs = first_arg(args);
                Ok(Value::Null)
            }
            "getOwner" => Ok(self.owner.clone()),
            _ => Err(HostError::unknown_method("Car", method)),
        }
    }

    fn get_field(&self, name: &str) -> Option<Value> {
        match name {
            "color" => Some(self.color.clone()),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: Value) -> Result<(), HostError> {
        match name {
            "color" => {
                self.color = value;
                Ok(())
            }
            _ => Err(HostError::unknown_field("Car", name)),
        }
    }
}

// ── Store: collection-valued property ─────────────────────────────────────

static STORE: Lazy<TypeInfo> = Lazy::new(|| {
    TypeInfo::new("Store")
        .getter("getItems")
        .setter("addItem")
        .setter("removeItem")
});

pub struct Store {
    pub items: CollectionRef,
    pub calls: Vec<String>,
}

impl Store {
    pub fn new(items: ArrayCollection) -> Self {
        Self {
            items: Rc::new(RefCell::new(items)),
            calls: Vec::new(),
        }
    }
}

impl Record for Store {
    fn type_info(&self) -> &TypeInfo {
        &STORE
    }

    fn call(&mut self, method: &str, args: Vec<Value>) -> Result<Value, HostError> {
        match method {
            "getItems" => Ok(Value::Collection(self.items.clone())),
            "addItem" => {
                let item = first_arg(args);
                self.calls.push(format!("add {}", item.to_json()));
                self.items.borrow_mut().push(item)?;
                Ok(Value::Null)
            }
            "removeItem" => {
                let item = first_arg(args);
                self.calls.push(format!("remove {}", item.to_json()));
                let key = self
                    .items
                    .borrow()
                    .entries()
                    .into_iter()
                    .find(|(_, v)| *v == item)
                    .map(|(k, _)| k);
                if let Some(key) = key {
                    self.items.borrow_mut().remove(&key)?;
                }
                Ok(Value::Null)
            }
            _ => Err(HostError::unknown_method("Store", method)),
        }
    }
}

// ── Magic: catch-all accessors only ───────────────────────────────────────

static MAGIC: Lazy<TypeInfo> =
    Lazy::new(|| TypeInfo::new("Magic").dynamic_getter().dynamic_setter());

#[derive(Debug, Default)]
pub struct Magic {
    pub data: IndexMap<String, Value>,
}

impl Record for Magic {
    fn type_info(&self) -> &TypeInfo {
        &MAGIC
    }

    fn call(&mut self, method: &str, _args: Vec<Value>) -> Result<Value, HostError> {
        Err(HostError::unknown_method("Magic", method))
    }

    fn get_dynamic(&self, name: &str) -> Result<Value, HostError> {
        Ok(self.data.get(name).cloned().unwrap_or_default())
    }

    fn set_dynamic(&mut self, name: &str, value: Value) -> Result<(), HostError> {
        self.data.insert(name.to_string(), value);
        Ok(())
    }

    fn project(&self) -> IndexMap<String, Value> {
        self.data.clone()
    }
}

// ── Patch targets ─────────────────────────────────────────────────────────

pub struct Document {
    pub host: Value,
    pub commits: usize,
    pub mergeable: bool,
    pub merged: Vec<serde_json::Value>,
}

impl Document {
    pub fn new(host: impl Into<Value>) -> Self {
        Self {
            host: host.into(),
            commits: 0,
            mergeable: false,
            merged: Vec::new(),
        }
    }

    pub fn mergeable(mut self) -> Self {
        self.mergeable = true;
        self
    }
}

impl Patchable for Document {
    fn host(&mut self) -> &mut Value {
        &mut self.host
    }

    fn commit(&mut self) -> Result<(), PatchError> {
        self.commits += 1;
        Ok(())
    }

    fn as_mergeable(&mut self) -> Option<&mut dyn MergePatchable> {
        if self.mergeable {
            Some(self)
        } else {
            None
        }
    }
}

impl MergePatchable for Document {
    fn merge(&mut self, document: &serde_json::Value) -> Result<(), PatchError> {
        self.merged.push(document.clone());
        Ok(())
    }
}

/// Reports a fixed set of violations regardless of the host.
pub struct FixedViolations(pub Vec<Violation>);

impl Validator for FixedViolations {
    fn validate(&self, _host: &Value) -> Vec<Violation> {
        self.0.clone()
    }
}

/// Requires a non-empty string at the top-level `name` key.
pub struct NameRequired;

impl Validator for NameRequired {
    fn validate(&self, host: &Value) -> Vec<Violation> {
        match host.get_key("name") {
            Some(Value::String(name)) if !name.is_empty() => Vec::new(),
            _ => vec![Violation::new("name", "This value should not be blank.")],
        }
    }
}
