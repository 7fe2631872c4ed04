use std::collections::BTreeMap;

use serde::Serialize;

/// JSON object exchanged with the remote API. Key order is preserved.
pub type WireRecord = serde_json::Map<String, serde_json::Value>;

/// A single logical attribute value.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum Value {
    /// Boolean value.
    Boolean(bool),
    /// 32-bit integer.
    Integer(i32),
    /// 64-bit integer.
    Long(i64),
    /// String value.
    String(String),
    /// Explicit absence.
    Null,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Long(value)
    }
}

/// A named attribute as supplied by the provisioning framework.
///
/// An empty value list means "no value": on update it clears the field.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub values: Vec<Value>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn single(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(name, vec![value.into()])
    }

    /// Attribute carrying no value.
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }

    /// True when the attribute carries no non-null value.
    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Value::is_null)
    }
}

/// Connector object identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Uid(String);

impl Uid {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Uid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Object returned to the provisioning framework. Never mutated after it
/// is built; callers rebuild on change.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalObject {
    uid: Uid,
    name: String,
    attributes: BTreeMap<String, Vec<Value>>,
}

impl LogicalObject {
    pub fn new(uid: Uid, name: impl Into<String>, attributes: BTreeMap<String, Vec<Value>>) -> Self {
        Self {
            uid,
            name: name.into(),
            attributes,
        }
    }

    pub fn uid(&self) -> &Uid {
        &self.uid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &BTreeMap<String, Vec<Value>> {
        &self.attributes
    }

    pub fn values(&self, logical_name: &str) -> Option<&[Value]> {
        self.attributes.get(logical_name).map(Vec::as_slice)
    }

    /// First value of a single-valued attribute.
    pub fn value(&self, logical_name: &str) -> Option<&Value> {
        self.attributes.get(logical_name).and_then(|v| v.first())
    }
}
