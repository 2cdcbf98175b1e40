//! Structured field values
//!
//! The decoded form of a request or response: field name -> [`Value`].

use std::collections::BTreeMap;
use std::fmt;

use crate::address::ObjectId;

use super::ErrorCode;

/// A single decoded field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Unsigned scalar (opcode, type, size, profile id, flags)
    Uint(u32),

    /// Object address
    Id(ObjectId),

    /// Opaque byte blob
    Data(Vec<u8>),

    /// Device error code
    Errcode(ErrorCode),

    /// Repeated group of nested field sets
    List(Vec<Values>),
}

impl Value {
    pub fn as_uint(&self) -> Option<u32> {
        match self {
            Value::Uint(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_id(&self) -> Option<&ObjectId> {
        match self {
            Value::Id(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_data(&self) -> Option<&[u8]> {
        match self {
            Value::Data(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_errcode(&self) -> Option<ErrorCode> {
        match self {
            Value::Errcode(code) => Some(*code),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Values]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Short kind name used in validation messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Uint(_) => "uint",
            Value::Id(_) => "object id",
            Value::Data(_) => "data",
            Value::Errcode(_) => "errcode",
            Value::List(_) => "list",
        }
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::Uint(v as u32)
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Value::Uint(v as u32)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Uint(v)
    }
}

impl From<ObjectId> for Value {
    fn from(id: ObjectId) -> Self {
        Value::Id(id)
    }
}

impl From<Vec<u8>> for Value {
    fn from(data: Vec<u8>) -> Self {
        Value::Data(data)
    }
}

impl From<&[u8]> for Value {
    fn from(data: &[u8]) -> Self {
        Value::Data(data.to_vec())
    }
}

impl From<ErrorCode> for Value {
    fn from(code: ErrorCode) -> Self {
        Value::Errcode(code)
    }
}

impl From<Vec<Values>> for Value {
    fn from(items: Vec<Values>) -> Self {
        Value::List(items)
    }
}

/// Decoded request or response: an unordered set of named fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Values(BTreeMap<String, Value>);

impl Values {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(name.into(), value.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn uint(&self, name: &str) -> Option<u32> {
        self.get(name).and_then(Value::as_uint)
    }

    pub fn object_id(&self, name: &str) -> Option<&ObjectId> {
        self.get(name).and_then(Value::as_id)
    }

    pub fn data(&self, name: &str) -> Option<&[u8]> {
        self.get(name).and_then(Value::as_data)
    }

    pub fn errcode(&self, name: &str) -> Option<ErrorCode> {
        self.get(name).and_then(Value::as_errcode)
    }

    pub fn list(&self, name: &str) -> Option<&[Values]> {
        self.get(name).and_then(Value::as_list)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Values {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl fmt::Display for Values {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match value {
                Value::Uint(v) => write!(f, "{}: {}", name, v)?,
                Value::Id(id) => write!(f, "{}: {}", name, id)?,
                Value::Data(data) => write!(f, "{}: {}", name, hex::encode(data))?,
                Value::Errcode(code) => write!(f, "{}: {}", name, code)?,
                Value::List(items) => {
                    write!(f, "{}: [", name)?;
                    for (j, item) in items.iter().enumerate() {
                        if j > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", item)?;
                    }
                    write!(f, "]")?;
                }
            }
        }
        write!(f, "}}")
    }
}
