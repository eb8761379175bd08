use crate::error::Result;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};
use std::collections::BTreeMap;

/// A parsed JSON document: the body of a captured request.
///
/// Numbers keep the precision they were parsed with, so unsubstituted
/// branches re-encode to the same values. Object key order is not kept.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentNode {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<DocumentNode>),
    Object(BTreeMap<String, DocumentNode>),
}

impl DocumentNode {
    /// Parse JSON text. Fails on anything that is not a single valid
    /// JSON document.
    pub fn parse(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Ok(value.into())
    }

    /// Compact JSON encoding.
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn is_scalar(&self) -> bool {
        !matches!(self, Self::Array(_) | Self::Object(_))
    }

    /// Value at `key` when this is an object.
    pub fn get(&self, key: &str) -> Option<&DocumentNode> {
        match self {
            Self::Object(map) => map.get(key),
            _ => None,
        }
    }
}

impl From<Value> for DocumentNode {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => Self::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<DocumentNode> for Value {
    fn from(node: DocumentNode) -> Self {
        match node {
            DocumentNode::Null => Value::Null,
            DocumentNode::Bool(b) => Value::Bool(b),
            DocumentNode::Number(n) => Value::Number(n),
            DocumentNode::String(s) => Value::String(s),
            DocumentNode::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            DocumentNode::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for DocumentNode {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for DocumentNode {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for DocumentNode {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for DocumentNode {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl From<u64> for DocumentNode {
    fn from(n: u64) -> Self {
        Self::Number(n.into())
    }
}

impl From<i32> for DocumentNode {
    fn from(n: i32) -> Self {
        Self::Number(n.into())
    }
}

/// Non-finite floats have no JSON form and become `null`.
impl From<f64> for DocumentNode {
    fn from(n: f64) -> Self {
        Number::from_f64(n).map_or(Self::Null, Self::Number)
    }
}

impl Serialize for DocumentNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => n.serialize(serializer),
            Self::String(s) => serializer.serialize_str(s),
            Self::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Object(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for DocumentNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from)
    }
}
