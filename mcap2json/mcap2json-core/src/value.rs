//! Decoded value tree produced by the fallback CDR decoder.

use std::{fmt, sync::Arc};

use serde_json::{Map, Number};

/// A single decoded value.
///
/// The set of variants is closed: the decoder only ever produces values it
/// constructed itself, so no runtime type inspection is needed downstream.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    /// Any signed integer (`int8` .. `int64`).
    Int(i64),
    /// Any unsigned integer (`uint8`/`octet` .. `uint64`).
    UInt(u64),
    /// `float` widened to `f64`, or `double`.
    Float(f64),
    String(Arc<str>),
    /// A nested record in field declaration order.
    Record(Record),
    /// A field whose type could not be resolved; holds the normalized type name.
    Unresolved(String),
    /// A field whose read faulted; holds the failure reason.
    Error(String),
}

impl Value {
    pub fn string(s: impl AsRef<str>) -> Self {
        Self::String(Arc::from(s.as_ref()))
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Render into a JSON value.
    ///
    /// Non-finite floats become `null`; placeholders become their string form.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Bool(v) => serde_json::Value::Bool(*v),
            Value::Int(v) => serde_json::Value::Number((*v).into()),
            Value::UInt(v) => serde_json::Value::Number((*v).into()),
            Value::Float(v) => Number::from_f64(*v)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.to_string()),
            Value::Record(r) => r.to_json(),
            Value::Unresolved(_) | Value::Error(_) => serde_json::Value::String(self.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::UInt(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::String(s) => f.write_str(s),
            Value::Record(r) => write!(f, "{}", r.to_json()),
            Value::Unresolved(ty) => write!(f, "<{ty}>"),
            Value::Error(reason) => write!(f, "<error: {reason}>"),
        }
    }
}

/// Ordered mapping from field name to [`Value`].
///
/// Insertion order is the field declaration order of the decoded record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Insert a field, replacing the value of an existing field with the same name
    /// while keeping its original position.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn to_json(&self) -> serde_json::Value {
        let mut map = Map::with_capacity(self.fields.len());
        for (name, value) in &self.fields {
            map.insert(name.clone(), value.to_json());
        }
        serde_json::Value::Object(map)
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}
