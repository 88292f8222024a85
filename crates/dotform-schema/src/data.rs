//! # Validation Data
//!
//! [`Data`] is the value tree that flows through validators. It mirrors
//! `serde_json::Value` with one extra variant, [`Data::Failure`], so that a
//! container validator receives its children's outcomes (cleaned values and
//! failure markers side by side) as ordinary input.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Number, Value};

use crate::validator::ValidationFailure;

/// The name of a node within its parent.
///
/// Map children are named by key; sequence children by position. The root
/// of a tree is named by the empty key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldName {
    /// A key within a map.
    Key(String),
    /// A position within a sequence.
    Index(usize),
}

impl FieldName {
    /// The key, if this is a map name.
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Self::Key(key) => Some(key),
            Self::Index(_) => None,
        }
    }

    /// The position, if this is a sequence name.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Self::Key(_) => None,
            Self::Index(index) => Some(*index),
        }
    }
}

impl Default for FieldName {
    fn default() -> Self {
        Self::Key(String::new())
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

impl From<&str> for FieldName {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for FieldName {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for FieldName {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Coarse classification of a [`Data`] node, used in type-check messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataKind {
    /// Missing or explicitly null.
    Null,
    /// `true` or `false`.
    Bool,
    /// Integer or floating point number.
    Number,
    /// UTF-8 string.
    String,
    /// String-keyed mapping.
    Map,
    /// Ordered sequence.
    Seq,
    /// A failure marker.
    Failure,
}

impl DataKind {
    /// Human-readable kind name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Map => "mapping",
            Self::Seq => "sequence",
            Self::Failure => "failure",
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A nested value whose positions may hold validation failures.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Data {
    /// Missing or explicitly null.
    #[default]
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// Numeric scalar.
    Number(Number),
    /// String scalar.
    String(String),
    /// Mapping of child name to child data.
    Map(BTreeMap<String, Data>),
    /// Sequence of child data.
    Seq(Vec<Data>),
    /// The position failed validation.
    Failure(Box<ValidationFailure>),
}

impl Data {
    /// The kind of this node.
    pub fn kind(&self) -> DataKind {
        match self {
            Self::Null => DataKind::Null,
            Self::Bool(_) => DataKind::Bool,
            Self::Number(_) => DataKind::Number,
            Self::String(_) => DataKind::String,
            Self::Map(_) => DataKind::Map,
            Self::Seq(_) => DataKind::Seq,
            Self::Failure(_) => DataKind::Failure,
        }
    }

    /// Returns true for the null-equivalent value.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns true if this position is a failure marker.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// Returns true for maps and sequences.
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Map(_) | Self::Seq(_))
    }

    /// The failure marker, if this position failed.
    pub fn as_failure(&self) -> Option<&ValidationFailure> {
        match self {
            Self::Failure(failure) => Some(failure),
            _ => None,
        }
    }

    /// The string slice, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Look up a map entry by key.
    pub fn get(&self, key: &str) -> Option<&Data> {
        match self {
            Self::Map(map) => map.get(key),
            _ => None,
        }
    }

    /// Look up the slice belonging to a child field: map entries by key,
    /// sequence elements by position.
    pub fn child(&self, name: &FieldName) -> Option<&Data> {
        match (self, name) {
            (Self::Map(map), FieldName::Key(key)) => map.get(key),
            (Self::Seq(items), FieldName::Index(index)) => items.get(*index),
            _ => None,
        }
    }

    /// Length of strings (in characters), maps and sequences.
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::String(s) => Some(s.chars().count()),
            Self::Map(map) => Some(map.len()),
            Self::Seq(items) => Some(items.len()),
            _ => None,
        }
    }

    /// Iterate over the direct children of a container.
    pub fn children(&self) -> Box<dyn Iterator<Item = &Data> + '_> {
        match self {
            Self::Map(map) => Box::new(map.values()),
            Self::Seq(items) => Box::new(items.iter()),
            _ => Box::new(std::iter::empty()),
        }
    }

    /// Convert into a plain JSON value.
    ///
    /// Failure markers become `null`.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Null | Self::Failure(_) => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => Value::Number(n.clone()),
            Self::String(s) => Value::String(s.clone()),
            Self::Map(map) => Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_value())).collect(),
            ),
            Self::Seq(items) => Value::Array(items.iter().map(Data::to_value).collect()),
        }
    }
}

impl fmt::Display for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Failure(failure) => write!(f, "<failure: {}>", failure.message.template()),
            other => write!(f, "{}", other.to_value()),
        }
    }
}

impl From<Value> for Data {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::String(s),
            Value::Object(map) => Self::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect()),
            Value::Array(items) => Self::Seq(items.into_iter().map(Data::from).collect()),
        }
    }
}

impl From<&Value> for Data {
    fn from(value: &Value) -> Self {
        value.clone().into()
    }
}

impl From<&str> for Data {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Data {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for Data {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Data {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl From<ValidationFailure> for Data {
    fn from(failure: ValidationFailure) -> Self {
        Self::Failure(Box::new(failure))
    }
}

impl PartialEq<Value> for Data {
    fn eq(&self, other: &Value) -> bool {
        !self.contains_failure() && self.to_value() == *other
    }
}

impl Data {
    /// Returns true if any position in this tree is a failure marker.
    pub fn contains_failure(&self) -> bool {
        match self {
            Self::Failure(_) => true,
            other => other.children().any(Data::contains_failure),
        }
    }
}
