//! Property and variable values.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A value stored on a vertex, an edge, or as a graph variable.
///
/// Whether a given value is *accepted* depends on the container's
/// data-type capabilities; see [`Value::shape`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Opaque serialized payload.
    Bytes(Vec<u8>),
    List(Vec<Value>),
    Map(HashMap<String, Value>),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
}

/// How rich a value is, in the terms data-type capabilities speak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueShape {
    Scalar,
    /// A list whose elements all share one type. Empty lists count.
    UniformList,
    MixedList,
    Map,
    Serializable,
}

// ============================================================================
// Type checking
// ============================================================================

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Bool(_) => "BOOLEAN",
            Value::Int(_) => "INTEGER",
            Value::Float(_) => "FLOAT",
            Value::String(_) => "STRING",
            Value::Bytes(_) => "BYTES",
            Value::List(_) => "LIST",
            Value::Map(_) => "MAP",
            Value::Date(_) => "DATE",
            Value::DateTime(_) => "DATETIME",
        }
    }

    pub fn shape(&self) -> ValueShape {
        match self {
            Value::Bytes(_) => ValueShape::Serializable,
            Value::Map(_) => ValueShape::Map,
            Value::List(items) => {
                let mut types = items.iter().map(Value::type_name);
                match types.next() {
                    Some(first) if types.any(|t| t != first) => ValueShape::MixedList,
                    _ => ValueShape::UniformList,
                }
            }
            _ => ValueShape::Scalar,
        }
    }

    /// Whether every float in this value, however deeply nested, is finite.
    /// JSON has no encoding for NaN or infinity.
    pub fn is_finite(&self) -> bool {
        match self {
            Value::Float(f) => f.is_finite(),
            Value::List(items) => items.iter().all(Value::is_finite),
            Value::Map(m) => m.values().all(Value::is_finite),
            _ => true,
        }
    }
}

// ============================================================================
// Conversions (From impls)
// ============================================================================

impl From<bool> for Value { fn from(v: bool) -> Self { Value::Bool(v) } }
impl From<i32> for Value { fn from(v: i32) -> Self { Value::Int(v as i64) } }
impl From<i64> for Value { fn from(v: i64) -> Self { Value::Int(v) } }
impl From<f64> for Value { fn from(v: f64) -> Self { Value::Float(v) } }
impl From<String> for Value { fn from(v: String) -> Self { Value::String(v) } }
impl From<&str> for Value { fn from(v: &str) -> Self { Value::String(v.to_owned()) } }
impl From<NaiveDate> for Value { fn from(v: NaiveDate) -> Self { Value::Date(v) } }
impl From<DateTime<Utc>> for Value { fn from(v: DateTime<Utc>) -> Self { Value::DateTime(v) } }
impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self { Value::List(v.into_iter().map(Into::into).collect()) }
}
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self { v.map(Into::into).unwrap_or(Value::Null) }
}

// ============================================================================
// Display
// ============================================================================

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::String(s) => write!(f, "\"{}\"", s.replace('"', "\\\"")),
            Value::Bytes(b) => write!(f, "<bytes[{}]>", b.len()),
            Value::List(l) => {
                write!(f, "[")?;
                for (i, v) in l.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
            Value::Map(m) => {
                write!(f, "{{")?;
                for (i, (k, v)) in m.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
            Value::Date(d) => write!(f, "{d}"),
            Value::DateTime(dt) => write!(f, "{dt}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_shapes() {
        assert_eq!(Value::Null.shape(), ValueShape::Scalar);
        assert_eq!(Value::from("hello").shape(), ValueShape::Scalar);
        assert_eq!(Value::from(42).shape(), ValueShape::Scalar);
        assert_eq!(Value::from(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()).shape(), ValueShape::Scalar);
    }

    #[test]
    fn test_list_shapes() {
        assert_eq!(Value::List(vec![]).shape(), ValueShape::UniformList);
        assert_eq!(Value::from(vec![1, 2, 3]).shape(), ValueShape::UniformList);
        assert_eq!(
            Value::List(vec![Value::Int(1), Value::from("two")]).shape(),
            ValueShape::MixedList
        );
    }

    #[test]
    fn test_composite_shapes() {
        assert_eq!(Value::Bytes(vec![0xde, 0xad]).shape(), ValueShape::Serializable);
        assert_eq!(Value::Map(crate::model::props([("k", 1)])).shape(), ValueShape::Map);
    }

    #[test]
    fn test_finite() {
        assert!(Value::from(1.5).is_finite());
        assert!(Value::from("NaN").is_finite());
        assert!(!Value::from(f64::NAN).is_finite());
        assert!(!Value::from(vec![1.0, f64::INFINITY]).is_finite());
        assert!(!Value::Map(crate::model::props([("x", f64::NEG_INFINITY)])).is_finite());
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from(vec![1, 2]).to_string(), "[1, 2]");
        assert_eq!(Value::from("a\"b").to_string(), "\"a\\\"b\"");
        assert_eq!(Value::Bytes(vec![1, 2, 3]).to_string(), "<bytes[3]>");
    }
}
