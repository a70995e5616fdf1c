//! Concrete values stored in a [`ConfigInstance`](crate::ConfigInstance).
//!
//! A value is either a primitive, an explicit `None` ("unset"), a collection,
//! or a nested instance. Values that arrive from outside (files, command line)
//! and cannot be coerced to their field's kind are kept as-is so validation can
//! report them as `WrongType` instead of failing the load.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value as JsonValue;

use crate::instance::ConfigInstance;

/// A single configuration value.
///
/// Equality treats every NaN as equal to every other NaN, so an instance
/// holding a non-finite float still compares equal to itself.
#[derive(Debug, Clone)]
pub enum Value {
    /// Explicitly absent.
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Record(ConfigInstance),
}

impl Value {
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// True for the "empty" value of each type: none, `""`, `[]` and `{}`.
    ///
    /// Booleans and numbers are never empty.
    pub fn is_empty_value(&self) -> bool {
        match self {
            Value::None => true,
            Value::Str(s) => s.is_empty(),
            Value::List(items) => items.is_empty(),
            Value::Map(entries) => entries.is_empty(),
            Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::Record(_) => false,
        }
    }

    /// Numeric view used for range checks. Ints widen to f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&ConfigInstance> {
        match self {
            Value::Record(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Short type name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "none",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Record(_) => "record",
        }
    }

    /// Convert an arbitrary plain value without any schema guidance.
    ///
    /// Objects become maps, never records: only the merger knows which
    /// objects correspond to nested schemas.
    pub fn from_json(json: &JsonValue) -> Value {
        match json {
            JsonValue::Null => Value::None,
            JsonValue::Bool(b) => Value::Bool(*b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            JsonValue::String(s) => Value::Str(s.clone()),
            JsonValue::Array(items) => Value::List(items.iter().map(Value::from_json).collect()),
            JsonValue::Object(entries) => Value::Map(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::from_json(v)))
                    .collect(),
            ),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "none"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", v),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::List(items) => write!(f, "list of {} item(s)", items.len()),
            Value::Map(entries) => write!(f, "map of {} entry(ies)", entries.len()),
            Value::Record(inner) => write!(f, "{} record", inner.schema_name()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<ConfigInstance> for Value {
    fn from(inner: ConfigInstance) -> Self {
        Value::Record(inner)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_values() {
        assert!(Value::None.is_empty_value());
        assert!(Value::from("").is_empty_value());
        assert!(Value::List(vec![]).is_empty_value());
        assert!(Value::Map(BTreeMap::new()).is_empty_value());
        assert!(!Value::from(false).is_empty_value());
        assert!(!Value::from(0).is_empty_value());
        assert!(!Value::from("x").is_empty_value());
    }

    #[test]
    fn test_numeric_view() {
        assert_eq!(Value::from(4).as_f64(), Some(4.0));
        assert_eq!(Value::from(0.5).as_f64(), Some(0.5));
        assert_eq!(Value::from("4").as_f64(), None);
    }

    #[test]
    fn test_from_json_shapes() {
        let value = Value::from_json(&json!({"a": [1, 2.5, null], "b": "x"}));
        let Value::Map(entries) = value else {
            panic!("expected map");
        };
        assert_eq!(
            entries.get("a"),
            Some(&Value::List(vec![
                Value::Int(1),
                Value::Float(2.5),
                Value::None
            ]))
        );
        assert_eq!(entries.get("b"), Some(&Value::from("x")));
    }

    #[test]
    fn test_float_equality() {
        assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
        assert_eq!(
            Value::from(vec![f64::NAN, f64::INFINITY]),
            Value::from(vec![f64::NAN, f64::INFINITY])
        );
        assert_eq!(Value::Float(0.0), Value::Float(-0.0));
        assert_ne!(Value::Float(f64::NAN), Value::Float(1.0));
        assert_ne!(Value::Float(2.0), Value::Int(2));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::None.to_string(), "none");
        assert_eq!(Value::from("wav").to_string(), "\"wav\"");
        assert_eq!(Value::from(vec![1, 2]).to_string(), "list of 2 item(s)");
    }
}
