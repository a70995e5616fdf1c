//! Conversion between instances and plain nested key-value trees.
//!
//! The plain form is what external loaders read and write: JSON objects with
//! every field present, `null` for unset fields. Non-finite floats, which
//! JSON cannot carry, are written as the strings `"inf"`, `"-inf"` and `"nan"`
//! and read back by float coercion.

use std::sync::Arc;

use serde_json::{Map as JsonMap, Number, Value as JsonValue};
use thiserror::Error;

use crate::instance::{instantiate, ConfigInstance};
use crate::merge::{merge, MergeError};
use crate::schema::SchemaRecord;
use crate::value::Value;

/// Errors reading an instance from JSON text.
#[derive(Error, Debug)]
pub enum PlainError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Merge(#[from] MergeError),
}

/// Convert an instance to its plain form, emitting every field.
pub fn to_plain(instance: &ConfigInstance) -> JsonValue {
    let mut map = JsonMap::new();
    for (field, value) in instance.fields() {
        map.insert(field.name().to_string(), value_to_plain(value));
    }
    JsonValue::Object(map)
}

pub fn value_to_plain(value: &Value) -> JsonValue {
    match value {
        Value::None => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Int(i) => JsonValue::Number(Number::from(*i)),
        Value::Float(f) => match Number::from_f64(*f) {
            Some(n) => JsonValue::Number(n),
            None => JsonValue::String(non_finite_label(*f).to_string()),
        },
        Value::Str(s) => JsonValue::String(s.clone()),
        Value::List(items) => JsonValue::Array(items.iter().map(value_to_plain).collect()),
        Value::Map(entries) => JsonValue::Object(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), value_to_plain(v)))
                .collect(),
        ),
        Value::Record(inner) => to_plain(inner),
    }
}

fn non_finite_label(f: f64) -> &'static str {
    if f.is_nan() {
        "nan"
    } else if f.is_sign_positive() {
        "inf"
    } else {
        "-inf"
    }
}

/// Build an instance of `schema` from a plain tree. Fields absent from the
/// tree keep their defaults; unknown keys are rejected.
pub fn from_plain(schema: &Arc<SchemaRecord>, plain: &JsonValue) -> Result<ConfigInstance, MergeError> {
    merge(&instantiate(schema), plain)
}

/// Pretty-printed JSON of the plain form.
pub fn to_json_string(instance: &ConfigInstance) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&to_plain(instance))
}

pub fn from_json_str(schema: &Arc<SchemaRecord>, json: &str) -> Result<ConfigInstance, PlainError> {
    let plain: JsonValue = serde_json::from_str(json)?;
    Ok(from_plain(schema, &plain)?)
}
