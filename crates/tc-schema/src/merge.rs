//! Applying override layers onto config instances.
//!
//! Overrides are partial plain value trees, as produced by file loaders or
//! command-line parsing. Merge rules:
//! - primitive fields are replaced;
//! - record fields are merged recursively, keeping fields the override omits;
//! - sequence fields are replaced wholesale, never merged element by element;
//! - keys the schema does not declare fail the whole merge.
//!
//! Values are coerced to the field's kind where that is lossless (`"22050"`
//! to an int, `"inf"` to a float, `123` or `true` to a string). Anything else is stored raw and reported
//! by validation as `WrongType`.

use std::sync::Arc;

use serde_json::{Map as JsonMap, Value as JsonValue};
use thiserror::Error;

use crate::field::{FieldKind, Primitive};
use crate::instance::{instantiate, ConfigInstance};
use crate::schema::SchemaRecord;
use crate::validate::FieldPath;
use crate::value::Value;

/// Errors that reject a merge. The target instance is never modified.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MergeError {
    #[error("unknown field '{path}' in record {record}")]
    UnknownField { record: String, path: String },

    #[error("overrides for record {record} must be an object, got {found}")]
    NotAnObject { record: String, found: String },

    #[error("malformed override '{entry}': {reason}")]
    MalformedOverride { entry: String, reason: String },
}

/// Merge `overrides` onto a copy of `instance`.
pub fn merge(instance: &ConfigInstance, overrides: &JsonValue) -> Result<ConfigInstance, MergeError> {
    let mut merged = instance.clone();
    apply_overrides(&mut merged, overrides, &FieldPath::root())?;
    Ok(merged)
}

pub(crate) fn apply_overrides(
    target: &mut ConfigInstance,
    overrides: &JsonValue,
    path: &FieldPath,
) -> Result<(), MergeError> {
    let schema = Arc::clone(target.schema());
    let JsonValue::Object(entries) = overrides else {
        return Err(MergeError::NotAnObject {
            record: schema.name().to_string(),
            found: json_type_name(overrides).to_string(),
        });
    };

    // Reject unknown keys before touching anything.
    if let Some(unknown) = entries.keys().find(|key| !schema.contains(key)) {
        tracing::debug!(record = schema.name(), field = %unknown, "unknown override key");
        return Err(MergeError::UnknownField {
            record: schema.name().to_string(),
            path: path.child(unknown).to_string(),
        });
    }

    for (key, incoming) in entries {
        let Some(position) = schema.position(key) else {
            continue;
        };
        let Some(field) = schema.fields().get(position) else {
            continue;
        };
        let Some(slot) = target.value_at_mut(position) else {
            continue;
        };
        merge_field(field.kind(), slot, incoming, &path.child(key))?;
    }
    Ok(())
}

fn merge_field(
    kind: &FieldKind,
    slot: &mut Value,
    incoming: &JsonValue,
    path: &FieldPath,
) -> Result<(), MergeError> {
    match (kind, incoming) {
        (FieldKind::Record(sub), JsonValue::Object(_)) => {
            let reusable = matches!(&*slot, Value::Record(inner) if inner.schema_name() == sub.name());
            if !reusable {
                *slot = Value::Record(instantiate(sub));
            }
            if let Value::Record(inner) = slot {
                apply_overrides(inner, incoming, path)?;
            }
        }
        (FieldKind::Sequence(sub), JsonValue::Array(items)) => {
            let mut replaced = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                replaced.push(sequence_item(sub, item, &path.index(i))?);
            }
            *slot = Value::List(replaced);
        }
        _ => *slot = coerce(kind, incoming),
    }
    Ok(())
}

fn sequence_item(
    schema: &Arc<SchemaRecord>,
    item: &JsonValue,
    path: &FieldPath,
) -> Result<Value, MergeError> {
    match item {
        JsonValue::Object(_) => {
            let mut element = instantiate(schema);
            apply_overrides(&mut element, item, path)?;
            Ok(Value::Record(element))
        }
        other => Ok(Value::from_json(other)),
    }
}

/// Coerce a plain value to a field kind, or keep it raw when that is not
/// possible without loss.
pub(crate) fn coerce(kind: &FieldKind, json: &JsonValue) -> Value {
    match kind {
        FieldKind::String => coerce_primitive(Primitive::String, json),
        FieldKind::Bool => coerce_primitive(Primitive::Bool, json),
        FieldKind::Int => coerce_primitive(Primitive::Int, json),
        FieldKind::Float => coerce_primitive(Primitive::Float, json),
        FieldKind::Enum { base, .. } => coerce_primitive(*base, json),
        FieldKind::List(element) => match json {
            JsonValue::Array(items) => Value::List(
                items
                    .iter()
                    .map(|item| coerce_primitive(*element, item))
                    .collect(),
            ),
            other => Value::from_json(other),
        },
        FieldKind::Map | FieldKind::Record(_) | FieldKind::Sequence(_) => Value::from_json(json),
    }
}

fn coerce_primitive(primitive: Primitive, json: &JsonValue) -> Value {
    let coerced = match (primitive, json) {
        (Primitive::Bool, JsonValue::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },
        (Primitive::Int, JsonValue::Number(n)) => n.as_i64().map(Value::Int).or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| Value::Int(f as i64))
        }),
        (Primitive::Int, JsonValue::String(s)) => s.trim().parse::<i64>().ok().map(Value::Int),
        (Primitive::Float, JsonValue::Number(n)) => n.as_f64().map(Value::Float),
        (Primitive::Float, JsonValue::String(s)) => s.trim().parse::<f64>().ok().map(Value::Float),
        (Primitive::String, JsonValue::Number(n)) => Some(Value::Str(n.to_string())),
        (Primitive::String, JsonValue::Bool(b)) => Some(Value::Str(b.to_string())),
        _ => None,
    };
    coerced.unwrap_or_else(|| Value::from_json(json))
}

fn json_type_name(json: &JsonValue) -> &'static str {
    match json {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// Build an override tree from `dotted.key=value` entries.
///
/// Each value is parsed as JSON when it can be (`22050`, `true`, `[]`,
/// `{"a": 1}`), otherwise it is taken as a plain string. Surrounding
/// whitespace is dropped either way. Later entries win.
pub fn overrides_from_pairs<I, S>(pairs: I) -> Result<JsonValue, MergeError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut root = JsonMap::new();
    for pair in pairs {
        let entry = pair.as_ref();
        let malformed = |reason: &str| MergeError::MalformedOverride {
            entry: entry.to_string(),
            reason: reason.to_string(),
        };

        let (key, raw) = entry
            .split_once('=')
            .ok_or_else(|| malformed("expected key=value"))?;
        let segments: Vec<&str> = key.trim().split('.').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(malformed("empty key segment"));
        }
        let raw = raw.trim();
        let value =
            serde_json::from_str(raw).unwrap_or_else(|_| JsonValue::String(raw.to_string()));

        let Some((last, parents)) = segments.split_last() else {
            return Err(malformed("empty key"));
        };
        let mut node = &mut root;
        for segment in parents {
            let child = node
                .entry(segment.to_string())
                .or_insert_with(|| JsonValue::Object(JsonMap::new()));
            node = match child {
                JsonValue::Object(map) => map,
                _ => return Err(malformed("key is both a value and a record")),
            };
        }
        node.insert(last.to_string(), value);
    }
    Ok(JsonValue::Object(root))
}
