//! Materialized configuration values.

use std::sync::Arc;

use serde::{Serialize, Serializer};
use serde_json::Value as JsonValue;

use crate::field::FieldSpec;
use crate::merge::{apply_overrides, MergeError};
use crate::plain::to_plain;
use crate::schema::SchemaRecord;
use crate::validate::{validate, FieldPath, Violation};
use crate::value::Value;

/// A value tree conforming to a [`SchemaRecord`].
///
/// Holds one value per schema field, in declaration order. The schema is
/// shared and read-only; nested instances are owned by their parent.
#[derive(Debug, Clone)]
pub struct ConfigInstance {
    schema: Arc<SchemaRecord>,
    values: Vec<Value>,
}

/// Three-state view of a field's value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldStatus<'a> {
    /// Unset, and the field never had a default: must be provided.
    UnsetNoDefault,
    /// Unset, which is legitimate for this field.
    UnsetDefaultNone,
    Set(&'a Value),
}

/// Build an instance of `schema` with every default filled in.
///
/// Composite defaults come from per-field factories, so no two instances
/// share nested objects.
pub fn instantiate(schema: &Arc<SchemaRecord>) -> ConfigInstance {
    let values = schema
        .fields()
        .iter()
        .map(|field| field.default().produce())
        .collect();
    ConfigInstance {
        schema: Arc::clone(schema),
        values,
    }
}

impl ConfigInstance {
    pub fn schema(&self) -> &Arc<SchemaRecord> {
        &self.schema
    }

    pub fn schema_name(&self) -> &str {
        self.schema.name()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schema
            .position(name)
            .and_then(|i| self.values.get(i))
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.schema
            .position(name)
            .and_then(|i| self.values.get_mut(i))
    }

    pub(crate) fn value_at_mut(&mut self, position: usize) -> Option<&mut Value> {
        self.values.get_mut(position)
    }

    /// Look up a nested value by dotted path, e.g. `audio.sample_rate` or
    /// `datasets[0].name`.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut current: Option<&Value> = None;
        for part in path.split('.') {
            let (name, indices) = split_indices(part)?;
            let mut value = match current {
                None => self.get(name)?,
                Some(Value::Record(inner)) => inner.get(name)?,
                Some(_) => return None,
            };
            for idx in indices {
                value = value.as_list()?.get(idx)?;
            }
            current = Some(value);
        }
        current
    }

    /// Replace one field's value. The value is stored as given; run
    /// validation to check it.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), MergeError> {
        let record = self.schema.name().to_string();
        match self.get_mut(name) {
            Some(slot) => {
                *slot = value.into();
                Ok(())
            }
            None => Err(MergeError::UnknownField {
                record,
                path: name.to_string(),
            }),
        }
    }

    /// True when the field exists and holds a non-none value.
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some_and(|v| !v.is_none())
    }

    pub fn status(&self, name: &str) -> Option<FieldStatus<'_>> {
        let field = self.schema.field(name)?;
        let value = self.get(name)?;
        Some(match value {
            Value::None if field.default().is_missing() => FieldStatus::UnsetNoDefault,
            Value::None => FieldStatus::UnsetDefaultNone,
            other => FieldStatus::Set(other),
        })
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_i64)
    }

    pub fn get_float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_f64)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn get_record(&self, name: &str) -> Option<&ConfigInstance> {
        self.get(name).and_then(Value::as_record)
    }

    /// Fields paired with their current values, in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&FieldSpec, &Value)> {
        self.schema.fields().iter().zip(self.values.iter())
    }

    /// Apply an override tree to this instance. On error the instance is
    /// left exactly as it was.
    pub fn merge_in_place(&mut self, overrides: &JsonValue) -> Result<(), MergeError> {
        let mut staged = self.clone();
        apply_overrides(&mut staged, overrides, &FieldPath::root())?;
        *self = staged;
        Ok(())
    }

    /// Validate against this instance's own schema.
    pub fn validate(&self) -> Vec<Violation> {
        validate(self, &self.schema)
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

impl PartialEq for ConfigInstance {
    fn eq(&self, other: &Self) -> bool {
        self.schema.name() == other.schema.name() && self.values == other.values
    }
}

impl Serialize for ConfigInstance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        to_plain(self).serialize(serializer)
    }
}

/// Split `datasets[0][1]` into `("datasets", [0, 1])`.
fn split_indices(part: &str) -> Option<(&str, Vec<usize>)> {
    let (name, mut rest) = match part.find('[') {
        Some(pos) => (&part[..pos], &part[pos..]),
        None => (part, ""),
    };
    let mut indices = Vec::new();
    while let Some(stripped) = rest.strip_prefix('[') {
        let close = stripped.find(']')?;
        indices.push(stripped[..close].parse().ok()?);
        rest = &stripped[close + 1..];
    }
    if name.is_empty() {
        return None;
    }
    Some((name, indices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldDefault, FieldKind};
    use crate::schema::SchemaBuilder;
    use crate::FieldSpec;

    fn schemas() -> (Arc<SchemaRecord>, Arc<SchemaRecord>) {
        let dataset = SchemaBuilder::new("Dataset")
            .field(FieldSpec::new("name", FieldKind::String, FieldDefault::value("ljspeech")))
            .build()
            .unwrap();
        let root = SchemaBuilder::new("Root")
            .field(FieldSpec::new("text_cleaner", FieldKind::String, FieldDefault::Missing))
            .field(FieldSpec::new("phoneme_language", FieldKind::String, FieldDefault::None))
            .field(FieldSpec::new("batch_group_size", FieldKind::Int, FieldDefault::value(0)))
            .field(FieldSpec::new(
                "datasets",
                FieldKind::sequence(&dataset),
                FieldDefault::sequence_of(&dataset, 1),
            ))
            .build()
            .unwrap();
        (dataset, root)
    }

    #[test]
    fn test_instantiate_fills_defaults() {
        let (_, root) = schemas();
        let instance = instantiate(&root);
        assert_eq!(instance.get("text_cleaner"), Some(&Value::None));
        assert_eq!(instance.get_int("batch_group_size"), Some(0));
        assert_eq!(instance.get("datasets").and_then(Value::as_list).map(<[Value]>::len), Some(1));
    }

    #[test]
    fn test_factory_defaults_are_independent() {
        let (_, root) = schemas();
        let mut first = instantiate(&root);
        let second = instantiate(&root);
        if let Some(Value::List(items)) = first.get_mut("datasets") {
            items.clear();
        }
        assert_eq!(second.get("datasets").and_then(Value::as_list).map(<[Value]>::len), Some(1));
        assert_ne!(first, second);
    }

    #[test]
    fn test_status_three_states() {
        let (_, root) = schemas();
        let instance = instantiate(&root);
        assert_eq!(instance.status("text_cleaner"), Some(FieldStatus::UnsetNoDefault));
        assert_eq!(instance.status("phoneme_language"), Some(FieldStatus::UnsetDefaultNone));
        assert_eq!(
            instance.status("batch_group_size"),
            Some(FieldStatus::Set(&Value::Int(0)))
        );
        assert_eq!(instance.status("nope"), None);
    }

    #[test]
    fn test_get_path() {
        let (_, root) = schemas();
        let instance = instantiate(&root);
        assert_eq!(
            instance.get_path("datasets[0].name"),
            Some(&Value::from("ljspeech"))
        );
        assert_eq!(instance.get_path("datasets[1].name"), None);
        assert_eq!(instance.get_path("batch_group_size.x"), None);
        assert_eq!(instance.get_path("batch_group_size"), Some(&Value::Int(0)));
    }

    #[test]
    fn test_set_unknown_field_fails() {
        let (_, root) = schemas();
        let mut instance = instantiate(&root);
        let err = instance.set("text_cleanr", "basic_cleaners").unwrap_err();
        assert!(matches!(err, MergeError::UnknownField { .. }));
        instance.set("text_cleaner", "basic_cleaners").unwrap();
        assert!(instance.has("text_cleaner"));
        assert_eq!(instance.get_str("text_cleaner"), Some("basic_cleaners"));
    }

    #[test]
    fn test_split_indices() {
        assert_eq!(split_indices("a[0][2]"), Some(("a", vec![0, 2])));
        assert_eq!(split_indices("a"), Some(("a", vec![])));
        assert_eq!(split_indices("a[x]"), None);
        assert_eq!(split_indices("[0]"), None);
    }
}
