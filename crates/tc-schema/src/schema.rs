//! Schema records and the builder that declares them.
//!
//! A [`SchemaRecord`] is built once and shared behind an `Arc` by every
//! instance created from it. Problems in a declaration (duplicate names,
//! defaults that break their own constraints, bad bounds) are programmer
//! errors and fail [`SchemaBuilder::build`] rather than surfacing later as
//! validation violations.
//!
//! Nested records are referenced by `Arc`, so a sub-schema must be built
//! before the schema that uses it. Cycles cannot be expressed.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde_json::{json, Value as JsonValue};
use thiserror::Error;

use crate::field::{FieldDefault, FieldKind, FieldSpec, Primitive};
use crate::plain::value_to_plain;
use crate::validate::check_field;

/// Errors raised while building a schema.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("duplicate field '{field}' in record {record}")]
    DuplicateField { record: String, field: String },

    #[error(
        "field '{field}' in record {record} shadows a base field of kind {base_kind} with incompatible kind {kind}"
    )]
    IncompatibleShadow {
        record: String,
        field: String,
        base_kind: String,
        kind: String,
    },

    #[error("invalid bounds on {record}.{field}: {reason}")]
    InvalidBounds {
        record: String,
        field: String,
        reason: String,
    },

    #[error("invalid kind for {record}.{field}: {reason}")]
    InvalidKind {
        record: String,
        field: String,
        reason: String,
    },

    #[error("invalid default for {record}.{field}: {reason}")]
    InvalidDefault {
        record: String,
        field: String,
        reason: String,
    },

    #[error("field '{field}' in record {record} names unknown alternative '{alternative}'")]
    UnknownAlternative {
        record: String,
        field: String,
        alternative: String,
    },

    #[error("invalid field name '{field}' in record {record}")]
    InvalidFieldName { record: String, field: String },
}

/// An immutable, ordered set of field declarations.
#[derive(Debug)]
pub struct SchemaRecord {
    name: String,
    base: Option<String>,
    fields: Vec<FieldSpec>,
    index: HashMap<String, usize>,
}

impl SchemaRecord {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the record this one extends, if any.
    pub fn base_name(&self) -> Option<&str> {
        self.base.as_deref()
    }

    /// Fields in declaration order. Base fields come first.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.index.get(name).and_then(|&i| self.fields.get(i))
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name())
    }

    /// Plain description of every field, for tooling and docs.
    pub fn describe(&self) -> JsonValue {
        let fields: Vec<JsonValue> = self
            .fields
            .iter()
            .map(|field| {
                let default = match field.default() {
                    FieldDefault::Missing => JsonValue::String("MISSING".to_string()),
                    other => value_to_plain(&other.produce()),
                };
                let constraints = field.constraints();
                json!({
                    "name": field.name(),
                    "kind": field.kind().to_string(),
                    "default": default,
                    "required": constraints.required,
                    "min": constraints.range.and_then(|b| b.min),
                    "max": constraints.range.and_then(|b| b.max),
                    "alternative": constraints.alternative,
                    "help": field.help_text(),
                })
            })
            .collect();

        json!({
            "name": self.name,
            "extends": self.base,
            "fields": fields,
        })
    }
}

/// Declares a [`SchemaRecord`].
///
/// ```ignore
/// let gst = SchemaBuilder::new("GSTConfig")
///     .field(FieldSpec::new("gst_num_heads", FieldKind::Int, FieldDefault::value(4)).range(2, 10))
///     .build()?;
/// ```
#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    base: Option<Arc<SchemaRecord>>,
    fields: Vec<FieldSpec>,
}

impl SchemaBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        SchemaBuilder {
            name: name.into(),
            base: None,
            fields: Vec::new(),
        }
    }

    /// Inherit every field of `base`. Fields declared on this builder with
    /// the same name replace the base field in its original position.
    pub fn extends(mut self, base: &Arc<SchemaRecord>) -> Self {
        self.base = Some(Arc::clone(base));
        self
    }

    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Register a field using the single `restricted` flag form.
    pub fn define_field(
        self,
        name: impl Into<String>,
        kind: FieldKind,
        default: FieldDefault,
        restricted: bool,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Self {
        self.field(FieldSpec::define(name, kind, default, restricted, min, max))
    }

    pub fn build(self) -> Result<Arc<SchemaRecord>, SchemaError> {
        let record = self.name;
        let mut fields: Vec<FieldSpec> = self
            .base
            .as_ref()
            .map(|b| b.fields().to_vec())
            .unwrap_or_default();
        let mut index: HashMap<String, usize> = fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name().to_string(), i))
            .collect();
        let mut declared: HashSet<String> = HashSet::new();

        for spec in self.fields {
            let name = spec.name().to_string();
            if !is_valid_field_name(&name) {
                return Err(SchemaError::InvalidFieldName {
                    record,
                    field: name,
                });
            }
            if !declared.insert(name.clone()) {
                return Err(SchemaError::DuplicateField {
                    record,
                    field: name,
                });
            }
            match index.get(&name) {
                Some(&position) => {
                    let base_kind = fields[position].kind();
                    if !base_kind.is_compatible_with(spec.kind()) {
                        return Err(SchemaError::IncompatibleShadow {
                            record,
                            field: name,
                            base_kind: base_kind.to_string(),
                            kind: spec.kind().to_string(),
                        });
                    }
                    fields[position] = spec;
                }
                None => {
                    index.insert(name, fields.len());
                    fields.push(spec);
                }
            }
        }

        for field in &fields {
            check_declaration(&record, field, &index)?;
        }

        tracing::trace!(
            record = %record,
            base = ?self.base.as_ref().map(|b| b.name().to_string()),
            fields = fields.len(),
            "schema built"
        );

        Ok(Arc::new(SchemaRecord {
            name: record,
            base: self.base.map(|b| b.name().to_string()),
            fields,
            index,
        }))
    }
}

fn is_valid_field_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Check one field's bounds, kind and default against each other.
fn check_declaration(
    record: &str,
    field: &FieldSpec,
    index: &HashMap<String, usize>,
) -> Result<(), SchemaError> {
    let constraints = field.constraints();

    if let Some(bounds) = constraints.range {
        let reason = if !field.kind().is_numeric() {
            Some(format!("range given for non-numeric kind {}", field.kind()))
        } else if bounds.min.is_some_and(f64::is_nan) || bounds.max.is_some_and(f64::is_nan) {
            Some("bound is NaN".to_string())
        } else {
            match (bounds.min, bounds.max) {
                (Some(min), Some(max)) if min > max => {
                    Some(format!("min {} is greater than max {}", min, max))
                }
                _ => None,
            }
        };
        if let Some(reason) = reason {
            return Err(SchemaError::InvalidBounds {
                record: record.to_string(),
                field: field.name().to_string(),
                reason,
            });
        }
    }

    if let FieldKind::Enum { base, choices } = field.kind() {
        let reason = if choices.is_empty() {
            Some("enum has no choices".to_string())
        } else if *base == Primitive::Bool && choices.len() > 2 {
            Some("bool enum has more than two choices".to_string())
        } else {
            choices
                .iter()
                .find(|c| !base.accepts(c))
                .map(|c| format!("choice {} is not a {}", c, base))
        };
        if let Some(reason) = reason {
            return Err(SchemaError::InvalidKind {
                record: record.to_string(),
                field: field.name().to_string(),
                reason,
            });
        }
    }

    if let Some(alternative) = &constraints.alternative {
        if alternative == field.name() || !index.contains_key(alternative) {
            return Err(SchemaError::UnknownAlternative {
                record: record.to_string(),
                field: field.name().to_string(),
                alternative: alternative.clone(),
            });
        }
    }

    match field.default() {
        FieldDefault::Missing => Ok(()),
        FieldDefault::None if constraints.required => Err(SchemaError::InvalidDefault {
            record: record.to_string(),
            field: field.name().to_string(),
            reason: "required field defaults to none; declare it Missing instead".to_string(),
        }),
        default => match check_field(field, &default.produce()) {
            Some((kind, detail)) => Err(SchemaError::InvalidDefault {
                record: record.to_string(),
                field: field.name().to_string(),
                reason: format!("{}: {}", kind, detail),
            }),
            None => Ok(()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn gst() -> Arc<SchemaRecord> {
        SchemaBuilder::new("GSTConfig")
            .define_field(
                "gst_style_input_wav",
                FieldKind::String,
                FieldDefault::None,
                false,
                None,
                None,
            )
            .define_field(
                "gst_num_heads",
                FieldKind::Int,
                FieldDefault::value(4),
                true,
                Some(2.0),
                Some(10.0),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_fields_keep_declaration_order() {
        let schema = gst();
        let names: Vec<&str> = schema.field_names().collect();
        assert_eq!(names, vec!["gst_style_input_wav", "gst_num_heads"]);
        assert_eq!(schema.position("gst_num_heads"), Some(1));
        assert!(schema.field("missing").is_none());
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let err = SchemaBuilder::new("Dup")
            .field(FieldSpec::new("a", FieldKind::Int, FieldDefault::value(1)))
            .field(FieldSpec::new("a", FieldKind::Int, FieldDefault::value(2)))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateField {
                record: "Dup".to_string(),
                field: "a".to_string()
            }
        );
    }

    #[test]
    fn test_extends_shadows_in_place() {
        let base = SchemaBuilder::new("Base")
            .field(FieldSpec::new("a", FieldKind::Int, FieldDefault::value(1)))
            .field(FieldSpec::new("b", FieldKind::String, FieldDefault::value("x")))
            .build()
            .unwrap();
        let derived = SchemaBuilder::new("Derived")
            .extends(&base)
            .field(FieldSpec::new("c", FieldKind::Bool, FieldDefault::value(true)))
            .field(FieldSpec::new("a", FieldKind::Int, FieldDefault::value(7)))
            .build()
            .unwrap();

        let names: Vec<&str> = derived.field_names().collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(derived.base_name(), Some("Base"));
        let a = derived.field("a").unwrap();
        assert_eq!(a.default().produce(), Value::Int(7));
        // The base record is untouched.
        assert_eq!(base.field("a").unwrap().default().produce(), Value::Int(1));
    }

    #[test]
    fn test_incompatible_shadow_rejected() {
        let base = SchemaBuilder::new("Base")
            .field(FieldSpec::new("a", FieldKind::Int, FieldDefault::value(1)))
            .build()
            .unwrap();
        let err = SchemaBuilder::new("Derived")
            .extends(&base)
            .field(FieldSpec::new("a", FieldKind::String, FieldDefault::None))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::IncompatibleShadow { .. }));
    }

    #[test]
    fn test_default_out_of_range_rejected() {
        let err = SchemaBuilder::new("Bad")
            .field(
                FieldSpec::new("heads", FieldKind::Int, FieldDefault::value(1)).range(2, 10),
            )
            .build()
            .unwrap_err();
        match err {
            SchemaError::InvalidDefault { field, reason, .. } => {
                assert_eq!(field, "heads");
                assert!(reason.contains("out_of_range"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_required_with_empty_default_rejected() {
        let err = SchemaBuilder::new("Bad")
            .field(FieldSpec::new("name", FieldKind::String, FieldDefault::value("")).required())
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidDefault { .. }));

        let err = SchemaBuilder::new("Bad")
            .field(FieldSpec::new("name", FieldKind::String, FieldDefault::None).required())
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidDefault { .. }));
    }

    #[test]
    fn test_default_wrong_type_rejected() {
        let err = SchemaBuilder::new("Bad")
            .field(FieldSpec::new("n", FieldKind::Int, FieldDefault::value("four")))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidDefault { .. }));
    }

    #[test]
    fn test_bad_bounds_rejected() {
        let err = SchemaBuilder::new("Bad")
            .field(FieldSpec::new("n", FieldKind::Int, FieldDefault::value(5)).range(10, 2))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidBounds { .. }));

        let err = SchemaBuilder::new("Bad")
            .field(FieldSpec::new("s", FieldKind::String, FieldDefault::None).at_least(1))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidBounds { .. }));
    }

    #[test]
    fn test_unknown_alternative_rejected() {
        let err = SchemaBuilder::new("Bad")
            .field(
                FieldSpec::new("frame_length_ms", FieldKind::Int, FieldDefault::None)
                    .alternative("win_length"),
            )
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::UnknownAlternative { .. }));
    }

    #[test]
    fn test_invalid_field_name_rejected() {
        let err = SchemaBuilder::new("Bad")
            .field(FieldSpec::new("audio.rate", FieldKind::Int, FieldDefault::value(1)))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidFieldName { .. }));
    }

    #[test]
    fn test_empty_enum_rejected() {
        let err = SchemaBuilder::new("Bad")
            .field(FieldSpec::new(
                "mode",
                FieldKind::Enum {
                    base: Primitive::String,
                    choices: vec![],
                },
                FieldDefault::None,
            ))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidKind { .. }));
    }

    #[test]
    fn test_describe_marks_missing() {
        let schema = SchemaBuilder::new("Chars")
            .field(FieldSpec::new("pad", FieldKind::String, FieldDefault::Missing).required())
            .build()
            .unwrap();
        let described = schema.describe();
        assert_eq!(described["name"], "Chars");
        assert_eq!(described["fields"][0]["default"], "MISSING");
        assert_eq!(described["fields"][0]["required"], true);
    }
}
