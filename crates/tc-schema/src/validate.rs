//! Validation of config instances against their schema.
//!
//! Validation never stops at the first problem. It walks every field in
//! declaration order, descending depth-first into nested records and
//! sequences, and returns the full list of [`Violation`]s.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::field::{matches_choice, FieldKind, FieldSpec};
use crate::instance::ConfigInstance;
use crate::schema::SchemaRecord;
use crate::value::Value;

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

/// Location of a field from the root record, e.g. `datasets[0].name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    pub fn root() -> Self {
        FieldPath(Vec::new())
    }

    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Field(name.to_string()));
        FieldPath(segments)
    }

    pub fn index(&self, i: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(i));
        FieldPath(segments)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Field names only, with index segments dropped.
    pub fn field_names(&self) -> Vec<&str> {
        self.0
            .iter()
            .filter_map(|s| match s {
                PathSegment::Field(name) => Some(name.as_str()),
                PathSegment::Index(_) => None,
            })
            .collect()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Field(name) if i == 0 => write!(f, "{}", name)?,
                PathSegment::Field(name) => write!(f, ".{}", name)?,
                PathSegment::Index(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}

impl<S: Into<String>> FromIterator<S> for FieldPath {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        FieldPath(
            iter.into_iter()
                .map(|s| PathSegment::Field(s.into()))
                .collect(),
        )
    }
}

/// Category of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// No value where one must be provided.
    MissingRequired,
    /// Numeric value outside its bounds, or enum value outside its choices.
    OutOfRange,
    /// Value does not match the declared kind.
    WrongType,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::MissingRequired => write!(f, "missing_required"),
            ViolationKind::OutOfRange => write!(f, "out_of_range"),
            ViolationKind::WrongType => write!(f, "wrong_type"),
        }
    }
}

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub path: FieldPath,
    pub kind: ViolationKind,
    pub detail: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.path, self.kind, self.detail)
    }
}

/// A rejected instance with every violation that was found.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{record} has {} violation(s): {}", .violations.len(), summarize(.violations))]
pub struct ValidationFailed {
    pub record: String,
    pub violations: Vec<Violation>,
}

fn summarize(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Validate `instance` against `schema`, collecting every violation.
///
/// Fields are looked up by name, so an instance built from a different
/// schema is checked field by field; fields it lacks count as unset.
pub fn validate(instance: &ConfigInstance, schema: &SchemaRecord) -> Vec<Violation> {
    let mut violations = Vec::new();
    walk_record(instance, schema, &FieldPath::root(), &mut violations);
    violations
}

/// Validate against the instance's own schema and fail with the full list.
pub fn ensure_valid(instance: &ConfigInstance) -> Result<(), ValidationFailed> {
    let violations = validate(instance, instance.schema());
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationFailed {
            record: instance.schema_name().to_string(),
            violations,
        })
    }
}

fn walk_record(
    instance: &ConfigInstance,
    schema: &SchemaRecord,
    base: &FieldPath,
    out: &mut Vec<Violation>,
) {
    for field in schema.fields() {
        let value = instance.get(field.name()).unwrap_or(&Value::None);
        let path = base.child(field.name());

        if let Some(alternative) = &field.constraints().alternative {
            if instance.get(alternative).is_some_and(|v| !v.is_none()) {
                continue;
            }
        }

        if let Some((kind, detail)) = check_field(field, value) {
            out.push(Violation { path, kind, detail });
            continue;
        }

        match (field.kind(), value) {
            (FieldKind::Record(sub), Value::Record(inner)) => {
                walk_record(inner, sub, &path, out);
            }
            (FieldKind::Sequence(sub), Value::List(items)) => {
                for (i, item) in items.iter().enumerate() {
                    let item_path = path.index(i);
                    match item {
                        Value::Record(inner) if inner.schema_name() == sub.name() => {
                            walk_record(inner, sub, &item_path, out);
                        }
                        other => out.push(Violation {
                            path: item_path,
                            kind: ViolationKind::WrongType,
                            detail: format!("expected {} record, got {}", sub.name(), other.type_name()),
                        }),
                    }
                }
            }
            (FieldKind::List(element), Value::List(items)) => {
                for (i, item) in items.iter().enumerate() {
                    if !element.accepts(item) {
                        out.push(Violation {
                            path: path.index(i),
                            kind: ViolationKind::WrongType,
                            detail: format!("expected {}, got {}", element, item.type_name()),
                        });
                    }
                }
            }
            _ => {}
        }
    }
}

/// Shallow checks for one field value: presence, type, emptiness, range and
/// enum membership. Nested records and elements are not visited.
pub(crate) fn check_field(field: &FieldSpec, value: &Value) -> Option<(ViolationKind, String)> {
    let constraints = field.constraints();

    if value.is_none() {
        if field.default().is_missing() {
            return Some((
                ViolationKind::MissingRequired,
                "field has no default and was never set".to_string(),
            ));
        }
        if constraints.required {
            return Some((
                ViolationKind::MissingRequired,
                "restricted field must be provided".to_string(),
            ));
        }
        return None;
    }

    if !field.kind().accepts(value) {
        let got = match value {
            Value::Record(inner) => format!("{} record", inner.schema_name()),
            other => other.type_name().to_string(),
        };
        return Some((
            ViolationKind::WrongType,
            format!("expected {}, got {}", field.kind(), got),
        ));
    }

    if constraints.required && value.is_empty_value() {
        return Some((
            ViolationKind::MissingRequired,
            format!("restricted field must not be an empty {}", value.type_name()),
        ));
    }

    if let (Some(bounds), Some(v)) = (constraints.range, value.as_f64()) {
        if let Some(detail) = bounds.violation(v) {
            return Some((ViolationKind::OutOfRange, detail));
        }
    }

    if let FieldKind::Enum { choices, .. } = field.kind() {
        if !choices.iter().any(|c| matches_choice(c, value)) {
            let allowed: Vec<String> = choices.iter().map(|c| c.to_string()).collect();
            return Some((
                ViolationKind::OutOfRange,
                format!("{} is not one of {}", value, allowed.join(", ")),
            ));
        }
    }

    None
}
