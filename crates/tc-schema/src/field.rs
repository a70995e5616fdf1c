//! Field declarations: kind, default and constraints of one configuration field.

use std::fmt;
use std::sync::Arc;

use crate::instance::instantiate;
use crate::schema::SchemaRecord;
use crate::value::Value;

/// Scalar types usable on their own, as enum bases and as list elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    String,
    Bool,
    Int,
    Float,
}

impl Primitive {
    /// Whether a non-none value has this primitive type. Ints are accepted
    /// where floats are expected.
    pub fn accepts(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (Primitive::String, Value::Str(_))
                | (Primitive::Bool, Value::Bool(_))
                | (Primitive::Int, Value::Int(_))
                | (Primitive::Float, Value::Float(_) | Value::Int(_))
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Primitive::String => "string",
            Primitive::Bool => "bool",
            Primitive::Int => "int",
            Primitive::Float => "float",
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The declared kind of a field.
#[derive(Debug, Clone)]
pub enum FieldKind {
    String,
    Bool,
    Int,
    Float,
    /// A primitive restricted to a fixed set of choices.
    Enum { base: Primitive, choices: Vec<Value> },
    /// A list of primitives.
    List(Primitive),
    /// A free-form string-keyed mapping.
    Map,
    /// A nested record.
    Record(Arc<SchemaRecord>),
    /// An ordered sequence of nested records.
    Sequence(Arc<SchemaRecord>),
}

impl FieldKind {
    /// Enum over string choices.
    pub fn string_enum(choices: &[&str]) -> Self {
        FieldKind::Enum {
            base: Primitive::String,
            choices: choices.iter().map(|c| Value::from(*c)).collect(),
        }
    }

    pub fn record(schema: &Arc<SchemaRecord>) -> Self {
        FieldKind::Record(Arc::clone(schema))
    }

    pub fn sequence(schema: &Arc<SchemaRecord>) -> Self {
        FieldKind::Sequence(Arc::clone(schema))
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldKind::Int | FieldKind::Float)
    }

    /// Sub-schema for record and sequence kinds.
    pub fn nested_schema(&self) -> Option<&Arc<SchemaRecord>> {
        match self {
            FieldKind::Record(schema) | FieldKind::Sequence(schema) => Some(schema),
            _ => None,
        }
    }

    /// Shallow type check for a non-none value.
    ///
    /// Elements of lists and sequences are checked separately so that each
    /// offending element gets its own path.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (FieldKind::String, v) => Primitive::String.accepts(v),
            (FieldKind::Bool, v) => Primitive::Bool.accepts(v),
            (FieldKind::Int, v) => Primitive::Int.accepts(v),
            (FieldKind::Float, v) => Primitive::Float.accepts(v),
            (FieldKind::Enum { base, .. }, v) => base.accepts(v),
            (FieldKind::List(_), Value::List(_)) => true,
            (FieldKind::Map, Value::Map(_)) => true,
            (FieldKind::Record(schema), Value::Record(inner)) => {
                inner.schema_name() == schema.name()
            }
            (FieldKind::Sequence(_), Value::List(_)) => true,
            _ => false,
        }
    }

    /// Whether a derived record may shadow a field of kind `self` with `other`.
    pub fn is_compatible_with(&self, other: &FieldKind) -> bool {
        match (self, other) {
            (FieldKind::String, FieldKind::String)
            | (FieldKind::Bool, FieldKind::Bool)
            | (FieldKind::Int, FieldKind::Int)
            | (FieldKind::Float, FieldKind::Float)
            | (FieldKind::Map, FieldKind::Map) => true,
            (FieldKind::Enum { base: a, .. }, FieldKind::Enum { base: b, .. }) => a == b,
            (FieldKind::List(a), FieldKind::List(b)) => a == b,
            (FieldKind::Record(a), FieldKind::Record(b))
            | (FieldKind::Sequence(a), FieldKind::Sequence(b)) => a.name() == b.name(),
            _ => false,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::String => write!(f, "string"),
            FieldKind::Bool => write!(f, "bool"),
            FieldKind::Int => write!(f, "int"),
            FieldKind::Float => write!(f, "float"),
            FieldKind::Enum { base, choices } => {
                let rendered: Vec<String> = choices.iter().map(|c| c.to_string()).collect();
                write!(f, "enum<{}>{{{}}}", base, rendered.join(", "))
            }
            FieldKind::List(element) => write!(f, "list<{}>", element),
            FieldKind::Map => write!(f, "map"),
            FieldKind::Record(schema) => write!(f, "record<{}>", schema.name()),
            FieldKind::Sequence(schema) => write!(f, "sequence<{}>", schema.name()),
        }
    }
}

/// Whether `value` equals one of an enum's `choice`s.
///
/// Strings compare case-insensitively, numbers by numeric value.
pub(crate) fn matches_choice(choice: &Value, value: &Value) -> bool {
    match (choice, value) {
        (Value::Str(a), Value::Str(b)) => a.eq_ignore_ascii_case(b),
        (Value::Bool(a), Value::Bool(b)) => a == b,
        _ => match (choice.as_f64(), value.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
    }
}

type DefaultFactory = Arc<dyn Fn() -> Value + Send + Sync>;

/// Where a field's initial value comes from.
#[derive(Clone)]
pub enum FieldDefault {
    /// No usable default: the field must be set before the config is valid.
    Missing,
    /// Defaults to an explicit `None`.
    None,
    /// A static value, cloned into every instance.
    Value(Value),
    /// Called once per instantiation, for composite defaults.
    Factory(DefaultFactory),
}

impl FieldDefault {
    pub fn value(value: impl Into<Value>) -> Self {
        FieldDefault::Value(value.into())
    }

    pub fn factory(f: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        FieldDefault::Factory(Arc::new(f))
    }

    /// A fresh instance of `schema` with its own defaults.
    pub fn record(schema: &Arc<SchemaRecord>) -> Self {
        let schema = Arc::clone(schema);
        FieldDefault::factory(move || Value::Record(instantiate(&schema)))
    }

    /// `count` fresh default instances of `schema`.
    pub fn sequence_of(schema: &Arc<SchemaRecord>, count: usize) -> Self {
        let schema = Arc::clone(schema);
        FieldDefault::factory(move || {
            Value::List(
                (0..count)
                    .map(|_| Value::Record(instantiate(&schema)))
                    .collect(),
            )
        })
    }

    pub fn empty_list() -> Self {
        FieldDefault::Value(Value::List(Vec::new()))
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, FieldDefault::Missing)
    }

    /// Produce the initial value. `Missing` and `None` both start out unset.
    pub fn produce(&self) -> Value {
        match self {
            FieldDefault::Missing | FieldDefault::None => Value::None,
            FieldDefault::Value(value) => value.clone(),
            FieldDefault::Factory(factory) => factory(),
        }
    }
}

impl fmt::Debug for FieldDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldDefault::Missing => write!(f, "Missing"),
            FieldDefault::None => write!(f, "None"),
            FieldDefault::Value(value) => f.debug_tuple("Value").field(value).finish(),
            FieldDefault::Factory(_) => write!(f, "Factory(..)"),
        }
    }
}

/// Inclusive numeric bounds; either side may be open.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Bounds {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Bounds { min, max }
    }

    /// Describe how `v` violates these bounds, if it does.
    pub fn violation(&self, v: f64) -> Option<String> {
        if v.is_nan() {
            return Some(format!("NaN is outside {}", self));
        }
        if let Some(min) = self.min {
            if v < min {
                return Some(format!("{} is below minimum {} (allowed {})", v, min, self));
            }
        }
        if let Some(max) = self.max {
            if v > max {
                return Some(format!("{} is above maximum {} (allowed {})", v, max, self));
            }
        }
        None
    }

    pub fn contains(&self, v: f64) -> bool {
        self.violation(v).is_none()
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (Some(min), Some(max)) => write!(f, "[{}, {}]", min, max),
            (Some(min), None) => write!(f, "[{}, +inf)", min),
            (None, Some(max)) => write!(f, "(-inf, {}]", max),
            (None, None) => write!(f, "(-inf, +inf)"),
        }
    }
}

/// Validation rules attached to a field.
///
/// `required` and `range` are independent: a field may be required, ranged,
/// both, or neither. A ranged field that is not required accepts `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constraints {
    /// Value must be present and non-empty.
    pub required: bool,
    /// Numeric value, when present, must lie within these bounds.
    pub range: Option<Bounds>,
    /// Sibling field that, when set, exempts this field from its checks.
    pub alternative: Option<String>,
}

impl Constraints {
    pub fn is_empty(&self) -> bool {
        !self.required && self.range.is_none()
    }
}

/// One field of a [`SchemaRecord`].
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: String,
    kind: FieldKind,
    default: FieldDefault,
    constraints: Constraints,
    help: Option<String>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, kind: FieldKind, default: FieldDefault) -> Self {
        FieldSpec {
            name: name.into(),
            kind,
            default,
            constraints: Constraints::default(),
            help: None,
        }
    }

    /// Single-flag form: bounds become a range constraint; `restricted`
    /// without bounds means the value must be provided and non-empty.
    pub fn define(
        name: impl Into<String>,
        kind: FieldKind,
        default: FieldDefault,
        restricted: bool,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Self {
        let mut spec = FieldSpec::new(name, kind, default);
        if min.is_some() || max.is_some() {
            spec.constraints.range = Some(Bounds::new(min, max));
        } else if restricted {
            spec.constraints.required = true;
        }
        spec
    }

    pub fn required(mut self) -> Self {
        self.constraints.required = true;
        self
    }

    pub fn range(mut self, min: impl Into<f64>, max: impl Into<f64>) -> Self {
        self.constraints.range = Some(Bounds::new(Some(min.into()), Some(max.into())));
        self
    }

    pub fn at_least(mut self, min: impl Into<f64>) -> Self {
        let max = self.constraints.range.and_then(|b| b.max);
        self.constraints.range = Some(Bounds::new(Some(min.into()), max));
        self
    }

    pub fn at_most(mut self, max: impl Into<f64>) -> Self {
        let min = self.constraints.range.and_then(|b| b.min);
        self.constraints.range = Some(Bounds::new(min, Some(max.into())));
        self
    }

    pub fn alternative(mut self, field: impl Into<String>) -> Self {
        self.constraints.alternative = Some(field.into());
        self
    }

    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.help = Some(text.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn default(&self) -> &FieldDefault {
        &self.default
    }

    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    pub fn help_text(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Subject to a non-empty or range rule.
    pub fn is_restricted(&self) -> bool {
        !self.constraints.is_empty()
    }

    /// Has no default and must be set explicitly.
    pub fn is_required_without_default(&self) -> bool {
        self.default.is_missing()
    }
}
