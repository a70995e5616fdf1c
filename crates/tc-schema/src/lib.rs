//! Declarative configuration schemas.
//!
//! This crate provides:
//! - Field declarations with kinds, defaults and constraints
//! - Schema records with inheritance (`extends`) and construction-time checks
//! - Config instances built from schema defaults
//! - Override merging with unknown-key rejection
//! - Validation that reports every violation in one pass
//! - Lossless conversion to and from plain JSON trees

pub mod field;
pub mod instance;
pub mod merge;
pub mod plain;
pub mod schema;
pub mod validate;
pub mod value;

pub use field::{Bounds, Constraints, FieldDefault, FieldKind, FieldSpec, Primitive};
pub use instance::{instantiate, ConfigInstance, FieldStatus};
pub use merge::{merge, overrides_from_pairs, MergeError};
pub use plain::{from_json_str, from_plain, to_json_string, to_plain, PlainError};
pub use schema::{SchemaBuilder, SchemaError, SchemaRecord};
pub use validate::{
    ensure_valid, validate, FieldPath, PathSegment, ValidationFailed, Violation, ViolationKind,
};
pub use value::Value;
