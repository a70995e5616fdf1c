//! BaseDatasetConfig: one entry of a training dataset list.

use std::sync::{Arc, OnceLock};

use tc_schema::{FieldDefault, FieldKind, FieldSpec, Primitive, SchemaBuilder, SchemaError, SchemaRecord};

pub const DATASET_SCHEMA: &str = "BaseDatasetConfig";

static DATASET: OnceLock<Arc<SchemaRecord>> = OnceLock::new();

pub fn dataset_schema() -> Arc<SchemaRecord> {
    Arc::clone(DATASET.get_or_init(|| build().expect("dataset schema declaration is well-formed")))
}

fn build() -> Result<Arc<SchemaRecord>, SchemaError> {
    SchemaBuilder::new(DATASET_SCHEMA)
        .field(
            FieldSpec::new("name", FieldKind::String, FieldDefault::Missing)
                .required()
                .help("Formatter name, e.g. ljspeech or vctk."),
        )
        .field(FieldSpec::new("path", FieldKind::String, FieldDefault::Missing).required())
        .field(FieldSpec::new("meta_file_train", FieldKind::String, FieldDefault::Missing).required())
        .field(FieldSpec::new(
            "ignored_speakers",
            FieldKind::List(Primitive::String),
            FieldDefault::empty_list(),
        ))
        .field(FieldSpec::new("meta_file_val", FieldKind::String, FieldDefault::value("")))
        .field(FieldSpec::new("meta_file_attn_mask", FieldKind::String, FieldDefault::value("")))
        .build()
}
