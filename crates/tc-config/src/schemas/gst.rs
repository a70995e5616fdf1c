//! GSTConfig: global style token module settings.

use std::sync::{Arc, OnceLock};

use tc_schema::{FieldDefault, FieldKind, FieldSpec, SchemaBuilder, SchemaError, SchemaRecord};

pub const GST_SCHEMA: &str = "GSTConfig";

static GST: OnceLock<Arc<SchemaRecord>> = OnceLock::new();

pub fn gst_schema() -> Arc<SchemaRecord> {
    Arc::clone(GST.get_or_init(|| build().expect("gst schema declaration is well-formed")))
}

fn build() -> Result<Arc<SchemaRecord>, SchemaError> {
    SchemaBuilder::new(GST_SCHEMA)
        .define_field("gst_style_input_wav", FieldKind::String, FieldDefault::None, false, None, None)
        .define_field("gst_style_input_weights", FieldKind::Map, FieldDefault::None, false, None, None)
        .define_field(
            "gst_embedding_dim",
            FieldKind::Int,
            FieldDefault::value(256),
            true,
            Some(0.0),
            Some(1000.0),
        )
        .define_field(
            "gst_use_speaker_embedding",
            FieldKind::Bool,
            FieldDefault::value(false),
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
        .define_field(
            "gst_num_style_tokens",
            FieldKind::Int,
            FieldDefault::value(10),
            true,
            Some(1.0),
            Some(1000.0),
        )
        .build()
}
