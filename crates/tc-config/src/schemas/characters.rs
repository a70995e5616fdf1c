//! CharactersConfig: the symbol sets a model is trained on.

use std::sync::{Arc, OnceLock};

use tc_schema::{FieldDefault, FieldKind, FieldSpec, SchemaBuilder, SchemaError, SchemaRecord};

pub const CHARACTERS_SCHEMA: &str = "CharactersConfig";

static CHARACTERS: OnceLock<Arc<SchemaRecord>> = OnceLock::new();

pub fn characters_schema() -> Arc<SchemaRecord> {
    Arc::clone(
        CHARACTERS.get_or_init(|| build().expect("characters schema declaration is well-formed")),
    )
}

fn build() -> Result<Arc<SchemaRecord>, SchemaError> {
    let mut builder = SchemaBuilder::new(CHARACTERS_SCHEMA);
    for name in ["pad", "eos", "bos", "characters", "punctuations", "phonemes"] {
        builder = builder.field(FieldSpec::new(name, FieldKind::String, FieldDefault::Missing).required());
    }
    builder
        .field(
            FieldSpec::new("unique", FieldKind::Bool, FieldDefault::value(true))
                .help("Drop duplicate symbols. Kept for models trained on lists with duplicates."),
        )
        .build()
}
