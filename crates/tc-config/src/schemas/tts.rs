//! Speech synthesis schemas: the shared BaseTTSConfig and the concrete
//! Tacotron configuration with global style tokens.

use std::sync::{Arc, OnceLock};

use tc_schema::{
    FieldDefault, FieldKind, FieldSpec, Primitive, SchemaBuilder, SchemaError, SchemaRecord,
};

use super::audio::audio_schema;
use super::characters::characters_schema;
use super::dataset::dataset_schema;
use super::gst::gst_schema;
use super::training::training_schema;

pub const TTS_SCHEMA: &str = "BaseTTSConfig";
pub const TACOTRON_GST_SCHEMA: &str = "TacotronGSTConfig";

static TTS: OnceLock<Arc<SchemaRecord>> = OnceLock::new();
static TACOTRON_GST: OnceLock<Arc<SchemaRecord>> = OnceLock::new();

pub fn tts_schema() -> Arc<SchemaRecord> {
    Arc::clone(TTS.get_or_init(|| build_tts().expect("tts schema declaration is well-formed")))
}

pub fn tacotron_gst_schema() -> Arc<SchemaRecord> {
    Arc::clone(TACOTRON_GST.get_or_init(|| {
        build_tacotron_gst().expect("tacotron gst schema declaration is well-formed")
    }))
}

fn build_tts() -> Result<Arc<SchemaRecord>, SchemaError> {
    let audio = audio_schema();
    let characters = characters_schema();
    let dataset = dataset_schema();

    SchemaBuilder::new(TTS_SCHEMA)
        .extends(&training_schema())
        .field(FieldSpec::new("audio", FieldKind::record(&audio), FieldDefault::record(&audio)))
        // phonemes
        .field(FieldSpec::new("use_phonemes", FieldKind::Bool, FieldDefault::value(false)))
        .field(FieldSpec::new("phoneme_language", FieldKind::String, FieldDefault::None))
        .field(FieldSpec::new("compute_input_seq_cache", FieldKind::Bool, FieldDefault::value(false)))
        .field(
            FieldSpec::new("text_cleaner", FieldKind::String, FieldDefault::Missing)
                .help("Name of the cleaner applied to transcripts."),
        )
        .field(FieldSpec::new("enable_eos_bos_chars", FieldKind::Bool, FieldDefault::value(false)))
        .field(FieldSpec::new("test_sentences_file", FieldKind::String, FieldDefault::value("")))
        .field(FieldSpec::new("phoneme_cache_path", FieldKind::String, FieldDefault::None))
        // vocabulary
        .field(FieldSpec::new(
            "characters",
            FieldKind::record(&characters),
            FieldDefault::None,
        ))
        // training
        .field(FieldSpec::new("batch_group_size", FieldKind::Int, FieldDefault::value(0)).at_least(0))
        .field(FieldSpec::new("loss_masking", FieldKind::Bool, FieldDefault::None))
        // data loading
        .field(FieldSpec::new("min_seq_len", FieldKind::Int, FieldDefault::value(1)).at_least(0))
        .field(
            FieldSpec::new("max_seq_len", FieldKind::Float, FieldDefault::value(f64::INFINITY))
                .at_least(1)
                .help("Longest input sequence used in training. Unbounded by default."),
        )
        .field(FieldSpec::new("compute_f0", FieldKind::Bool, FieldDefault::value(false)))
        .field(FieldSpec::new("add_blank", FieldKind::Bool, FieldDefault::value(false)))
        .field(FieldSpec::new(
            "test_sentences",
            FieldKind::List(Primitive::String),
            FieldDefault::empty_list(),
        ))
        .field(
            FieldSpec::new(
                "datasets",
                FieldKind::sequence(&dataset),
                FieldDefault::sequence_of(&dataset, 1),
            )
            .required(),
        )
        .build()
}

fn build_tacotron_gst() -> Result<Arc<SchemaRecord>, SchemaError> {
    let gst = gst_schema();

    SchemaBuilder::new(TACOTRON_GST_SCHEMA)
        .extends(&tts_schema())
        .field(FieldSpec::new("model", FieldKind::String, FieldDefault::value("tacotron2")).required())
        .field(FieldSpec::new("use_gst", FieldKind::Bool, FieldDefault::value(true)))
        .field(FieldSpec::new("gst", FieldKind::record(&gst), FieldDefault::record(&gst)))
        // model
        .field(
            FieldSpec::new("r", FieldKind::Int, FieldDefault::value(2))
                .range(1, 10)
                .help("Frames predicted per decoder step."),
        )
        .field(FieldSpec::new("memory_size", FieldKind::Int, FieldDefault::value(-1)))
        .field(FieldSpec::new(
            "prenet_type",
            FieldKind::string_enum(&["original", "bn"]),
            FieldDefault::value("original"),
        ))
        .field(FieldSpec::new("prenet_dropout", FieldKind::Bool, FieldDefault::value(true)))
        .field(FieldSpec::new("prenet_dropout_at_inference", FieldKind::Bool, FieldDefault::value(false)))
        .field(FieldSpec::new("stopnet", FieldKind::Bool, FieldDefault::value(true)))
        .field(FieldSpec::new("separate_stopnet", FieldKind::Bool, FieldDefault::value(true)))
        .field(
            FieldSpec::new("stopnet_pos_weight", FieldKind::Float, FieldDefault::value(10.0))
                .at_least(0),
        )
        .field(
            FieldSpec::new("max_decoder_steps", FieldKind::Int, FieldDefault::value(500)).at_least(1),
        )
        .field(FieldSpec::new("encoder_in_features", FieldKind::Int, FieldDefault::value(512)).at_least(1))
        .field(FieldSpec::new("decoder_in_features", FieldKind::Int, FieldDefault::value(512)).at_least(1))
        .field(FieldSpec::new("decoder_output_dim", FieldKind::Int, FieldDefault::value(80)).at_least(1))
        .field(FieldSpec::new("out_channels", FieldKind::Int, FieldDefault::value(513)).at_least(1))
        // attention
        .field(FieldSpec::new(
            "attention_type",
            FieldKind::string_enum(&["original", "graves", "dynamic_convolution"]),
            FieldDefault::value("original"),
        ))
        .field(FieldSpec::new("attention_heads", FieldKind::Int, FieldDefault::None).at_least(1))
        .field(FieldSpec::new(
            "attention_norm",
            FieldKind::string_enum(&["sigmoid", "softmax"]),
            FieldDefault::value("sigmoid"),
        ))
        .field(FieldSpec::new("windowing", FieldKind::Bool, FieldDefault::value(false)))
        .field(FieldSpec::new("use_forward_attn", FieldKind::Bool, FieldDefault::value(false)))
        .field(FieldSpec::new("forward_attn_mask", FieldKind::Bool, FieldDefault::value(false)))
        .field(FieldSpec::new("transition_agent", FieldKind::Bool, FieldDefault::value(false)))
        .field(FieldSpec::new("location_attn", FieldKind::Bool, FieldDefault::value(true)))
        // decoder consistency
        .field(FieldSpec::new("bidirectional_decoder", FieldKind::Bool, FieldDefault::value(false)))
        .field(FieldSpec::new("double_decoder_consistency", FieldKind::Bool, FieldDefault::value(false)))
        .field(FieldSpec::new("ddc_r", FieldKind::Int, FieldDefault::value(6)).range(1, 10))
        // loss weights
        .field(FieldSpec::new("decoder_loss_alpha", FieldKind::Float, FieldDefault::value(0.25)).at_least(0))
        .field(FieldSpec::new("postnet_loss_alpha", FieldKind::Float, FieldDefault::value(0.25)).at_least(0))
        .field(FieldSpec::new("ga_alpha", FieldKind::Float, FieldDefault::value(5.0)).at_least(0))
        .build()
}
