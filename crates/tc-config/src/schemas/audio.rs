//! BaseAudioConfig: STFT, normalization, mel and silence-trimming parameters.

use std::sync::{Arc, OnceLock};

use tc_schema::{FieldDefault, FieldKind, FieldSpec, SchemaBuilder, SchemaError, SchemaRecord};

pub const AUDIO_SCHEMA: &str = "BaseAudioConfig";

static AUDIO: OnceLock<Arc<SchemaRecord>> = OnceLock::new();

/// Shared audio processor schema.
pub fn audio_schema() -> Arc<SchemaRecord> {
    Arc::clone(AUDIO.get_or_init(|| build().expect("audio schema declaration is well-formed")))
}

fn build() -> Result<Arc<SchemaRecord>, SchemaError> {
    SchemaBuilder::new(AUDIO_SCHEMA)
        // stft
        .field(
            FieldSpec::new("fft_size", FieldKind::Int, FieldDefault::value(1024))
                .range(128, 4058)
                .help("Number of STFT frequency levels."),
        )
        .field(FieldSpec::new("win_length", FieldKind::Int, FieldDefault::value(1024)).at_least(1))
        .field(FieldSpec::new("hop_length", FieldKind::Int, FieldDefault::value(256)).at_least(1))
        .field(
            FieldSpec::new("frame_shift_ms", FieldKind::Float, FieldDefault::None)
                .range(1, 1000)
                .alternative("hop_length")
                .help("Hop length in milliseconds. Overrides hop_length when set."),
        )
        .field(
            FieldSpec::new("frame_length_ms", FieldKind::Float, FieldDefault::None)
                .range(10, 1000)
                .alternative("win_length")
                .help("Window length in milliseconds. Overrides win_length when set."),
        )
        .field(FieldSpec::new(
            "stft_pad_mode",
            FieldKind::string_enum(&["reflect", "constant", "replicate", "circular"]),
            FieldDefault::value("reflect"),
        ))
        // audio processing
        .field(
            FieldSpec::new("sample_rate", FieldKind::Int, FieldDefault::value(22050))
                .range(512, 100000),
        )
        .field(FieldSpec::new("resample", FieldKind::Bool, FieldDefault::value(false)))
        .field(FieldSpec::new("preemphasis", FieldKind::Float, FieldDefault::value(0.0)).range(0, 1))
        .field(
            FieldSpec::new("ref_level_db", FieldKind::Int, FieldDefault::value(20)).range(0, 1000),
        )
        .field(FieldSpec::new("do_sound_norm", FieldKind::Bool, FieldDefault::value(false)))
        .field(FieldSpec::new(
            "log_func",
            FieldKind::string_enum(&["np.log10", "np.log"]),
            FieldDefault::value("np.log10"),
        ))
        // silence trimming
        .field(FieldSpec::new("do_trim_silence", FieldKind::Bool, FieldDefault::value(true)).required())
        .field(FieldSpec::new("trim_db", FieldKind::Int, FieldDefault::value(45)).required())
        // griffin-lim
        .field(FieldSpec::new("power", FieldKind::Float, FieldDefault::value(1.5)).range(1, 5))
        .field(
            FieldSpec::new("griffin_lim_iters", FieldKind::Int, FieldDefault::value(60))
                .range(10, 1000),
        )
        // mel spectrogram
        .field(FieldSpec::new("num_mels", FieldKind::Int, FieldDefault::value(80)).range(10, 2056))
        .field(FieldSpec::new("mel_fmin", FieldKind::Float, FieldDefault::value(0.0)).range(0, 1000))
        .field(
            FieldSpec::new("mel_fmax", FieldKind::Float, FieldDefault::None)
                .at_least(500)
                .help("Upper mel frequency. Unset means sample_rate / 2."),
        )
        .field(FieldSpec::new("spec_gain", FieldKind::Int, FieldDefault::value(20)).range(1, 100))
        .field(FieldSpec::new("do_amp_to_db_linear", FieldKind::Bool, FieldDefault::value(true)))
        .field(FieldSpec::new("do_amp_to_db_mel", FieldKind::Bool, FieldDefault::value(true)))
        // normalization
        .field(FieldSpec::new("signal_norm", FieldKind::Bool, FieldDefault::value(true)).required())
        .field(
            FieldSpec::new("min_level_db", FieldKind::Int, FieldDefault::value(-100))
                .range(-1000, 10),
        )
        .field(FieldSpec::new("symmetric_norm", FieldKind::Bool, FieldDefault::value(true)).required())
        .field(
            FieldSpec::new("max_norm", FieldKind::Float, FieldDefault::value(4.0)).range(0.1, 1000),
        )
        .field(FieldSpec::new("clip_norm", FieldKind::Bool, FieldDefault::value(true)).required())
        .field(
            FieldSpec::new("stats_path", FieldKind::String, FieldDefault::None)
                .help("Path to precomputed feature statistics for mean-var normalization."),
        )
        .build()
}
