//! BaseTrainingConfig: fields shared by every trainable pipeline.

use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

use tc_schema::{FieldDefault, FieldKind, FieldSpec, SchemaBuilder, SchemaError, SchemaRecord, Value};

use super::audio::audio_schema;
use super::dataset::dataset_schema;

pub const TRAINING_SCHEMA: &str = "BaseTrainingConfig";

static TRAINING: OnceLock<Arc<SchemaRecord>> = OnceLock::new();

pub fn training_schema() -> Arc<SchemaRecord> {
    Arc::clone(
        TRAINING.get_or_init(|| build().expect("training schema declaration is well-formed")),
    )
}

pub(crate) fn empty_map() -> FieldDefault {
    FieldDefault::Value(Value::Map(BTreeMap::new()))
}

fn build() -> Result<Arc<SchemaRecord>, SchemaError> {
    let audio = audio_schema();
    let dataset = dataset_schema();

    SchemaBuilder::new(TRAINING_SCHEMA)
        .field(
            FieldSpec::new("model", FieldKind::String, FieldDefault::Missing)
                .required()
                .help("Model architecture name."),
        )
        .field(FieldSpec::new("run_name", FieldKind::String, FieldDefault::value("coqui_tts")))
        .field(FieldSpec::new("run_description", FieldKind::String, FieldDefault::value("")))
        // training
        .field(FieldSpec::new("epochs", FieldKind::Int, FieldDefault::value(10000)).at_least(1))
        .field(FieldSpec::new("batch_size", FieldKind::Int, FieldDefault::value(32)).at_least(1))
        .field(FieldSpec::new("eval_batch_size", FieldKind::Int, FieldDefault::value(16)).at_least(1))
        .field(FieldSpec::new("mixed_precision", FieldKind::Bool, FieldDefault::value(false)))
        .field(FieldSpec::new("scheduler_after_epoch", FieldKind::Bool, FieldDefault::value(false)))
        .field(FieldSpec::new("run_eval", FieldKind::Bool, FieldDefault::value(true)))
        .field(FieldSpec::new("test_delay_epochs", FieldKind::Int, FieldDefault::value(0)).at_least(0))
        .field(FieldSpec::new("print_eval", FieldKind::Bool, FieldDefault::value(false)))
        // logging
        .field(FieldSpec::new(
            "dashboard_logger",
            FieldKind::string_enum(&["tensorboard", "wandb"]),
            FieldDefault::value("tensorboard"),
        ))
        .field(FieldSpec::new("print_step", FieldKind::Int, FieldDefault::value(25)).at_least(1))
        .field(FieldSpec::new("plot_step", FieldKind::Int, FieldDefault::value(100)).at_least(1))
        .field(FieldSpec::new("model_param_stats", FieldKind::Bool, FieldDefault::value(false)))
        // checkpointing
        .field(FieldSpec::new("save_step", FieldKind::Int, FieldDefault::value(10000)).at_least(1))
        .field(FieldSpec::new("checkpoint", FieldKind::Bool, FieldDefault::value(true)))
        .field(FieldSpec::new("keep_all_best", FieldKind::Bool, FieldDefault::value(false)))
        .field(FieldSpec::new("keep_after", FieldKind::Int, FieldDefault::value(10000)).at_least(0))
        // data loading
        .field(
            FieldSpec::new("num_loader_workers", FieldKind::Int, FieldDefault::value(0)).at_least(0),
        )
        .field(
            FieldSpec::new("num_eval_loader_workers", FieldKind::Int, FieldDefault::value(0))
                .at_least(0),
        )
        .field(FieldSpec::new("use_noise_augment", FieldKind::Bool, FieldDefault::value(false)))
        // paths and distributed
        .field(
            FieldSpec::new("output_path", FieldKind::String, FieldDefault::Missing)
                .required()
                .help("Directory that receives checkpoints and logs."),
        )
        .field(FieldSpec::new(
            "distributed_backend",
            FieldKind::string_enum(&["nccl", "gloo"]),
            FieldDefault::value("nccl"),
        ))
        .field(FieldSpec::new(
            "distributed_url",
            FieldKind::String,
            FieldDefault::value("tcp://localhost:54321"),
        ))
        // optimizer
        .field(FieldSpec::new("lr", FieldKind::Float, FieldDefault::value(0.001)).at_least(0))
        .field(FieldSpec::new("optimizer", FieldKind::String, FieldDefault::value("radam")))
        .field(FieldSpec::new("optimizer_params", FieldKind::Map, empty_map()))
        .field(FieldSpec::new("lr_scheduler", FieldKind::String, FieldDefault::None))
        .field(FieldSpec::new("lr_scheduler_params", FieldKind::Map, empty_map()))
        .field(FieldSpec::new("grad_clip", FieldKind::Float, FieldDefault::value(0.0)).at_least(0))
        // nested
        .field(FieldSpec::new("audio", FieldKind::record(&audio), FieldDefault::record(&audio)))
        .field(
            FieldSpec::new(
                "datasets",
                FieldKind::sequence(&dataset),
                FieldDefault::sequence_of(&dataset, 1),
            )
            .help("Datasets merged for training."),
        )
        .build()
}
