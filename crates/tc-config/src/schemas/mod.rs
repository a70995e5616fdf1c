//! Built-in pipeline schemas.
//!
//! Each schema is declared once per process and shared through an `Arc`.
//! [`SchemaName`] is the registry used by loaders and the command line.

pub mod audio;
pub mod characters;
pub mod dataset;
pub mod gst;
pub mod training;
pub mod tts;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tc_schema::SchemaRecord;

pub use audio::audio_schema;
pub use characters::characters_schema;
pub use dataset::dataset_schema;
pub use gst::gst_schema;
pub use training::training_schema;
pub use tts::{tacotron_gst_schema, tts_schema};

/// Selectable top-level schemas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchemaName {
    Audio,
    Dataset,
    Characters,
    Gst,
    Training,
    Tts,
    #[default]
    TacotronGst,
}

impl SchemaName {
    /// All available schema names.
    pub const ALL: &'static [SchemaName] = &[
        SchemaName::Audio,
        SchemaName::Dataset,
        SchemaName::Characters,
        SchemaName::Gst,
        SchemaName::Training,
        SchemaName::Tts,
        SchemaName::TacotronGst,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaName::Audio => "audio",
            SchemaName::Dataset => "dataset",
            SchemaName::Characters => "characters",
            SchemaName::Gst => "gst",
            SchemaName::Training => "training",
            SchemaName::Tts => "tts",
            SchemaName::TacotronGst => "tacotron-gst",
        }
    }

    /// Parse a schema name, accepting record names and a few aliases.
    pub fn parse(s: &str) -> Option<SchemaName> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "audio" | "baseaudioconfig" => Some(SchemaName::Audio),
            "dataset" | "basedatasetconfig" => Some(SchemaName::Dataset),
            "characters" | "chars" | "charactersconfig" => Some(SchemaName::Characters),
            "gst" | "gstconfig" => Some(SchemaName::Gst),
            "training" | "train" | "basetrainingconfig" => Some(SchemaName::Training),
            "tts" | "basettsconfig" => Some(SchemaName::Tts),
            "tacotron-gst" | "tacotron" | "tacotrongstconfig" => Some(SchemaName::TacotronGst),
            _ => None,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SchemaName::Audio => "Audio processing: STFT, mel spectrogram, normalization, trimming",
            SchemaName::Dataset => "One training dataset entry",
            SchemaName::Characters => "Character and phoneme symbol sets",
            SchemaName::Gst => "Global style token module",
            SchemaName::Training => "Generic training run: logging, checkpoints, optimizer, data",
            SchemaName::Tts => "Shared text-to-speech settings on top of training",
            SchemaName::TacotronGst => "Tacotron with global style tokens",
        }
    }

    /// The shared schema record for this name.
    pub fn schema(&self) -> Arc<SchemaRecord> {
        match self {
            SchemaName::Audio => audio_schema(),
            SchemaName::Dataset => dataset_schema(),
            SchemaName::Characters => characters_schema(),
            SchemaName::Gst => gst_schema(),
            SchemaName::Training => training_schema(),
            SchemaName::Tts => tts_schema(),
            SchemaName::TacotronGst => tacotron_gst_schema(),
        }
    }
}

impl fmt::Display for SchemaName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SchemaName {
    type Err = UnknownSchema;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SchemaName::parse(s).ok_or_else(|| UnknownSchema(s.to_string()))
    }
}

/// Name that matches no built-in schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSchema(pub String);

impl fmt::Display for UnknownSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown schema '{}'. Available: {}",
            self.0,
            SchemaName::ALL
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl std::error::Error for UnknownSchema {}
