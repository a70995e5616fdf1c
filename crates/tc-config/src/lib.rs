//! Text-to-speech pipeline configuration.
//!
//! This crate provides:
//! - The built-in pipeline schemas (audio, datasets, characters, GST,
//!   training, TTS and Tacotron-GST)
//! - Config file resolution (CLI → env → XDG → defaults)
//! - Layered loading: defaults, then file, then overrides, then validation
//! - Config snapshots for run provenance

pub mod error;
pub mod load;
pub mod resolve;
pub mod schemas;
pub mod snapshot;

pub use error::{ConfigError, ErrorCategory};
pub use load::{load_config, load_unvalidated, LoadOptions, LoadedConfig};
pub use resolve::{resolve_config, ConfigSource, ResolvedConfig};
pub use schemas::{SchemaName, UnknownSchema};
pub use snapshot::ConfigSnapshot;
