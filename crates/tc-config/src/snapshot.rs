//! Config snapshots for run provenance and reproducibility.
//!
//! A snapshot records which schema and file produced a configuration and a
//! content hash of the merged result, so two runs can be compared cheaply.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tc_schema::{to_plain, ConfigInstance};

use crate::load::LoadedConfig;
use crate::resolve::ConfigSource;

/// A frozen record of a loaded configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    /// When this snapshot was taken.
    pub timestamp: DateTime<Utc>,

    /// Selected schema, e.g. `tacotron-gst`.
    pub schema: String,

    /// Record name of the schema, e.g. `TacotronGSTConfig`.
    pub record: String,

    pub source: ConfigSource,

    /// Path the config file was loaded from.
    #[serde(default)]
    pub path: Option<String>,

    /// SHA-256 of the canonical plain JSON of the merged config.
    pub config_hash: String,

    /// Violations outstanding when the snapshot was taken.
    pub violation_count: usize,
}

impl ConfigSnapshot {
    /// Snapshot a loaded configuration.
    pub fn new(loaded: &LoadedConfig) -> Self {
        Self::with_violation_count(loaded, loaded.violations().len())
    }

    /// Snapshot a configuration whose violations the caller already counted.
    pub fn with_violation_count(loaded: &LoadedConfig, violation_count: usize) -> Self {
        ConfigSnapshot {
            timestamp: Utc::now(),
            schema: loaded.schema.to_string(),
            record: loaded.instance.schema_name().to_string(),
            source: loaded.source,
            path: loaded.path.as_ref().map(|p| p.display().to_string()),
            config_hash: hash_instance(&loaded.instance),
            violation_count,
        }
    }

    /// Serialize snapshot to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Same schema and same merged values.
    pub fn matches(&self, other: &ConfigSnapshot) -> bool {
        self.record == other.record && self.config_hash == other.config_hash
    }

    /// Get a short identifier for this snapshot (first 12 chars of hash).
    pub fn short_id(&self) -> &str {
        &self.config_hash[..12.min(self.config_hash.len())]
    }
}

/// Hash of the instance's plain form. Object keys serialize in sorted order,
/// so equal instances always hash the same.
pub fn hash_instance(instance: &ConfigInstance) -> String {
    hash_content(&to_plain(instance).to_string())
}

/// Hash content with SHA-256 and return hex string.
fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
