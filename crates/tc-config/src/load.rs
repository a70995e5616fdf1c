//! Loading a configuration: defaults, then file, then override layers.

use std::path::{Path, PathBuf};

use serde_json::Value as JsonValue;
use tc_schema::{instantiate, ConfigInstance, Violation};

use crate::error::{ConfigError, Result};
use crate::resolve::{resolve_config, ConfigSource, ResolvedConfig};
use crate::schemas::SchemaName;

/// What to load and which layers to apply on top of the schema defaults.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub schema: SchemaName,
    /// Explicit config file; when unset the file is discovered by [`resolve_config`].
    pub config_path: Option<PathBuf>,
    /// Override trees applied after the file, in order.
    pub overrides: Vec<JsonValue>,
}

impl LoadOptions {
    pub fn new(schema: SchemaName) -> Self {
        LoadOptions {
            schema,
            ..Default::default()
        }
    }

    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn with_override(mut self, layer: JsonValue) -> Self {
        self.overrides.push(layer);
        self
    }
}

/// A merged configuration and where it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub schema: SchemaName,
    pub instance: ConfigInstance,
    pub source: ConfigSource,
    pub path: Option<PathBuf>,
}

impl LoadedConfig {
    pub fn violations(&self) -> Vec<Violation> {
        self.instance.validate()
    }
}

/// Load and validate. Fails with [`ConfigError::Invalid`] listing every
/// violation when the merged instance does not validate.
pub fn load_config(options: &LoadOptions) -> Result<LoadedConfig> {
    let loaded = load_unvalidated(options)?;
    let violations = loaded.violations();
    if !violations.is_empty() {
        tracing::warn!(
            schema = %options.schema,
            violations = violations.len(),
            "config failed validation"
        );
        return Err(ConfigError::Invalid {
            schema: loaded.instance.schema_name().to_string(),
            violations,
        });
    }
    Ok(loaded)
}

/// Load and merge every layer without validating the result.
pub fn load_unvalidated(options: &LoadOptions) -> Result<LoadedConfig> {
    let schema = options.schema.schema();
    let mut instance = instantiate(&schema);

    let ResolvedConfig { path, source } = resolve_config(options.config_path.as_deref());
    tracing::debug!(
        schema = %options.schema,
        source = %source,
        path = ?path,
        "resolved config file"
    );

    if let Some(path) = &path {
        let plain = read_json(path)?;
        tracing::debug!(path = %path.display(), "merging config file");
        instance
            .merge_in_place(&plain)
            .map_err(|source| ConfigError::Merge {
                origin: path.display().to_string(),
                source,
            })?;
    }

    for (i, layer) in options.overrides.iter().enumerate() {
        tracing::debug!(layer = i + 1, "merging override layer");
        instance
            .merge_in_place(layer)
            .map_err(|source| ConfigError::Merge {
                origin: format!("override #{}", i + 1),
                source,
            })?;
    }

    tracing::info!(
        schema = %options.schema,
        source = %source,
        overrides = options.overrides.len(),
        "config loaded"
    );

    Ok(LoadedConfig {
        schema: options.schema,
        instance,
        source,
        path,
    })
}

fn read_json(path: &Path) -> Result<JsonValue> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
