//! Config file discovery.
//!
//! Resolution order: CLI argument → environment variables → XDG paths → built-in defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Where the config file was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via `TTS_CONFIG` or `TTS_CONFIG_DIR`.
    Environment,

    /// Found in the XDG config directory.
    XdgConfig,

    /// No file; schema defaults only.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// A resolved config file location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Path to the config file, or None when only defaults apply.
    pub path: Option<PathBuf>,
    pub source: ConfigSource,
}

/// Environment variable names.
pub const ENV_CONFIG_PATH: &str = "TTS_CONFIG";
pub const ENV_CONFIG_DIR: &str = "TTS_CONFIG_DIR";

/// Standard config file name.
pub const CONFIG_FILENAME: &str = "config.json";

/// Application name for XDG directories.
const APP_NAME: &str = "tts-config";

/// Resolve the config file path.
///
/// 1. Explicit CLI path (returned even if it does not exist, so loading reports it)
/// 2. `TTS_CONFIG` environment variable
/// 3. `TTS_CONFIG_DIR` environment variable + `config.json`
/// 4. XDG config directory (`~/.config/tts-config/config.json`)
/// 5. Built-in defaults (None)
pub fn resolve_config(cli_path: Option<&Path>) -> ResolvedConfig {
    // 1. CLI argument
    if let Some(path) = cli_path {
        return ResolvedConfig {
            path: Some(path.to_path_buf()),
            source: ConfigSource::CliArgument,
        };
    }

    // 2. Environment variable (direct path)
    if let Ok(env_path) = std::env::var(ENV_CONFIG_PATH) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return found(path, ConfigSource::Environment);
        }
        tracing::warn!(
            var = ENV_CONFIG_PATH,
            path = %path.display(),
            "config path from environment does not exist"
        );
    }

    // 3. Environment variable (config dir)
    if let Ok(config_dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = PathBuf::from(config_dir).join(CONFIG_FILENAME);
        if path.exists() {
            return found(path, ConfigSource::Environment);
        }
    }

    // 4. XDG config directory
    if let Some(dir) = xdg_config_dir() {
        let path = dir.join(CONFIG_FILENAME);
        if path.exists() {
            return found(path, ConfigSource::XdgConfig);
        }
    }

    // 5. Built-in defaults
    ResolvedConfig::default()
}

fn found(path: PathBuf, source: ConfigSource) -> ResolvedConfig {
    ResolvedConfig {
        path: Some(path),
        source,
    }
}

/// Get the XDG config directory for tts-config.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}
