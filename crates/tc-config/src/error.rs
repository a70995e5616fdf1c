//! Errors raised while loading a configuration.
//!
//! Each error carries a stable numeric code and a category so callers can
//! map it to an exit status or a structured response:
//! - 10-19: configuration content (bad overrides, violations)
//! - 60-69: file access and JSON parsing

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tc_schema::{MergeError, Violation};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Override or validation problems in the config content.
    Config,
    /// Reading or parsing the config file.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config file {} is not valid JSON: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{origin}: {source}")]
    Merge {
        /// Which layer was being applied: a file path or `override #N`.
        origin: String,
        #[source]
        source: MergeError,
    },

    #[error("{schema} has {} violation(s)", .violations.len())]
    Invalid {
        schema: String,
        violations: Vec<Violation>,
    },
}

impl ConfigError {
    /// Stable error code for machine parsing.
    pub fn code(&self) -> u32 {
        match self {
            ConfigError::Merge { .. } => 12,
            ConfigError::Invalid { .. } => 13,
            ConfigError::Io { .. } => 60,
            ConfigError::Parse { .. } => 61,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ConfigError::Merge { .. } | ConfigError::Invalid { .. } => ErrorCategory::Config,
            ConfigError::Io { .. } | ConfigError::Parse { .. } => ErrorCategory::Io,
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            ConfigError::Io { .. } => "Check the path given by --config, TTS_CONFIG or TTS_CONFIG_DIR",
            ConfigError::Parse { .. } => "Fix the JSON syntax in the config file",
            ConfigError::Merge { .. } => {
                "Remove or rename the unknown key; run 'tc-core describe' to list fields"
            }
            ConfigError::Invalid { .. } => "Set the reported fields and run 'tc-core check' again",
        }
    }

    /// Violations carried by an `Invalid` error.
    pub fn violations(&self) -> &[Violation] {
        match self {
            ConfigError::Invalid { violations, .. } => violations,
            _ => &[],
        }
    }
}
