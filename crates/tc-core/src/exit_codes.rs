//! Exit codes for the tc-core CLI.
//!
//! Exit code ranges:
//! - 0-1: Check outcomes (parse outcome from code, not output)
//! - 10-19: User/environment errors (recoverable by user action)
//! - 20-29: Internal errors

use tc_config::ConfigError;

/// Exit codes for tc-core operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Config merged and validated without violations
    Clean = 0,

    /// Config merged but has at least one violation
    Violations = 1,

    /// Invalid arguments, including malformed `--set` entries
    ArgsError = 10,

    /// Config content could not be applied (unknown key, bad JSON)
    ConfigError = 11,

    /// Internal error (bug - please report)
    InternalError = 20,

    /// Config file could not be read
    IoError = 21,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Check if this exit code is a user/environment error (codes 10-19).
    pub fn is_user_error(self) -> bool {
        (10..20).contains(&(self as i32))
    }

    /// Check if this exit code indicates any error requiring attention.
    /// Violations are an outcome, not an error.
    pub fn is_error(self) -> bool {
        (self as i32) >= 10
    }

    /// Get the error code name as a string constant (for JSON output).
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK_CLEAN",
            ExitCode::Violations => "OK_VIOLATIONS",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }
}

impl From<&ConfigError> for ExitCode {
    fn from(err: &ConfigError) -> Self {
        match err {
            ConfigError::Io { .. } => ExitCode::IoError,
            ConfigError::Parse { .. } | ConfigError::Merge { .. } => ExitCode::ConfigError,
            ConfigError::Invalid { .. } => ExitCode::Violations,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}
