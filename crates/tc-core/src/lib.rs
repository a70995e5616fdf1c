//! Operator CLI support for text-to-speech pipeline configs.
//!
//! The binary lives in `main.rs`; this library holds the pieces it shares
//! with tests: exit codes, logging setup and response rendering.

pub mod exit_codes;
pub mod logging;
pub mod output;

pub use exit_codes::ExitCode;
pub use output::OutputFormat;
