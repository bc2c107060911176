//! Source control command execution layer
//!
//! This module handles running external source control tools and parsing
//! their output into [`Modification`](crate::model::Modification)s.

pub mod constants;
mod executor;
/// Parser module (public for integration testing)
pub mod parser;
mod process;

pub use executor::{ProcessExecutor, ProcessRunner};
pub use process::{ArgumentBuilder, ProcessInfo, ProcessResult};

use std::io;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while detecting changes or fetching source
#[derive(Error, Debug)]
pub enum VcsError {
    /// The process outlived its timeout and was killed
    #[error("Process timed out after {} ms: {command}", .timeout.as_millis())]
    Timeout { command: String, timeout: Duration },

    /// The process exited with an unsuccessful exit code.
    ///
    /// `command` is the verbatim command line; logs only ever carry the
    /// masked form.
    #[error("External tool failed (exit code {exit_code}): {command}\n{stderr}")]
    ExternalToolFailure {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    #[error("Failed to parse source control output: {0}")]
    ParseFailure(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Executable not found: {0}")]
    ExecutableNotFound(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl VcsError {
    /// Whether a retry could plausibly succeed (remote flakiness, slow server)
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            VcsError::Timeout { .. } | VcsError::ExternalToolFailure { .. } | VcsError::IoError(_)
        )
    }
}
