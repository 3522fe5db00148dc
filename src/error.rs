//! Error types for the adbrun CLI.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.
//!
//! Only conditions that prevent a tool invocation from producing a result are
//! errors here. A tool that runs and exits non-zero is *not* an error: the
//! exit code and captured output come back as data in an
//! [`ExecutionResult`](crate::process::ExecutionResult) for the caller to
//! interpret.

use crate::exit_codes;
use std::io;
use thiserror::Error;

/// Main error type for adbrun operations.
///
/// Each variant maps to a specific exit code.
#[derive(Error, Debug)]
pub enum AdbrunError {
    /// The tool executable could not be located under any search root.
    ///
    /// Distinct from a non-zero exit code: no subprocess was ever spawned.
    #[error(
        "could not find '{tool}' in the Android SDK\n\
         Fix: pass --home <sdk-dir> or set the ANDROID_HOME environment variable."
    )]
    ToolNotFound { tool: String },

    /// The OS refused to create the subprocess (permissions, corrupt binary,
    /// path deleted between resolution and execution).
    #[error("failed to start '{tool}': {source}")]
    SpawnFailure {
        tool: String,
        #[source]
        source: io::Error,
    },

    /// User provided invalid arguments or parameters.
    #[error("{0}")]
    UserError(String),
}

impl AdbrunError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            AdbrunError::ToolNotFound { .. } => exit_codes::TOOL_NOT_FOUND,
            AdbrunError::SpawnFailure { .. } => exit_codes::SPAWN_FAILURE,
            AdbrunError::UserError(_) => exit_codes::USER_ERROR,
        }
    }
}

/// Result type alias for adbrun operations.
pub type Result<T> = std::result::Result<T, AdbrunError>;
