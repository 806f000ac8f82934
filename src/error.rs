// error.rs

//! # Error Handling Module
//!
//! This module defines the `AppError` enum covering every failure the workflow
//! can report, and the mapping from each failure kind to a process exit code.
//!
//! Operator refusal at a confirmation prompt is deliberately *not* an error: it
//! is reported as `Outcome::Cancelled` by the workflow.
//!
//! # Usage Example
//! ```rust
//! use crate::error::AppError;
//!
//! fn example_function() -> Result<(), AppError> {
//!     Err(AppError::BinaryNotFound("terraform".to_string()))
//! }
//! ```

use std::path::PathBuf;

use thiserror::Error;

use crate::core::stage::Stage;

/// Process exit code for configuration errors detected before Terraform runs.
pub const EXIT_CONFIG_ERROR: i32 = 1;

/// Process exit code for failures of (or while driving) the external tool.
pub const EXIT_TOOL_FAILURE: i32 = 3;

// ============================
// Application Error Definitions
// ============================

/// Represents errors that may occur within the application.
#[derive(Error, Debug)]
pub enum AppError {
    /// The stage's secret file does not exist.
    #[error("secret file not found: {}", .0.display())]
    SecretFileNotFound(PathBuf),

    /// The stage's secret file exists but could not be parsed.
    #[error("could not load secret file {}: {source}", .path.display())]
    SecretFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    /// The Terraform executable is not on the `PATH`.
    #[error("the {0} binary was not found on PATH")]
    BinaryNotFound(String),

    /// The Terraform working directory does not exist.
    #[error("terraform working directory not found: {}", .0.display())]
    WorkingDirNotFound(PathBuf),

    /// The external process could not be started at all.
    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The external process started, but its output could not be forwarded
    /// or its exit status could not be collected.
    #[error("lost track of `{command}` while it was running: {source}")]
    Stream {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The external process ran and exited unsuccessfully.
    #[error("`{command}` failed (exit code: {})", display_code(.code))]
    CommandFailed { command: String, code: Option<i32> },

    /// `terraform plan` failed, so there is no artifact to report or apply.
    #[error("terraform plan failed for the '{0}' stage")]
    PlanFailed(Stage),

    /// Input ended or was interrupted while waiting for a yes/no answer.
    #[error("confirmation prompt closed before an answer was given")]
    PromptClosed,

    /// The interactive line editor failed.
    #[error("prompt error: {0}")]
    Prompt(rustyline::error::ReadlineError),

    /// Wrapper for standard I/O errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Returns the process exit code for this failure kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::SecretFileNotFound(_)
            | Self::SecretFile { .. }
            | Self::BinaryNotFound(_)
            | Self::WorkingDirNotFound(_) => EXIT_CONFIG_ERROR,
            Self::Spawn { .. }
            | Self::Stream { .. }
            | Self::CommandFailed { .. }
            | Self::PlanFailed(_)
            | Self::PromptClosed
            | Self::Prompt(_)
            | Self::Io(_) => EXIT_TOOL_FAILURE,
        }
    }
}

/// Renders an optional exit code; `None` means the child was killed by a signal.
pub fn display_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "terminated by signal".to_string(), |c| c.to_string())
}
