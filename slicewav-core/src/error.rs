// ============================================================================
// slicewav-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Error Types for the Core Library
//
// Every fallible operation in slicewav-core returns `CoreResult<T>`. Setup
// errors (bad directories, invalid configuration, missing tools) surface to the
// caller; per-job tool failures are logged inside the worker that hit them and
// never cross the task pool boundary.

use std::io;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors produced by the slicewav core library.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Path error: {0}")]
    PathError(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to start command '{0}': {1}")]
    CommandStart(String, #[source] io::Error),

    /// The command ran and exited unsuccessfully. The last field holds the
    /// tool's combined output so callers can log it in full.
    #[error("Command '{0}' failed with {1}")]
    CommandFailed(String, ExitStatus, String),

    #[error("Failed waiting for command '{0}': {1}")]
    CommandWait(String, #[source] io::Error),

    #[error("Failed to parse probe output: {0}")]
    ProbeParse(String),

    #[error("Required dependency '{0}' was not found")]
    DependencyNotFound(String),

    #[error("Task pool has been stopped")]
    PoolStopped,

    #[error("Task pool error: {0}")]
    Pool(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

/// Result type for slicewav-core operations.
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Returns the captured tool output for a failed command, if any.
    #[must_use]
    pub fn tool_output(&self) -> Option<&str> {
        match self {
            CoreError::CommandFailed(_, _, output) => Some(output.as_str()),
            _ => None,
        }
    }
}

pub fn command_start_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandStart(cmd.into(), err)
}

pub fn command_failed_error(
    cmd: impl Into<String>,
    status: ExitStatus,
    output: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed(cmd.into(), status, output.into())
}

pub fn command_wait_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandWait(cmd.into(), err)
}
