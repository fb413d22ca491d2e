//! Error types for the execution engine.

use thiserror::Error;

/// Errors that can occur while running a shell command.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// The shell process could not be created.
    #[error("Failed to execute command '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The command exited with a non-zero status.
    #[error("Command '{command}' exited with code {exit_code}: {stderr}")]
    CommandFailed {
        command: String,
        /// Exit code, `-1` when the child was terminated by a signal.
        exit_code: i32,
        /// Everything the command wrote to standard error.
        stderr: String,
    },

    /// Reading a pipe or waiting for the child failed.
    #[error("I/O error while running '{command}': {source}")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// A standard stream was not captured.
    #[error("Standard {stream} of '{command}' was not captured")]
    PipeUnavailable {
        command: String,
        stream: &'static str,
    },
}

impl ExecutionError {
    /// The command that produced this error.
    pub fn command(&self) -> &str {
        match self {
            Self::Spawn { command, .. }
            | Self::CommandFailed { command, .. }
            | Self::Io { command, .. }
            | Self::PipeUnavailable { command, .. } => command,
        }
    }

    /// Captured standard error, only present for failed commands.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Self::CommandFailed { stderr, .. } => Some(stderr),
            _ => None,
        }
    }

    /// Label used for the `result` dimension of command metrics.
    pub(crate) fn metric_label(&self) -> &'static str {
        match self {
            Self::Spawn { .. } => "spawn_error",
            Self::CommandFailed { .. } => "failed",
            Self::Io { .. } | Self::PipeUnavailable { .. } => "io_error",
        }
    }
}
