//! Shell command runner.

use std::io;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::config::ExecutionConfig;
use super::error::ExecutionError;
use super::types::ExecutionResult;
use crate::metrics::{COMMANDS_TOTAL, COMMAND_DURATION};

/// Bytes requested from a pipe per read.
const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Exit code the shell reports when it cannot find the program to run.
#[cfg(not(windows))]
pub const COMMAND_NOT_FOUND_EXIT_CODE: i32 = 127;
#[cfg(windows)]
pub const COMMAND_NOT_FOUND_EXIT_CODE: i32 = 9009;

/// Runs shell commands and records how long the last one took.
///
/// A runner belongs to exactly one converter instance. `run` takes `&mut self`,
/// so a runner is never reentered while a command is in flight.
#[derive(Debug, Clone, Default)]
pub struct CommandRunner {
    config: ExecutionConfig,
    last_duration: Option<Duration>,
}

impl CommandRunner {
    /// Creates a runner with the given configuration.
    pub fn new(config: ExecutionConfig) -> Self {
        Self {
            config,
            last_duration: None,
        }
    }

    /// Creates a runner with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ExecutionConfig::default())
    }

    pub fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    /// Duration of the most recent `run` call, successful or not.
    pub fn last_duration(&self) -> Option<Duration> {
        self.last_duration
    }

    /// Runs `command` through the shell and classifies its exit code.
    ///
    /// Returns the captured stdout when the command exits with code 0. A
    /// non-zero exit fails with [`ExecutionError::CommandFailed`] unless
    /// `ignore_errors` is set, in which case `Ok(None)` is returned and the
    /// captured output is discarded.
    ///
    /// A program the shell cannot find (exit code
    /// [`COMMAND_NOT_FOUND_EXIT_CODE`]) fails with [`ExecutionError::Spawn`]
    /// even when `ignore_errors` is set.
    pub async fn run(
        &mut self,
        command: &str,
        ignore_errors: bool,
        verbose: bool,
    ) -> Result<Option<String>, ExecutionError> {
        let start = Instant::now();

        let outcome = match self.capture(command).await {
            Ok(result) => Self::classify(command, result, ignore_errors, verbose),
            Err(e) => Err(e),
        };

        let elapsed = start.elapsed();
        self.last_duration = Some(elapsed);

        let label = match &outcome {
            Ok(Some(_)) => "success",
            Ok(None) => "ignored",
            Err(e) => e.metric_label(),
        };
        COMMANDS_TOTAL.with_label_values(&[label]).inc();
        COMMAND_DURATION
            .with_label_values(&[label])
            .observe(elapsed.as_secs_f64());

        info!(
            command,
            result = label,
            elapsed_secs = elapsed.as_secs_f64(),
            "Took {:.3} seconds",
            elapsed.as_secs_f64()
        );

        outcome
    }

    /// Runs `command` through the shell and returns both streams and the exit code.
    ///
    /// Both pipes are drained concurrently while the child runs, so a command
    /// that fills one pipe's OS buffer never blocks on the other.
    pub async fn capture(&self, command: &str) -> Result<ExecutionResult, ExecutionError> {
        let start = Instant::now();

        debug!(
            shell = %self.config.shell.display(),
            command,
            "Spawning shell command"
        );

        let mut child = Command::new(&self.config.shell)
            .arg(&self.config.shell_arg)
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ExecutionError::Spawn {
                command: command.to_string(),
                source,
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ExecutionError::PipeUnavailable {
                command: command.to_string(),
                stream: "output",
            })?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| ExecutionError::PipeUnavailable {
                command: command.to_string(),
                stream: "error",
            })?;

        let (stdout, stderr, status) =
            tokio::try_join!(drain(stdout), drain(stderr), child.wait()).map_err(|source| {
                ExecutionError::Io {
                    command: command.to_string(),
                    source,
                }
            })?;

        Ok(ExecutionResult {
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
            exit_code: status.code().unwrap_or(-1),
            duration: start.elapsed(),
        })
    }

    fn classify(
        command: &str,
        result: ExecutionResult,
        ignore_errors: bool,
        verbose: bool,
    ) -> Result<Option<String>, ExecutionError> {
        if verbose {
            let errors = result.stderr.trim();
            if !errors.is_empty() {
                warn!(command, stderr = %errors, "Command wrote to stderr");
            }
        }

        if result.success() {
            return Ok(Some(result.stdout));
        }

        if result.exit_code == COMMAND_NOT_FOUND_EXIT_CODE {
            let reason = match result.stderr.trim() {
                "" => "command not found",
                stderr => stderr,
            };
            return Err(ExecutionError::Spawn {
                command: command.to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, reason.to_string()),
            });
        }

        if ignore_errors {
            debug!(
                command,
                exit_code = result.exit_code,
                "Ignoring non-zero exit code"
            );
            return Ok(None);
        }

        Err(ExecutionError::CommandFailed {
            command: command.to_string(),
            exit_code: result.exit_code,
            stderr: result.stderr,
        })
    }
}

/// Reads a pipe until EOF into its own accumulator.
async fn drain<R: AsyncRead + Unpin>(mut pipe: R) -> io::Result<Vec<u8>> {
    let mut accumulator = Vec::new();
    let mut chunk = vec![0u8; READ_CHUNK_SIZE];
    loop {
        let n = pipe.read(&mut chunk).await?;
        if n == 0 {
            // EOF: the child closed its end
            break;
        }
        accumulator.extend_from_slice(&chunk[..n]);
    }
    Ok(accumulator)
}
