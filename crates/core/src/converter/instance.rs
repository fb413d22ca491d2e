//! Per-job converter state.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use super::error::ConverterError;
use super::types::{ConverterDescriptor, Side};
use crate::exec::{CommandRunner, ExecutionConfig, ExecutionError};

/// State shared by every converter implementation: the type's descriptor,
/// the input/output path pair and the instance's own command runner.
#[derive(Debug, Clone)]
pub struct ConverterInstance {
    descriptor: Arc<ConverterDescriptor>,
    input_path: PathBuf,
    output_path: PathBuf,
    runner: CommandRunner,
}

impl ConverterInstance {
    pub fn new(
        descriptor: Arc<ConverterDescriptor>,
        input_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            descriptor,
            input_path: input_path.into(),
            output_path: output_path.into(),
            runner: CommandRunner::with_defaults(),
        }
    }

    /// Replaces the runner with one using `config`.
    pub fn with_execution_config(mut self, config: ExecutionConfig) -> Self {
        self.runner = CommandRunner::new(config);
        self
    }

    pub fn descriptor(&self) -> &Arc<ConverterDescriptor> {
        &self.descriptor
    }

    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    pub fn input_format(&self) -> &str {
        self.descriptor.input_format()
    }

    pub fn output_format(&self) -> &str {
        self.descriptor.output_format()
    }

    pub fn input_extensions(&self) -> &[String] {
        self.descriptor.input_extensions()
    }

    pub fn output_extensions(&self) -> &[String] {
        self.descriptor.output_extensions()
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn runner(&self) -> &CommandRunner {
        &self.runner
    }

    /// Duration of the last command run by this instance.
    pub fn last_duration(&self) -> Option<Duration> {
        self.runner.last_duration()
    }

    /// Runs a shell command on behalf of this converter.
    ///
    /// See [`CommandRunner::run`] for the return value semantics.
    pub async fn execute(
        &mut self,
        command: &str,
        ignore_errors: bool,
        verbose: bool,
    ) -> Result<Option<String>, ExecutionError> {
        info!(converter = %self.descriptor.name(), "{}> {}", self.descriptor.name(), command);
        self.runner.run(command, ignore_errors, verbose).await
    }

    /// Runs a shell command using the flags from the instance's execution config.
    pub async fn run(&mut self, command: &str) -> Result<Option<String>, ExecutionError> {
        let ignore_errors = self.runner.config().ignore_errors;
        let verbose = self.runner.config().verbose;
        self.execute(command, ignore_errors, verbose).await
    }

    /// Checks both paths against the declared extensions.
    pub fn verify_extensions(&self) -> Result<(), ConverterError> {
        for (side, path) in [
            (Side::Input, &self.input_path),
            (Side::Output, &self.output_path),
        ] {
            if !self.descriptor.matches(side, path) {
                return Err(ConverterError::ExtensionMismatch {
                    path: path.clone(),
                    side,
                    expected: self.descriptor.extensions(side).to_vec(),
                });
            }
        }
        Ok(())
    }
}
