//! Execution engine for running converter shell commands.
//!
//! A [`CommandRunner`] spawns one shell process per call, drains its standard
//! output and standard error concurrently into two accumulators, waits for the
//! child to exit and classifies the result by exit code.
//!
//! # Example
//!
//! ```ignore
//! use bioconvert_core::exec::CommandRunner;
//!
//! let mut runner = CommandRunner::with_defaults();
//! let stdout = runner.run("samtools view -H input.bam", false, true).await?;
//! println!("took {:?}", runner.last_duration());
//! ```

mod config;
mod error;
mod runner;
mod types;

pub use config::ExecutionConfig;
pub use error::ExecutionError;
pub use runner::{CommandRunner, COMMAND_NOT_FOUND_EXIT_CODE};
pub use types::ExecutionResult;
