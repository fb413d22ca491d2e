//! Types produced by the execution engine.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Outcome of a single shell command, before success/failure classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Everything the command wrote to standard output.
    pub stdout: String,
    /// Everything the command wrote to standard error.
    pub stderr: String,
    /// Exit code, `-1` when the child was terminated by a signal.
    pub exit_code: i32,
    /// Wall-clock time from spawn to exit.
    pub duration: Duration,
}

impl ExecutionResult {
    /// Whether the command exited with code 0.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_only_for_zero() {
        let mut result = ExecutionResult {
            stdout: String::new(),
            stderr: String::new(),
            exit_code: 0,
            duration: Duration::ZERO,
        };
        assert!(result.success());

        result.exit_code = -1;
        assert!(!result.success());
    }
}
