//! Configuration for the execution engine.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How shell commands are launched and reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Shell used to interpret command strings.
    #[serde(default = "default_shell")]
    pub shell: PathBuf,

    /// Flag passed to the shell before the command string.
    #[serde(default = "default_shell_arg")]
    pub shell_arg: String,

    /// Surface captured stderr as a diagnostic after each command.
    #[serde(default)]
    pub verbose: bool,

    /// Treat non-zero exit codes as non-fatal.
    #[serde(default)]
    pub ignore_errors: bool,
}

#[cfg(not(windows))]
fn default_shell() -> PathBuf {
    PathBuf::from("sh")
}

#[cfg(windows)]
fn default_shell() -> PathBuf {
    PathBuf::from("cmd")
}

#[cfg(not(windows))]
fn default_shell_arg() -> String {
    "-c".to_string()
}

#[cfg(windows)]
fn default_shell_arg() -> String {
    "/C".to_string()
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            shell: default_shell(),
            shell_arg: default_shell_arg(),
            verbose: false,
            ignore_errors: false,
        }
    }
}

impl ExecutionConfig {
    /// Creates a config using a custom shell.
    pub fn with_shell(shell: PathBuf, shell_arg: impl Into<String>) -> Self {
        Self {
            shell,
            shell_arg: shell_arg.into(),
            ..Default::default()
        }
    }

    /// Sets the verbose flag.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Sets the ignore-errors flag.
    pub fn with_ignore_errors(mut self, ignore_errors: bool) -> Self {
        self.ignore_errors = ignore_errors;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(unix)]
    fn test_default_config() {
        let config = ExecutionConfig::default();
        assert_eq!(config.shell, PathBuf::from("sh"));
        assert_eq!(config.shell_arg, "-c");
        assert!(!config.verbose);
        assert!(!config.ignore_errors);
    }

    #[test]
    fn test_config_builder() {
        let config = ExecutionConfig::with_shell(PathBuf::from("/bin/bash"), "-c")
            .with_verbose(true)
            .with_ignore_errors(true);

        assert_eq!(config.shell, PathBuf::from("/bin/bash"));
        assert!(config.verbose);
        assert!(config.ignore_errors);
    }

    #[test]
    fn test_config_deserialize_defaults() {
        let config: ExecutionConfig = serde_json::from_str("{\"verbose\": true}").unwrap();
        assert!(config.verbose);
        assert_eq!(config.shell, ExecutionConfig::default().shell);
    }
}
