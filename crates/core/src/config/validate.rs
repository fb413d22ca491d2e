use std::collections::HashSet;

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - The shell is set
/// - Every converter has a command
/// - Converter names are unique
///
/// Converter names and extensions are checked at registration instead, so a
/// malformed converter only skips itself.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.execution.shell.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "execution.shell cannot be empty".to_string(),
        ));
    }

    let mut names = HashSet::new();
    for entry in &config.converters {
        if entry.command.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "converter '{}' has an empty command",
                entry.name
            )));
        }
        if !names.insert(entry.name.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "converter '{}' is declared more than once",
                entry.name
            )));
        }
    }

    Ok(())
}
