use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;
use tracing::debug;

use super::{types::Config, ConfigError};

/// Prefix of environment variables overriding file values
pub const ENV_PREFIX: &str = "BIOCONVERT_";

/// Variables under [`ENV_PREFIX`] that select the file rather than override it
const RESERVED_ENV_KEYS: &[&str] = &["config"];

/// Load configuration from file with environment variable overrides
///
/// Nested keys are separated by a double underscore, e.g.
/// `BIOCONVERT_EXECUTION__VERBOSE=true`. `BIOCONVERT_CONFIG` names the file
/// and is not merged.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(
            Env::prefixed(ENV_PREFIX)
                .ignore(RESERVED_ENV_KEYS)
                .split("__"),
        )
        .extract()
        .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;

    debug!(
        path = %path.display(),
        converters = config.converters.len(),
        "Configuration extracted"
    );
    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[execution]
ignore_errors = true

[[converters]]
name = "sam2bam"
input_extensions = "sam"
output_extensions = "bam"
command = "samtools view -b {input} -o {output}"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert!(config.execution.ignore_errors);
        assert_eq!(config.converters[0].name, "sam2bam");
    }

    #[test]
    fn test_load_config_from_str_invalid() {
        let result = load_config_from_str("[execution\nverbose = 1");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/bioconvert.toml"));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_env_overrides_file_values() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "bioconvert.toml",
                r#"
[execution]
verbose = false
ignore_errors = false

[[converters]]
name = "fastq2fasta"
input_extensions = "fastq"
output_extensions = "fasta"
command = "seqtk seq -A {input} > {output}"
"#,
            )?;
            jail.set_env("BIOCONVERT_EXECUTION__VERBOSE", "true");
            jail.set_env("BIOCONVERT_CONFIG", "bioconvert.toml");

            let config = load_config(Path::new("bioconvert.toml")).map_err(|e| e.to_string())?;
            assert!(config.execution.verbose);
            assert!(!config.execution.ignore_errors);
            assert_eq!(config.converters.len(), 1);
            Ok(())
        });
    }

    #[test]
    fn test_parse_error_names_the_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[[converters]]\nname = 1").unwrap();

        let err = load_config(temp_file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
        assert!(err
            .to_string()
            .contains(&temp_file.path().display().to_string()));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[execution]
shell = "/bin/bash"

[[converters]]
name = "bam2bed"
input_extensions = ["bam"]
output_extensions = "bed"
command = "bedtools bamtobed -i {{input}} > {{output}}"
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.execution.shell.to_str().unwrap(), "/bin/bash");
        assert_eq!(
            config.converters[0].command,
            "bedtools bamtobed -i {input} > {output}"
        );
    }
}
