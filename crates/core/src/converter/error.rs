//! Error types for the converter module.

use std::path::PathBuf;
use thiserror::Error;

use super::types::Side;
use crate::exec::ExecutionError;

/// Errors raised while validating, registering or looking up converter types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The type name does not read `<input>2<output>`.
    #[error("Converter name '{name}' must follow the convention input2output")]
    NamingConvention { name: String },

    /// An extension declaration is neither a string nor a non-empty sequence of strings.
    #[error(
        "The {side} extensions of converter '{converter}' must be a string or a non-empty sequence of strings, found {found}"
    )]
    ExtensionType {
        converter: String,
        side: Side,
        found: String,
    },

    /// Another declaration already uses this name.
    #[error("Converter '{name}' is already registered with a different declaration")]
    DuplicateConverter { name: String },

    /// No converter is registered under this name.
    #[error("Unknown converter: {name}")]
    UnknownConverter { name: String },

    /// No registered converter handles this pair of paths.
    #[error("No converter handles {input} -> {output}")]
    NoMatchingConverter { input: PathBuf, output: PathBuf },

    /// Several registered converters handle this pair of paths.
    #[error("Several converters handle {input} -> {output}: {}", .candidates.join(", "))]
    AmbiguousConverter {
        input: PathBuf,
        output: PathBuf,
        candidates: Vec<String>,
    },
}

impl RegistryError {
    /// Whether this error comes from a malformed declaration.
    pub fn is_declaration_error(&self) -> bool {
        matches!(
            self,
            Self::NamingConvention { .. } | Self::ExtensionType { .. }
        )
    }
}

/// Errors returned by converter implementations.
#[derive(Debug, Error)]
pub enum ConverterError {
    /// The converter type could not be registered.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// A command run on behalf of the converter failed.
    #[error(transparent)]
    Execution(#[from] ExecutionError),

    /// A path does not carry one of the converter's declared extensions.
    #[error("{side} path {path} does not end with any of: {}", .expected.join(", "))]
    ExtensionMismatch {
        path: PathBuf,
        side: Side,
        expected: Vec<String>,
    },

    /// I/O error during conversion.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_type_message_names_side() {
        let err = RegistryError::ExtensionType {
            converter: "fasta2fastq".to_string(),
            side: Side::Output,
            found: "nothing".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("output"));
        assert!(message.contains("fasta2fastq"));
        assert!(err.is_declaration_error());
    }

    #[test]
    fn test_ambiguous_lists_candidates() {
        let err = RegistryError::AmbiguousConverter {
            input: PathBuf::from("a.fa"),
            output: PathBuf::from("a.fq"),
            candidates: vec!["fa2fq".to_string(), "fasta2fastq".to_string()],
        };
        assert!(err.to_string().ends_with("fa2fq, fasta2fastq"));
        assert!(!err.is_declaration_error());
    }

    #[test]
    fn test_converter_error_is_transparent() {
        let err: ConverterError = RegistryError::UnknownConverter {
            name: "bam2bed".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Unknown converter: bam2bed");
    }
}
