//! Naming and extension rules every converter type must satisfy.

use tracing::warn;

use super::error::RegistryError;
use super::types::{ConverterDeclaration, ConverterDescriptor, ExtensionDecl, Side};

/// Separator between the input and output format in a converter name.
pub const FORMAT_SEPARATOR: char = '2';

/// Validates a declaration and derives its descriptor.
///
/// Checks run in order: name, input extensions, output extensions. The first
/// failure is returned.
pub fn validate_and_normalize(
    declaration: &ConverterDeclaration,
) -> Result<ConverterDescriptor, RegistryError> {
    let name = declaration.name.as_str();
    let (input_format, output_format) = parse_converter_name(name)?;
    let input_extensions =
        normalize_extensions(name, Side::Input, declaration.input_extensions.as_ref())?;
    let output_extensions =
        normalize_extensions(name, Side::Output, declaration.output_extensions.as_ref())?;

    Ok(ConverterDescriptor {
        name: name.to_string(),
        input_format,
        output_format,
        input_extensions,
        output_extensions,
    })
}

/// Splits `name` on the first `2` and uppercases both halves.
///
/// Either half may be empty: `"fasta2"` has output format `""`.
pub fn parse_converter_name(name: &str) -> Result<(String, String), RegistryError> {
    name.split_once(FORMAT_SEPARATOR)
        .map(|(input, output)| (input.to_uppercase(), output.to_uppercase()))
        .ok_or_else(|| RegistryError::NamingConvention {
            name: name.to_string(),
        })
}

/// Normalizes one side's declaration into an ordered list of dotted extensions.
pub fn normalize_extensions(
    converter: &str,
    side: Side,
    declaration: Option<&ExtensionDecl>,
) -> Result<Vec<String>, RegistryError> {
    let found = match declaration {
        None => "nothing",
        Some(decl) if decl.as_slice().is_empty() => "an empty sequence",
        Some(decl) => return Ok(decl.as_slice().iter().map(|e| normalize_extension(e)).collect()),
    };

    let err = RegistryError::ExtensionType {
        converter: converter.to_string(),
        side,
        found: found.to_string(),
    };
    warn!("skip converter '{}': {}", converter, err);
    Err(err)
}

/// Prefixes `ext` with a dot unless it already starts with one.
pub fn normalize_extension(ext: &str) -> String {
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{ext}")
    }
}
