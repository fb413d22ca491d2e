use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::converter::{
    parse_converter_name, ConverterDeclaration, ExtensionDecl, RegistryError, Side,
};
use crate::exec::ExecutionConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub execution: ExecutionConfig,
    #[serde(default)]
    pub converters: Vec<ConverterEntry>,
}

/// A converter declared in the configuration file.
///
/// Extension declarations are kept as raw values here and checked when the
/// entry is registered, so one malformed entry does not prevent the rest of
/// the file from loading.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ConverterEntry {
    /// Converter name, `<input>2<output>`
    pub name: String,
    #[serde(default)]
    pub input_extensions: Option<Value>,
    #[serde(default)]
    pub output_extensions: Option<Value>,
    /// Shell command template using `{input}` and `{output}`
    pub command: String,
    /// Reject paths whose extensions are not declared
    #[serde(default)]
    pub check_extensions: bool,
    /// Overrides `execution.verbose` for this converter
    #[serde(default)]
    pub verbose: Option<bool>,
    /// Overrides `execution.ignore_errors` for this converter
    #[serde(default)]
    pub ignore_errors: Option<bool>,
}

impl ConverterEntry {
    /// Checks the name and extension value shapes, in that order.
    pub fn declaration(&self) -> Result<ConverterDeclaration, RegistryError> {
        parse_converter_name(&self.name)?;
        let input =
            ExtensionDecl::from_value(&self.name, Side::Input, self.input_extensions.as_ref())?;
        let output =
            ExtensionDecl::from_value(&self.name, Side::Output, self.output_extensions.as_ref())?;
        Ok(ConverterDeclaration {
            name: self.name.clone(),
            input_extensions: Some(input),
            output_extensions: Some(output),
        })
    }

    /// Execution settings for this converter, falling back to `base`.
    pub fn execution_config(&self, base: &ExecutionConfig) -> ExecutionConfig {
        ExecutionConfig {
            verbose: self.verbose.unwrap_or(base.verbose),
            ignore_errors: self.ignore_errors.unwrap_or(base.ignore_errors),
            ..base.clone()
        }
    }
}
