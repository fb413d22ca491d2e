//! Types describing converter declarations and their validated form.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use tracing::warn;

use super::error::RegistryError;

/// Which end of a conversion an extension declaration belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Input,
    Output,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Output => "output",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extensions declared by a converter type, before normalization.
///
/// Either a single extension or an ordered list of them. The leading dot is
/// optional in both forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtensionDecl {
    One(String),
    Many(Vec<String>),
}

impl ExtensionDecl {
    /// Converts a dynamically typed declaration (e.g. from a config file).
    ///
    /// Strings and arrays of strings are accepted. Arrays holding anything
    /// else, and every other value shape, fail with
    /// [`RegistryError::ExtensionType`].
    pub fn from_value(
        converter: &str,
        side: Side,
        value: Option<&Value>,
    ) -> Result<Self, RegistryError> {
        match value {
            Some(Value::String(ext)) => Ok(Self::One(ext.clone())),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(ext) => Ok(ext.clone()),
                    other => Err(RegistryError::ExtensionType {
                        converter: converter.to_string(),
                        side,
                        found: format!("a sequence containing {}", value_kind(other)),
                    }),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Many),
            other => {
                let err = RegistryError::ExtensionType {
                    converter: converter.to_string(),
                    side,
                    found: other.map_or("nothing", value_kind).to_string(),
                };
                warn!("skip converter '{}': {}", converter, err);
                Err(err)
            }
        }
    }

    /// Raw declared extensions in declaration order.
    pub fn as_slice(&self) -> &[String] {
        match self {
            Self::One(ext) => std::slice::from_ref(ext),
            Self::Many(exts) => exts,
        }
    }
}

impl From<&str> for ExtensionDecl {
    fn from(ext: &str) -> Self {
        Self::One(ext.to_string())
    }
}

impl From<String> for ExtensionDecl {
    fn from(ext: String) -> Self {
        Self::One(ext)
    }
}

impl From<Vec<String>> for ExtensionDecl {
    fn from(exts: Vec<String>) -> Self {
        Self::Many(exts)
    }
}

impl From<&[&str]> for ExtensionDecl {
    fn from(exts: &[&str]) -> Self {
        Self::Many(exts.iter().map(|e| e.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ExtensionDecl {
    fn from(exts: [&str; N]) -> Self {
        Self::Many(exts.iter().map(|e| e.to_string()).collect())
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a map",
    }
}

/// A converter type as submitted to the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverterDeclaration {
    /// Type name, expected to read `<input>2<output>`.
    pub name: String,
    #[serde(default)]
    pub input_extensions: Option<ExtensionDecl>,
    #[serde(default)]
    pub output_extensions: Option<ExtensionDecl>,
}

impl ConverterDeclaration {
    pub fn new(
        name: impl Into<String>,
        input_extensions: impl Into<ExtensionDecl>,
        output_extensions: impl Into<ExtensionDecl>,
    ) -> Self {
        Self {
            name: name.into(),
            input_extensions: Some(input_extensions.into()),
            output_extensions: Some(output_extensions.into()),
        }
    }
}

/// Validated, normalized metadata of a converter type.
///
/// Built once at registration and shared by every instance of the type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConverterDescriptor {
    pub(crate) name: String,
    pub(crate) input_format: String,
    pub(crate) output_format: String,
    pub(crate) input_extensions: Vec<String>,
    pub(crate) output_extensions: Vec<String>,
}

impl ConverterDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Uppercase format token before the `2` separator.
    pub fn input_format(&self) -> &str {
        &self.input_format
    }

    /// Uppercase format token after the `2` separator.
    pub fn output_format(&self) -> &str {
        &self.output_format
    }

    pub fn input_extensions(&self) -> &[String] {
        &self.input_extensions
    }

    pub fn output_extensions(&self) -> &[String] {
        &self.output_extensions
    }

    pub fn extensions(&self, side: Side) -> &[String] {
        match side {
            Side::Input => &self.input_extensions,
            Side::Output => &self.output_extensions,
        }
    }

    /// Whether the file name of `path` ends with one of the side's extensions.
    pub fn matches(&self, side: Side, path: &Path) -> bool {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        self.extensions(side)
            .iter()
            .any(|ext| file_name.len() > ext.len() && file_name.ends_with(ext.as_str()))
    }
}
