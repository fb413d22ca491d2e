//! Converters declared in configuration and backed by a shell command template.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use super::error::{ConverterError, RegistryError};
use super::instance::ConverterInstance;
use super::registry::ConverterRegistry;
use super::traits::Converter;
use super::types::ConverterDescriptor;
use crate::config::{Config, ConverterEntry};
use crate::exec::ExecutionConfig;
use crate::metrics::REGISTRATIONS_TOTAL;

/// Placeholder replaced by the input path.
pub const INPUT_PLACEHOLDER: &str = "{input}";

/// Placeholder replaced by the output path.
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

/// Replaces the path placeholders in a command template.
///
/// Paths are inserted as-is; quoting belongs to the template.
pub fn substitute_command(template: &str, input_path: &Path, output_path: &Path) -> String {
    template
        .replace(INPUT_PLACEHOLDER, &input_path.to_string_lossy())
        .replace(OUTPUT_PLACEHOLDER, &output_path.to_string_lossy())
}

/// A registered converter type whose conversion is a single shell command.
#[derive(Debug, Clone)]
pub struct ShellConverterType {
    descriptor: Arc<ConverterDescriptor>,
    command_template: String,
    check_extensions: bool,
    execution: ExecutionConfig,
}

impl ShellConverterType {
    pub fn new(descriptor: Arc<ConverterDescriptor>, command_template: impl Into<String>) -> Self {
        Self {
            descriptor,
            command_template: command_template.into(),
            check_extensions: false,
            execution: ExecutionConfig::default(),
        }
    }

    /// Registers a configuration entry and builds its type.
    pub fn register(
        registry: &ConverterRegistry,
        entry: &ConverterEntry,
        execution: &ExecutionConfig,
    ) -> Result<Self, RegistryError> {
        let declaration = entry.declaration().inspect_err(|_| {
            REGISTRATIONS_TOTAL.with_label_values(&["rejected"]).inc();
        })?;
        let descriptor = registry.register(declaration)?;
        Ok(Self::new(descriptor, entry.command.clone())
            .with_extension_check(entry.check_extensions)
            .with_execution_config(entry.execution_config(execution)))
    }

    /// Reject paths not matching the declared extensions at construction.
    pub fn with_extension_check(mut self, check_extensions: bool) -> Self {
        self.check_extensions = check_extensions;
        self
    }

    pub fn with_execution_config(mut self, execution: ExecutionConfig) -> Self {
        self.execution = execution;
        self
    }

    pub fn descriptor(&self) -> &Arc<ConverterDescriptor> {
        &self.descriptor
    }

    pub fn command_template(&self) -> &str {
        &self.command_template
    }

    pub fn execution(&self) -> &ExecutionConfig {
        &self.execution
    }

    /// Creates a converter for one input/output pair.
    pub fn instantiate(
        &self,
        input_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
    ) -> Result<ShellConverter, ConverterError> {
        let instance = ConverterInstance::new(Arc::clone(&self.descriptor), input_path, output_path)
            .with_execution_config(self.execution.clone());
        let converter = ShellConverter {
            instance,
            command_template: self.command_template.clone(),
            check_extensions: self.check_extensions,
        };
        converter.check_extension()?;
        Ok(converter)
    }
}

/// One conversion job running a shell command template.
#[derive(Debug, Clone)]
pub struct ShellConverter {
    instance: ConverterInstance,
    command_template: String,
    check_extensions: bool,
}

impl ShellConverter {
    /// The command with placeholders replaced by this job's paths.
    pub fn command(&self) -> String {
        substitute_command(
            &self.command_template,
            self.instance.input_path(),
            self.instance.output_path(),
        )
    }
}

#[async_trait]
impl Converter for ShellConverter {
    fn instance(&self) -> &ConverterInstance {
        &self.instance
    }

    fn instance_mut(&mut self) -> &mut ConverterInstance {
        &mut self.instance
    }

    fn check_extension(&self) -> Result<(), ConverterError> {
        if self.check_extensions {
            self.instance.verify_extensions()
        } else {
            Ok(())
        }
    }

    async fn convert(&mut self) -> Result<(), ConverterError> {
        let command = self.command();
        self.instance.run(&command).await?;
        Ok(())
    }
}

/// Shell converter types loaded from a configuration file.
#[derive(Debug, Default)]
pub struct ShellConverters {
    types: BTreeMap<String, ShellConverterType>,
    rejected: Vec<(String, RegistryError)>,
}

impl ShellConverters {
    /// Registers every converter entry of `config` in `registry`.
    ///
    /// Entries failing registration are logged and kept in
    /// [`rejected`](Self::rejected); the remaining entries are still loaded.
    pub fn load(config: &Config, registry: &ConverterRegistry) -> Self {
        let mut loaded = Self::default();
        for entry in &config.converters {
            match ShellConverterType::register(registry, entry, &config.execution) {
                Ok(converter_type) => {
                    loaded.types.insert(entry.name.clone(), converter_type);
                }
                Err(e) => {
                    warn!(converter = %entry.name, error = %e, "Skipping converter");
                    loaded.rejected.push((entry.name.clone(), e));
                }
            }
        }
        info!(
            loaded = loaded.types.len(),
            rejected = loaded.rejected.len(),
            "Loaded shell converters"
        );
        loaded
    }

    pub fn get(&self, name: &str) -> Option<&ShellConverterType> {
        self.types.get(name)
    }

    /// Loaded types sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = &ShellConverterType> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn rejected(&self) -> &[(String, RegistryError)] {
        &self.rejected
    }
}
