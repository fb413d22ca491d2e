//! Trait definitions for the converter module.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use super::error::{ConverterError, RegistryError};
use super::instance::ConverterInstance;
use super::registry::ConverterRegistry;
use super::types::{ConverterDeclaration, ConverterDescriptor, ExtensionDecl};
use crate::exec::ExecutionConfig;

/// Static declaration of a converter type.
///
/// Implementors name themselves `<input>2<output>` and declare the extensions
/// they read and write. The declaration is validated the first time the type
/// is used and memoized in [`ConverterRegistry::global`].
///
/// ```ignore
/// struct Fastq2Fasta {
///     instance: ConverterInstance,
/// }
///
/// impl ConverterType for Fastq2Fasta {
///     const NAME: &'static str = "Fastq2Fasta";
///
///     fn input_extensions() -> Option<ExtensionDecl> {
///         Some(["fastq", "fq"].into())
///     }
///
///     fn output_extensions() -> Option<ExtensionDecl> {
///         Some("fasta".into())
///     }
///
///     fn from_instance(instance: ConverterInstance) -> Self {
///         Self { instance }
///     }
/// }
/// ```
pub trait ConverterType {
    /// Type name, `<input>2<output>`.
    const NAME: &'static str;

    fn input_extensions() -> Option<ExtensionDecl>;

    fn output_extensions() -> Option<ExtensionDecl>;

    /// Wraps the shared per-job state into the concrete converter.
    fn from_instance(instance: ConverterInstance) -> Self
    where
        Self: Sized;

    fn declaration() -> ConverterDeclaration
    where
        Self: Sized,
    {
        ConverterDeclaration {
            name: Self::NAME.to_string(),
            input_extensions: Self::input_extensions(),
            output_extensions: Self::output_extensions(),
        }
    }

    /// Validated metadata of this type, registering it on first use.
    fn descriptor() -> Result<Arc<ConverterDescriptor>, RegistryError>
    where
        Self: Sized,
    {
        ConverterRegistry::global().register_type::<Self>()
    }

    /// Creates a converter for one input/output pair with default execution settings.
    fn create(
        input_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
    ) -> Result<Self, ConverterError>
    where
        Self: Converter + Sized,
    {
        Self::create_with(input_path, output_path, ExecutionConfig::default())
    }

    /// Creates a converter for one input/output pair.
    ///
    /// Fails when the type's declaration is malformed or when
    /// [`Converter::check_extension`] rejects the paths.
    fn create_with(
        input_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        execution: ExecutionConfig,
    ) -> Result<Self, ConverterError>
    where
        Self: Converter + Sized,
    {
        let instance = ConverterInstance::new(Self::descriptor()?, input_path, output_path)
            .with_execution_config(execution);
        let converter = Self::from_instance(instance);
        converter.check_extension()?;
        Ok(converter)
    }
}

/// A single conversion job bound to an input and an output path.
#[async_trait]
pub trait Converter: Send {
    fn instance(&self) -> &ConverterInstance;

    fn instance_mut(&mut self) -> &mut ConverterInstance;

    /// Returns the name of the converter type.
    fn name(&self) -> &str {
        self.instance().name()
    }

    /// Checks the paths against the declared extensions.
    ///
    /// Called once at construction. The default accepts any paths;
    /// implementations wanting strict checks can delegate to
    /// [`ConverterInstance::verify_extensions`].
    fn check_extension(&self) -> Result<(), ConverterError> {
        debug!(
            converter = %self.name(),
            input = %self.instance().input_path().display(),
            output = %self.instance().output_path().display(),
            "Extension check not implemented for converter"
        );
        Ok(())
    }

    /// Performs the conversion.
    async fn convert(&mut self) -> Result<(), ConverterError>;
}
