//! Converter contract and registry.
//!
//! Every converter type is named `<input>2<output>` (for example
//! `Fastq2Fasta`) and declares the extensions it reads and writes. The
//! declaration is validated once, when the type is registered, and turned into
//! a shared [`ConverterDescriptor`] with uppercase format names and
//! dot-prefixed extensions. A malformed declaration is rejected before any
//! instance of the type can be built.
//!
//! Converter instances carry an input path, an output path and their own
//! [`CommandRunner`](crate::exec::CommandRunner) through which conversions run
//! shell commands.
//!
//! # Example
//!
//! ```ignore
//! use bioconvert_core::converter::{ConverterDeclaration, ConverterRegistry};
//!
//! let registry = ConverterRegistry::new();
//! let descriptor = registry.register(ConverterDeclaration::new(
//!     "Fastq2Fasta",
//!     ["fastq", "fq"],
//!     "fasta",
//! ))?;
//! assert_eq!(descriptor.input_format(), "FASTQ");
//! assert_eq!(descriptor.output_extensions(), [".fasta"]);
//! ```

mod error;
mod instance;
mod registry;
mod shell;
mod traits;
mod types;
mod validate;

pub use error::{ConverterError, RegistryError};
pub use instance::ConverterInstance;
pub use registry::ConverterRegistry;
pub use shell::{
    substitute_command, ShellConverter, ShellConverterType, ShellConverters, INPUT_PLACEHOLDER,
    OUTPUT_PLACEHOLDER,
};
pub use traits::{Converter, ConverterType};
pub use types::{ConverterDeclaration, ConverterDescriptor, ExtensionDecl, Side};
pub use validate::{
    normalize_extension, normalize_extensions, parse_converter_name, validate_and_normalize,
    FORMAT_SEPARATOR,
};
