pub mod config;
pub mod converter;
pub mod exec;
pub mod metrics;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, ConverterEntry,
};
pub use converter::{
    Converter, ConverterDeclaration, ConverterDescriptor, ConverterError, ConverterInstance,
    ConverterRegistry, ConverterType, ExtensionDecl, RegistryError, ShellConverter,
    ShellConverterType, ShellConverters, Side,
};
pub use exec::{CommandRunner, ExecutionConfig, ExecutionError, ExecutionResult};
