use std::fmt::Write as _;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use bioconvert_core::{Config, Converter, ConverterRegistry, ShellConverters};
use tracing::info;

use crate::cli::ConvertArgs;

/// Converters loaded from one configuration file.
pub struct Session {
    registry: ConverterRegistry,
    converters: ShellConverters,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        let registry = ConverterRegistry::new();
        let converters = ShellConverters::load(config, &registry);
        Self {
            registry,
            converters,
        }
    }

    pub fn converters(&self) -> &ShellConverters {
        &self.converters
    }
}

/// One line per converter: name, formats and extensions.
pub fn list(session: &Session) -> String {
    let mut out = String::new();
    for converter in session.converters.iter() {
        let d = converter.descriptor();
        let _ = writeln!(
            out,
            "{:<24} {} -> {}  [{}] -> [{}]",
            d.name(),
            d.input_format(),
            d.output_format(),
            d.input_extensions().join(", "),
            d.output_extensions().join(", "),
        );
    }
    for (name, e) in session.converters.rejected() {
        let _ = writeln!(out, "{:<24} invalid: {}", name, e);
    }
    out
}

/// Runs the converter picked for `args` and returns how long its command took.
pub async fn convert(session: &Session, args: &ConvertArgs) -> Result<Option<Duration>> {
    let descriptor = session
        .registry
        .resolve(args.converter.as_deref(), &args.input, &args.output)?;
    let converter_type = session
        .converters
        .get(descriptor.name())
        .ok_or_else(|| anyhow!("converter '{}' has no command", descriptor.name()))?;

    let mut execution = converter_type.execution().clone();
    execution.verbose |= args.verbose;
    execution.ignore_errors |= args.ignore_errors;

    let mut converter = converter_type
        .clone()
        .with_execution_config(execution)
        .instantiate(&args.input, &args.output)?;

    info!(
        "Converting {:?} to {:?} with {}",
        args.input,
        args.output,
        converter.name()
    );
    converter
        .convert()
        .await
        .with_context(|| format!("{} failed", descriptor.name()))?;

    Ok(converter.instance().last_duration())
}
