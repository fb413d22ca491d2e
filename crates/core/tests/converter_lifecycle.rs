//! Converter lifecycle integration tests.
//!
//! These tests go through the public API only: declaring converter types,
//! registering them, building instances and running conversions.

use std::io::Write;

use async_trait::async_trait;
use tempfile::{NamedTempFile, TempDir};
use tokio_test::{assert_err, assert_ok};

use bioconvert_core::{
    load_config, Converter, ConverterError, ConverterInstance, ConverterRegistry, ConverterType,
    ExecutionConfig, ExtensionDecl, RegistryError, ShellConverters,
};

/// Uppercases a text file with `tr`.
#[derive(Debug)]
struct Txt2Upper {
    instance: ConverterInstance,
}

impl ConverterType for Txt2Upper {
    const NAME: &'static str = "Txt2Upper";

    fn input_extensions() -> Option<ExtensionDecl> {
        Some(["txt", "text"].into())
    }

    fn output_extensions() -> Option<ExtensionDecl> {
        Some("upper".into())
    }

    fn from_instance(instance: ConverterInstance) -> Self {
        Self { instance }
    }
}

#[async_trait]
impl Converter for Txt2Upper {
    fn instance(&self) -> &ConverterInstance {
        &self.instance
    }

    fn instance_mut(&mut self) -> &mut ConverterInstance {
        &mut self.instance
    }

    async fn convert(&mut self) -> Result<(), ConverterError> {
        let command = format!(
            "tr a-z A-Z < '{}' > '{}'",
            self.instance.input_path().display(),
            self.instance.output_path().display()
        );
        self.instance.run(&command).await?;
        Ok(())
    }
}

/// Name without the format separator.
#[derive(Debug)]
struct TextToUpper {
    instance: ConverterInstance,
}

impl ConverterType for TextToUpper {
    const NAME: &'static str = "TextToUpper";

    fn input_extensions() -> Option<ExtensionDecl> {
        Some("txt".into())
    }

    fn output_extensions() -> Option<ExtensionDecl> {
        Some("upper".into())
    }

    fn from_instance(instance: ConverterInstance) -> Self {
        Self { instance }
    }
}

#[async_trait]
impl Converter for TextToUpper {
    fn instance(&self) -> &ConverterInstance {
        &self.instance
    }

    fn instance_mut(&mut self) -> &mut ConverterInstance {
        &mut self.instance
    }

    async fn convert(&mut self) -> Result<(), ConverterError> {
        Ok(())
    }
}

/// Declares no output extensions.
#[derive(Debug)]
struct Txt2Nothing {
    instance: ConverterInstance,
}

impl ConverterType for Txt2Nothing {
    const NAME: &'static str = "Txt2Nothing";

    fn input_extensions() -> Option<ExtensionDecl> {
        Some("txt".into())
    }

    fn output_extensions() -> Option<ExtensionDecl> {
        None
    }

    fn from_instance(instance: ConverterInstance) -> Self {
        Self { instance }
    }
}

#[async_trait]
impl Converter for Txt2Nothing {
    fn instance(&self) -> &ConverterInstance {
        &self.instance
    }

    fn instance_mut(&mut self) -> &mut ConverterInstance {
        &mut self.instance
    }

    async fn convert(&mut self) -> Result<(), ConverterError> {
        Ok(())
    }
}

#[test]
fn test_static_type_registers_globally() {
    let descriptor = assert_ok!(Txt2Upper::descriptor());
    assert_eq!(descriptor.input_format(), "TXT");
    assert_eq!(descriptor.output_format(), "UPPER");
    assert_eq!(descriptor.input_extensions(), [".txt", ".text"]);
    assert_eq!(descriptor.output_extensions(), [".upper"]);

    let again = assert_ok!(Txt2Upper::descriptor());
    assert!(std::sync::Arc::ptr_eq(&descriptor, &again));
    assert!(ConverterRegistry::global().get("Txt2Upper").is_some());
}

#[test]
fn test_invalid_types_cannot_be_built() {
    let err = assert_err!(TextToUpper::create("a.txt", "a.upper"));
    assert!(matches!(
        err,
        ConverterError::Registry(RegistryError::NamingConvention { .. })
    ));

    let err = assert_err!(Txt2Nothing::create("a.txt", "a.out"));
    assert!(matches!(
        err,
        ConverterError::Registry(RegistryError::ExtensionType { .. })
    ));

    // Rejected types leave no trace and do not affect valid ones.
    assert!(ConverterRegistry::global().get("TextToUpper").is_none());
    assert!(ConverterRegistry::global().get("Txt2Nothing").is_none());
    assert_ok!(Txt2Upper::create("a.txt", "a.upper"));
}

#[tokio::test]
async fn test_static_converter_runs() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("notes.txt");
    let output = dir.path().join("notes.upper");
    std::fs::write(&input, "acgt\n").unwrap();

    let mut converter = assert_ok!(Txt2Upper::create(&input, &output));
    assert_eq!(converter.name(), "Txt2Upper");
    assert!(converter.instance().last_duration().is_none());

    assert_ok!(converter.convert().await);

    assert_eq!(std::fs::read_to_string(&output).unwrap(), "ACGT\n");
    assert!(converter.instance().last_duration().is_some());
}

#[tokio::test]
async fn test_failing_conversion_reports_command() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("missing.txt");
    let output = dir.path().join("missing.upper");

    let mut converter = assert_ok!(Txt2Upper::create(&input, &output));
    let err = assert_err!(converter.convert().await);
    match err {
        ConverterError::Execution(e) => {
            assert!(e.command().contains("missing.txt"));
            assert!(e.stderr().is_some());
        }
        other => panic!("unexpected error: {other}"),
    }

    let mut converter = assert_ok!(Txt2Upper::create_with(
        &input,
        &output,
        ExecutionConfig::default().with_ignore_errors(true),
    ));
    assert_ok!(converter.convert().await);
}

#[tokio::test]
async fn test_shell_converters_from_config_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("reads.fastq");
    let output = dir.path().join("reads.fasta");
    std::fs::write(&input, "@r1\nACGT\n+\nIIII\n").unwrap();

    let mut config_file = NamedTempFile::new().unwrap();
    writeln!(
        config_file,
        r#"
[[converters]]
name = "fastq2fasta"
input_extensions = ["fastq", "fq"]
output_extensions = "fasta"
command = "awk 'NR % 4 == 1 {{ sub(/^@/, \">\"); print }} NR % 4 == 2' {{input}} > {{output}}"

[[converters]]
name = "fastq2nothing"
input_extensions = "fastq"
output_extensions = [1, 2]
command = "true"
"#
    )
    .unwrap();

    let config = assert_ok!(load_config(config_file.path()));
    let registry = ConverterRegistry::new();
    let converters = ShellConverters::load(&config, &registry);

    assert_eq!(converters.len(), 1);
    assert_eq!(converters.rejected().len(), 1);
    assert!(registry.get("fastq2nothing").is_none());

    let descriptor = assert_ok!(registry.resolve(None, &input, &output));
    let converter_type = converters.get(descriptor.name()).unwrap();
    let mut converter = assert_ok!(converter_type.instantiate(&input, &output));
    assert_ok!(converter.convert().await);

    assert_eq!(std::fs::read_to_string(&output).unwrap(), ">r1\nACGT\n");
}
