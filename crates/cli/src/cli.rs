use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Default configuration file, relative to the working directory
pub const DEFAULT_CONFIG: &str = "bioconvert.toml";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, propagate_version = true)]
pub struct Cli {
    /// Configuration file declaring the converters
    #[arg(long, global = true, env = "BIOCONVERT_CONFIG", default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// Print the Prometheus metrics after the command
    #[arg(long, global = true)]
    pub metrics: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the registered converters
    List,

    /// Convert INPUT into OUTPUT
    Convert(ConvertArgs),
}

#[derive(clap::Args, Debug)]
pub struct ConvertArgs {
    pub input: PathBuf,

    pub output: PathBuf,

    /// Converter to use instead of picking one from the file extensions
    #[arg(short, long)]
    pub converter: Option<String>,

    /// Log the stderr of every command
    #[arg(short, long)]
    pub verbose: bool,

    /// Do not fail when the command exits with a non-zero code, unless the
    /// shell could not find the program
    #[arg(long)]
    pub ignore_errors: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn convert_help(flag: &str) -> String {
        let command = Cli::command();
        let convert = command.find_subcommand("convert").unwrap();
        let arg = convert
            .get_arguments()
            .find(|a| a.get_id() == flag)
            .unwrap();
        arg.get_help().unwrap().to_string()
    }

    #[test]
    fn test_convert_flag_help() {
        assert_eq!(convert_help("verbose"), "Log the stderr of every command");
        assert!(convert_help("ignore_errors").contains("could not find the program"));
    }

    #[test]
    fn test_parse_list() {
        let cli = Cli::try_parse_from(["bioconvert", "list"]).unwrap();
        assert!(matches!(cli.command, Commands::List));
        assert!(!cli.metrics);
    }

    #[test]
    fn test_parse_convert() {
        let cli = Cli::try_parse_from([
            "bioconvert",
            "--config",
            "/etc/bioconvert.toml",
            "convert",
            "reads.fastq",
            "reads.fasta",
            "-c",
            "fastq2fasta",
            "--ignore-errors",
        ])
        .unwrap();

        assert_eq!(cli.config, PathBuf::from("/etc/bioconvert.toml"));
        let Commands::Convert(args) = cli.command else {
            panic!("expected convert");
        };
        assert_eq!(args.input, PathBuf::from("reads.fastq"));
        assert_eq!(args.output, PathBuf::from("reads.fasta"));
        assert_eq!(args.converter.as_deref(), Some("fastq2fasta"));
        assert!(args.ignore_errors);
        assert!(!args.verbose);
    }

    #[test]
    fn test_convert_requires_paths() {
        assert!(Cli::try_parse_from(["bioconvert", "convert", "reads.fastq"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["bioconvert", "list", "--metrics"]).unwrap();
        assert!(cli.metrics);
    }
}
