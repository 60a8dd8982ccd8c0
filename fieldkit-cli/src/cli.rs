//! CLI definition for the fieldkit command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// How command results are printed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON document
    Json,
    /// YAML document
    Yaml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Yaml => write!(f, "yaml"),
        }
    }
}

/// fieldkit - inspect the built-in profile form
///
/// Lists fields, evaluates visibility, validates records and replays edits
/// against the profile form schema.
#[derive(Parser, Debug)]
#[command(name = "fieldkit")]
#[command(version)]
#[command(about = "Inspect and evaluate the fieldkit profile form")]
pub struct Cli {
    /// Enable debug output to stderr
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Settings file to load on top of discovered ones
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the form's fields in render order
    Fields {
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Show which fields are visible for a record
    Visible {
        /// JSON record file, or `-` for stdin
        data: String,
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Validate a record; exits with 2 when the form is invalid
    Validate {
        /// JSON record file, or `-` for stdin
        data: String,
        /// Override a value before validating (name=value). The value is parsed as
        /// JSON first, so `password=123456` is a number; quote it as
        /// `password='"123456"'` to pass a string
        #[arg(long = "set", value_name = "NAME=VALUE")]
        set: Vec<String>,
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Apply one edit, run derivations and print the resulting record
    Change {
        /// JSON record file, or `-` for stdin
        data: String,
        /// Field that changed
        name: String,
        /// New value, parsed as JSON when possible
        value: String,
    },
}
