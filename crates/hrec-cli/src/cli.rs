//! CLI argument definitions for the record validator.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use hrec_standards::RulesFormat;

#[derive(Parser)]
#[command(
    name = "hrec",
    version,
    about = "Validate hierarchical records against rule sets",
    long_about = "Validate hierarchical JSON records against rule sets.\n\n\
                  Rules are read from CSV or JSON-lines files with the columns\n\
                  Field Name, Value Type, Obligation, Cardinality, Validation\n\
                  and Children Required."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Include record values in trace output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a record against a rule set.
    Validate(ValidateArgs),

    /// List every address in a record.
    Keys(RecordArgs),

    /// List every leaf address with its value.
    Leaves(RecordArgs),

    /// Print the value or field at an address.
    Get(GetArgs),
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Record document (JSON).
    #[arg(value_name = "RECORD")]
    pub record: PathBuf,

    /// Rule file (CSV or JSON lines).
    #[arg(value_name = "RULES")]
    pub rules: PathBuf,

    /// Print only the validity flag.
    #[arg(long = "just-result")]
    pub just_result: bool,

    /// Accept keys that no rule declares.
    #[arg(long = "lax")]
    pub lax: bool,

    /// Do not report required fields that are absent.
    #[arg(long = "allow-missing")]
    pub allow_missing: bool,

    /// Rule file format (default: from the file extension).
    #[arg(long = "rules-format", value_enum)]
    pub rules_format: Option<RulesFormatArg>,

    /// Print issues as a table instead of JSON.
    #[arg(long = "table", conflicts_with = "just_result")]
    pub table: bool,
}

#[derive(Args)]
pub struct RecordArgs {
    /// Record document (JSON).
    #[arg(value_name = "RECORD")]
    pub record: PathBuf,
}

#[derive(Args)]
pub struct GetArgs {
    /// Record document (JSON).
    #[arg(value_name = "RECORD")]
    pub record: PathBuf,

    /// Dotted address; a trailing index selects one value.
    #[arg(value_name = "ADDRESS")]
    pub address: String,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum RulesFormatArg {
    Csv,
    Jsonl,
}

impl From<RulesFormatArg> for RulesFormat {
    fn from(arg: RulesFormatArg) -> Self {
        match arg {
            RulesFormatArg::Csv => RulesFormat::Csv,
            RulesFormatArg::Jsonl => RulesFormat::JsonLines,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
