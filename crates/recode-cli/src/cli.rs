//! CLI argument definitions for `recode`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use recode_model::ColumnSelector;

fn parse_column(raw: &str) -> Result<ColumnSelector, String> {
    raw.parse()
}

#[derive(Parser)]
#[command(
    name = "recode",
    version,
    about = "Resolve messy categorical values through a lookup dictionary",
    long_about = "Resolve raw values to canonical values using a two-column dictionary.\n\n\
                  Dictionary keys may be exact values, `.regex <pattern>` rules,\n\
                  `.missing` or `.default`; a value of `.na` resolves to missing."
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
}

#[derive(Subcommand)]
pub enum Command {
    /// Resolve every column of a CSV file against a grouped dictionary.
    Apply(ApplyArgs),

    /// Resolve values given on the command line.
    Vector(VectorArgs),

    /// Compile a dictionary and list its rules.
    Inspect(InspectArgs),
}

/// Where the dictionary lives and how to read it.
#[derive(Args)]
pub struct DictionaryArgs {
    /// Dictionary CSV file.
    #[arg(long = "dictionary", short = 'd', value_name = "CSV")]
    pub dictionary: PathBuf,

    /// Key column, by header name or 1-based position.
    #[arg(long = "from", value_name = "COLUMN", value_parser = parse_column, default_value = "1")]
    pub from: ColumnSelector,

    /// Value column, by header name or 1-based position.
    #[arg(long = "to", value_name = "COLUMN", value_parser = parse_column, default_value = "2")]
    pub to: ColumnSelector,

    /// Field delimiter of the CSV inputs.
    #[arg(long = "delimiter", value_name = "CHAR", default_value_t = ',')]
    pub delimiter: char,

    /// Cell text read as missing (repeatable).
    #[arg(long = "na", value_name = "TOKEN", default_values_t = vec!["NA".to_string()])]
    pub na_tokens: Vec<String>,

    /// Match `.regex` patterns anywhere instead of against the whole value.
    #[arg(long = "no-anchor-regex")]
    pub no_anchor_regex: bool,
}

#[derive(Args)]
pub struct ApplyArgs {
    /// Data CSV file.
    #[arg(long = "data", value_name = "CSV")]
    pub data: PathBuf,

    #[command(flatten)]
    pub dictionary: DictionaryArgs,

    /// Group column naming the target data column of each row.
    #[arg(long = "by", value_name = "COLUMN", value_parser = parse_column, default_value = "3")]
    pub by: ColumnSelector,

    /// Numeric column ordering rows inside each group tier.
    #[arg(long = "order", value_name = "COLUMN", value_parser = parse_column)]
    pub order: Option<ColumnSelector>,

    /// Report per-column diagnostics.
    #[arg(long = "warn")]
    pub warn: bool,

    /// Output CSV file (default: print the summary only).
    #[arg(long = "output", short = 'o', value_name = "CSV")]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct VectorArgs {
    #[command(flatten)]
    pub dictionary: DictionaryArgs,

    /// Suppress diagnostics.
    #[arg(long = "silent")]
    pub silent: bool,

    /// Do not report values replaced by `.default`.
    #[arg(long = "no-warn-default")]
    pub no_warn_default: bool,

    /// Treat the values as an ordered categorical and print the category order.
    #[arg(long = "categorical")]
    pub categorical: bool,

    /// Values to resolve; the token `NA` stands for a missing value.
    #[arg(value_name = "VALUE", required = true)]
    pub values: Vec<String>,
}

#[derive(Args)]
pub struct InspectArgs {
    #[command(flatten)]
    pub dictionary: DictionaryArgs,
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
