//! CLI argument definitions for the contact list purifier.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "purifier",
    version,
    about = "Clean, deduplicate, and reconcile contact lists",
    long_about = "Clean, deduplicate, and reconcile contact lists exported as CSV.\n\n\
                  purify: validate and deduplicate one or more lists, merging them.\n\
                  reconcile: keep the contacts found in only one of two lists."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
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

    /// Include email addresses and names in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate and deduplicate one or more lists, merging them.
    Purify(PurifyArgs),

    /// Keep the contacts present in only one of two lists.
    Reconcile(ReconcileArgs),
}

#[derive(Args)]
pub struct PurifyArgs {
    /// CSV files, or directories of CSV files, in processing order.
    #[arg(value_name = "FILES", required = true)]
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(Args)]
pub struct ReconcileArgs {
    /// CSV files (or directories) making up list A.
    #[arg(long = "a", value_name = "FILES", num_args = 1.., required = true)]
    pub a: Vec<PathBuf>,

    /// CSV files (or directories) making up list B.
    #[arg(long = "b", value_name = "FILES", num_args = 1.., required = true)]
    pub b: Vec<PathBuf>,

    /// Column layout of the unique-record files.
    #[arg(long = "schema", value_enum)]
    pub schema: Option<SchemaArg>,

    #[command(flatten)]
    pub run: RunArgs,
}

/// Options shared by both subcommands. Flags override the config file.
#[derive(Args, Default)]
pub struct RunArgs {
    /// Directory for output files.
    #[arg(long = "output-dir", value_name = "DIR", default_value = "output")]
    pub output_dir: PathBuf,

    /// Also split outputs into fixed-size chunk files.
    #[arg(long = "chunked")]
    pub chunked: bool,

    /// Records per chunk file.
    #[arg(long = "chunk-size", value_name = "N")]
    pub chunk_size: Option<usize>,

    /// How chunk files are labelled.
    #[arg(long = "label-style", value_enum)]
    pub label_style: Option<LabelStyleArg>,

    /// Also write invalid and duplicate rows with their status.
    #[arg(long = "export-rejected")]
    pub export_rejected: bool,

    /// TOML file with run options.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Process and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LabelStyleArg {
    /// 1-based inclusive ranges, e.g. 5000-9998.
    Exact,
    /// Rounded thousands, e.g. 5K-10K.
    Thousands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SchemaArg {
    /// First Name, Last Name, Email.
    Contact,
    /// The input rows unchanged.
    Passthrough,
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
