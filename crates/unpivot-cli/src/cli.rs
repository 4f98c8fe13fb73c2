//! CLI argument definitions for the unpivot tool.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tracing::level_filters::LevelFilter;

use unpivot_cli::logging::LogFormat;
use unpivot_cli::pipeline::OptionOverrides;

#[derive(Parser)]
#[command(
    name = "unpivot",
    version,
    about = "Unpivot a wide CSV table into attribute/value rows",
    long_about = "Reshape a wide CSV table into long format.\n\n\
                  Every selected column becomes one row per input row, paired with the\n\
                  identifier column and any static columns that are kept as-is."
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
}

#[derive(Subcommand)]
pub enum Command {
    /// Unpivot a CSV file.
    Run(RunArgs),

    /// Show how a CSV file would be unpivoted without executing it.
    Explain(UnpivotArgs),
}

#[derive(Args)]
pub struct UnpivotArgs {
    /// Path to the wide CSV file.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Identifier column (default: first column).
    #[arg(long = "id", value_name = "COLUMN")]
    pub id_column: Option<String>,

    /// Column to unpivot; repeat for several (default: all but the identifier).
    #[arg(long = "pivot", value_name = "COLUMN")]
    pub pivot: Vec<String>,

    /// Output column holding attribute names.
    #[arg(long = "attribute-name", value_name = "NAME")]
    pub attribute_name: Option<String>,

    /// Output column holding attribute values.
    #[arg(long = "value-name", value_name = "NAME")]
    pub value_name: Option<String>,

    /// JSON options document; command-line flags take precedence.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl UnpivotArgs {
    pub fn overrides(&self) -> OptionOverrides {
        OptionOverrides {
            id_column: self.id_column.clone(),
            columns_to_pivot: self.pivot.clone(),
            attribute_name: self.attribute_name.clone(),
            value_name: self.value_name.clone(),
        }
    }
}

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub unpivot: UnpivotArgs,

    /// Write the long table to this CSV file.
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Number of result rows to print (0 disables the preview).
    #[arg(long = "preview", value_name = "ROWS", default_value_t = 10)]
    pub preview: usize,
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

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => Self::ERROR,
            LogLevelArg::Warn => Self::WARN,
            LogLevelArg::Info => Self::INFO,
            LogLevelArg::Debug => Self::DEBUG,
            LogLevelArg::Trace => Self::TRACE,
        }
    }
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Compact => Self::Compact,
            LogFormatArg::Json => Self::Json,
        }
    }
}
