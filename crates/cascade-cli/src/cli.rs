//! CLI argument definitions for the cascade picker.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "cascade",
    version,
    about = "Cascade picker - pick values level by level from a spreadsheet",
    long_about = "Pick values across an ordered chain of spreadsheet columns.\n\n\
                  Each level only offers values found in rows matching the level\n\
                  above it. Saved combinations are exported as JSON lines."
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

    /// TOML file with the level chain and export file name.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Directory the export file is written to (default: current directory).
    #[arg(long = "output-dir", value_name = "DIR", global = true)]
    pub output_dir: Option<PathBuf>,

    /// Export file name (overrides the config file).
    #[arg(long = "export-file", value_name = "NAME", global = true)]
    pub export_file: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the level chain against a spreadsheet.
    Levels(LevelsArgs),

    /// Start a line-oriented picking session.
    Session(SessionArgs),

    /// Run a command script and write the export file.
    Export(ExportArgs),
}

#[derive(Parser)]
pub struct LevelsArgs {
    /// Workbook (xlsx, xlsm, xlsb, xls, ods) or CSV file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Parser)]
pub struct SessionArgs {
    /// Spreadsheet to load before the first command.
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Read commands from a file instead of stdin.
    #[arg(long = "script", value_name = "PATH")]
    pub script: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ExportArgs {
    /// Spreadsheet to load before running the script.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Command script; the first failing command aborts the run.
    #[arg(long = "script", value_name = "PATH")]
    pub script: PathBuf,
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
