//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "sparkctl",
    version,
    about = "Terminal editor for the Spark device library",
    long_about = "Browse and edit vendor device definitions.\n\n\
                  By default the library is read from GitHub and changes are published\n\
                  as a pull request. With --local, a checkout on disk is edited in place."
)]
pub struct Cli {
    /// Edit a local checkout instead of the GitHub repository.
    #[arg(long)]
    pub local: bool,

    /// Root of the local checkout (implies --local).
    #[arg(long, value_name = "DIR")]
    pub path: Option<PathBuf>,

    /// Settings file (default: platform config directory).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output in the log file (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,

    /// Log file (default: sparkctl.log in the platform data directory).
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Whether the local backend was requested.
    pub fn is_local(&self) -> bool {
        self.local || self.path.is_some()
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
