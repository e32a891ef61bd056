#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use clap::{Parser, ValueEnum};
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "modprint")]
#[command(about = "Print values, or log standard input line by line, with timestamps, splitting and routing")]
pub struct CliConfig {
    /// Values to print; standard input is read when none are given
    pub values: Vec<String>,

    #[arg(long, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Separator between values (understands \\n, \\t and \\\\)")]
    pub sep: Option<String>,

    #[arg(long, help = "Text printed after the values (understands \\n, \\t and \\\\)")]
    pub end: Option<String>,

    #[arg(long, help = "Do not wrap long lines")]
    pub no_split: bool,

    #[arg(long, help = "Columns to wrap at instead of the terminal width")]
    pub width: Option<usize>,

    #[arg(long, help = "Prefix printed lines with a timestamp")]
    pub timestamp: bool,

    #[arg(long, help = "Render timestamps in UTC")]
    pub utc: bool,

    #[arg(long, help = "strftime format of the timestamp")]
    pub ts_format: Option<String>,

    #[arg(long = "type", help = "Log type selecting the output file")]
    pub log_type: Option<String>,

    #[arg(long, help = "File to append to")]
    pub file: Option<String>,

    #[arg(long, help = "Level of the call, a number or a level name")]
    pub level: Option<String>,

    #[arg(long, help = "Language to translate message keys into")]
    pub language: Option<String>,

    #[arg(
        long,
        help = "JSON arguments for translated lines, e.g. '{\"positional\": [3], \"named\": {\"dir\": \"/tmp\"}}'"
    )]
    pub format_args: Option<String>,

    #[arg(long, help = "Append lines to the log file")]
    pub write: bool,

    #[arg(long, help = "Do not print to the screen")]
    pub no_display: bool,

    #[arg(long, help = "Treat the values as a docstring and dedent them")]
    pub docstring: bool,

    #[arg(long, default_value = "4", help = "Tab size used by --docstring")]
    pub tabs: usize,

    #[arg(long, help = "Print to standard error instead of standard output")]
    pub stderr: bool,

    #[arg(long, value_enum, default_value = "compact", help = "Format of diagnostics")]
    pub log_format: LogFormat,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}
