//! CLI argument definitions for lci-bridge.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::{ColorChoice, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use lci_model::TargetDatabase;
use tracing::level_filters::LevelFilter;

use crate::logging::{LogConfig, LogFormat};

#[derive(Parser)]
#[command(
    name = "lci-bridge",
    version,
    about = "Convert life-cycle inventories between Brightway and SimaPro",
    long_about = "Convert life-cycle inventories between Brightway and SimaPro.\n\n\
                  Exports Brightway inventories as SimaPro CSV linked to ecoinvent or UVEK,\n\
                  and imports SimaPro CSV exports as Brightway datasets."
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
    /// Export a Brightway inventory as a SimaPro CSV file.
    ToSimapro(ToSimaproArgs),

    /// Import a SimaPro CSV export as Brightway datasets.
    ToBrightway(ToBrightwayArgs),

    /// List the reference tables and their sizes.
    Tables,
}

#[derive(Parser)]
pub struct ToSimaproArgs {
    /// Brightway inventory as a JSON array of activities.
    #[arg(value_name = "INVENTORY")]
    pub inventory: PathBuf,

    /// System descriptions and literature references to append (YAML).
    #[arg(long = "metadata", value_name = "FILE")]
    pub metadata: Option<PathBuf>,

    /// Database the exported processes link to.
    #[arg(long = "target", value_enum, default_value = "ecoinvent")]
    pub target: TargetArg,

    /// ecoinvent release the inventory was built against.
    #[arg(long = "ecoinvent-version", value_name = "VERSION", default_value = "3.9")]
    pub ecoinvent_version: String,

    /// Directory for the SimaPro file (default: current directory).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ToBrightwayArgs {
    /// SimaPro CSV export.
    #[arg(value_name = "EXPORT")]
    pub export: PathBuf,

    /// ecoinvent release used to reconcile biosphere flows.
    #[arg(long = "ecoinvent-version", value_name = "VERSION", default_value = "3.9")]
    pub ecoinvent_version: String,

    /// Database linked by technosphere exchanges (default: file stem).
    #[arg(long = "database", value_name = "NAME")]
    pub database: Option<String>,

    /// JSON output path (default: <EXPORT> with a .json extension).
    #[arg(long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TargetArg {
    Ecoinvent,
    Uvek,
}

impl From<TargetArg> for TargetDatabase {
    fn from(value: TargetArg) -> Self {
        match value {
            TargetArg::Ecoinvent => Self::Ecoinvent,
            TargetArg::Uvek => Self::Uvek,
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

impl Cli {
    /// Logging configuration with consistent precedence: `--log-level`
    /// beats `-v`/`-q`, and `RUST_LOG` applies only when neither is given.
    pub fn log_config(&self) -> LogConfig {
        let mut config = LogConfig {
            level_filter: self.verbosity.tracing_level_filter(),
            use_env_filter: !(self.verbosity.is_present() || self.log_level.is_some()),
            ..LogConfig::default()
        };
        if let Some(level) = self.log_level {
            config.level_filter = match level {
                LogLevelArg::Error => LevelFilter::ERROR,
                LogLevelArg::Warn => LevelFilter::WARN,
                LogLevelArg::Info => LevelFilter::INFO,
                LogLevelArg::Debug => LevelFilter::DEBUG,
                LogLevelArg::Trace => LevelFilter::TRACE,
            };
        }
        config.format = match self.log_format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        };
        config.log_file.clone_from(&self.log_file);
        config.with_ansi = match self.color.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.log_file.is_none() && io::stderr().is_terminal(),
        };
        config
    }
}
