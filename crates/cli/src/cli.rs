//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// F1 Capture - lap and telemetry capture for racing simulator UDP broadcasts
#[derive(Parser, Debug)]
#[command(
    name = "f1-capture",
    author,
    version,
    about = "Capture racing simulator UDP telemetry into lap records",
    long_about = "Listens for the simulator's UDP telemetry broadcast, infers lap boundaries,\n\
                  tracks tyre and fuel state, and persists sessions, laps and sampled\n\
                  telemetry to the configured store."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "F1_CAPTURE_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "F1_CAPTURE_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Listen for telemetry and capture laps
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON); defaults apply when omitted
    #[arg(short, long, env = "F1_CAPTURE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Wire format (newer | legacy, aliases f1_2018 | f1_2017)
    #[arg(short, long, env = "F1_CAPTURE_FORMAT")]
    pub format: Option<String>,

    /// Override the bind address
    #[arg(long, env = "F1_CAPTURE_BIND")]
    pub bind: Option<String>,

    /// Override the UDP port
    #[arg(short, long, env = "F1_CAPTURE_PORT")]
    pub port: Option<u16>,

    /// Override the telemetry sample period (forward 1 frame out of N)
    #[arg(long, env = "F1_CAPTURE_SAMPLE_PERIOD")]
    pub sample_period: Option<u64>,

    /// Override the track label
    #[arg(long, env = "F1_CAPTURE_TRACK")]
    pub track: Option<String>,

    /// Write JSON lines into this directory instead of the configured store
    #[arg(short, long, env = "F1_CAPTURE_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Stop after this many datagrams (0 = unlimited)
    #[arg(long, default_value = "0", env = "F1_CAPTURE_MAX_DATAGRAMS")]
    pub max_datagrams: u64,

    /// Stop after this many seconds (0 = no timeout)
    #[arg(long, default_value = "0", env = "F1_CAPTURE_TIMEOUT")]
    pub timeout: u64,

    /// Validate configuration and exit without listening
    #[arg(long)]
    pub dry_run: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "F1_CAPTURE_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "capture.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
