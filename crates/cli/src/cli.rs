//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Stream Mapper - pass-through transformer for row-oriented interchange streams
#[derive(Parser, Debug)]
#[command(
    name = "stream-mapper",
    author,
    version,
    about = "Pass-through message transformer for row-oriented interchange streams",
    long_about = "A pass-through transformer for line-delimited interchange messages.\n\n\
                  Reads decoded messages in arrival order, applies the operator's \n\
                  transform definition where one declares an override, enforces \n\
                  protocol invariants, and forwards every message downstream in order."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "STREAM_MAPPER_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "compact",
        global = true,
        env = "STREAM_MAPPER_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the mapping pipeline
    Run(RunArgs),

    /// Validate configuration and transform definition without running
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "config.toml",
        env = "STREAM_MAPPER_CONFIG"
    )]
    pub config: PathBuf,

    /// Override transform definition path from configuration
    #[arg(long, env = "STREAM_MAPPER_TRANSFORM")]
    pub transform: Option<PathBuf>,

    /// Read messages from a file instead of stdin
    #[arg(long, env = "STREAM_MAPPER_INPUT")]
    pub input: Option<PathBuf>,

    /// Write messages to a file instead of stdout
    #[arg(long, env = "STREAM_MAPPER_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Maximum number of messages to map (0 = unlimited)
    #[arg(long, default_value = "0", env = "STREAM_MAPPER_MAX_MESSAGES")]
    pub max_messages: u64,

    /// Pipeline timeout in seconds (0 = no timeout)
    #[arg(long, default_value = "0", env = "STREAM_MAPPER_TIMEOUT")]
    pub timeout: u64,

    /// Validate configuration and exit without running pipeline
    #[arg(long)]
    pub dry_run: bool,

    /// Override channel buffer size for the internal queue
    #[arg(long, env = "STREAM_MAPPER_BUFFER_SIZE")]
    pub buffer_size: Option<usize>,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "STREAM_MAPPER_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show per-capability operation details
    #[arg(long)]
    pub operations: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}
