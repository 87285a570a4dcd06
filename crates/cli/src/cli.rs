//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use contracts::{Policy, Timestamp};
use std::path::PathBuf;

/// Session Labeler - frame/control/command association for recorded drives
#[derive(Parser, Debug)]
#[command(
    name = "session-labeler",
    author,
    version,
    about = "Label recorded driving sessions for training",
    long_about = "Associates camera frames with wheel controls and high-level commands.\n\n\
                  Every session directory under the configured datasets gets a matched\n\
                  frame/control file, a frame/control/command file and a processed label\n\
                  file. Existing files are reused unless --redo-matching is given."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "LABELER_VERBOSE")]
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
        env = "LABELER_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Label every session of the configured datasets
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Show sessions and their cached stages
    Info(InfoArgs),
}

/// Where the sessions live and how they are matched.
///
/// Flags override the config file; with `--data-dir` and `--dataset` no file is needed.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, env = "LABELER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Root directory holding the datasets
    #[arg(long, env = "LABELER_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Dataset directory name (repeatable, or comma separated)
    #[arg(long = "dataset", env = "LABELER_DATASETS", value_delimiter = ',')]
    pub datasets: Vec<String>,

    /// Control scheme: autopilot or point_goal_nav
    #[arg(long, env = "LABELER_POLICY")]
    pub policy: Option<Policy>,

    /// Largest allowed offset between associated timestamps (exclusive)
    #[arg(long, env = "LABELER_MAX_OFFSET")]
    pub max_offset: Option<Timestamp>,
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Recompute every stage even when its output exists
    #[arg(long, env = "LABELER_REDO_MATCHING")]
    pub redo_matching: bool,

    /// Keep frames whose left and right controls are both zero
    #[arg(long, env = "LABELER_KEEP_ZEROS")]
    pub keep_zeros: bool,

    /// Number of sessions processed concurrently
    #[arg(short, long, default_value = "1", env = "LABELER_JOBS")]
    pub jobs: usize,

    /// Write the labeled frame paths to this file, one per line
    #[arg(long, env = "LABELER_FRAME_LIST")]
    pub frame_list: Option<PathBuf>,

    /// List the sessions that would be processed and exit
    #[arg(long)]
    pub dry_run: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "LABELER_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "labeler.toml", env = "LABELER_CONFIG")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Also read each matched file and report its control range
    #[arg(long)]
    pub controls: bool,
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
            LogFormat::Json => observability::LogFormat::Json,
            LogFormat::Pretty => observability::LogFormat::Pretty,
            LogFormat::Compact => observability::LogFormat::Compact,
        }
    }
}
