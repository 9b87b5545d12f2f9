use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use tasklane_core::options::RunMode;

/// Scheduling mode, as exposed on the command line.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    Sequential,
    Parallel,
    Pool,
}

impl From<ModeArg> for RunMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Sequential => RunMode::Sequential,
            ModeArg::Parallel => RunMode::Parallel,
            ModeArg::Pool => RunMode::Pool,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "tasklane", version, about = "Run task batches sequentially, in parallel or through a bounded pool")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file path. Defaults to ~/.tasklane/config.toml, then ./tasklane.toml.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level override, e.g. "debug" or "tasklane_core=trace".
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct RunArgs {
    /// Scheduling mode. Falls back to the configured default.
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Concurrency bound, pool mode only.
    #[arg(long)]
    pub limit: Option<usize>,

    /// Number of synthetic tasks to generate.
    #[arg(long)]
    pub count: Option<u32>,

    /// Minimum synthetic task duration in milliseconds.
    #[arg(long)]
    pub min_ms: Option<u64>,

    /// Maximum synthetic task duration in milliseconds.
    #[arg(long)]
    pub max_ms: Option<u64>,

    /// 1-based ids of tasks that should fail, comma separated.
    #[arg(long, value_delimiter = ',')]
    pub fail_at: Vec<u32>,

    /// Abort the run on the first failure.
    #[arg(long)]
    pub fail_fast: bool,

    /// Per-attempt deadline in milliseconds.
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Re-attempts after the first failure.
    #[arg(long)]
    pub retries: Option<u32>,

    /// Base delay before the first re-attempt, in milliseconds.
    #[arg(long)]
    pub retry_delay_ms: Option<u64>,

    /// Multiplier applied to the retry delay after each attempt.
    #[arg(long)]
    pub backoff_factor: Option<f64>,

    /// Jitter amplitude as a fraction of the current retry delay.
    #[arg(long)]
    pub jitter_ratio: Option<f64>,

    /// Seed for task generation and retry jitter.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print the summary as JSON instead of the table.
    #[arg(long)]
    pub json: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ServeArgs {
    /// Bind host, overrides the configured one.
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port, overrides the configured one.
    #[arg(long)]
    pub port: Option<u16>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate synthetic tasks and run them.
    Run(RunArgs),
    /// Start the HTTP API server.
    Serve(ServeArgs),
}

impl Default for Commands {
    /// A bare `tasklane` invocation runs with all defaults.
    fn default() -> Self {
        Self::Run(RunArgs::default())
    }
}
