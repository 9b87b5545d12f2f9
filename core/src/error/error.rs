use thiserror::Error;

use crate::outcome::RunSummary;

/// Failure of a single task within a run.
///
/// `Failed` and `Timeout` describe one attempt; `RetryExhausted` wraps the
/// final attempt's failure once the retry budget is spent.
#[derive(Error, Debug)]
pub enum TaskError {
    /// The task body itself returned an error.
    #[error("task {id} failed: {source}")]
    Failed {
        id: u32,
        #[source]
        source: anyhow::Error,
    },

    /// An attempt missed its deadline. The underlying future is abandoned
    /// to finish on its own; it is never cancelled.
    #[error("task {id} timed out after {timeout_ms}ms")]
    Timeout { id: u32, timeout_ms: u64 },

    /// All attempts failed. Carries the final attempt's error as cause.
    #[error("task {id} failed after {attempts} attempts: {source}")]
    RetryExhausted {
        id: u32,
        attempts: u32,
        #[source]
        source: Box<TaskError>,
    },
}

impl TaskError {
    /// Position of the task this error belongs to (1-based input order).
    pub fn task_id(&self) -> u32 {
        match self {
            Self::Failed { id, .. } => *id,
            Self::Timeout { id, .. } => *id,
            Self::RetryExhausted { id, .. } => *id,
        }
    }

    /// Stable machine-readable code, mirrored into wire outcomes.
    /// Only deadline misses carry one; exhaustion inherits its cause's code.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::Failed { .. } => None,
            Self::Timeout { .. } => Some("ETIMEDOUT"),
            Self::RetryExhausted { source, .. } => source.code(),
        }
    }
}

/// Run-level failures. None of these is ever folded into a successful
/// summary return.
#[derive(Error, Debug)]
pub enum RunError {
    /// Pool limit must be at least 1. Raised before any task starts.
    #[error("invalid pool limit {limit}: must be >= 1")]
    InvalidLimit { limit: usize },

    /// A structurally invalid run option, raised before any task starts.
    #[error("invalid option {name}: {reason}")]
    InvalidOption { name: &'static str, reason: String },

    /// A fail-fast run aborted on its first failure. `summary` follows the
    /// mode's contract: settled outcomes so far for sequential, admitted
    /// outcomes for pool, all-unknown placeholders for parallel.
    #[error("run aborted: {cause}")]
    Aborted {
        #[source]
        cause: TaskError,
        summary: RunSummary,
    },
}

impl RunError {
    /// Map run error to a stable code for CLI exit mapping and HTTP bodies.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidLimit { .. } | Self::InvalidOption { .. } => "ECONFIG",
            Self::Aborted { .. } => "EABORTED",
        }
    }

    /// Partial summary attached to an abort, if this is one.
    pub fn summary(&self) -> Option<&RunSummary> {
        match self {
            Self::Aborted { summary, .. } => Some(summary),
            _ => None,
        }
    }
}

/// Errors from loading or parsing the config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}
