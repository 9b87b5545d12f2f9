use serde::{Deserialize, Serialize};

use crate::error::RunError;

/// Execution discipline for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// One task at a time, input order.
    Sequential,
    /// Every task started at once.
    Parallel,
    /// At most `limit` tasks in flight, FIFO admission. Accepts the
    /// legacy wire name `parallelLimit`.
    #[serde(alias = "parallelLimit")]
    Pool,
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Sequential => "sequential",
            Self::Parallel => "parallel",
            Self::Pool => "pool",
        };
        f.write_str(s)
    }
}

/// Per-run options shared by all modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOptions {
    /// Abort the run on the first task failure instead of collecting it.
    #[serde(default)]
    pub fail_fast: bool,

    /// Per-attempt deadline in milliseconds. None means no deadline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,

    /// Re-attempts after the first failure; 0 means a single attempt.
    #[serde(default)]
    pub retries: u32,

    /// Base delay before the first re-attempt.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Multiplier applied to the delay after each re-attempt.
    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: f64,

    /// Jitter amplitude as a fraction of the current delay; 0 disables
    /// jitter entirely (no RNG is built).
    #[serde(default = "default_jitter_ratio")]
    pub jitter_ratio: f64,

    /// Seed for the jitter RNG. None seeds from entropy.
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "seed")]
    pub jitter_seed: Option<u64>,
}

fn default_retry_delay_ms() -> u64 {
    100
}

fn default_backoff_factor() -> f64 {
    2.0
}

fn default_jitter_ratio() -> f64 {
    0.2
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            fail_fast: false,
            timeout_ms: None,
            retries: 0,
            retry_delay_ms: default_retry_delay_ms(),
            backoff_factor: default_backoff_factor(),
            jitter_ratio: default_jitter_ratio(),
            jitter_seed: None,
        }
    }
}

impl RunOptions {
    /// Reject structurally invalid options before any task is scheduled.
    pub fn validate(&self) -> Result<(), RunError> {
        if !self.backoff_factor.is_finite() || self.backoff_factor < 1.0 {
            return Err(RunError::InvalidOption {
                name: "backoff_factor",
                reason: format!("{} is not a finite number >= 1", self.backoff_factor),
            });
        }
        if !self.jitter_ratio.is_finite() || !(0.0..=1.0).contains(&self.jitter_ratio) {
            return Err(RunError::InvalidOption {
                name: "jitter_ratio",
                reason: format!("{} is not a finite number in [0, 1]", self.jitter_ratio),
            });
        }
        if self.timeout_ms == Some(0) {
            return Err(RunError::InvalidOption {
                name: "timeout_ms",
                reason: "deadline must be at least 1ms".to_string(),
            });
        }
        Ok(())
    }
}
