//! Task execution engine: three scheduling disciplines over one attempt
//! driver.
//!
//! All modes settle tasks through the same pipeline (deadline racing plus
//! retry with backoff) and fold outcomes into a [`RunSummary`]:
//! - sequential: one task at a time, input order
//! - parallel: every task started at once
//! - pool: at most `limit` in flight, FIFO admission
//!
//! # Architecture
//!
//! ```text
//! Vec<Arc<dyn Task>>
//!   ↓
//! run_sequential / run_parallel / run_pool
//!   ↓
//! settle_task() → attempt loop (BackoffSchedule)
//!   ↓
//! run_attempt() → deadline race, abandon on miss
//!   ↓
//! TaskOutcome per task → summarize() → RunSummary
//! ```

mod attempt;
mod deadline;
mod parallel;
mod pool;
mod sequential;

use std::sync::Arc;

use crate::error::RunError;
use crate::options::{RunMode, RunOptions};
use crate::outcome::RunSummary;
use crate::task::Task;

pub use parallel::run_parallel;
pub use pool::run_pool;
pub use sequential::run_sequential;

/// Dispatch a run by mode. Pool mode requires `limit`; a missing one is
/// rejected the same way as an explicit zero.
pub async fn run(
    tasks: Vec<Arc<dyn Task>>,
    mode: RunMode,
    limit: Option<usize>,
    options: &RunOptions,
) -> Result<RunSummary, RunError> {
    match mode {
        RunMode::Sequential => run_sequential(tasks, options).await,
        RunMode::Parallel => run_parallel(tasks, options).await,
        RunMode::Pool => run_pool(tasks, limit.unwrap_or(0), options).await,
    }
}
