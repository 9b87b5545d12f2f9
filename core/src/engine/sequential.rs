//! Sequential execution: one task at a time, input order.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use crate::engine::attempt::{settle_task, Settled};
use crate::error::RunError;
use crate::options::{RunMode, RunOptions};
use crate::outcome::{summarize, RunSummary};
use crate::task::Task;

/// Await each task to settlement before starting the next.
///
/// With `fail_fast`, the first failure aborts the run: the failing task's
/// outcome closes the partial summary and later tasks are never started.
pub async fn run_sequential(
    tasks: Vec<Arc<dyn Task>>,
    options: &RunOptions,
) -> Result<RunSummary, RunError> {
    options.validate()?;
    let run_start = Instant::now();
    let total = tasks.len();
    let mut results = Vec::with_capacity(total);

    info!(target: "tasklane.engine", mode = "sequential", total, "run started");

    for (index, task) in tasks.into_iter().enumerate() {
        let Settled { outcome, error } = settle_task(index as u32 + 1, task, options).await;
        results.push(outcome);

        if let Some(cause) = error {
            if options.fail_fast {
                warn!(
                    target: "tasklane.engine",
                    mode = "sequential",
                    settled = results.len(),
                    total,
                    cause = %cause,
                    "aborting run on first failure"
                );
                let summary = summarize(RunMode::Sequential, results, run_start.elapsed());
                return Err(RunError::Aborted { cause, summary });
            }
        }
    }

    let summary = summarize(RunMode::Sequential, results, run_start.elapsed());
    info!(
        target: "tasklane.engine",
        mode = "sequential",
        succeeded = summary.succeeded,
        failed = summary.failed,
        duration_ms = summary.duration_ms,
        "run finished"
    );
    Ok(summary)
}
