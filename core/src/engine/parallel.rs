//! Unbounded parallel execution: every task started at once.

use std::sync::Arc;
use std::time::Instant;

use futures::stream::FuturesUnordered;
use futures::StreamExt;
use tracing::{info, warn};

use crate::engine::attempt::{settle_task, Settled};
use crate::error::{RunError, TaskError};
use crate::options::{RunMode, RunOptions};
use crate::outcome::{summarize, RunSummary, TaskOutcome};
use crate::task::Task;

/// Start every task before awaiting any, then collect settlements.
///
/// With `fail_fast`, the first failure aborts the run immediately and the
/// abort summary reports **every** task as `unknown`, settled ones
/// included. Callers that need partial results under fail-fast should use
/// the pool executor instead. Already-running tasks are abandoned, never
/// cancelled.
pub async fn run_parallel(
    tasks: Vec<Arc<dyn Task>>,
    options: &RunOptions,
) -> Result<RunSummary, RunError> {
    options.validate()?;
    if options.fail_fast {
        run_all_or_nothing(tasks, options).await
    } else {
        run_collecting(tasks, options).await
    }
}

/// Collect every settlement; failures land in the summary.
async fn run_collecting(
    tasks: Vec<Arc<dyn Task>>,
    options: &RunOptions,
) -> Result<RunSummary, RunError> {
    let run_start = Instant::now();
    let total = tasks.len();
    info!(target: "tasklane.engine", mode = "parallel", total, "run started");

    let mut in_flight: FuturesUnordered<_> = tasks
        .into_iter()
        .enumerate()
        .map(|(index, task)| async move {
            (index, settle_task(index as u32 + 1, task, options).await)
        })
        .collect();

    let mut slots: Vec<Option<TaskOutcome>> = (0..total).map(|_| None).collect();
    while let Some((index, settled)) = in_flight.next().await {
        slots[index] = Some(settled.outcome);
    }

    let results: Vec<TaskOutcome> = slots.into_iter().flatten().collect();
    let summary = summarize(RunMode::Parallel, results, run_start.elapsed());
    info!(
        target: "tasklane.engine",
        mode = "parallel",
        succeeded = summary.succeeded,
        failed = summary.failed,
        duration_ms = summary.duration_ms,
        "run finished"
    );
    Ok(summary)
}

/// Fail-fast path. Settlements run as spawned tasks so that an abort can
/// walk away from the stragglers without cancelling them.
async fn run_all_or_nothing(
    tasks: Vec<Arc<dyn Task>>,
    options: &RunOptions,
) -> Result<RunSummary, RunError> {
    let run_start = Instant::now();
    let total = tasks.len();
    info!(
        target: "tasklane.engine",
        mode = "parallel",
        total,
        fail_fast = true,
        "run started"
    );

    let mut in_flight = FuturesUnordered::new();
    for (index, task) in tasks.into_iter().enumerate() {
        let task_options = options.clone();
        let handle =
            tokio::spawn(async move { settle_task(index as u32 + 1, task, &task_options).await });
        in_flight.push(async move { (index, handle.await) });
    }

    let mut slots: Vec<Option<TaskOutcome>> = (0..total).map(|_| None).collect();
    while let Some((index, joined)) = in_flight.next().await {
        let error = match joined {
            Ok(Settled { outcome, error }) => {
                slots[index] = Some(outcome);
                error
            }
            // A panicked settlement counts as that task failing.
            Err(join_err) => Some(TaskError::Failed {
                id: index as u32 + 1,
                source: anyhow::Error::new(join_err),
            }),
        };

        if let Some(cause) = error {
            warn!(
                target: "tasklane.engine",
                mode = "parallel",
                total,
                cause = %cause,
                "aborting run, reporting all tasks unknown"
            );
            // The all-or-nothing contract: no per-task results survive the
            // abort, only placeholders. In-flight tasks keep running
            // detached; their handles drop with `in_flight`.
            let placeholders = (1..=total as u32).map(TaskOutcome::unknown).collect();
            let summary = summarize(RunMode::Parallel, placeholders, run_start.elapsed());
            return Err(RunError::Aborted { cause, summary });
        }
    }

    let results: Vec<TaskOutcome> = slots.into_iter().flatten().collect();
    let summary = summarize(RunMode::Parallel, results, run_start.elapsed());
    info!(
        target: "tasklane.engine",
        mode = "parallel",
        succeeded = summary.succeeded,
        failed = summary.failed,
        duration_ms = summary.duration_ms,
        "run finished"
    );
    Ok(summary)
}
