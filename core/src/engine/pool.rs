//! Bounded pool execution: at most `limit` tasks in flight, admission
//! strictly in input order.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use futures::StreamExt;
use tracing::{debug, info, warn};

use crate::engine::attempt::{settle_task, Settled};
use crate::error::{RunError, TaskError};
use crate::options::{RunMode, RunOptions};
use crate::outcome::{summarize, RunSummary, TaskOutcome};
use crate::task::Task;

/// Run `tasks` with at most `limit` in flight.
///
/// `limit < 1` is a configuration error, raised before any task starts.
/// With `fail_fast`, the first failure stops admission and drains the
/// in-flight tasks; the abort summary holds real outcomes for every
/// admitted task and omits never-admitted ones.
pub async fn run_pool(
    tasks: Vec<Arc<dyn Task>>,
    limit: usize,
    options: &RunOptions,
) -> Result<RunSummary, RunError> {
    if limit < 1 {
        return Err(RunError::InvalidLimit { limit });
    }
    options.validate()?;

    let run_start = Instant::now();
    let total = tasks.len();
    info!(target: "tasklane.engine", mode = "pool", total, limit, "run started");

    let run = PoolScheduler::new(tasks, limit, options).run().await;
    let admitted = run.admitted;
    let summary = summarize(RunMode::Pool, run.results, run_start.elapsed());

    match run.abort {
        Some(cause) => {
            warn!(
                target: "tasklane.engine",
                mode = "pool",
                admitted,
                total,
                cause = %cause,
                "run aborted after draining in-flight tasks"
            );
            Err(RunError::Aborted { cause, summary })
        }
        None => {
            info!(
                target: "tasklane.engine",
                mode = "pool",
                succeeded = summary.succeeded,
                failed = summary.failed,
                duration_ms = summary.duration_ms,
                "run finished"
            );
            Ok(summary)
        }
    }
}

struct PoolRun {
    results: Vec<TaskOutcome>,
    abort: Option<TaskError>,
    admitted: usize,
}

/// Explicit pool state: the admission queue, the in-flight set, the result
/// slots and the aborted flag all live here by name.
struct PoolScheduler<'a> {
    options: &'a RunOptions,
    limit: usize,
    queue: VecDeque<(usize, Arc<dyn Task>)>,
    in_flight: FuturesUnordered<BoxFuture<'a, (usize, Settled)>>,
    slots: Vec<Option<TaskOutcome>>,
    admitted: usize,
    aborted: bool,
    abort_cause: Option<TaskError>,
}

impl<'a> PoolScheduler<'a> {
    fn new(tasks: Vec<Arc<dyn Task>>, limit: usize, options: &'a RunOptions) -> Self {
        let total = tasks.len();
        Self {
            options,
            limit,
            queue: tasks.into_iter().enumerate().collect(),
            in_flight: FuturesUnordered::new(),
            slots: (0..total).map(|_| None).collect(),
            admitted: 0,
            aborted: false,
            abort_cause: None,
        }
    }

    async fn run(mut self) -> PoolRun {
        loop {
            self.admit_ready();
            let Some((index, settled)) = self.in_flight.next().await else {
                break;
            };
            self.record(index, settled);
        }
        // Never-admitted tasks have empty slots and stay absent from the
        // results entirely.
        PoolRun {
            results: self.slots.into_iter().flatten().collect(),
            abort: self.abort_cause,
            admitted: self.admitted,
        }
    }

    /// Admit queued tasks while a slot is free, strictly in input order.
    /// An aborted scheduler admits nothing further.
    fn admit_ready(&mut self) {
        while !self.aborted && self.in_flight.len() < self.limit {
            let Some((index, task)) = self.queue.pop_front() else {
                break;
            };
            self.admitted += 1;
            debug!(
                target: "tasklane.engine",
                task = index as u32 + 1,
                in_flight = self.in_flight.len() + 1,
                limit = self.limit,
                "task admitted"
            );
            let options = self.options;
            self.in_flight.push(Box::pin(async move {
                (index, settle_task(index as u32 + 1, task, options).await)
            }));
        }
    }

    /// Record one settlement. The first failure under `fail_fast` flips the
    /// aborted flag; `abort_cause` is set in the same step, never apart.
    fn record(&mut self, index: usize, settled: Settled) {
        let Settled { outcome, error } = settled;
        self.slots[index] = Some(outcome);
        if let Some(cause) = error {
            if self.options.fail_fast && !self.aborted {
                self.aborted = true;
                self.abort_cause = Some(cause);
            }
        }
    }
}
