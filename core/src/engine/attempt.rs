//! Drives one task to settlement: attempt loop, retry delays, outcome
//! assembly.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{debug, warn};

use crate::engine::deadline::run_attempt;
use crate::error::TaskError;
use crate::options::RunOptions;
use crate::outcome::TaskOutcome;
use crate::retry::BackoffSchedule;
use crate::task::Task;

/// A settled task: the wire outcome plus the engine-level error when it
/// failed. `error` is Some exactly when the outcome status is not ok.
pub(crate) struct Settled {
    pub outcome: TaskOutcome,
    pub error: Option<TaskError>,
}

/// Run task `id` until it succeeds or its retry budget is spent.
///
/// `id` is the task's 1-based input position, assigned by the executor.
/// There is no sleep after the final failed attempt; exhaustion settles
/// immediately with the final error as cause.
pub(crate) async fn settle_task(id: u32, task: Arc<dyn Task>, options: &RunOptions) -> Settled {
    let started_at = Utc::now().timestamp_millis();
    let start = Instant::now();
    let mut schedule = BackoffSchedule::new(options);
    let mut attempts: u32 = 0;

    debug!(target: "tasklane.engine", task = id, "task started");

    let result = loop {
        attempts += 1;
        match run_attempt(id, Arc::clone(&task), options.timeout_ms).await {
            Ok(value) => break Ok(value),
            Err(err) => {
                if attempts > options.retries {
                    break Err(err);
                }
                let wait_ms = schedule.next_wait_ms();
                debug!(
                    target: "tasklane.engine",
                    task = id,
                    attempt = attempts,
                    wait_ms,
                    error = %err,
                    "attempt failed, retrying"
                );
                tokio::time::sleep(Duration::from_millis(wait_ms)).await;
            }
        }
    };

    let finished_at = Utc::now().timestamp_millis();
    let duration_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(value) => {
            debug!(
                target: "tasklane.engine",
                task = id,
                attempts,
                duration_ms,
                "task succeeded"
            );
            Settled {
                outcome: TaskOutcome::ok(id, value, attempts, started_at, finished_at, duration_ms),
                error: None,
            }
        }
        Err(final_err) => {
            let error = if options.retries > 0 {
                TaskError::RetryExhausted {
                    id,
                    attempts,
                    source: Box::new(final_err),
                }
            } else {
                final_err
            };
            warn!(
                target: "tasklane.engine",
                task = id,
                attempts,
                duration_ms,
                error = %error,
                "task failed"
            );
            let outcome =
                TaskOutcome::failed(id, &error, attempts, started_at, finished_at, duration_ms);
            Settled {
                outcome,
                error: Some(error),
            }
        }
    }
}
