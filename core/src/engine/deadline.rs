//! Per-attempt deadline racing.
//!
//! A deadline miss abandons the attempt: the spawned future is detached to
//! finish on its own and its eventual result is discarded. Nothing here
//! aborts or cancels the underlying work.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::error::TaskError;
use crate::task::Task;

/// Run one attempt of task `id`, racing it against `timeout_ms` when set.
pub(crate) async fn run_attempt(
    id: u32,
    task: Arc<dyn Task>,
    timeout_ms: Option<u64>,
) -> Result<serde_json::Value, TaskError> {
    let Some(ms) = timeout_ms else {
        // No deadline: the attempt runs inline on the caller's future.
        return task.run().await.map_err(|source| TaskError::Failed { id, source });
    };

    // Spawned so that losing the race leaves the attempt running detached.
    let mut attempt = tokio::spawn(async move { task.run().await });

    match tokio::time::timeout(Duration::from_millis(ms), &mut attempt).await {
        Ok(Ok(Ok(value))) => Ok(value),
        Ok(Ok(Err(source))) => Err(TaskError::Failed { id, source }),
        Ok(Err(join_err)) => Err(TaskError::Failed {
            id,
            source: anyhow::Error::new(join_err),
        }),
        Err(_elapsed) => {
            debug!(
                target: "tasklane.engine",
                task = id,
                timeout_ms = ms,
                "deadline missed, abandoning attempt"
            );
            // Dropping the handle detaches the attempt; it keeps running.
            drop(attempt);
            Err(TaskError::Timeout { id, timeout_ms: ms })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskFn;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test]
    async fn fast_task_beats_deadline() {
        let task = TaskFn::arc(|| async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Ok(json!("done"))
        });
        let result = run_attempt(1, task, Some(200)).await;
        assert_eq!(result.ok(), Some(json!("done")));
    }

    #[tokio::test]
    async fn slow_task_times_out_with_code() {
        let task = TaskFn::arc(|| async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(json!("late"))
        });
        let err = run_attempt(1, task, Some(20)).await.unwrap_err();
        assert!(matches!(err, TaskError::Timeout { timeout_ms: 20, .. }));
        assert_eq!(err.code(), Some("ETIMEDOUT"));
        assert!(err.to_string().to_lowercase().contains("timed out"));
    }

    #[tokio::test]
    async fn abandoned_attempt_keeps_running() {
        let completed = Arc::new(AtomicBool::new(false));
        let probe = Arc::clone(&completed);
        let task = TaskFn::arc(move || {
            let probe = Arc::clone(&probe);
            async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                probe.store(true, Ordering::SeqCst);
                Ok(json!(null))
            }
        });

        let err = run_attempt(1, task, Some(10)).await.unwrap_err();
        assert!(matches!(err, TaskError::Timeout { .. }));
        assert!(!completed.load(Ordering::SeqCst));

        // The detached attempt finishes on its own after the engine moved on.
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(completed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn no_deadline_runs_inline() {
        let task = TaskFn::arc(|| async { Ok(json!(1)) });
        assert_eq!(run_attempt(1, task, None).await.ok(), Some(json!(1)));
    }

    #[tokio::test]
    async fn failure_is_wrapped_with_task_id() {
        let task = TaskFn::arc(|| async { anyhow::bail!("kaput") });
        let err = run_attempt(7, task, None).await.unwrap_err();
        match err {
            TaskError::Failed { id, source } => {
                assert_eq!(id, 7);
                assert_eq!(source.to_string(), "kaput");
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }
}
