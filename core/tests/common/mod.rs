use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;
use tasklane_core::{Task, TaskFn};

/// Tracks how many probe tasks are in flight at once.
#[derive(Default)]
pub struct ConcurrencyStats {
    current: AtomicUsize,
    max: AtomicUsize,
}

impl ConcurrencyStats {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn max(&self) -> usize {
        self.max.load(Ordering::SeqCst)
    }

    fn enter(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.max.fetch_max(now, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Probe task: records concurrency around a sleep, then succeeds or fails.
pub fn probe_task(
    duration_ms: u64,
    stats: &Arc<ConcurrencyStats>,
    should_fail: bool,
) -> Arc<dyn Task> {
    let stats = Arc::clone(stats);
    TaskFn::arc(move || {
        let stats = Arc::clone(&stats);
        async move {
            stats.enter();
            tokio::time::sleep(Duration::from_millis(duration_ms)).await;
            stats.exit();
            if should_fail {
                anyhow::bail!("boom")
            }
            Ok(json!(duration_ms))
        }
    })
}

/// Fails its first `fail_times` attempts, then succeeds.
pub fn flaky_task(fail_times: u32, duration_ms: u64) -> Arc<dyn Task> {
    let remaining = Arc::new(AtomicU32::new(fail_times));
    TaskFn::arc(move || {
        let remaining = Arc::clone(&remaining);
        async move {
            tokio::time::sleep(Duration::from_millis(duration_ms)).await;
            let before = remaining
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .unwrap_or(0);
            if before > 0 {
                anyhow::bail!("boom")
            }
            Ok(json!("ok"))
        }
    })
}

/// Appends `label` to `log` when the task's first poll begins.
pub fn logged_task(label: &str, duration_ms: u64, log: &Arc<Mutex<Vec<String>>>) -> Arc<dyn Task> {
    let log = Arc::clone(log);
    let label = label.to_string();
    TaskFn::arc(move || {
        let log = Arc::clone(&log);
        let label = label.clone();
        async move {
            log.lock().unwrap().push(label);
            tokio::time::sleep(Duration::from_millis(duration_ms)).await;
            Ok(json!(null))
        }
    })
}

pub fn ids_of(summary: &tasklane_core::RunSummary) -> Vec<u32> {
    summary.results.iter().map(|r| r.id).collect()
}
