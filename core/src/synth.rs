//! Synthetic sleep-based tasks for demos, CLI runs and the HTTP API.
//!
//! Each generated task knows its 1-based position so the value it resolves
//! with can echo it; the executors assign the same positions independently.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::task::Task;

/// Shape of a generated batch: `count` tasks sleeping between `min_ms` and
/// `max_ms`, failing when their 1-based position is listed in `fail_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthSpec {
    #[serde(default = "default_count")]
    pub count: u32,

    #[serde(default = "default_min_ms", rename = "min")]
    pub min_ms: u64,

    #[serde(default = "default_max_ms", rename = "max")]
    pub max_ms: u64,

    #[serde(default, rename = "failAt")]
    pub fail_at: Vec<u32>,
}

fn default_count() -> u32 {
    6
}

fn default_min_ms() -> u64 {
    100
}

fn default_max_ms() -> u64 {
    800
}

impl Default for SynthSpec {
    fn default() -> Self {
        Self {
            count: default_count(),
            min_ms: default_min_ms(),
            max_ms: default_max_ms(),
            fail_at: Vec::new(),
        }
    }
}

/// Explicit per-task definition, the alternative to a [`SynthSpec`] batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthTaskDef {
    #[serde(rename = "duration", alias = "durationMs")]
    pub duration_ms: u64,

    #[serde(default)]
    pub fail: bool,
}

/// One synthetic task: sleep, then resolve with id and duration, or fail.
pub struct SyntheticTask {
    id: u32,
    duration_ms: u64,
    fail: bool,
}

impl SyntheticTask {
    pub fn new(id: u32, duration_ms: u64, fail: bool) -> Self {
        Self {
            id,
            duration_ms,
            fail,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }
}

#[async_trait]
impl Task for SyntheticTask {
    async fn run(&self) -> anyhow::Result<Value> {
        debug!(target: "tasklane.synth", task = self.id, duration_ms = self.duration_ms, "task started");
        tokio::time::sleep(Duration::from_millis(self.duration_ms)).await;
        if self.fail {
            debug!(target: "tasklane.synth", task = self.id, "task failed");
            anyhow::bail!("task {} failed after {}ms", self.id, self.duration_ms);
        }
        debug!(target: "tasklane.synth", task = self.id, "task finished");
        Ok(json!({ "id": self.id, "durationMs": self.duration_ms }))
    }
}

/// Generate a batch from a spec. Durations are drawn uniformly from
/// `[min_ms, max_ms]`; a seed makes the draw reproducible.
pub fn generate_synthetic(spec: &SynthSpec, seed: Option<u64>) -> Vec<SyntheticTask> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let lo = spec.min_ms.min(spec.max_ms);
    let hi = spec.min_ms.max(spec.max_ms);

    (1..=spec.count)
        .map(|id| {
            let duration_ms = rng.gen_range(lo..=hi);
            let fail = spec.fail_at.contains(&id);
            SyntheticTask::new(id, duration_ms, fail)
        })
        .collect()
}

/// Same batch, boxed for the engine.
pub fn generate_tasks(spec: &SynthSpec, seed: Option<u64>) -> Vec<Arc<dyn Task>> {
    generate_synthetic(spec, seed)
        .into_iter()
        .map(|t| Arc::new(t) as Arc<dyn Task>)
        .collect()
}

/// Build a batch from explicit definitions, positions assigned in order.
pub fn tasks_from_defs(defs: &[SynthTaskDef]) -> Vec<Arc<dyn Task>> {
    defs.iter()
        .enumerate()
        .map(|(i, def)| {
            Arc::new(SyntheticTask::new(i as u32 + 1, def.duration_ms, def.fail))
                as Arc<dyn Task>
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::TaskStatus;

    #[test]
    fn generates_count_tasks_with_sequential_ids() {
        let spec = SynthSpec {
            count: 4,
            min_ms: 1,
            max_ms: 5,
            fail_at: vec![],
        };
        let tasks = generate_synthetic(&spec, Some(1));
        let ids: Vec<u32> = tasks.iter().map(SyntheticTask::id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let spec = SynthSpec {
            count: 8,
            min_ms: 10,
            max_ms: 500,
            fail_at: vec![],
        };
        let a: Vec<u64> = generate_synthetic(&spec, Some(99))
            .iter()
            .map(SyntheticTask::duration_ms)
            .collect();
        let b: Vec<u64> = generate_synthetic(&spec, Some(99))
            .iter()
            .map(SyntheticTask::duration_ms)
            .collect();
        assert_eq!(a, b);
        assert!(a.iter().all(|d| (10..=500).contains(d)));
    }

    #[tokio::test]
    async fn fail_at_marks_listed_positions() {
        let spec = SynthSpec {
            count: 3,
            min_ms: 1,
            max_ms: 2,
            fail_at: vec![2],
        };
        let tasks = generate_tasks(&spec, Some(7));
        assert!(tasks[0].run().await.is_ok());
        assert!(tasks[1].run().await.is_err());
        assert!(tasks[2].run().await.is_ok());
    }

    #[tokio::test]
    async fn synthetic_value_carries_numeric_id_and_duration() {
        let task = SyntheticTask::new(5, 1, false);
        let value = task.run().await.unwrap();
        assert_eq!(value["id"], 5);
        assert_eq!(value["durationMs"], 1);
    }

    #[tokio::test]
    async fn defs_build_positional_batch() {
        let defs = vec![
            SynthTaskDef {
                duration_ms: 1,
                fail: false,
            },
            SynthTaskDef {
                duration_ms: 1,
                fail: true,
            },
        ];
        let tasks = tasks_from_defs(&defs);
        assert!(tasks[0].run().await.is_ok());
        let err = tasks[1].run().await.unwrap_err();
        assert!(err.to_string().contains("task 2"));
    }

    #[tokio::test]
    async fn generated_batch_runs_to_summary() {
        use crate::engine::run_sequential;
        use crate::options::RunOptions;

        let spec = SynthSpec {
            count: 3,
            min_ms: 1,
            max_ms: 3,
            fail_at: vec![3],
        };
        let tasks = generate_tasks(&spec, Some(11));
        let summary = run_sequential(tasks, &RunOptions::default()).await.unwrap();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.results[2].status, TaskStatus::Error);
        assert_eq!(summary.results[2].id, 3);
    }
}
