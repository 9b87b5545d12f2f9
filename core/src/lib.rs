//! tasklane-core: an async task execution engine.
//!
//! Runs collections of independent, potentially-failing tasks under three
//! disciplines (sequential, unbounded parallel, bounded pool) with
//! per-attempt deadlines and exponential-backoff retry. Every run folds
//! into a [`RunSummary`] of per-task [`TaskOutcome`] records in input
//! order.
//!
//! Deadlines abandon rather than cancel: a task that misses its deadline
//! keeps running detached while the engine records the timeout and moves
//! on. Fail-fast changes failure handling per mode; see [`engine`].
//!
//! ```no_run
//! use tasklane_core::{run_pool, RunOptions, TaskFn};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let tasks = (1..=4)
//!     .map(|n| TaskFn::arc(move || async move {
//!         Ok(serde_json::json!(n * 10))
//!     }))
//!     .collect();
//!
//! let options = RunOptions { retries: 1, ..RunOptions::default() };
//! let summary = run_pool(tasks, 2, &options).await?;
//! assert_eq!(summary.succeeded, 4);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod options;
pub mod outcome;
pub mod retry;
pub mod synth;
pub mod task;

pub use config::{load_config, AppConfig};
pub use engine::{run, run_parallel, run_pool, run_sequential};
pub use error::{ConfigError, RunError, TaskError};
pub use options::{RunMode, RunOptions};
pub use outcome::{summarize, OutcomeError, RunSummary, TaskOutcome, TaskStatus};
pub use retry::BackoffSchedule;
pub use synth::{generate_tasks, tasks_from_defs, SynthSpec, SynthTaskDef, SyntheticTask};
pub use task::{Task, TaskFn};
