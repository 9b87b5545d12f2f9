use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::Value;

/// An async unit of work, opaque to the engine.
///
/// Tasks carry no identity of their own; executors address them by their
/// 1-based position in the submitted batch. `run` is called once per
/// attempt, so implementations must be able to produce a fresh execution
/// each time. The engine never inspects the produced value beyond
/// recording it.
#[async_trait]
pub trait Task: Send + Sync {
    /// Execute one attempt of this task.
    async fn run(&self) -> anyhow::Result<Value>;
}

/// Adapter turning an async closure into a [`Task`].
///
/// The closure is invoked once per attempt and must return an owned future.
pub struct TaskFn {
    body: Box<dyn Fn() -> BoxFuture<'static, anyhow::Result<Value>> + Send + Sync>,
}

impl TaskFn {
    pub fn new<F, Fut>(body: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
    {
        Self {
            body: Box::new(move || body().boxed()),
        }
    }

    /// Convenience for handing a list of closures to the engine.
    pub fn arc<F, Fut>(body: F) -> Arc<dyn Task>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
    {
        Arc::new(Self::new(body))
    }
}

#[async_trait]
impl Task for TaskFn {
    async fn run(&self) -> anyhow::Result<Value> {
        (self.body)().await
    }
}

impl std::fmt::Debug for TaskFn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskFn").finish_non_exhaustive()
    }
}
