//! HTTP服务器状态管理

use chrono::{DateTime, Local};
use tasklane_core::config::DefaultsConfig;
use tokio::sync::broadcast;

/// 应用状态（在所有handlers间共享）
#[derive(Clone)]
pub struct AppState {
    /// 配置的运行默认值，请求字段逐项覆盖
    pub defaults: DefaultsConfig,
    pub started_at: DateTime<Local>,
    pub shutdown_tx: broadcast::Sender<()>,
}

impl AppState {
    pub fn new(defaults: DefaultsConfig, shutdown_tx: broadcast::Sender<()>) -> Self {
        Self {
            defaults,
            started_at: Local::now(),
            shutdown_tx,
        }
    }

    pub fn uptime_seconds(&self) -> f64 {
        let now = Local::now();
        (now - self.started_at).num_milliseconds() as f64 / 1000.0
    }
}
