//! HTTP路由handlers

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use tasklane_core::engine;
use tasklane_core::options::RunOptions;
use tasklane_core::synth::{generate_tasks, tasks_from_defs, SynthSpec};
use tracing::info;

use crate::http::{models::*, state::AppState};

/// 创建所有路由
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/run", post(run_handler))
        .route("/health", get(health_handler))
        .route("/shutdown", post(shutdown_handler))
        .with_state(state)
}

/// 合并配置默认值与请求字段，请求优先
fn run_options_for(req: &RunRequest, state: &AppState) -> RunOptions {
    let mut options = state.defaults.run_options();
    if let Some(v) = req.fail_fast {
        options.fail_fast = v;
    }
    if req.timeout_ms.is_some() {
        options.timeout_ms = req.timeout_ms;
    }
    if let Some(v) = req.retries {
        options.retries = v;
    }
    if let Some(v) = req.retry_delay_ms {
        options.retry_delay_ms = v;
    }
    if let Some(v) = req.backoff_factor {
        options.backoff_factor = v;
    }
    if let Some(v) = req.jitter_ratio {
        options.jitter_ratio = v;
    }
    options.jitter_seed = req.seed;
    options
}

/// POST /run - 生成任务并按所选模式执行
async fn run_handler(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<RunResponse>, ApiError> {
    // 手动解析，统一把字段错误映射为400
    let req: RunRequest =
        serde_json::from_value(body).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

    let limit = req.limit.unwrap_or(state.defaults.limit);
    let options = run_options_for(&req, &state);
    let tasks = match &req.tasks {
        Some(TasksPayload::List(defs)) => tasks_from_defs(defs),
        Some(TasksPayload::Spec(spec)) => generate_tasks(spec, req.seed),
        None => generate_tasks(&SynthSpec::default(), req.seed),
    };

    info!(
        target: "tasklane.http",
        mode = %req.mode,
        count = tasks.len(),
        fail_fast = options.fail_fast,
        "run requested"
    );

    let summary = engine::run(tasks, req.mode, Some(limit), &options).await?;

    Ok(Json(RunResponse {
        status: "completed".into(),
        summary,
    }))
}

/// GET /health - 健康检查
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        uptime: state.uptime_seconds(),
        pid: std::process::id(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// POST /shutdown - 触发优雅关闭
async fn shutdown_handler(State(state): State<AppState>) -> Json<Value> {
    let _ = state.shutdown_tx.send(());

    Json(serde_json::json!({
        "status": "shutting down"
    }))
}
