//! HTTP API数据模型

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tasklane_core::error::RunError;
use tasklane_core::options::RunMode;
use tasklane_core::outcome::RunSummary;
use tasklane_core::synth::{SynthSpec, SynthTaskDef};

// ============= Run =============

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRequest {
    pub mode: RunMode,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub fail_fast: Option<bool>,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub retries: Option<u32>,
    #[serde(default)]
    pub retry_delay_ms: Option<u64>,
    #[serde(default)]
    pub backoff_factor: Option<f64>,
    #[serde(default)]
    pub jitter_ratio: Option<f64>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub tasks: Option<TasksPayload>,
}

/// 任务定义 - 批量规格或显式列表
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TasksPayload {
    Spec(SynthSpec),
    List(Vec<SynthTaskDef>),
}

/// 成功响应：summary字段（含mode）平铺到顶层，results落在顶层
#[derive(Debug, Serialize)]
pub struct RunResponse {
    pub status: String,
    #[serde(flatten)]
    pub summary: RunSummary,
}

// ============= Health =============

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime: f64,
    pub pid: u32,
    pub version: String,
}

// ============= Error Handling =============

#[derive(Debug)]
pub enum ApiError {
    /// 请求体无法解析或校验失败
    InvalidRequest(String),
    /// 引擎拒绝或中止了本次运行
    Run(RunError),
}

impl From<RunError> for ApiError {
    fn from(err: RunError) -> Self {
        Self::Run(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, serde_json::json!({ "error": msg }))
            }
            Self::Run(err) => {
                let status = match &err {
                    RunError::Aborted { .. } => StatusCode::CONFLICT,
                    _ => StatusCode::BAD_REQUEST,
                };
                let mut body = serde_json::json!({
                    "error": err.to_string(),
                    "code": err.error_code(),
                });
                if let Some(summary) = err.summary() {
                    body["summary"] = serde_json::to_value(summary).unwrap_or_default();
                }
                (status, body)
            }
        };

        (status, Json(body)).into_response()
    }
}
