use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TaskError;
use crate::options::RunMode;

/// Terminal status of a task within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Ok,
    Error,
    /// Placeholder emitted by an aborted unbounded-parallel run; the real
    /// outcome of the task was never observed.
    Unknown,
}

/// Wire form of a task failure: a stable code (when one exists) plus the
/// rendered message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub message: String,
}

impl From<&TaskError> for OutcomeError {
    fn from(err: &TaskError) -> Self {
        Self {
            code: err.code().map(str::to_string),
            message: err.to_string(),
        }
    }
}

/// Record of one task's fate within a run.
///
/// `id` is the task's 1-based input position, assigned by the executor;
/// tasks themselves carry no identity. `unknown` placeholders carry no
/// timestamps and `attempts == 0`; settled outcomes always have timestamps
/// and `attempts >= 1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskOutcome {
    pub id: u32,
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<OutcomeError>,
    pub attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl TaskOutcome {
    pub fn ok(
        id: u32,
        value: Value,
        attempts: u32,
        started_at: i64,
        finished_at: i64,
        duration_ms: u64,
    ) -> Self {
        Self {
            id,
            status: TaskStatus::Ok,
            value: Some(value),
            error: None,
            attempts,
            started_at: Some(started_at),
            finished_at: Some(finished_at),
            duration_ms: Some(duration_ms),
        }
    }

    pub fn failed(
        id: u32,
        error: &TaskError,
        attempts: u32,
        started_at: i64,
        finished_at: i64,
        duration_ms: u64,
    ) -> Self {
        Self {
            id,
            status: TaskStatus::Error,
            value: None,
            error: Some(OutcomeError::from(error)),
            attempts,
            started_at: Some(started_at),
            finished_at: Some(finished_at),
            duration_ms: Some(duration_ms),
        }
    }

    /// Placeholder for a task whose real fate an aborted parallel run
    /// refuses to report.
    pub fn unknown(id: u32) -> Self {
        Self {
            id,
            status: TaskStatus::Unknown,
            value: None,
            error: None,
            attempts: 0,
            started_at: None,
            finished_at: None,
            duration_ms: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == TaskStatus::Ok
    }
}

/// Aggregate over a run's outcomes, in input order, tagged with the
/// executor that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub mode: RunMode,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub results: Vec<TaskOutcome>,
}

/// Fold outcomes into a summary. Pure: packages the mode tag, counts by
/// status only, never inspects values or errors, preserves input order.
pub fn summarize(mode: RunMode, results: Vec<TaskOutcome>, duration: Duration) -> RunSummary {
    let total = results.len();
    let succeeded = results.iter().filter(|r| r.is_ok()).count();
    RunSummary {
        mode,
        total,
        succeeded,
        failed: total - succeeded,
        duration_ms: duration.as_millis() as u64,
        results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn summarize_counts_unknown_as_failed() {
        let results = vec![
            TaskOutcome::ok(1, json!(1), 1, 10, 20, 10),
            TaskOutcome::unknown(2),
            TaskOutcome::failed(
                3,
                &TaskError::Timeout {
                    id: 3,
                    timeout_ms: 5,
                },
                1,
                10,
                16,
                6,
            ),
        ];
        let summary = summarize(RunMode::Parallel, results, Duration::from_millis(42));

        assert_eq!(summary.mode, RunMode::Parallel);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.duration_ms, 42);
        let ids: Vec<u32> = summary.results.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn summarize_empty_run() {
        let summary = summarize(RunMode::Sequential, Vec::new(), Duration::ZERO);
        assert_eq!(summary.mode, RunMode::Sequential);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.succeeded, 0);
        assert_eq!(summary.failed, 0);
        assert!(summary.results.is_empty());
    }

    #[test]
    fn summary_serializes_mode_tag() {
        let summary = summarize(RunMode::Pool, Vec::new(), Duration::from_millis(7));
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["mode"], "pool");
        assert_eq!(json["durationMs"], 7);
    }

    #[test]
    fn outcome_serializes_camel_case_and_skips_absent_fields() {
        let json = serde_json::to_value(TaskOutcome::unknown(9)).unwrap();
        assert_eq!(json["status"], "unknown");
        assert_eq!(json["id"], 9);
        assert_eq!(json["attempts"], 0);
        assert!(json.get("startedAt").is_none());
        assert!(json.get("finishedAt").is_none());
        assert!(json.get("durationMs").is_none());
        assert!(json.get("value").is_none());

        let ok = serde_json::to_value(TaskOutcome::ok(1, json!({"n": 1}), 2, 100, 130, 30))
            .unwrap();
        assert_eq!(ok["status"], "ok");
        // numeric id, not a string
        assert_eq!(ok["id"], 1);
        assert_eq!(ok["startedAt"], 100);
        assert_eq!(ok["finishedAt"], 130);
        assert_eq!(ok["durationMs"], 30);
        assert_eq!(ok["attempts"], 2);
    }

    #[test]
    fn failed_outcome_carries_code_and_message() {
        let err = TaskError::Timeout {
            id: 2,
            timeout_ms: 60,
        };
        let json = serde_json::to_value(TaskOutcome::failed(2, &err, 1, 0, 60, 60)).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["error"]["code"], "ETIMEDOUT");
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("timed out"));
    }
}
