//! Human-readable run summaries for the CLI. JSON output serializes the
//! summary directly instead.

use tasklane_core::outcome::{RunSummary, TaskOutcome, TaskStatus};

fn status_label(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Ok => "ok",
        TaskStatus::Error => "error",
        TaskStatus::Unknown => "unknown",
    }
}

fn render_outcome(outcome: &TaskOutcome) -> String {
    let mut line = format!("task {:>3}  {}", outcome.id, status_label(outcome.status));
    if let Some(ms) = outcome.duration_ms {
        line.push_str(&format!("  {ms}ms"));
    }
    if outcome.attempts > 0 {
        line.push_str(&format!("  attempts={}", outcome.attempts));
    }
    if let Some(err) = &outcome.error {
        line.push_str(&format!("  {}", err.message));
    }
    line
}

/// One line per task in input order, then a totals line naming the mode.
pub fn render_summary(summary: &RunSummary) -> String {
    let mut out = String::new();
    for outcome in &summary.results {
        out.push_str(&render_outcome(outcome));
        out.push('\n');
    }
    out.push_str(&format!(
        "{}/{} succeeded, {} failed in {}ms ({} mode)\n",
        summary.succeeded, summary.total, summary.failed, summary.duration_ms, summary.mode
    ));
    out
}
