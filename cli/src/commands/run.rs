use tasklane_core::config::AppConfig;
use tasklane_core::engine;
use tasklane_core::options::{RunMode, RunOptions};
use tasklane_core::synth::{generate_tasks, SynthSpec};
use tracing::info;

use super::cli::RunArgs;
use crate::error::CliError;
use crate::report;

/// Merge config defaults with CLI flags; flags win field by field.
fn merge_options(args: &RunArgs, cfg: &AppConfig) -> RunOptions {
    let mut options = cfg.defaults.run_options();
    if args.fail_fast {
        options.fail_fast = true;
    }
    if args.timeout_ms.is_some() {
        options.timeout_ms = args.timeout_ms;
    }
    if let Some(v) = args.retries {
        options.retries = v;
    }
    if let Some(v) = args.retry_delay_ms {
        options.retry_delay_ms = v;
    }
    if let Some(v) = args.backoff_factor {
        options.backoff_factor = v;
    }
    if let Some(v) = args.jitter_ratio {
        options.jitter_ratio = v;
    }
    options.jitter_seed = args.seed;
    options
}

fn merge_spec(args: &RunArgs) -> SynthSpec {
    let mut spec = SynthSpec::default();
    if let Some(v) = args.count {
        spec.count = v;
    }
    if let Some(v) = args.min_ms {
        spec.min_ms = v;
    }
    if let Some(v) = args.max_ms {
        spec.max_ms = v;
    }
    spec.fail_at = args.fail_at.clone();
    spec
}

pub async fn handle_run(args: RunArgs, cfg: &AppConfig) -> Result<i32, CliError> {
    let mode = args.mode.map(RunMode::from).unwrap_or(cfg.defaults.mode);
    let limit = args.limit.unwrap_or(cfg.defaults.limit);
    let options = merge_options(&args, cfg);
    let spec = merge_spec(&args);

    let tasks = generate_tasks(&spec, args.seed);
    info!(
        target: "tasklane.cli",
        mode = %mode,
        count = spec.count,
        fail_fast = options.fail_fast,
        "starting run"
    );

    match engine::run(tasks, mode, Some(limit), &options).await {
        Ok(summary) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", report::render_summary(&summary));
            }
            Ok(if summary.failed == 0 { 0 } else { 1 })
        }
        Err(err) => {
            // Aborted runs still report what settled before bailing out.
            if let Some(summary) = err.summary() {
                if args.json {
                    let body = serde_json::json!({
                        "error": err.to_string(),
                        "code": err.error_code(),
                        "summary": summary,
                    });
                    println!("{}", serde_json::to_string_pretty(&body)?);
                } else {
                    print!("{}", report::render_summary(summary));
                }
            }
            Err(err.into())
        }
    }
}
