use clap::Parser;

mod commands;
mod error;
mod http;
mod report;

use commands::cli;
use error::CliError;
use tasklane_core::config::{self, LoggingConfig};
use tasklane_core::error::RunError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static LOG_GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
    std::sync::OnceLock::new();

#[tokio::main]
async fn main() {
    let exit = match real_main().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            exit_code_for_error(&e)
        }
    };

    std::process::exit(exit);
}

async fn real_main() -> Result<i32, CliError> {
    let args = cli::Args::parse();
    let mut cfg = config::load_config(args.config.as_deref())
        .map_err(|e| CliError::Config(e.to_string()))?;
    if let Some(level) = &args.log_level {
        cfg.logging.level = level.clone();
    }
    init_tracing(&cfg.logging).map_err(CliError::Command)?;

    let cmd = args.command.unwrap_or_default();
    dispatch(cmd, &cfg).await
}

fn exit_code_for_error(e: &CliError) -> i32 {
    // 0: run finished, every task succeeded
    // 1: run finished with failures (returned as a normal exit code)
    // 11: config error
    // 12: fail-fast abort
    // 20: command / IO error
    // 50: internal/uncategorized
    match e {
        CliError::Config(_) => 11,
        CliError::Run(re) => match re {
            RunError::InvalidLimit { .. } | RunError::InvalidOption { .. } => 11,
            RunError::Aborted { .. } => 12,
        },
        CliError::Command(_) => 20,
        CliError::Json(_) => 50,
    }
}

async fn dispatch(cmd: cli::Commands, cfg: &config::AppConfig) -> Result<i32, CliError> {
    match cmd {
        cli::Commands::Run(run_args) => commands::run::handle_run(run_args, cfg).await,
        cli::Commands::Serve(serve_args) => {
            commands::serve::handle_serve(serve_args, cfg).await?;
            Ok(0)
        }
    }
}

fn init_tracing(logging: &LoggingConfig) -> Result<(), String> {
    if !logging.enabled {
        return Ok(());
    }

    let filter = match std::env::var("RUST_LOG") {
        Ok(v) if !v.trim().is_empty() => EnvFilter::from_default_env(),
        _ => EnvFilter::try_new(logging.level.clone()).map_err(|e| e.to_string())?,
    };

    let mut maybe_writer = None;

    if logging.file {
        let dir = match logging
            .directory
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            Some(d) => std::path::PathBuf::from(d),
            None => config::tasklane_data_dir()
                .map_err(|e| e.to_string())?
                .join("logs"),
        };

        std::fs::create_dir_all(&dir).map_err(|e| format!("create log dir failed: {e}"))?;
        let file_name = format!("tasklane.{}.log", std::process::id());
        let appender = tracing_appender::rolling::never(dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        let _ = LOG_GUARD.set(guard);
        maybe_writer = Some(non_blocking);
    }

    if !logging.console && maybe_writer.is_none() {
        return Err("logging disabled for both console and file".to_string());
    }

    let console_layer = logging.console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(atty::is(atty::Stream::Stderr))
    });

    let file_layer = maybe_writer.map(|w| {
        tracing_subscriber::fmt::layer()
            .with_writer(w)
            .with_ansi(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(())
}
