use tasklane_core::error::RunError;
use thiserror::Error;

/// Top-level CLI failures, mapped to exit codes in `main.rs`.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Run(#[from] RunError),

    #[error("{0}")]
    Command(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
