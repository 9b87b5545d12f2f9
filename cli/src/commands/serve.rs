use tasklane_core::config::AppConfig;
use tokio::sync::broadcast;

use super::cli::ServeArgs;
use crate::error::CliError;
use crate::http::{server, AppState};

/// Start the HTTP API server, CLI flags overriding the configured bind.
pub async fn handle_serve(args: ServeArgs, cfg: &AppConfig) -> Result<(), CliError> {
    let host = args.host.unwrap_or_else(|| cfg.server.host.clone());
    let port = args.port.unwrap_or(cfg.server.port);

    let (shutdown_tx, _) = broadcast::channel(1);
    let state = AppState::new(cfg.defaults.clone(), shutdown_tx);

    server::start_server(&host, port, state)
        .await
        .map_err(|e| CliError::Command(e.to_string()))?;

    Ok(())
}
