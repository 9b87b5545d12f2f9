//! HTTP服务器生命周期管理

use std::net::SocketAddr;

use axum::middleware;
use tokio::signal;
use tracing::info;

use super::{
    middleware::{create_middleware_stack, request_logger},
    routes::create_router,
    AppState,
};

/// 启动HTTP服务器并等待关闭信号
pub async fn start_server(host: &str, port: u16, state: AppState) -> anyhow::Result<()> {
    let router = create_router(state.clone());

    let app = router
        .layer(middleware::from_fn(request_logger))
        .layer(create_middleware_stack());

    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(target: "tasklane.http", "HTTP server listening on http://{addr}");

    let mut shutdown_rx = state.shutdown_tx.subscribe();

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = signal::ctrl_c() => {
                    info!(target: "tasklane.http", "Received Ctrl+C signal");
                }
                _ = shutdown_rx.recv() => {
                    info!(target: "tasklane.http", "Received shutdown signal from API");
                }
                _ = wait_for_sigterm() => {
                    info!(target: "tasklane.http", "Received SIGTERM signal");
                }
            }

            info!(target: "tasklane.http", "Starting graceful shutdown...");
        })
        .await?;

    info!(target: "tasklane.http", "Server shutdown complete");

    Ok(())
}

/// 等待 SIGTERM 信号（Unix系统）
#[cfg(unix)]
async fn wait_for_sigterm() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        // 注册失败时退回到仅响应 Ctrl+C / shutdown API
        Err(_) => std::future::pending::<()>().await,
    }
}

/// Windows 系统不支持 SIGTERM，永久等待
#[cfg(not(unix))]
async fn wait_for_sigterm() {
    std::future::pending::<()>().await
}
