use std::future::Future;

use axum::Router;
use configs::AppConfig;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::routes::{self, ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Build the router over the configured file-backed store.
pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    // 文件存储 + ID 策略均来自 [storage] 配置
    let collections = service::runtime::collection_service(&cfg.storage).await?;
    let state = ServerState { collections };
    Ok(routes::build_router(state, build_cors()))
}

/// Public entry: serve until Ctrl+C / SIGTERM, letting in-flight requests finish.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    run_until(cfg, shutdown_signal()).await
}

/// Same as [`run`] with a caller-provided shutdown future.
pub async fn run_until<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_app(&cfg).await?;
    let listener = TcpListener::bind(cfg.server.bind_addr()).await?;
    info!(data_path = %cfg.storage.data_path, "document store configured");
    serve(listener, app, shutdown).await
}

/// Serve on an already bound listener.
/// Returns once `shutdown` resolves and all open connections have drained.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!(%addr, "backend running");
    // 优雅停机：停止接收新连接，等待进行中的请求（含 persist）完成
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    info!(%addr, "server drained");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to register SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!(signal = "SIGINT", "shutdown signal received"),
        _ = terminate => info!(signal = "SIGTERM", "shutdown signal received"),
    }
}
