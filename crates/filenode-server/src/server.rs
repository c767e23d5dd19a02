//! Server startup and lifecycle.

use crate::{config::NodeConfig, routes, state::AppState};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

pub async fn run_server(config: NodeConfig) -> anyhow::Result<()> {
    let state = Arc::new(AppState::new(config.clone())?);
    let app = routes::create_router(state);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "filenode coordinator listening");

    axum::serve(listener, app).await?;
    Ok(())
}

pub async fn run_server_with_shutdown(
    config: NodeConfig,
    shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let state = Arc::new(AppState::new(config.clone())?);
    let app = routes::create_router(state);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "filenode coordinator listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;
    info!("filenode coordinator shut down");
    Ok(())
}
