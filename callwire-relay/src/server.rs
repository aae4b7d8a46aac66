use crate::config::RelayConfig;
use crate::relay::{RelayService, ws_handler};
use anyhow::{Context, Result};
use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tracing::info;

pub fn router(service: RelayService, path: &str) -> Router {
    Router::new()
        .route(path, get(ws_handler))
        .with_state(service)
}

/// Binds `config.bind` and relays until the process stops.
pub async fn serve(config: RelayConfig) -> Result<()> {
    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind relay on {}", config.bind))?;

    serve_listener(listener, RelayService::new(), &config.path).await
}

/// Relays on an already bound listener, e.g. port 0 in tests.
pub async fn serve_listener(listener: TcpListener, service: RelayService, path: &str) -> Result<()> {
    let addr = listener.local_addr()?;
    info!("Relay listening on ws://{}{}", addr, path);

    axum::serve(listener, router(service, path))
        .await
        .context("Relay server stopped")?;
    Ok(())
}
