use crate::config::ServerConfig;
use crate::http::health;
use crate::signaling::{SignalingService, ws_handler};
use anyhow::{Context, Result};
use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Websocket upgrade on `/` and `/ws`, liveness on `/health`.
pub fn router(service: SignalingService) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(ws_handler))
        .route("/ws", get(ws_handler))
        .route("/health", get(health))
        .layer(cors)
        .with_state(service)
}

/// Start the session controller and serve until the listener fails.
pub async fn serve(config: ServerConfig) -> Result<()> {
    let service = SignalingService::spawn(&config);
    let app = router(service);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("Signaling server listening on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .await
        .context("Signaling server stopped")?;
    Ok(())
}
