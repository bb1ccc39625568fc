//! HTTP server for external liveness monitoring
//!
//! Serves a single endpoint, `GET /` → `200 OK`, on its own port
//! (HEALTH_PORT, default 8080). It runs independently of the Telegram
//! dispatcher, so it keeps answering while long downloads are in flight.

use axum::{http::StatusCode, response::IntoResponse, routing::get, Router};
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Router with the liveness route.
pub fn health_router() -> Router {
    Router::new().route("/", get(root_handler))
}

/// Bind on all interfaces and serve until the process exits.
pub async fn start_health_server(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(&addr).await?;

    log::info!("Starting health server on http://{}", addr);
    log::info!("  /  - Liveness check");

    serve_health(listener).await?;
    Ok(())
}

/// Serve the liveness router on an already bound listener.
pub async fn serve_health(listener: TcpListener) -> std::io::Result<()> {
    axum::serve(listener, health_router()).await
}

/// Handler for / endpoint
async fn root_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
