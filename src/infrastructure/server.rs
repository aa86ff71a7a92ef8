// Server module - Builds the HTTP application and runs it

use axum::Router;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::infrastructure::AppState;

/// Build the full router with request tracing
pub fn build_router(state: AppState) -> Router {
    api::router(state).layer(TraceLayer::new_for_http())
}

/// Bind `port` on all interfaces and serve until the process stops
pub async fn serve(state: AppState, port: u16) -> Result<(), String> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;

    tracing::info!("Library catalog listening on {}", addr);

    axum::serve(listener, build_router(state))
        .await
        .map_err(|e| format!("HTTP server error: {}", e))
}
