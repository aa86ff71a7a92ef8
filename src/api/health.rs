use axum::{extract::State, http::StatusCode, Json};
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy"),
        (status = 503, description = "Database is unreachable")
    )
)]
pub async fn health_check(State(db): State<DatabaseConnection>) -> (StatusCode, Json<Value>) {
    let (status, label) = match db.ping().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "degraded")
        }
    };

    (
        status,
        Json(json!({
            "status": label,
            "service": "library-catalog",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}
