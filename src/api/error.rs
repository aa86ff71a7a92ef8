//! HTTP error mapping
//!
//! Validation failures never get here, they re-render their form with a 200.
//! Guard failures are rejected by the extractors with an empty 401.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domain::DomainError;

#[derive(Debug)]
pub enum ApiError {
    NotFound,
    Internal(String),
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound => ApiError::NotFound,
            // Services turn write conflicts into form errors
            DomainError::Conflict(msg) | DomainError::Database(msg) => ApiError::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": "Not Found" }))).into_response()
            }
            ApiError::Internal(msg) => {
                tracing::error!("Request failed: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal Server Error" })),
                )
                    .into_response()
            }
        }
    }
}

/// Ids in paths and hidden fields; anything unparsable names no record
pub fn parse_id(raw: &str) -> Result<i32, ApiError> {
    raw.trim().parse().map_err(|_| ApiError::NotFound)
}
