// Handlers module
// HTTP handlers for the REST API

pub mod challenges;
pub mod completions;
pub mod users;

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Health check handler
/// Returns "OK" with 200 status for monitoring purposes
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Fallback handler for requests matching no (verb, path) pattern
pub async fn route_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "Route not found" })),
    )
}
