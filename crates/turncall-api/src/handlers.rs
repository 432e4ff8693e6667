//! Health and fallback handlers.

use axum::http::Uri;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::ApiError;

/// `GET`/`HEAD /health`.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Any unmatched route.
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("no route for {}", uri.path()))
}
