//! Health check handler.

use axum::{response::IntoResponse, Json};

/// `GET /health` - process is up. Answers regardless of storage or
/// credential state.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}
