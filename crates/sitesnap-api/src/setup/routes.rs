//! Route configuration.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers::{health::health, upload::upload, upload_json::upload_json};
use crate::state::AppState;

/// Slack on top of the per-file limit for text fields and multipart
/// framing.
const BODY_LIMIT_SLACK: usize = 1024 * 1024;

pub fn build_router(state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(&state)?;
    let body_limit = state.config.max_file_size_bytes + BODY_LIMIT_SLACK;

    let router = Router::new()
        .route("/health", get(health))
        .route("/upload", post(upload))
        .route("/upload-json", post(upload_json))
        .fallback_service(ServeDir::new("public"))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(router)
}

fn setup_cors(state: &Arc<AppState>) -> Result<CorsLayer, anyhow::Error> {
    let origins = &state.config.cors_origins;

    if origins.iter().any(|o| o == "*") {
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any));
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .map(|o| {
            o.parse::<HeaderValue>()
                .map_err(|_| anyhow::anyhow!("Invalid CORS origin: {}", o))
        })
        .collect::<Result<_, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(parsed)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any))
}
