//! JSON upload handler.
//!
//! Variant of `/upload` for front ends that send base64 file payloads in a
//! JSON body instead of multipart. Field keys are free-form and go through
//! the same alias normalization.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{extract::State, Json};
use base64::Engine;
use serde::Deserialize;

use crate::error::{HttpAppError, ValidatedJson};
use crate::handlers::UploadResponse;
use crate::services::upload::process_upload;
use crate::state::AppState;
use sitesnap_core::AppError;

#[derive(Debug, Deserialize)]
pub struct JsonFile {
    pub name: String,
    #[serde(default, rename = "contentType")]
    pub content_type: Option<String>,
    /// Base64-encoded file bytes.
    pub data: String,
}

#[derive(Debug, Deserialize)]
pub struct UploadJsonBody {
    #[serde(default)]
    pub files: Vec<JsonFile>,
    /// Everything else: free-form text fields for the normalizer.
    #[serde(flatten)]
    pub fields: HashMap<String, serde_json::Value>,
}

/// `POST /upload-json`
#[tracing::instrument(skip(state, body), fields(operation = "upload_json"))]
pub async fn upload_json(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<UploadJsonBody>,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let raw_fields: HashMap<String, String> = body
        .fields
        .into_iter()
        .filter_map(|(k, v)| match v {
            serde_json::Value::String(s) => Some((k, s)),
            serde_json::Value::Number(n) => Some((k, n.to_string())),
            _ => None,
        })
        .collect();

    let mut files = Vec::with_capacity(body.files.len());
    for file in body.files {
        let data = base64::engine::general_purpose::STANDARD
            .decode(file.data.as_bytes())
            .map_err(|e| {
                AppError::Validation(format!("Invalid base64 data for {}: {}", file.name, e))
            })?;
        if data.len() > state.config.max_file_size_bytes {
            return Err(AppError::Validation(format!(
                "{} exceeds maximum file size",
                file.name
            ))
            .into());
        }
        let content_type = file
            .content_type
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let spooled = state
            .spool
            .write(&file.name, &content_type, data.into())
            .await
            .map_err(|e| AppError::Internal(format!("Failed to spool file: {}", e)))?;
        files.push(spooled);
    }

    let links = process_upload(&state, raw_fields, files).await?;
    Ok(Json(UploadResponse::uploaded(links)))
}
