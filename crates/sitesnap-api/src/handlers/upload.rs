//! Multipart upload handler.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::error::HttpAppError;
use crate::handlers::UploadResponse;
use crate::services::upload::process_upload;
use crate::spool::SpooledFile;
use crate::state::AppState;
use sitesnap_core::AppError;

/// `POST /upload` - multipart form. Front-end versions disagree on field
/// names, so any part carrying a filename is treated as a file and text
/// parts feed the alias-based normalizer.
#[tracing::instrument(skip(state, multipart), fields(operation = "upload"))]
pub async fn upload(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let (raw_fields, files) = collect_multipart(&state, multipart).await?;
    let links = process_upload(&state, raw_fields, files).await?;
    Ok(Json(UploadResponse::uploaded(links)))
}

/// Split a multipart payload into text fields and spooled files. Multipart
/// parsing failures (including body-size violations) surface as validation
/// errors so the client gets the JSON envelope, never a bare error page.
async fn collect_multipart(
    state: &Arc<AppState>,
    mut multipart: Multipart,
) -> Result<(HashMap<String, String>, Vec<SpooledFile>), HttpAppError> {
    let mut raw_fields = HashMap::new();
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read multipart: {}", e)))?
    {
        if let Some(filename) = field.file_name().map(String::from) {
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read file data: {}", e)))?;
            let spooled = state
                .spool
                .write(&filename, &content_type, data)
                .await
                .map_err(|e| AppError::Internal(format!("Failed to spool file: {}", e)))?;
            files.push(spooled);
        } else {
            let name = field.name().map(String::from).unwrap_or_default();
            let value = field
                .text()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read field: {}", e)))?;
            if !name.is_empty() {
                raw_fields.insert(name, value);
            }
        }
    }

    Ok((raw_fields, files))
}
