//! Upload pipeline: validate -> resolve path -> dispatch -> record.
//!
//! Both the multipart and the JSON handlers funnel into `process_upload`.
//! Errors from the resolver and the dispatcher bubble unchanged; the HTTP
//! error layer is the only translation point.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use sitesnap_core::naming::build_drive_filename;
use sitesnap_core::{normalize, AppError, CanonicalFields};
use sitesnap_drive::{build_path, MetadataRecorder, PhotoStore, SheetRow, UploadedFile};

use crate::spool::SpooledFile;
use crate::state::AppState;

/// Run the whole pipeline for one request. `files` are consumed; their
/// temp copies are gone by the time this returns, on every path.
pub async fn process_upload(
    state: &Arc<AppState>,
    raw_fields: HashMap<String, String>,
    files: Vec<SpooledFile>,
) -> Result<Vec<String>, AppError> {
    let fields = normalize(&raw_fields);

    if files.is_empty() {
        return Err(AppError::Validation("no file provided".to_string()));
    }
    let missing = fields.missing_required();
    if !missing.is_empty() {
        return Err(AppError::Validation(format!(
            "missing required fields: {}",
            missing.join(", ")
        )));
    }

    let folder_id = build_path(
        state.store.as_ref(),
        &state.config.root_folder_name,
        &fields.date,
        &fields.work_type,
    )
    .await?;

    let results = dispatch(state.store.as_ref(), files, &folder_id, &fields).await?;
    let links: Vec<String> = results.into_iter().map(|r| r.link).collect();

    // Recorded only after the whole batch succeeded; a recorder failure
    // does not flip the upload outcome.
    if let Some(recorder) = &state.recorder {
        let row = SheetRow {
            date: fields.date.clone(),
            work_type: fields.work_type.clone(),
            address: fields.address.clone(),
            uploader: fields.uploader.clone(),
            memo: fields.memo.clone(),
            links: links.clone(),
            recorded_at: Utc::now(),
        };
        if let Err(e) = recorder.append_row(&row).await {
            tracing::warn!(error = %e, "Failed to append metadata row");
        }
    }

    Ok(links)
}

/// Upload each file sequentially, in input order. The temp copy is deleted
/// after every dispatch attempt, success or failure. A failure aborts the
/// batch: earlier files stay uploaded remotely but their results are
/// dropped with the error - the request reports overall failure.
async fn dispatch(
    store: &dyn PhotoStore,
    files: Vec<SpooledFile>,
    folder_id: &str,
    fields: &CanonicalFields,
) -> Result<Vec<UploadedFile>, AppError> {
    let mut results = Vec::with_capacity(files.len());

    for (index, mut file) in files.into_iter().enumerate() {
        let filename = build_drive_filename(
            &fields.uploader,
            &fields.date,
            &fields.work_type,
            &file.original_name,
            Utc::now(),
            index + 1,
        );

        let outcome = match file.read().await {
            Ok(data) => {
                store
                    .upload_file(folder_id, &filename, &file.content_type, data.into())
                    .await
                    .map_err(AppError::from)
            }
            Err(e) => Err(AppError::Internal(format!(
                "Failed to read spooled file: {}",
                e
            ))),
        };
        file.discard().await;

        results.push(outcome?);
    }

    Ok(results)
}
