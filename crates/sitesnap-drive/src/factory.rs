//! Store construction from configuration.

use std::sync::Arc;
use std::time::Duration;

use sitesnap_core::Config;

use crate::drive::GoogleDrive;
use crate::sheets::{MetadataRecorder, SheetsRecorder};
use crate::traits::{PhotoStore, StoreError, StoreResult};

/// Build the Drive store and, when a spreadsheet is configured, the
/// metadata recorder. Both share one token provider so the service account
/// authenticates once.
pub fn create_store(
    config: &Config,
) -> StoreResult<(Arc<dyn PhotoStore>, Option<Arc<dyn MetadataRecorder>>)> {
    let drive = GoogleDrive::new(
        &config.service_account_json,
        config.shared_drive_id.clone(),
    )?;

    let recorder: Option<Arc<dyn MetadataRecorder>> = match &config.spreadsheet_id {
        Some(spreadsheet_id) => {
            let http = reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .map_err(|e| {
                    StoreError::Remote(format!("Failed to create HTTP client: {}", e))
                })?;
            Some(Arc::new(SheetsRecorder::new(
                http,
                drive.token_provider(),
                spreadsheet_id.clone(),
                config.sheet_name.clone(),
            )))
        }
        None => None,
    };

    Ok((Arc::new(drive), recorder))
}
