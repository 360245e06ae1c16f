//! Spreadsheet metadata recorder.
//!
//! Appends one row per successful upload batch to a configured sheet.
//! Fire-and-forget relative to the upload outcome: callers log a failure
//! here and still report the upload as successful.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;

use crate::auth::TokenProvider;
use crate::traits::{StoreError, StoreResult};

const SHEETS_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Fixed-order metadata row, append-only.
#[derive(Debug, Clone)]
pub struct SheetRow {
    pub date: String,
    pub work_type: String,
    pub address: String,
    pub uploader: String,
    pub memo: String,
    pub links: Vec<String>,
    pub recorded_at: DateTime<Utc>,
}

/// Append-only sink for upload metadata. The pipeline only sees this
/// trait; `SheetsRecorder` is the production implementation.
#[async_trait]
pub trait MetadataRecorder: Send + Sync {
    async fn append_row(&self, row: &SheetRow) -> StoreResult<()>;
}

pub struct SheetsRecorder {
    http: reqwest::Client,
    auth: Arc<TokenProvider>,
    spreadsheet_id: String,
    sheet_name: String,
}

impl SheetsRecorder {
    pub fn new(
        http: reqwest::Client,
        auth: Arc<TokenProvider>,
        spreadsheet_id: String,
        sheet_name: String,
    ) -> Self {
        Self {
            http,
            auth,
            spreadsheet_id,
            sheet_name,
        }
    }
}

#[async_trait]
impl MetadataRecorder for SheetsRecorder {
    async fn append_row(&self, row: &SheetRow) -> StoreResult<()> {
        let token = self.auth.access_token().await?;

        let range = format!("{}!A:G", self.sheet_name);
        let url = format!(
            "{}/{}/values/{}:append",
            SHEETS_URL,
            self.spreadsheet_id,
            urlencoding::encode(&range)
        );

        let body = json!({
            "values": [[
                row.date,
                row.work_type,
                row.address,
                row.uploader,
                row.memo,
                row.links.join("\n"),
                row.recorded_at.to_rfc3339(),
            ]]
        });

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .query(&[("valueInputOption", "USER_ENTERED")])
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::Remote(format!("Sheet append failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(StoreError::Remote(format!(
                "Sheet append returned {}: {}",
                status, text
            )));
        }

        tracing::debug!(spreadsheet = %self.spreadsheet_id, "Appended metadata row");
        Ok(())
    }
}
