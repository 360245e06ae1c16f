//! Google Drive v3 client
//!
//! Implements `PhotoStore` against the Drive REST API: folder
//! lookup-or-create and multipart media upload. Folder creation for a given
//! (parent, name) pair is serialized through an in-process keyed mutex so
//! two concurrent requests cannot both create the same sibling. Cross-
//! process races remain possible; Drive has no conditional create.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Mutex;

use crate::auth::{ServiceAccountKey, TokenProvider};
use crate::traits::{PhotoStore, StoreError, StoreResult, UploadedFile};

const FILES_URL: &str = "https://www.googleapis.com/drive/v3/files";
const UPLOAD_URL: &str = "https://www.googleapis.com/upload/drive/v3/files";
const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";
const HTTP_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<FileRef>,
}

#[derive(Debug, Deserialize)]
struct FileRef {
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedFile {
    id: String,
    #[serde(default)]
    web_view_link: Option<String>,
}

/// Per-(parent, name) creation locks. The map only ever grows, but keys
/// are dates and work types so the footprint stays small.
pub(crate) struct FolderLocks {
    inner: Mutex<HashMap<(String, String), Arc<Mutex<()>>>>,
}

impl FolderLocks {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) async fn acquire(&self, name: &str, parent: Option<&str>) -> Arc<Mutex<()>> {
        let key = (parent.unwrap_or("").to_string(), name.to_string());
        let mut locks = self.inner.lock().await;
        locks.entry(key).or_insert_with(|| Arc::new(Mutex::new(()))).clone()
    }
}

/// Find-or-create under the pair's creation lock. `create` runs only when
/// `find` came back empty, and never concurrently with another call for
/// the same (parent, name) pair.
pub(crate) async fn locked_find_or_create<F, FFut, C, CFut>(
    locks: &FolderLocks,
    name: &str,
    parent: Option<&str>,
    find: F,
    create: C,
) -> StoreResult<String>
where
    F: FnOnce() -> FFut,
    FFut: Future<Output = StoreResult<Option<String>>>,
    C: FnOnce() -> CFut,
    CFut: Future<Output = StoreResult<String>>,
{
    let lock = locks.acquire(name, parent).await;
    let _guard = lock.lock().await;

    if let Some(id) = find().await? {
        return Ok(id);
    }
    create().await
}

/// Drive client bound to one service account and, optionally, one shared
/// drive. Built once at startup and injected everywhere.
pub struct GoogleDrive {
    http: reqwest::Client,
    auth: Arc<TokenProvider>,
    shared_drive_id: Option<String>,
    folder_locks: FolderLocks,
}

impl GoogleDrive {
    pub fn new(service_account_json: &str, shared_drive_id: Option<String>) -> StoreResult<Self> {
        let key = ServiceAccountKey::from_json(service_account_json)?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| StoreError::Remote(format!("Failed to create HTTP client: {}", e)))?;
        let auth = Arc::new(TokenProvider::new(key, http.clone()));
        Ok(Self {
            http,
            auth,
            shared_drive_id,
            folder_locks: FolderLocks::new(),
        })
    }

    /// Token provider, shared with the Sheets client.
    pub fn token_provider(&self) -> Arc<TokenProvider> {
        self.auth.clone()
    }

    pub(crate) fn build_folder_query(name: &str, parent: Option<&str>) -> String {
        let safe_name = name.replace('\\', "\\\\").replace('\'', "\\'");
        let mut clauses = vec![
            format!("name='{}'", safe_name),
            format!("mimeType='{}'", FOLDER_MIME_TYPE),
            "trashed=false".to_string(),
        ];
        if let Some(parent) = parent {
            clauses.push(format!("'{}' in parents", parent));
        }
        clauses.join(" and ")
    }

    async fn find_folder(&self, name: &str, parent: Option<&str>) -> StoreResult<Option<String>> {
        let token = self.auth.access_token().await?;
        let q = Self::build_folder_query(name, parent);

        let mut request = self
            .http
            .get(FILES_URL)
            .bearer_auth(token)
            .query(&[
                ("q", q.as_str()),
                ("fields", "files(id, name)"),
                ("supportsAllDrives", "true"),
                ("includeItemsFromAllDrives", "true"),
            ]);
        if let Some(drive_id) = &self.shared_drive_id {
            request = request.query(&[("corpora", "drive"), ("driveId", drive_id.as_str())]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Remote(format!("Folder lookup failed: {}", e)))?;
        let list: FileList = check_json(response, "Folder lookup").await?;

        // First match wins; duplicate siblings are resolved arbitrarily.
        Ok(list.files.into_iter().next().map(|f| f.id))
    }

    async fn create_folder(&self, name: &str, parent: Option<&str>) -> StoreResult<String> {
        let token = self.auth.access_token().await?;

        // Parentless folders land at the shared-drive root when one is
        // configured, otherwise in the service account's My Drive.
        let parents: Vec<&str> = match (parent, self.shared_drive_id.as_deref()) {
            (Some(parent), _) => vec![parent],
            (None, Some(drive_id)) => vec![drive_id],
            (None, None) => vec![],
        };

        let mut body = json!({
            "name": name,
            "mimeType": FOLDER_MIME_TYPE,
        });
        if !parents.is_empty() {
            body["parents"] = json!(parents);
        }

        let response = self
            .http
            .post(FILES_URL)
            .bearer_auth(token)
            .query(&[("supportsAllDrives", "true"), ("fields", "id")])
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::Remote(format!("Folder create failed: {}", e)))?;
        let created: CreatedFile = check_json(response, "Folder create").await?;

        tracing::info!(folder = %name, id = %created.id, "Created Drive folder");
        Ok(created.id)
    }
}

#[async_trait]
impl PhotoStore for GoogleDrive {
    async fn resolve_or_create_folder(
        &self,
        name: &str,
        parent: Option<&str>,
    ) -> StoreResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::InvalidArgument(
                "Folder name must not be empty".to_string(),
            ));
        }

        locked_find_or_create(
            &self.folder_locks,
            name,
            parent,
            move || self.find_folder(name, parent),
            move || self.create_folder(name, parent),
        )
        .await
    }

    async fn upload_file(
        &self,
        folder_id: &str,
        filename: &str,
        content_type: &str,
        data: Bytes,
    ) -> StoreResult<UploadedFile> {
        let token = self.auth.access_token().await?;

        let metadata = json!({
            "name": filename,
            "parents": [folder_id],
        });

        // Drive's multipart upload wants multipart/related: a JSON metadata
        // part followed by the media part.
        let boundary = format!("sitesnap-{}", uuid::Uuid::new_v4().simple());
        let mut body = Vec::with_capacity(data.len() + 512);
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        body.extend_from_slice(b"Content-Type: application/json; charset=UTF-8\r\n\r\n");
        body.extend_from_slice(metadata.to_string().as_bytes());
        body.extend_from_slice(format!("\r\n--{}\r\n", boundary).as_bytes());
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
        body.extend_from_slice(&data);
        body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

        let response = self
            .http
            .post(UPLOAD_URL)
            .bearer_auth(token)
            .query(&[
                ("uploadType", "multipart"),
                ("supportsAllDrives", "true"),
                ("fields", "id, webViewLink"),
            ])
            .header(
                reqwest::header::CONTENT_TYPE,
                format!("multipart/related; boundary={}", boundary),
            )
            .body(body)
            .send()
            .await
            .map_err(|e| StoreError::Remote(format!("File upload failed: {}", e)))?;
        let created: CreatedFile = check_json(response, "File upload").await?;

        tracing::info!(file = %filename, id = %created.id, "Uploaded file to Drive");

        let link = created
            .web_view_link
            .unwrap_or_else(|| format!("https://drive.google.com/file/d/{}/view", created.id));
        Ok(UploadedFile {
            file_id: created.id,
            link,
        })
    }
}

/// Fail on non-2xx with the remote message attached, otherwise decode JSON.
async fn check_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
    operation: &str,
) -> StoreResult<T> {
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(StoreError::Remote(format!(
            "{} returned {}: {}",
            operation, status, text
        )));
    }
    response
        .json()
        .await
        .map_err(|e| StoreError::Remote(format!("{} returned invalid JSON: {}", operation, e)))
}
