//! Test helpers: build the router against an in-memory fake store.
//!
//! Run from workspace root: `cargo test -p sitesnap-api`.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum_test::TestServer;
use bytes::Bytes;
use tempfile::TempDir;

use sitesnap_api::setup::routes::build_router;
use sitesnap_api::spool::Spool;
use sitesnap_api::state::AppState;
use sitesnap_core::Config;
use sitesnap_drive::{MetadataRecorder, PhotoStore, SheetRow, StoreError, StoreResult, UploadedFile};

/// In-memory store: deterministic folder ids, recorded calls, optional
/// simulated failure on the Nth upload (1-based).
#[derive(Default)]
pub struct FakeStore {
    folders: Mutex<HashMap<(Option<String>, String), String>>,
    pub resolve_calls: Mutex<Vec<(String, Option<String>)>>,
    pub uploads: Mutex<Vec<(String, String)>>,
    pub fail_on_upload: Option<usize>,
    upload_counter: AtomicUsize,
}

impl FakeStore {
    pub fn failing_on_upload(n: usize) -> Self {
        Self {
            fail_on_upload: Some(n),
            ..Default::default()
        }
    }
}

#[async_trait]
impl PhotoStore for FakeStore {
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
        self.resolve_calls
            .lock()
            .unwrap()
            .push((name.to_string(), parent.map(String::from)));

        let mut folders = self.folders.lock().unwrap();
        let next_id = format!("folder-{}", folders.len() + 1);
        let id = folders
            .entry((parent.map(String::from), name.to_string()))
            .or_insert(next_id);
        Ok(id.clone())
    }

    async fn upload_file(
        &self,
        folder_id: &str,
        filename: &str,
        _content_type: &str,
        _data: Bytes,
    ) -> StoreResult<UploadedFile> {
        let n = self.upload_counter.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on_upload == Some(n) {
            return Err(StoreError::Remote("simulated upload failure".to_string()));
        }
        self.uploads
            .lock()
            .unwrap()
            .push((folder_id.to_string(), filename.to_string()));
        Ok(UploadedFile {
            file_id: format!("file-{}", n),
            link: format!("https://drive.example.com/file-{}/view", n),
        })
    }
}

/// Recorder that always fails its append. Upload responses must not
/// notice.
pub struct FailingRecorder {
    pub attempts: AtomicUsize,
}

impl FailingRecorder {
    pub fn new() -> Self {
        Self {
            attempts: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl MetadataRecorder for FailingRecorder {
    async fn append_row(&self, _row: &SheetRow) -> StoreResult<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Remote(
            "simulated sheet append failure".to_string(),
        ))
    }
}

/// Test application: server plus the fake store and spool dir for
/// post-request assertions.
pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<FakeStore>,
    pub spool_dir: TempDir,
}

impl TestApp {
    pub fn spooled_file_count(&self) -> usize {
        std::fs::read_dir(self.spool_dir.path()).unwrap().count()
    }
}

fn test_config(upload_dir: &std::path::Path) -> Config {
    Config {
        server_port: 0,
        shared_drive_id: None,
        root_folder_name: "공사사진".to_string(),
        service_account_json: "{}".to_string(),
        spreadsheet_id: None,
        sheet_name: "Sheet1".to_string(),
        upload_dir: upload_dir.display().to_string(),
        max_file_size_bytes: 25 * 1024 * 1024,
        cors_origins: vec!["*".to_string()],
    }
}

pub async fn setup_test_app(store: FakeStore) -> TestApp {
    setup_test_app_with_recorder(store, None).await
}

pub async fn setup_test_app_with_recorder(
    store: FakeStore,
    recorder: Option<Arc<dyn MetadataRecorder>>,
) -> TestApp {
    let spool_dir = TempDir::new().expect("temp dir");
    let store = Arc::new(store);

    let state = Arc::new(AppState {
        config: test_config(spool_dir.path()),
        store: store.clone(),
        recorder,
        spool: Spool::new(spool_dir.path()).await.expect("spool"),
    });

    let router = build_router(state).expect("router");
    let server = TestServer::new(router).expect("test server");

    TestApp {
        server,
        store,
        spool_dir,
    }
}
