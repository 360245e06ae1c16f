//! Remote photo-store abstraction
//!
//! The API and the upload dispatcher depend on this trait rather than the
//! concrete Drive client, so tests can substitute an in-memory store.

use async_trait::async_trait;
use bytes::Bytes;
use sitesnap_core::AppError;
use thiserror::Error;

/// Remote store operation errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Any Drive/Sheets API failure (auth expiry, quota, network). The
    /// underlying message is attached untransformed; never retried.
    #[error("Remote API error: {0}")]
    Remote(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidArgument(msg) => AppError::Validation(msg),
            StoreError::AuthFailed(msg) => AppError::RemoteStorage(msg),
            StoreError::Remote(msg) => AppError::RemoteStorage(msg),
        }
    }
}

/// One dispatched file: remote identifier plus view link, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_id: String,
    pub link: String,
}

/// Remote store the upload pipeline writes into.
#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Return the id of a folder named `name` under `parent` (or at the
    /// storage root when `parent` is `None`), creating it when absent.
    /// First match wins; repeat calls with no concurrent mutation return
    /// the same id. Not atomic across processes.
    async fn resolve_or_create_folder(
        &self,
        name: &str,
        parent: Option<&str>,
    ) -> StoreResult<String>;

    /// Upload one file into `folder_id` under `filename` and return its
    /// remote id and share link.
    async fn upload_file(
        &self,
        folder_id: &str,
        filename: &str,
        content_type: &str,
        data: Bytes,
    ) -> StoreResult<UploadedFile>;
}
