//! Request-private temp-file spool.
//!
//! Incoming file parts are written here before dispatch. Cleanup is
//! best-effort and never escalates: an explicit `discard` after dispatch,
//! with a `Drop` fallback covering every other exit path (validation
//! failure, panic, earlier error).

use std::path::{Path, PathBuf};

use bytes::Bytes;

/// Spool directory, created once at startup.
#[derive(Clone, Debug)]
pub struct Spool {
    dir: PathBuf,
}

impl Spool {
    pub async fn new(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    /// Write one received file part to disk under a unique name.
    pub async fn write(
        &self,
        original_name: &str,
        content_type: &str,
        data: Bytes,
    ) -> std::io::Result<SpooledFile> {
        let path = self.dir.join(uuid::Uuid::new_v4().to_string());
        tokio::fs::write(&path, &data).await?;
        Ok(SpooledFile {
            path,
            original_name: original_name.to_string(),
            content_type: content_type.to_string(),
            size_bytes: data.len() as u64,
            removed: false,
        })
    }
}

/// One received file, owned by the request for its duration.
#[derive(Debug)]
pub struct SpooledFile {
    pub path: PathBuf,
    pub original_name: String,
    pub content_type: String,
    pub size_bytes: u64,
    removed: bool,
}

impl SpooledFile {
    pub async fn read(&self) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }

    /// Delete the temp file. Failures are logged and swallowed; temp-file
    /// leakage is tolerated, never fatal.
    pub async fn discard(&mut self) {
        if self.removed {
            return;
        }
        self.removed = true;
        if let Err(e) = tokio::fs::remove_file(&self.path).await {
            log_cleanup_failure(&self.path, &e);
        }
    }
}

impl Drop for SpooledFile {
    fn drop(&mut self) {
        if self.removed {
            return;
        }
        self.removed = true;
        if let Err(e) = std::fs::remove_file(&self.path) {
            log_cleanup_failure(&self.path, &e);
        }
    }
}

fn log_cleanup_failure(path: &Path, err: &std::io::Error) {
    if err.kind() != std::io::ErrorKind::NotFound {
        tracing::warn!(path = %path.display(), error = %err, "Failed to delete temp file");
    }
}
