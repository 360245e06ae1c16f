//! Error types module
//!
//! All errors flowing through the upload pipeline are unified under the
//! `AppError` enum. Components below the HTTP surface return these
//! unchanged; the HTTP surface is the only place they become responses.

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Missing or malformed request input. Always a client error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Failure reported by Google Drive or Sheets. The underlying message
    /// is passed through untransformed and the operation is not retried.
    #[error("Remote storage error: {0}")]
    RemoteStorage(String),

    /// Missing credentials or storage scope. Fatal at startup, 500 if it
    /// surfaces on first use.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("JSON parsing error: {}", err))
    }
}

impl AppError {
    /// HTTP status for this error. Validation failures are the caller's
    /// fault; everything else is ours or Google's.
    pub fn http_status_code(&self) -> u16 {
        match self {
            AppError::Validation(_) => 400,
            AppError::RemoteStorage(_) => 500,
            AppError::Configuration(_) => 500,
            AppError::Internal(_) => 500,
        }
    }

    /// Short category used as the `message` field of the error envelope.
    pub fn client_message(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation failed",
            AppError::RemoteStorage(_) => "upload failed",
            AppError::Configuration(_) => "server misconfigured",
            AppError::Internal(_) => "server error",
        }
    }

    /// Error type name for logging.
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "Validation",
            AppError::RemoteStorage(_) => "RemoteStorage",
            AppError::Configuration(_) => "Configuration",
            AppError::Internal(_) => "Internal",
        }
    }
}
