pub mod health;
pub mod upload;
pub mod upload_json;

use serde::Serialize;

/// Success envelope shared by both upload handlers.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub message: &'static str,
    pub links: Vec<String>,
}

impl UploadResponse {
    pub fn uploaded(links: Vec<String>) -> Self {
        Self {
            success: true,
            message: "uploaded",
            links,
        }
    }
}
