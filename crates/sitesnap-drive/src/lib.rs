//! Sitesnap Drive library
//!
//! Remote-storage seam for the upload pipeline. The `PhotoStore` trait is
//! what the API talks to; `GoogleDrive` is the production implementation
//! (Drive v3 REST via a service account). Folder identifiers are never
//! cached across requests - Drive is the source of truth.

pub mod auth;
pub mod drive;
pub mod factory;
pub mod folders;
pub mod sheets;
pub mod traits;

pub use drive::GoogleDrive;
pub use factory::create_store;
pub use folders::build_path;
pub use sheets::{MetadataRecorder, SheetRow, SheetsRecorder};
pub use traits::{PhotoStore, StoreError, StoreResult, UploadedFile};
