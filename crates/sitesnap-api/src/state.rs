//! Application state.
//!
//! Built once at startup and injected into every handler; no module-level
//! clients.

use std::sync::Arc;

use sitesnap_core::Config;
use sitesnap_drive::{MetadataRecorder, PhotoStore};

use crate::spool::Spool;

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn PhotoStore>,
    /// Present only when a spreadsheet id is configured.
    pub recorder: Option<Arc<dyn MetadataRecorder>>,
    pub spool: Spool,
}
