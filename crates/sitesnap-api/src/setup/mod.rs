//! Application initialization: state construction, routes, server.

pub mod routes;
pub mod server;

use std::sync::Arc;

use sitesnap_core::Config;
use sitesnap_drive::create_store;

use crate::spool::Spool;
use crate::state::AppState;

/// Build the application state: credentials are parsed and the Drive
/// client is constructed exactly once, then injected everywhere.
pub async fn build_state(config: Config) -> Result<Arc<AppState>, anyhow::Error> {
    let (store, recorder) = create_store(&config)?;
    let spool = Spool::new(&config.upload_dir).await?;

    Ok(Arc::new(AppState {
        config,
        store,
        recorder,
        spool,
    }))
}
