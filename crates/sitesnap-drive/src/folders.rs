//! Destination path construction.
//!
//! Three strictly sequential resolve-or-create calls, root -> date -> work
//! type, each parented on the previous result. Earlier folders are not
//! rolled back when a later step fails.

use crate::traits::{PhotoStore, StoreResult};

/// Resolve the leaf (work-type) folder id for one upload request.
pub async fn build_path(
    store: &dyn PhotoStore,
    root_name: &str,
    date: &str,
    work_type: &str,
) -> StoreResult<String> {
    let root_id = store.resolve_or_create_folder(root_name, None).await?;
    let date_id = store.resolve_or_create_folder(date, Some(&root_id)).await?;
    store.resolve_or_create_folder(work_type, Some(&date_id)).await
}
