//! Storage setup and initialization

use anyhow::{Context, Result};
use pixform_core::ServiceConfig;
use pixform_storage::{LocalStorage, Storage};
use std::sync::Arc;

/// Open the upload directory, creating it when absent.
pub async fn setup_storage(config: &ServiceConfig) -> Result<Arc<dyn Storage>> {
    tracing::info!("Initializing upload storage...");
    let storage = LocalStorage::new(&config.upload_dir)
        .await
        .context("Failed to prepare upload directory")?;
    tracing::info!(
        path = %storage.base_path().display(),
        "Upload storage initialized successfully"
    );

    Ok(Arc::new(storage))
}
