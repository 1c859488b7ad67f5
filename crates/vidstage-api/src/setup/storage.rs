//! Storage backend setup

use std::sync::Arc;

use anyhow::{Context, Result};
use vidstage_core::Config;
use vidstage_storage::{create_storage, Storage};

pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    let storage = create_storage(config)
        .await
        .context("Failed to initialize storage backend")?;

    tracing::info!(
        backend = %storage.backend_type(),
        staging_dir = %config.staging_dir().display(),
        "Storage initialized"
    );

    Ok(storage)
}
