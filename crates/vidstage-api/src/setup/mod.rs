//! Application setup and initialization

pub mod routes;
pub mod server;
pub mod storage;

use std::sync::Arc;

use anyhow::{Context, Result};
use vidstage_core::Config;
use vidstage_db::{setup_database, PgVideoRepository};
use vidstage_processing::UploadPipeline;

use crate::state::AppState;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry()
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    config
        .validate()
        .context("Configuration validation failed")?;
    tracing::info!("Configuration loaded and validated successfully");

    let pool = setup_database(&config).await?;
    let storage = storage::setup_storage(&config).await?;

    let pipeline = Arc::new(UploadPipeline::from_config(&config, storage));
    let videos = Arc::new(PgVideoRepository::new(pool));
    let state = Arc::new(AppState::new(config.clone(), videos, pipeline));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
