//! Shared application state

use std::sync::Arc;

use vidstage_core::{Config, VideoRepository};
use vidstage_processing::UploadPipeline;
use vidstage_storage::Storage;

use crate::auth::JwtValidator;

/// Immutable collaborators shared by all requests.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub videos: Arc<dyn VideoRepository>,
    pub pipeline: Arc<UploadPipeline>,
    pub jwt: JwtValidator,
}

impl AppState {
    pub fn new(
        config: Config,
        videos: Arc<dyn VideoRepository>,
        pipeline: Arc<UploadPipeline>,
    ) -> Self {
        let jwt = JwtValidator::new(config.jwt_secret());
        Self {
            config,
            videos,
            pipeline,
            jwt,
        }
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        self.pipeline.storage()
    }
}
