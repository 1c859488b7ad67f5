//! Video record store seam
//!
//! The HTTP layer reads and updates video records through this trait so the
//! Postgres implementation in vidstage-db can be swapped for an in-memory one.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::Video;

#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// Fetch a video by id. `Ok(None)` when no such record exists.
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError>;

    /// Persist the mutable fields of a video and return the stored row.
    async fn update_video(&self, video: &Video) -> Result<Video, AppError>;
}
