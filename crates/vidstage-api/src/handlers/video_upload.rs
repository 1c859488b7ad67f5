use std::sync::Arc;

use axum::{
    extract::{multipart::Field, Multipart, Path, State},
    http::HeaderMap,
    Json,
};
use futures::TryStreamExt;
use tokio_util::io::StreamReader;
use uuid::Uuid;
use vidstage_core::{AppError, Video};
use vidstage_processing::{UploadRequest, UploadResult};

use crate::constants::VIDEO_FIELD;
use crate::error::HttpAppError;
use crate::state::AppState;

/// `POST /api/videos/{video_id}/upload`
///
/// Streams the `video` multipart field through the ingestion pipeline and
/// points the video record at the stored asset.
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<Video>, HttpAppError> {
    let video_id = Uuid::parse_str(&video_id)
        .map_err(|_| AppError::InvalidInput(format!("Invalid video id: {}", video_id)))?;

    let user = state.jwt.authenticate(&headers)?;

    let mut video = state
        .videos
        .get_video(video_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Video {} not found", video_id)))?;

    if !video.is_owned_by(user.user_id) {
        tracing::debug!(
            video_id = %video_id,
            user_id = %user.user_id,
            "Upload rejected: caller does not own video"
        );
        return Err(AppError::Forbidden("You do not own this video".to_string()).into());
    }

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(VIDEO_FIELD) {
            continue;
        }

        let uploaded = run_pipeline(&state, video_id, field).await?;

        video.set_video_url(uploaded.public_url.clone());
        return match state.videos.update_video(&video).await {
            Ok(updated) => Ok(Json(updated)),
            Err(e) => {
                if state.config.delete_orphaned_uploads() {
                    delete_orphaned_upload(&state, video_id, &uploaded).await;
                }
                Err(e.into())
            }
        };
    }

    Err(AppError::InvalidInput(format!("Missing '{}' field in multipart body", VIDEO_FIELD)).into())
}

async fn run_pipeline(
    state: &AppState,
    video_id: Uuid,
    field: Field<'_>,
) -> Result<UploadResult, HttpAppError> {
    let media_type = field.content_type().unwrap_or_default().to_string();
    let body = StreamReader::new(field.map_err(std::io::Error::other));

    let request = UploadRequest::new(video_id, media_type, Box::pin(body));
    Ok(state.pipeline.process(request).await?)
}

/// Best-effort removal of an object whose record update failed.
async fn delete_orphaned_upload(state: &AppState, video_id: Uuid, uploaded: &UploadResult) {
    let storage_key = uploaded.key.storage_key();
    match state.storage().delete(&storage_key).await {
        Ok(()) => tracing::warn!(
            video_id = %video_id,
            storage_key = %storage_key,
            "Deleted uploaded object after record update failed"
        ),
        Err(e) => tracing::error!(
            video_id = %video_id,
            storage_key = %storage_key,
            error = %e,
            "Failed to delete orphaned upload"
        ),
    }
}
