//! Upload pipeline: validate → stage → classify → remux → key → store.
//!
//! Each call to [`UploadPipeline::process`] is independent. Temp files are
//! owned by guards living on the invocation's stack, so they are released on
//! success, on every error path and when the future is dropped.

use std::sync::Arc;

use vidstage_core::Config;
use vidstage_storage::Storage;

use super::error::PipelineError;
use super::keys::KeyGenerator;
use super::types::{PipelineState, UploadRequest, UploadResult};
use crate::staging::StagingArea;
use crate::validator::MediaValidator;
use crate::video::{AspectClassifier, FfmpegRemuxer, FfprobeProbe, MediaProbe, Remuxer};

pub struct UploadPipeline {
    validator: MediaValidator,
    staging: StagingArea,
    classifier: AspectClassifier,
    remuxer: Arc<dyn Remuxer>,
    keys: KeyGenerator,
    storage: Arc<dyn Storage>,
}

impl UploadPipeline {
    pub fn new(
        staging: StagingArea,
        probe: Arc<dyn MediaProbe>,
        remuxer: Arc<dyn Remuxer>,
        storage: Arc<dyn Storage>,
    ) -> Self {
        Self {
            validator: MediaValidator::default(),
            staging,
            classifier: AspectClassifier::new(probe),
            remuxer,
            keys: KeyGenerator::new(),
            storage,
        }
    }

    /// Pipeline wired to the configured ffprobe/ffmpeg binaries and staging dir.
    pub fn from_config(config: &Config, storage: Arc<dyn Storage>) -> Self {
        let timeout = config.media_tool_timeout();
        Self::new(
            StagingArea::new(config.staging_dir()),
            Arc::new(FfprobeProbe::new(config.ffprobe_path()).with_timeout(timeout)),
            Arc::new(FfmpegRemuxer::new(config.ffmpeg_path()).with_timeout(timeout)),
            storage,
        )
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    #[tracing::instrument(skip(self, request), fields(
        video_id = %request.video_id,
        media_type = %request.media_type
    ))]
    pub async fn process(&self, request: UploadRequest<'_>) -> Result<UploadResult, PipelineError> {
        let start = std::time::Instant::now();
        let mut state = PipelineState::Received;

        let result = self.run(request, &mut state).await;

        match &result {
            Ok(uploaded) => {
                advance(&mut state, PipelineState::Completed);
                tracing::info!(
                    key = %uploaded.key,
                    public_url = %uploaded.public_url,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Video upload completed"
                );
            }
            Err(e) if e.is_client_error() => {
                tracing::debug!(error = %e, reason = e.kind(), "Video upload rejected");
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    reason = e.kind(),
                    failed_after = %state,
                    tool_stderr = e.tool_stderr(),
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Video upload failed"
                );
            }
        }

        result
    }

    async fn run(
        &self,
        request: UploadRequest<'_>,
        state: &mut PipelineState,
    ) -> Result<UploadResult, PipelineError> {
        let UploadRequest {
            media_type,
            mut content,
            video_id,
        } = request;

        let media_type = self.validator.validate_content_type(&media_type)?;

        let staged = self
            .staging
            .stage(&mut content)
            .await
            .map_err(PipelineError::Staging)?;
        drop(content);
        advance(state, PipelineState::Staged);

        let orientation = self.classifier.classify(staged.path()).await?;
        advance(state, PipelineState::Classified);

        let remuxed = self.remuxer.remux(staged.path()).await?;
        advance(state, PipelineState::Remuxed);

        let key = self.keys.generate_key(&media_type, orientation);
        let storage_key = key.storage_key();

        let file = tokio::fs::File::open(remuxed.path())
            .await
            .map_err(PipelineError::Staging)?;
        self.storage
            .put_stream(&storage_key, &media_type, Some(remuxed.size()), Box::pin(file))
            .await?;
        advance(state, PipelineState::Uploaded);

        let public_url = self.storage.public_url(&storage_key);

        tracing::debug!(
            %video_id,
            staged_bytes = staged.size(),
            remuxed_bytes = remuxed.size(),
            "Temporary files released"
        );

        Ok(UploadResult { key, public_url })
    }
}

fn advance(state: &mut PipelineState, next: PipelineState) {
    tracing::debug!(from = %state, to = %next, "Upload pipeline transition");
    *state = next;
}
