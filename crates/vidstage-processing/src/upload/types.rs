//! Types for the upload pipeline.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::pin::Pin;

use tokio::io::AsyncRead;
use uuid::Uuid;

use super::keys::AssetKey;

/// Sequential upload body of not-yet-known length. May borrow from the
/// request it is read out of.
pub type ByteStream<'a> = Pin<Box<dyn AsyncRead + Send + Unpin + 'a>>;

/// One upload handed to the pipeline.
pub struct UploadRequest<'a> {
    /// Declared media type, e.g. `video/mp4`.
    pub media_type: String,
    pub content: ByteStream<'a>,
    /// Video record the upload belongs to. Used for log correlation only.
    pub video_id: Uuid,
}

impl<'a> UploadRequest<'a> {
    pub fn new(video_id: Uuid, media_type: impl Into<String>, content: ByteStream<'a>) -> Self {
        Self {
            media_type: media_type.into(),
            content,
            video_id,
        }
    }
}

/// Outcome of a successful pipeline run. The caller persists `public_url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub key: AssetKey,
    pub public_url: String,
}

/// Per-invocation pipeline progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Received,
    Staged,
    Classified,
    Remuxed,
    Uploaded,
    Completed,
}

impl Display for PipelineState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let name = match self {
            PipelineState::Received => "received",
            PipelineState::Staged => "staged",
            PipelineState::Classified => "classified",
            PipelineState::Remuxed => "remuxed",
            PipelineState::Uploaded => "uploaded",
            PipelineState::Completed => "completed",
        };
        f.write_str(name)
    }
}
