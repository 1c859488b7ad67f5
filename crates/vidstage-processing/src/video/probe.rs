//! ffprobe stream inspection.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;

use super::tool::{run_tool, stderr_tail, ToolError};

/// Errors from probing a staged file
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("ffprobe failed: {message}")]
    Failed {
        message: String,
        stderr: Option<String>,
    },

    #[error("no video streams found")]
    NoStreams,
}

impl From<ToolError> for ProbeError {
    fn from(err: ToolError) -> Self {
        ProbeError::Failed {
            message: err.to_string(),
            stderr: None,
        }
    }
}

/// Pixel dimensions of the first video stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoDimensions {
    pub width: u32,
    pub height: u32,
}

/// Reads stream dimensions from a local media file.
#[async_trait]
pub trait MediaProbe: Send + Sync {
    async fn probe(&self, path: &Path) -> Result<VideoDimensions, ProbeError>;
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    streams: Option<Vec<FfprobeStream>>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

/// Parse `ffprobe -print_format json -show_streams` output.
///
/// The first stream tagged `codec_type: "video"` wins. Streams without a
/// `codec_type` count as video when they carry dimensions.
pub fn parse_probe_output(stdout: &[u8]) -> Result<VideoDimensions, ProbeError> {
    if stdout.iter().all(u8::is_ascii_whitespace) {
        return Err(ProbeError::Failed {
            message: "ffprobe produced no output".to_string(),
            stderr: None,
        });
    }

    let output: FfprobeOutput =
        serde_json::from_slice(stdout).map_err(|e| ProbeError::Failed {
            message: format!("Failed to parse ffprobe output: {}", e),
            stderr: None,
        })?;

    let streams = output.streams.unwrap_or_default();
    let stream = streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .or_else(|| {
            streams
                .iter()
                .find(|s| s.codec_type.is_none() && s.width.is_some() && s.height.is_some())
        })
        .ok_or(ProbeError::NoStreams)?;

    match (stream.width, stream.height) {
        (Some(width), Some(height)) if width > 0 && height > 0 => {
            Ok(VideoDimensions { width, height })
        }
        (width, height) => Err(ProbeError::Failed {
            message: format!(
                "video stream has no usable dimensions (width: {:?}, height: {:?})",
                width, height
            ),
            stderr: None,
        }),
    }
}

/// [`MediaProbe`] backed by the ffprobe binary.
#[derive(Debug, Clone)]
pub struct FfprobeProbe {
    ffprobe_path: String,
    timeout: Option<Duration>,
}

impl FfprobeProbe {
    pub fn new(ffprobe_path: impl Into<String>) -> Self {
        Self {
            ffprobe_path: ffprobe_path.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl MediaProbe for FfprobeProbe {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffprobe",
        process.executable.path = %self.ffprobe_path,
        ffmpeg.operation = "probe"
    ))]
    async fn probe(&self, path: &Path) -> Result<VideoDimensions, ProbeError> {
        let start = std::time::Instant::now();

        let mut command = Command::new(&self.ffprobe_path);
        command
            .args(["-v", "error", "-print_format", "json", "-show_streams"])
            .arg(path);

        let output = run_tool("ffprobe", command, self.timeout).await?;

        if !output.status.success() {
            return Err(ProbeError::Failed {
                message: format!("ffprobe exited with {}", output.status),
                stderr: stderr_tail(&output.stderr),
            });
        }

        let dimensions = parse_probe_output(&output.stdout)?;

        tracing::info!(
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            width = dimensions.width,
            height = dimensions.height,
            "Video probe completed"
        );

        Ok(dimensions)
    }
}
