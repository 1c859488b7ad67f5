//! Fast-start remux with ffmpeg.
//!
//! Streams are copied verbatim; only the container is rewritten so the
//! `moov` index sits ahead of the media data.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempPath;
use tokio::process::Command;

use super::tool::{run_tool, stderr_tail, ToolError};

const OUTPUT_SUFFIX: &str = ".processing";

/// Errors from remuxing a staged file
#[derive(Debug, thiserror::Error)]
pub enum RemuxError {
    #[error("ffmpeg remux failed: {message}")]
    Failed {
        message: String,
        stderr: Option<String>,
        exit_code: Option<i32>,
    },

    #[error("remux produced no output at {}", .0.display())]
    EmptyOutput(PathBuf),
}

impl From<ToolError> for RemuxError {
    fn from(err: ToolError) -> Self {
        RemuxError::Failed {
            message: err.to_string(),
            stderr: None,
            exit_code: None,
        }
    }
}

/// The remuxed copy of a staged file. Deleted on drop.
#[derive(Debug)]
pub struct RemuxedFile {
    path: TempPath,
    size: u64,
}

impl RemuxedFile {
    /// Take ownership of an existing file at `path`.
    pub fn new(path: TempPath, size: u64) -> Self {
        Self { path, size }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> u64 {
        self.size
    }
}

/// Produces a playback-optimized copy of a local media file.
#[async_trait]
pub trait Remuxer: Send + Sync {
    /// Write the optimized copy next to `input`, leaving `input` untouched.
    async fn remux(&self, input: &Path) -> Result<RemuxedFile, RemuxError>;
}

/// Output path for a remux of `input`: the same path with `.processing` appended.
pub fn remux_output_path(input: &Path) -> PathBuf {
    let mut name = OsString::from(input.as_os_str());
    name.push(OUTPUT_SUFFIX);
    PathBuf::from(name)
}

/// Stat a finished remux. Missing or zero-length output is `EmptyOutput`.
pub async fn verify_output(output: TempPath) -> Result<RemuxedFile, RemuxError> {
    match tokio::fs::metadata(&output).await {
        Ok(meta) if meta.len() > 0 => {
            let size = meta.len();
            Ok(RemuxedFile::new(output, size))
        }
        _ => Err(RemuxError::EmptyOutput(output.to_path_buf())),
    }
}

/// [`Remuxer`] backed by the ffmpeg binary.
#[derive(Debug, Clone)]
pub struct FfmpegRemuxer {
    ffmpeg_path: String,
    timeout: Option<Duration>,
}

impl FfmpegRemuxer {
    pub fn new(ffmpeg_path: impl Into<String>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl Remuxer for FfmpegRemuxer {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffmpeg",
        process.executable.path = %self.ffmpeg_path,
        ffmpeg.operation = "faststart"
    ))]
    async fn remux(&self, input: &Path) -> Result<RemuxedFile, RemuxError> {
        let start = std::time::Instant::now();

        // Guard first, so partial output is removed even if ffmpeg is killed mid-write.
        let output = TempPath::from_path(remux_output_path(input));

        let mut command = Command::new(&self.ffmpeg_path);
        command
            .args(["-y", "-v", "error", "-i"])
            .arg(input)
            .args(["-c", "copy", "-movflags", "faststart", "-f", "mp4"])
            .arg(&*output);

        let result = run_tool("ffmpeg", command, self.timeout).await?;

        if !result.status.success() {
            return Err(RemuxError::Failed {
                message: format!("ffmpeg exited with {}", result.status),
                stderr: stderr_tail(&result.stderr),
                exit_code: result.status.code(),
            });
        }

        let remuxed = verify_output(output).await?;

        tracing::info!(
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            size_bytes = remuxed.size(),
            "Fast-start remux completed"
        );

        Ok(remuxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remux_output_path() {
        assert_eq!(
            remux_output_path(Path::new("/tmp/vidstage-upload-abc.mp4")),
            PathBuf::from("/tmp/vidstage-upload-abc.mp4.processing")
        );
    }

    #[tokio::test]
    async fn test_verify_output_rejects_missing_and_empty() {
        let dir = tempfile::tempdir().unwrap();

        let missing = TempPath::from_path(dir.path().join("missing.processing"));
        assert!(matches!(
            verify_output(missing).await,
            Err(RemuxError::EmptyOutput(_))
        ));

        let empty_path = dir.path().join("empty.processing");
        std::fs::write(&empty_path, b"").unwrap();
        assert!(matches!(
            verify_output(TempPath::from_path(&empty_path)).await,
            Err(RemuxError::EmptyOutput(_))
        ));
        assert!(!empty_path.exists());
    }

    #[cfg(unix)]
    mod ffmpeg_binary {
        use super::*;
        use crate::video::test_support::{write_script, COPYING_FFMPEG};

        fn input(dir: &Path) -> PathBuf {
            let path = dir.join("vidstage-upload-test.mp4");
            std::fs::write(&path, b"ftypisom fake mp4 payload").unwrap();
            path
        }

        #[tokio::test]
        async fn test_remux_writes_processing_copy() {
            let dir = tempfile::tempdir().unwrap();
            let ffmpeg = write_script(dir.path(), "ffmpeg", COPYING_FFMPEG);
            let input = input(dir.path());

            let remuxer = FfmpegRemuxer::new(ffmpeg.to_string_lossy());
            let remuxed = remuxer.remux(&input).await.unwrap();

            assert_eq!(remuxed.path(), remux_output_path(&input));
            assert_eq!(
                std::fs::read(remuxed.path()).unwrap(),
                std::fs::read(&input).unwrap()
            );
            assert_eq!(remuxed.size(), std::fs::metadata(&input).unwrap().len());

            let out = remuxed.path().to_path_buf();
            drop(remuxed);
            assert!(!out.exists());
            assert!(input.exists());
        }

        #[tokio::test]
        async fn test_remux_passes_faststart_arguments() {
            let dir = tempfile::tempdir().unwrap();
            let ffmpeg = write_script(
                dir.path(),
                "ffmpeg",
                r#"[ "$1 $2 $3 $4" = "-y -v error -i" ] || exit 3
[ "$6 $7 $8 $9" = "-c copy -movflags faststart" ] || exit 4
shift 9
[ "$1 $2" = "-f mp4" ] || exit 5
printf 'remuxed' > "$3""#,
            );
            let input = input(dir.path());

            let remuxer = FfmpegRemuxer::new(ffmpeg.to_string_lossy());
            let remuxed = remuxer.remux(&input).await.unwrap();
            assert_eq!(std::fs::read(remuxed.path()).unwrap(), b"remuxed");
        }

        #[tokio::test]
        async fn test_zero_byte_output_is_empty_output() {
            let dir = tempfile::tempdir().unwrap();
            let ffmpeg = write_script(
                dir.path(),
                "ffmpeg",
                "for arg; do :; done\n: > \"$arg\"",
            );
            let input = input(dir.path());

            let remuxer = FfmpegRemuxer::new(ffmpeg.to_string_lossy());
            let err = remuxer.remux(&input).await.unwrap_err();

            assert!(matches!(err, RemuxError::EmptyOutput(_)));
            assert!(!remux_output_path(&input).exists());
            assert!(input.exists());
        }

        #[tokio::test]
        async fn test_silent_exit_without_output_is_empty_output() {
            let dir = tempfile::tempdir().unwrap();
            let ffmpeg = write_script(dir.path(), "ffmpeg", "exit 0");
            let input = input(dir.path());

            let remuxer = FfmpegRemuxer::new(ffmpeg.to_string_lossy());
            assert!(matches!(
                remuxer.remux(&input).await,
                Err(RemuxError::EmptyOutput(_))
            ));
        }

        #[tokio::test]
        async fn test_non_zero_exit_cleans_partial_output() {
            let dir = tempfile::tempdir().unwrap();
            let ffmpeg = write_script(
                dir.path(),
                "ffmpeg",
                "for arg; do :; done\nprintf 'partial' > \"$arg\"\necho 'moov atom not found' >&2\nexit 1",
            );
            let input = input(dir.path());

            let remuxer = FfmpegRemuxer::new(ffmpeg.to_string_lossy());
            match remuxer.remux(&input).await {
                Err(RemuxError::Failed {
                    stderr, exit_code, ..
                }) => {
                    assert_eq!(stderr.as_deref(), Some("moov atom not found"));
                    assert_eq!(exit_code, Some(1));
                }
                other => panic!("expected remux failure, got {:?}", other),
            }
            assert!(!remux_output_path(&input).exists());
        }
    }
}
