//! Local staging of uploaded bytes.
//!
//! Uploads arrive as a one-shot stream of unknown length. ffprobe and ffmpeg
//! need a seekable file, so the stream is copied to a temp file first. The
//! file is owned by a [`StagedFile`] and removed when it is dropped, whether
//! the invocation succeeds, fails or is cancelled.

use std::io::{self, SeekFrom};
use std::path::{Path, PathBuf};

use tempfile::TempPath;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncSeekExt, AsyncWriteExt};

const STAGED_FILE_PREFIX: &str = "vidstage-upload-";
const STAGED_FILE_SUFFIX: &str = ".mp4";

/// Creates staged files in a fixed directory.
#[derive(Debug, Clone)]
pub struct StagingArea {
    dir: PathBuf,
}

impl StagingArea {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Copy `content` to a new temp file and rewind it to byte 0.
    ///
    /// Any read or write error fails the whole operation and the half-written
    /// file is removed before the error is returned.
    pub async fn stage<R>(&self, content: &mut R) -> io::Result<StagedFile>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        let start = std::time::Instant::now();

        let named = tempfile::Builder::new()
            .prefix(STAGED_FILE_PREFIX)
            .suffix(STAGED_FILE_SUFFIX)
            .tempfile_in(&self.dir)?;
        let (std_file, path) = named.into_parts();
        let mut file = File::from_std(std_file);

        let size = tokio::io::copy(content, &mut file).await?;
        file.flush().await?;
        file.seek(SeekFrom::Start(0)).await?;

        tracing::debug!(
            path = %path.display(),
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Upload staged"
        );

        Ok(StagedFile { path, file, size })
    }
}

/// An exclusively owned temp copy of an upload. Deleted on drop.
#[derive(Debug)]
pub struct StagedFile {
    path: TempPath,
    file: File,
    size: u64,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Read handle positioned at the start of the staged bytes.
    pub fn file_mut(&mut self) -> &mut File {
        &mut self.file
    }
}
