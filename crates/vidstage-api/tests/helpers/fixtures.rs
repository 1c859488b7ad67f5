//! In-memory video records and fake media tools.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;
use vidstage_core::{AppError, Video, VideoRepository};

#[derive(Default)]
pub struct InMemoryVideoRepository {
    videos: Mutex<HashMap<Uuid, Video>>,
    fail_updates: AtomicBool,
}

impl InMemoryVideoRepository {
    pub fn insert(&self, video: Video) {
        self.videos.lock().unwrap().insert(video.id, video);
    }

    pub fn get(&self, id: Uuid) -> Option<Video> {
        self.videos.lock().unwrap().get(&id).cloned()
    }

    pub fn fail_updates(&self) {
        self.fail_updates.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl VideoRepository for InMemoryVideoRepository {
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        Ok(self.get(id))
    }

    async fn update_video(&self, video: &Video) -> Result<Video, AppError> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(AppError::Internal("database unavailable".to_string()));
        }
        let mut videos = self.videos.lock().unwrap();
        match videos.get_mut(&video.id) {
            Some(stored) => {
                *stored = video.clone();
                Ok(stored.clone())
            }
            None => Err(AppError::NotFound(format!("Video {} not found", video.id))),
        }
    }
}

pub fn video_owned_by(user_id: Uuid) -> Video {
    let now = Utc::now();
    Video {
        id: Uuid::new_v4(),
        user_id,
        title: "Skate session".to_string(),
        description: "Filmed at the bowl".to_string(),
        video_url: None,
        created_at: now,
        updated_at: now,
    }
}

/// A few bytes that pass for an mp4 with the fake tools.
pub fn mp4_bytes() -> Vec<u8> {
    let mut data = b"\x00\x00\x00\x18ftypmp42".to_vec();
    data.extend(std::iter::repeat(0xAB).take(4096));
    data
}

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// ffprobe stand-in reporting one video stream of the given size.
pub fn fake_ffprobe(dir: &Path, width: u32, height: u32) -> PathBuf {
    write_script(
        dir,
        "ffprobe",
        &format!(
            r#"echo '{{"streams":[{{"index":0,"codec_type":"video","width":{},"height":{}}}]}}'"#,
            width, height
        ),
    )
}

/// ffprobe stand-in that fails like it does on a non-media file.
pub fn failing_ffprobe(dir: &Path) -> PathBuf {
    write_script(
        dir,
        "ffprobe",
        r#"echo "Invalid data found when processing input" >&2
exit 1"#,
    )
}

/// ffmpeg stand-in copying the `-i` input to the output path (last argument).
pub fn fake_ffmpeg(dir: &Path) -> PathBuf {
    write_script(
        dir,
        "ffmpeg",
        r#"in=""
prev=""
for arg in "$@"; do
  if [ "$prev" = "-i" ]; then in="$arg"; fi
  prev="$arg"
done
cp "$in" "$prev""#,
    )
}
