//! Test helpers: build an app around in-memory records, local storage and
//! fake media tools.
//!
//! Run from workspace root: `cargo test -p vidstage-api`.

#![allow(dead_code)]

pub mod auth;
pub mod fixtures;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum_test::TestServer;
use tempfile::TempDir;
use vidstage_api::setup::routes;
use vidstage_api::state::AppState;
use vidstage_core::{BaseConfig, Config, IngestConfig, StorageBackend};
use vidstage_processing::UploadPipeline;
use vidstage_storage::{LocalStorage, Storage};

use fixtures::InMemoryVideoRepository;

pub const MEDIA_BASE_URL: &str = "http://localhost:8091/media";

/// Which ffprobe stand-in the app runs.
pub enum Probe {
    Reports(u32, u32),
    Fails,
}

pub struct TestOptions {
    pub probe: Probe,
    pub max_video_size_bytes: usize,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            probe: Probe::Reports(1920, 1080),
            max_video_size_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Test application: server plus the resources it owns.
pub struct TestApp {
    pub server: TestServer,
    pub videos: Arc<InMemoryVideoRepository>,
    pub storage: Arc<dyn Storage>,
    pub storage_dir: TempDir,
    pub staging_dir: TempDir,
    pub _tools_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Every file currently stored, relative to the storage root.
    pub fn stored_files(&self) -> Vec<String> {
        let mut files = Vec::new();
        collect_files(self.storage_dir.path(), self.storage_dir.path(), &mut files);
        files.sort();
        files
    }

    pub fn staged_files(&self) -> usize {
        std::fs::read_dir(self.staging_dir.path()).unwrap().count()
    }
}

fn collect_files(root: &Path, dir: &Path, out: &mut Vec<String>) {
    for entry in std::fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect_files(root, &path, out);
        } else {
            out.push(
                path.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/"),
            );
        }
    }
}

pub fn create_test_config(
    storage_dir: &Path,
    staging_dir: &Path,
    ffprobe: PathBuf,
    ffmpeg: PathBuf,
    max_video_size_bytes: usize,
) -> Config {
    Config(Box::new(IngestConfig {
        base: BaseConfig {
            server_port: 0,
            cors_origins: vec!["*".to_string()],
            db_max_connections: 1,
            db_timeout_seconds: 5,
            jwt_secret: auth::TEST_JWT_SECRET.to_string(),
            environment: "test".to_string(),
        },
        database_url: "postgres://unused@localhost/vidstage".to_string(),
        storage_backend: Some(StorageBackend::Local),
        s3_bucket: None,
        s3_region: None,
        s3_endpoint: None,
        aws_region: None,
        local_storage_path: Some(storage_dir.to_string_lossy().into_owned()),
        local_storage_base_url: Some(MEDIA_BASE_URL.to_string()),
        public_base_url: None,
        max_video_size_bytes,
        ffmpeg_path: ffmpeg.to_string_lossy().into_owned(),
        ffprobe_path: ffprobe.to_string_lossy().into_owned(),
        media_tool_timeout_secs: 10,
        staging_dir: Some(staging_dir.to_path_buf()),
        delete_orphaned_uploads: true,
    }))
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(TestOptions::default()).await
}

pub async fn setup_test_app_with(options: TestOptions) -> TestApp {
    let tools_dir = tempfile::tempdir().expect("Failed to create tools directory");
    let storage_dir = tempfile::tempdir().expect("Failed to create storage directory");
    let staging_dir = tempfile::tempdir().expect("Failed to create staging directory");

    let ffprobe = match options.probe {
        Probe::Reports(width, height) => fixtures::fake_ffprobe(tools_dir.path(), width, height),
        Probe::Fails => fixtures::failing_ffprobe(tools_dir.path()),
    };
    let ffmpeg = fixtures::fake_ffmpeg(tools_dir.path());

    let config = create_test_config(
        storage_dir.path(),
        staging_dir.path(),
        ffprobe,
        ffmpeg,
        options.max_video_size_bytes,
    );
    config.validate().expect("Test config should be valid");

    let storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(storage_dir.path(), MEDIA_BASE_URL.to_string())
            .await
            .expect("Failed to create local storage"),
    );

    let videos = Arc::new(InMemoryVideoRepository::default());
    let pipeline = Arc::new(UploadPipeline::from_config(&config, storage.clone()));
    let state = Arc::new(AppState::new(config.clone(), videos.clone(), pipeline));

    let app = routes::setup_routes(&config, state).expect("Failed to build routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        videos,
        storage,
        storage_dir,
        staging_dir,
        _tools_dir: tools_dir,
    }
}
