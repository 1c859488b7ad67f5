#![cfg(unix)]

mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use bytes::Bytes;
use uuid::Uuid;
use vidstage_core::Video;
use vidstage_storage::Storage;

use helpers::auth::bearer;
use helpers::fixtures::{mp4_bytes, video_owned_by};
use helpers::{setup_test_app, setup_test_app_with, Probe, TestOptions, MEDIA_BASE_URL};

fn upload_path(video_id: impl std::fmt::Display) -> String {
    format!("/api/videos/{}/upload", video_id)
}

fn video_form(data: Vec<u8>, mime_type: &str) -> MultipartForm {
    let part = Part::bytes(Bytes::from(data))
        .file_name("clip.mp4")
        .mime_type(mime_type);
    MultipartForm::new().add_part("video", part)
}

#[tokio::test]
async fn test_health() {
    let app = setup_test_app().await;

    let response = app.client().get("/health").await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "alive");
}

#[tokio::test]
async fn test_upload_landscape_video() {
    let app = setup_test_app().await;
    let user_id = Uuid::new_v4();
    let video = video_owned_by(user_id);
    app.videos.insert(video.clone());

    let response = app
        .client()
        .post(&upload_path(video.id))
        .add_header("Authorization", bearer(user_id))
        .multipart(video_form(mp4_bytes(), "video/mp4"))
        .await;

    assert_eq!(response.status_code(), 200);
    let updated: Video = response.json();
    assert_eq!(updated.id, video.id);
    assert_eq!(updated.title, video.title);

    let url = updated.video_url.expect("video_url should be set");
    let key = url
        .strip_prefix(&format!("{}/", MEDIA_BASE_URL))
        .expect("URL should start with the media base URL");
    assert!(key.starts_with("landscape/"));
    assert!(key.ends_with(".mp4"));

    assert_eq!(app.stored_files(), vec![key.to_string()]);
    assert_eq!(app.storage.download(key).await.unwrap(), mp4_bytes());
    assert_eq!(app.videos.get(video.id).unwrap().video_url, Some(url.clone()));
    assert_eq!(app.staged_files(), 0);
}

#[tokio::test]
async fn test_upload_portrait_video() {
    let app = setup_test_app_with(TestOptions {
        probe: Probe::Reports(1080, 1920),
        ..Default::default()
    })
    .await;
    let user_id = Uuid::new_v4();
    let video = video_owned_by(user_id);
    app.videos.insert(video.clone());

    let response = app
        .client()
        .post(&upload_path(video.id))
        .add_header("Authorization", bearer(user_id))
        .multipart(video_form(mp4_bytes(), "video/mp4"))
        .await;

    assert_eq!(response.status_code(), 200);
    let files = app.stored_files();
    assert_eq!(files.len(), 1);
    assert!(files[0].starts_with("portrait/"));
}

#[tokio::test]
async fn test_repeated_uploads_replace_url() {
    let app = setup_test_app().await;
    let user_id = Uuid::new_v4();
    let video = video_owned_by(user_id);
    app.videos.insert(video.clone());

    let mut urls = Vec::new();
    for _ in 0..2 {
        let response = app
            .client()
            .post(&upload_path(video.id))
            .add_header("Authorization", bearer(user_id))
            .multipart(video_form(mp4_bytes(), "video/mp4"))
            .await;
        assert_eq!(response.status_code(), 200);
        urls.push(response.json::<Video>().video_url.unwrap());
    }

    assert_ne!(urls[0], urls[1]);
    assert_eq!(app.stored_files().len(), 2);
    assert_eq!(app.videos.get(video.id).unwrap().video_url.as_ref(), Some(&urls[1]));
}

#[tokio::test]
async fn test_invalid_video_id() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&upload_path("not-a-uuid"))
        .multipart(video_form(mp4_bytes(), "video/mp4"))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_upload_unauthorized() {
    let app = setup_test_app().await;
    let video = video_owned_by(Uuid::new_v4());
    app.videos.insert(video.clone());

    let missing = app
        .client()
        .post(&upload_path(video.id))
        .multipart(video_form(mp4_bytes(), "video/mp4"))
        .await;
    assert_eq!(missing.status_code(), 401);

    let garbage = app
        .client()
        .post(&upload_path(video.id))
        .add_header("Authorization", "Bearer not.a.jwt")
        .multipart(video_form(mp4_bytes(), "video/mp4"))
        .await;
    assert_eq!(garbage.status_code(), 401);

    assert!(app.stored_files().is_empty());
}

#[tokio::test]
async fn test_upload_video_not_found() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&upload_path(Uuid::new_v4()))
        .add_header("Authorization", bearer(Uuid::new_v4()))
        .multipart(video_form(mp4_bytes(), "video/mp4"))
        .await;

    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_upload_to_someone_elses_video() {
    let app = setup_test_app().await;
    let video = video_owned_by(Uuid::new_v4());
    app.videos.insert(video.clone());

    let response = app
        .client()
        .post(&upload_path(video.id))
        .add_header("Authorization", bearer(Uuid::new_v4()))
        .multipart(video_form(mp4_bytes(), "video/mp4"))
        .await;

    assert_eq!(response.status_code(), 403);
    assert!(app.stored_files().is_empty());
    assert_eq!(app.videos.get(video.id).unwrap().video_url, None);
}

#[tokio::test]
async fn test_upload_rejects_non_mp4() {
    let app = setup_test_app().await;
    let user_id = Uuid::new_v4();
    let video = video_owned_by(user_id);
    app.videos.insert(video.clone());

    let response = app
        .client()
        .post(&upload_path(video.id))
        .add_header("Authorization", bearer(user_id))
        .multipart(video_form(mp4_bytes(), "video/quicktime"))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "UNSUPPORTED_MEDIA_TYPE");
    assert!(app.stored_files().is_empty());
    assert_eq!(app.staged_files(), 0);
}

#[tokio::test]
async fn test_upload_missing_video_field() {
    let app = setup_test_app().await;
    let user_id = Uuid::new_v4();
    let video = video_owned_by(user_id);
    app.videos.insert(video.clone());

    let form = MultipartForm::new().add_text("title", "no file here");
    let response = app
        .client()
        .post(&upload_path(video.id))
        .add_header("Authorization", bearer(user_id))
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_probe_failure_is_server_error() {
    let app = setup_test_app_with(TestOptions {
        probe: Probe::Fails,
        ..Default::default()
    })
    .await;
    let user_id = Uuid::new_v4();
    let video = video_owned_by(user_id);
    app.videos.insert(video.clone());

    let response = app
        .client()
        .post(&upload_path(video.id))
        .add_header("Authorization", bearer(user_id))
        .multipart(video_form(b"definitely not a video".to_vec(), "video/mp4"))
        .await;

    assert_eq!(response.status_code(), 500);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "MEDIA_PROCESSING_ERROR");
    assert!(app.stored_files().is_empty());
    assert_eq!(app.staged_files(), 0);
    assert_eq!(app.videos.get(video.id).unwrap().video_url, None);
}

#[tokio::test]
async fn test_record_update_failure_deletes_upload() {
    let app = setup_test_app().await;
    let user_id = Uuid::new_v4();
    let video = video_owned_by(user_id);
    app.videos.insert(video.clone());
    app.videos.fail_updates();

    let response = app
        .client()
        .post(&upload_path(video.id))
        .add_header("Authorization", bearer(user_id))
        .multipart(video_form(mp4_bytes(), "video/mp4"))
        .await;

    assert_eq!(response.status_code(), 500);
    assert!(app.stored_files().is_empty());
    assert_eq!(app.staged_files(), 0);
}

#[tokio::test]
async fn test_upload_too_large() {
    let app = setup_test_app_with(TestOptions {
        max_video_size_bytes: 1024,
        ..Default::default()
    })
    .await;
    let user_id = Uuid::new_v4();
    let video = video_owned_by(user_id);
    app.videos.insert(video.clone());

    let response = app
        .client()
        .post(&upload_path(video.id))
        .add_header("Authorization", bearer(user_id))
        .multipart(video_form(mp4_bytes(), "video/mp4"))
        .await;

    assert_eq!(response.status_code(), 413);
    assert!(app.stored_files().is_empty());
    assert_eq!(app.staged_files(), 0);
}
