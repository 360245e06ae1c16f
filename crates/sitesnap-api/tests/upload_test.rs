//! Upload pipeline integration tests.
//!
//! Run with: `cargo test -p sitesnap-api --test upload_test`

mod helpers;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum_test::multipart::{MultipartForm, Part};
use base64::Engine;
use helpers::{setup_test_app, setup_test_app_with_recorder, FailingRecorder, FakeStore};

const JPEG_STUB: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46];

fn photo_part() -> Part {
    Part::bytes(JPEG_STUB.to_vec())
        .file_name("현장 사진.jpg")
        .mime_type("image/jpeg")
}

fn complete_form() -> MultipartForm {
    MultipartForm::new()
        .add_text("date", "2024-05-01")
        .add_text("workType", "타일")
        .add_text("address", "서울시 강남구")
        .add_text("uploader", "홍길동")
        .add_text("memo", "주방 벽")
        .add_part("photos", photo_part())
}

#[tokio::test]
async fn upload_single_file_succeeds() {
    let app = setup_test_app(FakeStore::default()).await;

    let response = app.server.post("/upload").multipart(complete_form()).await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], serde_json::json!(true));
    assert_eq!(body["message"], serde_json::json!("uploaded"));
    let links = body["links"].as_array().expect("links array");
    assert_eq!(links.len(), 1);
    assert!(links[0].as_str().unwrap().starts_with("https://"));

    // Path resolved root -> date -> work type, each parented on the
    // previous result.
    let calls = app.store.resolve_calls.lock().unwrap().clone();
    assert_eq!(
        calls,
        vec![
            ("공사사진".to_string(), None),
            ("2024-05-01".to_string(), Some("folder-1".to_string())),
            ("타일".to_string(), Some("folder-2".to_string())),
        ]
    );

    // Filename is sanitized and parented on the leaf folder.
    let uploads = app.store.uploads.lock().unwrap().clone();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].0, "folder-3");
    assert!(uploads[0].1.starts_with("홍길동_2024-05-01_타일_"));
    assert!(uploads[0].1.ends_with("_01.jpg"));

    assert_eq!(app.spooled_file_count(), 0);
}

#[tokio::test]
async fn upload_accepts_aliased_field_names() {
    let app = setup_test_app(FakeStore::default()).await;

    let form = MultipartForm::new()
        .add_text("workDate", "2024-05-02")
        .add_text("category", "전기")
        .add_text("location", "부산시 해운대구")
        .add_text("name", "김철수")
        .add_part("file", photo_part());
    let response = app.server.post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    let calls = app.store.resolve_calls.lock().unwrap().clone();
    assert_eq!(calls[1].0, "2024-05-02");
    assert_eq!(calls[2].0, "전기");
}

#[tokio::test]
async fn upload_missing_date_is_rejected_naming_the_field() {
    let app = setup_test_app(FakeStore::default()).await;

    let form = MultipartForm::new()
        .add_text("workType", "타일")
        .add_text("address", "서울시 강남구")
        .add_text("uploader", "홍길동")
        .add_part("photos", photo_part());
    let response = app.server.post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], serde_json::json!(false));
    assert!(body["error"].as_str().unwrap().contains("date"));

    // Rejected before any remote call; temp files already gone.
    assert!(app.store.resolve_calls.lock().unwrap().is_empty());
    assert_eq!(app.spooled_file_count(), 0);
}

#[tokio::test]
async fn upload_without_file_is_rejected() {
    let app = setup_test_app(FakeStore::default()).await;

    let form = MultipartForm::new()
        .add_text("date", "2024-05-01")
        .add_text("workType", "타일")
        .add_text("address", "서울시 강남구")
        .add_text("uploader", "홍길동");
    let response = app.server.post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], serde_json::json!(false));
    assert!(body["error"].as_str().unwrap().contains("no file"));
}

#[tokio::test]
async fn batch_failure_reports_overall_failure_without_leaking_results() {
    // Three files, second upload fails remotely.
    let app = setup_test_app(FakeStore::failing_on_upload(2)).await;

    let form = complete_form()
        .add_part("photos", photo_part())
        .add_part("photos", photo_part());
    let response = app.server.post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), 500);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], serde_json::json!(false));
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("simulated upload failure"));
    // The first file was dispatched but its result is not reported.
    assert!(body.get("links").is_none());
    assert_eq!(app.store.uploads.lock().unwrap().len(), 1);

    // Temp copies are cleaned up on failure paths too.
    assert_eq!(app.spooled_file_count(), 0);
}

#[tokio::test]
async fn upload_json_variant_succeeds() {
    let app = setup_test_app(FakeStore::default()).await;

    let data = base64::engine::general_purpose::STANDARD.encode(JPEG_STUB);
    let response = app
        .server
        .post("/upload-json")
        .json(&serde_json::json!({
            "date": "2024-05-01",
            "workType": "도장",
            "address": "서울시 강남구",
            "uploader": "홍길동",
            "files": [{ "name": "photo.jpg", "contentType": "image/jpeg", "data": data }]
        }))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], serde_json::json!(true));
    assert_eq!(body["links"].as_array().unwrap().len(), 1);
    assert_eq!(app.spooled_file_count(), 0);
}

#[tokio::test]
async fn upload_json_rejects_invalid_base64() {
    let app = setup_test_app(FakeStore::default()).await;

    let response = app
        .server
        .post("/upload-json")
        .json(&serde_json::json!({
            "date": "2024-05-01",
            "workType": "도장",
            "address": "서울시 강남구",
            "uploader": "홍길동",
            "files": [{ "name": "photo.jpg", "data": "not base64!!!" }]
        }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], serde_json::json!(false));
}

#[tokio::test]
async fn recorder_failure_does_not_fail_the_upload() {
    let recorder = Arc::new(FailingRecorder::new());
    let app =
        setup_test_app_with_recorder(FakeStore::default(), Some(recorder.clone())).await;

    let response = app.server.post("/upload").multipart(complete_form()).await;

    // The append was attempted and failed; the upload still succeeds.
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], serde_json::json!(true));
    assert_eq!(body["links"].as_array().unwrap().len(), 1);
    assert_eq!(recorder.attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn repeated_uploads_reuse_existing_folders() {
    let app = setup_test_app(FakeStore::default()).await;

    let first = app.server.post("/upload").multipart(complete_form()).await;
    let second = app.server.post("/upload").multipart(complete_form()).await;
    assert_eq!(first.status_code(), 200);
    assert_eq!(second.status_code(), 200);

    // Same arguments resolve to the same ids on repeat.
    let uploads = app.store.uploads.lock().unwrap().clone();
    assert_eq!(uploads.len(), 2);
    assert_eq!(uploads[0].0, uploads[1].0);
}
