//! Health endpoint tests.

mod helpers;

use helpers::{setup_test_app, FakeStore};

#[tokio::test]
async fn health_returns_ok_regardless_of_storage_state() {
    // No credentials, no recorder - health must still answer.
    let app = setup_test_app(FakeStore::default()).await;

    let response = app.server.get("/health").await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body, serde_json::json!({ "ok": true }));
}
