//! Integration tests for the video generation endpoint.

mod common;

use axum::http::StatusCode;
use common::{body_json, post_json, spawn_http_stub};
use serde_json::json;

// ---------------------------------------------------------------------------
// Test: model allow-list guard
// ---------------------------------------------------------------------------

#[tokio::test]
async fn wrong_model_prefix_returns_400() {
    let (app, _state) = common::build_test_app("http://127.0.0.1:1", "http://127.0.0.1:1");

    let body = json!({ "model": "gemini-video-001", "driveFileId": "file-9" });
    let response = post_json(app, "/api/video/generate", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Test: an input image is required
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_input_image_returns_400() {
    let (app, _state) = common::build_test_app("http://127.0.0.1:1", "http://127.0.0.1:1");

    let body = json!({ "prompt": "slow zoom" });
    let response = post_json(app, "/api/video/generate", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(
        json["error"].as_str().unwrap().contains("driveFileId"),
        "error should point at the missing input: {json}"
    );
}

// ---------------------------------------------------------------------------
// Test: happy path starts the task
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread")]
async fn video_task_is_started() {
    let ark_base = spawn_http_stub(200, json!({ "id": "cgt-2026-xyz" }).to_string()).await;
    let drive_base = spawn_http_stub(200, json!({ "ok": true }).to_string()).await;

    let (app, _state) = common::build_test_app(&ark_base, &drive_base);

    let body = json!({
        "prompt": "slow cinematic zoom",
        "driveFileId": "file-9",
        "resolution": "720p",
    });
    let response = post_json(app, "/api/video/generate", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["ok"], true);
    assert_eq!(json["taskId"], "cgt-2026-xyz");
    assert_eq!(json["status"], "processing");
}

// ---------------------------------------------------------------------------
// Test: upstream failure surfaces as 502
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread")]
async fn upstream_failure_returns_502() {
    let ark_base = spawn_http_stub(500, json!({ "error": "model overloaded" }).to_string()).await;

    let (app, _state) = common::build_test_app(&ark_base, "http://127.0.0.1:1");

    let body = json!({ "driveFileId": "file-9" });
    let response = post_json(app, "/api/video/generate", body).await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UPSTREAM_ERROR");
}
