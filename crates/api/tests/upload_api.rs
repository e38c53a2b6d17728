//! Integration tests for upload token issuance.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, send_json, RecordingBlobStore};
use serde_json::json;

use atelier_core::upload::MAX_UPLOAD_BYTES;

#[tokio::test]
async fn issue_token_for_allowed_image() {
    let (app, token) = common::build_test_app(RecordingBlobStore::new());

    let response = send_json(
        &app,
        Method::POST,
        "/api/v1/upload",
        &token,
        json!({
            "fileName": "holiday.jpg",
            "contentType": "image/jpeg",
            "size": 1024,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert!(body["uploadUrl"].as_str().unwrap().starts_with("https://"));
    assert!(body["publicUrl"].as_str().unwrap().contains("holiday.jpg"));
    assert_eq!(body["contentType"], "image/jpeg");
    assert_eq!(body["contentDisposition"], "attachment");
    assert_eq!(body["maxBytes"], MAX_UPLOAD_BYTES);
    assert!(body["expiresAt"].is_string());
}

#[tokio::test]
async fn rejects_disallowed_content_type() {
    let (app, token) = common::build_test_app(RecordingBlobStore::new());

    // SVG is scriptable and stays off the allowlist.
    let response = send_json(
        &app,
        Method::POST,
        "/api/v1/upload",
        &token,
        json!({
            "fileName": "logo.svg",
            "contentType": "image/svg+xml",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn rejects_oversized_declaration() {
    let (app, token) = common::build_test_app(RecordingBlobStore::new());

    let response = send_json(
        &app,
        Method::POST,
        "/api/v1/upload",
        &token,
        json!({
            "fileName": "huge.png",
            "contentType": "image/png",
            "size": MAX_UPLOAD_BYTES + 1,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn rejects_blank_file_name() {
    let (app, token) = common::build_test_app(RecordingBlobStore::new());

    let response = send_json(
        &app,
        Method::POST,
        "/api/v1/upload",
        &token,
        json!({
            "fileName": "  ",
            "contentType": "image/png",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn issuance_requires_a_session() {
    let (app, _token) = common::build_test_app(RecordingBlobStore::new());

    let response = send_json(
        &app,
        Method::POST,
        "/api/v1/upload",
        "bogus",
        json!({
            "fileName": "a.png",
            "contentType": "image/png",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
