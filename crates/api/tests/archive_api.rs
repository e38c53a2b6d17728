//! Integration tests for the bulk ZIP download.

mod common;

use std::io::Read;

use axum::http::{header, StatusCode};
use common::{body_bytes, get, RecordingBlobStore};
use zip::ZipArchive;

use atelier_core::seed::DEFAULT_CATEGORIES;

fn entry_names(bytes: Vec<u8>) -> Vec<String> {
    let mut archive = ZipArchive::new(std::io::Cursor::new(bytes)).expect("valid zip");
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}

#[tokio::test]
async fn archive_packages_every_picture_under_all_pictures() {
    let blobs = RecordingBlobStore::new();
    blobs.put("https://blobs.test/a.png", b"aaa".to_vec());
    blobs.put("https://blobs.test/b.png", b"bbb".to_vec());
    let (app, token) = common::build_test_app(blobs.clone());

    common::create_picture(&app, &token, "https://blobs.test/a.png", "a.png", None).await;
    common::create_picture(&app, &token, "https://blobs.test/b.png", "b.png", None).await;

    let response = get(&app, "/api/v1/pictures/archive").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/zip"
    );
    assert_eq!(
        response.headers().get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=\"All Pictures.zip\""
    );

    let mut names = entry_names(body_bytes(response).await);
    names.sort();
    assert_eq!(names, vec!["All Pictures/a.png", "All Pictures/b.png"]);
}

#[tokio::test]
async fn archive_filters_by_category_and_uses_its_name_as_folder() {
    let blobs = RecordingBlobStore::new();
    blobs.put("https://blobs.test/in.png", b"in".to_vec());
    blobs.put("https://blobs.test/out.png", b"out".to_vec());
    let (app, token) = common::build_test_app(blobs.clone());

    let category = &DEFAULT_CATEGORIES[0];
    common::create_picture(
        &app,
        &token,
        "https://blobs.test/in.png",
        "in.png",
        Some(category.id),
    )
    .await;
    common::create_picture(&app, &token, "https://blobs.test/out.png", "out.png", None).await;

    let response = get(
        &app,
        &format!("/api/v1/pictures/archive?categoryId={}", category.id),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert_eq!(
        disposition,
        format!("attachment; filename=\"{}.zip\"", category.name)
    );

    let names = entry_names(body_bytes(response).await);
    assert_eq!(names, vec![format!("{}/in.png", category.name)]);
}

#[tokio::test]
async fn quoted_category_name_cannot_corrupt_the_disposition_header() {
    let blobs = RecordingBlobStore::new();
    blobs.put("https://blobs.test/in.png", b"in".to_vec());
    let (app, token) = common::build_test_app(blobs.clone());

    let response = common::send_json(
        &app,
        axum::http::Method::POST,
        "/api/v1/categories",
        &token,
        serde_json::json!({ "name": "Say \"Cheese\"" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let category = common::body_json(response).await;
    assert_eq!(category["id"], "say-\"cheese\"");

    common::create_picture(
        &app,
        &token,
        "https://blobs.test/in.png",
        "in.png",
        Some("say-\"cheese\""),
    )
    .await;

    let response = get(&app, "/api/v1/pictures/archive?categoryId=say-%22cheese%22").await;
    assert_eq!(response.status(), StatusCode::OK);

    // The quotes are stripped from the header; only the delimiters remain.
    assert_eq!(
        response.headers().get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=\"Say Cheese.zip\""
    );

    // The archive folder keeps the real name.
    let names = entry_names(body_bytes(response).await);
    assert_eq!(names, vec!["Say \"Cheese\"/in.png"]);
}

#[tokio::test]
async fn archive_skips_unfetchable_blobs() {
    let blobs = RecordingBlobStore::new();
    blobs.put("https://blobs.test/ok.png", b"ok".to_vec());
    let (app, token) = common::build_test_app(blobs.clone());

    common::create_picture(&app, &token, "https://blobs.test/ok.png", "ok.png", None).await;
    common::create_picture(&app, &token, "https://blobs.test/gone.png", "gone.png", None).await;

    let response = get(&app, "/api/v1/pictures/archive").await;
    assert_eq!(response.status(), StatusCode::OK);

    let names = entry_names(body_bytes(response).await);
    assert_eq!(names, vec!["All Pictures/ok.png"]);
}

#[tokio::test]
async fn archive_of_empty_gallery_is_a_valid_empty_zip() {
    let (app, _token) = common::build_test_app(RecordingBlobStore::new());

    let response = get(&app, "/api/v1/pictures/archive").await;
    assert_eq!(response.status(), StatusCode::OK);

    let names = entry_names(body_bytes(response).await);
    assert!(names.is_empty());
}

#[tokio::test]
async fn archive_entry_bytes_match_the_blobs() {
    let blobs = RecordingBlobStore::new();
    blobs.put("https://blobs.test/a.png", b"payload".to_vec());
    let (app, token) = common::build_test_app(blobs.clone());

    common::create_picture(&app, &token, "https://blobs.test/a.png", "a.png", None).await;

    let response = get(&app, "/api/v1/pictures/archive").await;
    let bytes = body_bytes(response).await;

    let mut archive = ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
    let mut entry = archive.by_name("All Pictures/a.png").unwrap();
    let mut contents = Vec::new();
    entry.read_to_end(&mut contents).unwrap();
    assert_eq!(contents, b"payload");
}
