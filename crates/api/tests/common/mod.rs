#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use atelier_api::auth::jwt::{generate_session_token, JwtConfig};
use atelier_api::auth::password::hash_password;
use atelier_api::config::ServerConfig;
use atelier_api::router::build_app_router;
use atelier_api::state::AppState;
use atelier_cloud::{BlobStore, CloudError, DeleteOutcome, UploadToken};
use atelier_core::upload::MAX_UPLOAD_BYTES;
use atelier_db::LocalFileStore;

/// Password the test config's Argon2 hash corresponds to.
pub const TEST_PASSWORD: &str = "gallery-admin";

/// In-memory blob store that records every call.
///
/// `fail_deletes` turns deletion into a simulated storage outage so the
/// partial-failure paths can be exercised.
#[derive(Default)]
pub struct RecordingBlobStore {
    pub blobs: Mutex<HashMap<String, Vec<u8>>>,
    pub deleted: Mutex<Vec<String>>,
    pub fail_deletes: bool,
}

impl RecordingBlobStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing_deletes() -> Arc<Self> {
        Arc::new(Self {
            fail_deletes: true,
            ..Self::default()
        })
    }

    /// Pre-populate a blob so `fetch_blob` and deletion find it.
    pub fn put(&self, url: &str, bytes: Vec<u8>) {
        self.blobs.lock().unwrap().insert(url.to_string(), bytes);
    }

    pub fn deleted_urls(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl BlobStore for RecordingBlobStore {
    async fn issue_upload_token(
        &self,
        file_name: &str,
        content_type: &str,
    ) -> Result<UploadToken, CloudError> {
        Ok(UploadToken {
            upload_url: format!("https://blobs.test/upload/{file_name}?sig=stub"),
            public_url: format!("https://blobs.test/{file_name}"),
            content_type: content_type.to_string(),
            content_disposition: "attachment".to_string(),
            max_bytes: MAX_UPLOAD_BYTES,
            expires_at: chrono::Utc::now() + chrono::Duration::minutes(15),
        })
    }

    async fn delete_blob(&self, url: &str) -> Result<(), CloudError> {
        if self.fail_deletes {
            return Err(CloudError::Unavailable("simulated outage".into()));
        }
        self.blobs.lock().unwrap().remove(url);
        self.deleted.lock().unwrap().push(url.to_string());
        Ok(())
    }

    async fn delete_blobs(&self, urls: &[String]) -> Result<DeleteOutcome, CloudError> {
        if self.fail_deletes {
            return Ok(DeleteOutcome {
                deleted: 0,
                failed: urls.to_vec(),
            });
        }
        let mut deleted = self.deleted.lock().unwrap();
        let mut blobs = self.blobs.lock().unwrap();
        for url in urls {
            blobs.remove(url);
            deleted.push(url.clone());
        }
        Ok(DeleteOutcome {
            deleted: urls.len(),
            failed: Vec::new(),
        })
    }

    async fn fetch_blob(&self, url: &str) -> Result<Vec<u8>, CloudError> {
        self.blobs
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| CloudError::Unavailable(format!("no such blob: {url}")))
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        admin_password_hash: hash_password(TEST_PASSWORD).expect("hashing test password"),
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            session_expiry_hours: 1,
        },
    }
}

/// A unique gallery file path under the system temp directory.
pub fn temp_data_file() -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!(
        "atelier-api-test-{}-{nanos}.json",
        std::process::id()
    ))
}

/// Build the full application router over a fresh local-file store, with
/// the same middleware stack production uses. Returns the router and a
/// valid admin session token.
pub fn build_test_app(blobs: Arc<dyn BlobStore>) -> (Router, String) {
    let config = test_config();
    let token = generate_session_token(&config.jwt).expect("minting test token");

    let state = AppState {
        store: Arc::new(LocalFileStore::new(temp_data_file())),
        blobs,
        config: Arc::new(config.clone()),
    };

    (build_app_router(state, &config), token)
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

/// Authenticated JSON request.
pub async fn send_json(
    app: &Router,
    method: Method,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// Authenticated request with no body.
pub async fn send_auth(app: &Router, method: Method, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Record a picture through the API, returning its JSON representation.
pub async fn create_picture(
    app: &Router,
    token: &str,
    url: &str,
    file_name: &str,
    category_id: Option<&str>,
) -> serde_json::Value {
    let response = send_json(
        app,
        Method::POST,
        "/api/v1/pictures",
        token,
        serde_json::json!({
            "url": url,
            "fileName": file_name,
            "categoryId": category_id,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}
