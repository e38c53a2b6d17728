//! S3 implementation of [`BlobStore`].
//!
//! Upload tokens are presigned `PutObject` requests: the signature pins
//! the object key, content type, and attachment disposition, and expires
//! after a few minutes. Batch deletion uses `DeleteObjects` in chunks of
//! the S3 per-request maximum.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::types::{Delete, ObjectIdentifier};
use uuid::Uuid;

use atelier_core::upload::MAX_UPLOAD_BYTES;

use crate::{BlobStore, CloudError, DeleteOutcome, UploadToken};

/// Default presigned-URL lifetime.
const DEFAULT_TOKEN_EXPIRY_SECS: u64 = 900;

/// S3 `DeleteObjects` accepts at most this many keys per request.
const DELETE_BATCH_MAX: usize = 1000;

pub struct S3BlobStore {
    client: aws_sdk_s3::Client,
    http: reqwest::Client,
    bucket: String,
    public_base_url: String,
    token_expiry: Duration,
}

impl S3BlobStore {
    pub fn new(
        client: aws_sdk_s3::Client,
        bucket: impl Into<String>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            http: reqwest::Client::new(),
            bucket: bucket.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
            token_expiry: Duration::from_secs(DEFAULT_TOKEN_EXPIRY_SECS),
        }
    }

    /// Build from the ambient AWS environment.
    ///
    /// | Env Var              | Required | Default                          |
    /// |----------------------|----------|----------------------------------|
    /// | `S3_BUCKET`          | **yes**  | --                               |
    /// | `S3_PUBLIC_BASE_URL` | no       | `https://{bucket}.s3.amazonaws.com` |
    ///
    /// Region and credentials resolve through the standard AWS config
    /// chain (`aws-config`).
    ///
    /// # Panics
    ///
    /// Panics if `S3_BUCKET` is not set.
    pub async fn from_env() -> Self {
        let bucket = std::env::var("S3_BUCKET").expect("S3_BUCKET must be set");
        let public_base_url = std::env::var("S3_PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("https://{bucket}.s3.amazonaws.com"));

        let aws_config = aws_config::load_from_env().await;
        let client = aws_sdk_s3::Client::new(&aws_config);
        Self::new(client, bucket, public_base_url)
    }

    /// Resolve a public URL back to the object key it addresses.
    fn key_for_url(&self, url: &str) -> Result<String, CloudError> {
        url_to_key(&self.public_base_url, url)
            .ok_or_else(|| CloudError::InvalidUrl(url.to_string()))
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn issue_upload_token(
        &self,
        file_name: &str,
        content_type: &str,
    ) -> Result<UploadToken, CloudError> {
        let safe_name = sanitize_file_name(file_name);
        // Random prefix: uploads of the same file name never collide.
        let key = format!("{}-{safe_name}", Uuid::new_v4());
        let content_disposition = format!("attachment; filename=\"{safe_name}\"");

        let presigning = PresigningConfig::expires_in(self.token_expiry)
            .map_err(|e| CloudError::Unavailable(e.to_string()))?;

        let presigned = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type(content_type)
            .content_disposition(&content_disposition)
            .presigned(presigning)
            .await
            .map_err(|e| CloudError::Unavailable(e.to_string()))?;

        Ok(UploadToken {
            upload_url: presigned.uri().to_string(),
            public_url: format!("{}/{key}", self.public_base_url),
            content_type: content_type.to_string(),
            content_disposition,
            max_bytes: MAX_UPLOAD_BYTES,
            expires_at: chrono::Utc::now()
                + chrono::Duration::from_std(self.token_expiry)
                    .unwrap_or_else(|_| chrono::Duration::seconds(0)),
        })
    }

    async fn delete_blob(&self, url: &str) -> Result<(), CloudError> {
        let key = self.key_for_url(url)?;
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
            .map_err(|e| CloudError::Unavailable(e.to_string()))?;
        Ok(())
    }

    async fn delete_blobs(&self, urls: &[String]) -> Result<DeleteOutcome, CloudError> {
        let mut outcome = DeleteOutcome::default();

        for chunk in urls.chunks(DELETE_BATCH_MAX) {
            let mut identifiers = Vec::with_capacity(chunk.len());
            for url in chunk {
                match self.key_for_url(url) {
                    Ok(key) => identifiers.push(
                        ObjectIdentifier::builder()
                            .key(key)
                            .build()
                            .map_err(|e| CloudError::Unavailable(e.to_string()))?,
                    ),
                    Err(_) => {
                        // A URL outside this store cannot be deleted here;
                        // report it rather than failing the whole batch.
                        outcome.failed.push(url.clone());
                    }
                }
            }
            if identifiers.is_empty() {
                continue;
            }

            let delete = Delete::builder()
                .set_objects(Some(identifiers))
                .build()
                .map_err(|e| CloudError::Unavailable(e.to_string()))?;

            let response = self
                .client
                .delete_objects()
                .bucket(&self.bucket)
                .delete(delete)
                .send()
                .await
                .map_err(|e| CloudError::Unavailable(e.to_string()))?;

            outcome.deleted += response.deleted().len();
            for error in response.errors() {
                let key = error.key().unwrap_or_default();
                tracing::warn!(key, "Blob deletion rejected by storage");
                outcome
                    .failed
                    .push(format!("{}/{key}", self.public_base_url));
            }
        }

        Ok(outcome)
    }

    async fn fetch_blob(&self, url: &str) -> Result<Vec<u8>, CloudError> {
        let response = self.http.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}

/// Strip the file name down to characters safe in object keys and
/// disposition headers.
fn sanitize_file_name(file_name: &str) -> String {
    let cleaned: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '-'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

/// Resolve a public URL to its object key, if it lives under `base`.
fn url_to_key(base: &str, url: &str) -> Option<String> {
    url.strip_prefix(base)
        .and_then(|rest| rest.strip_prefix('/'))
        .filter(|key| !key.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_keeps_safe_characters() {
        assert_eq!(sanitize_file_name("photo-01_final.png"), "photo-01_final.png");
    }

    #[test]
    fn sanitize_replaces_unsafe_characters() {
        assert_eq!(sanitize_file_name("my photo (1).png"), "my-photo--1-.png");
    }

    #[test]
    fn sanitize_never_returns_empty() {
        assert_eq!(sanitize_file_name(""), "file");
    }

    #[test]
    fn url_round_trips_to_key() {
        let base = "https://cdn.example.com";
        assert_eq!(
            url_to_key(base, "https://cdn.example.com/abc-x.png").as_deref(),
            Some("abc-x.png")
        );
    }

    #[test]
    fn foreign_url_has_no_key() {
        assert_eq!(url_to_key("https://cdn.example.com", "https://other.com/x.png"), None);
        assert_eq!(url_to_key("https://cdn.example.com", "https://cdn.example.com/"), None);
    }
}
