//! Object-storage boundary.
//!
//! The server's only involvement with file bytes is issuing a scoped,
//! short-lived upload credential; the browser streams the bytes straight
//! to storage. This crate defines that capability-token contract plus
//! blob deletion and (for archive packaging) blob fetch.

pub mod s3;

use async_trait::async_trait;
use atelier_core::types::Timestamp;
use serde::Serialize;

pub use s3::S3BlobStore;

#[derive(Debug, thiserror::Error)]
pub enum CloudError {
    #[error("Object storage unavailable: {0}")]
    Unavailable(String),

    #[error("URL does not belong to this store: {0}")]
    InvalidUrl(String),

    #[error("Blob fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),
}

/// A short-lived, scoped credential for one direct browser-to-storage
/// upload.
///
/// The signature covers the object key, the content type, and the forced
/// attachment disposition (malicious payloads can never execute inline).
/// `max_bytes` is the policy cap the client enforces before sending.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadToken {
    /// Presigned PUT endpoint the client streams the bytes to.
    pub upload_url: String,
    /// Public URL the blob will be readable at once uploaded.
    pub public_url: String,
    /// Content type the signature is bound to; the client must send it
    /// verbatim.
    pub content_type: String,
    /// Disposition header the signature is bound to.
    pub content_disposition: String,
    pub max_bytes: u64,
    pub expires_at: Timestamp,
}

/// Result of a bulk blob deletion.
#[derive(Debug, Clone, Default)]
pub struct DeleteOutcome {
    pub deleted: usize,
    /// URLs storage reported errors for.
    pub failed: Vec<String>,
}

/// Blob lifecycle operations against the object-storage service.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Issue a scoped upload credential for one file. Callers validate the
    /// content type against the upload policy before asking.
    async fn issue_upload_token(
        &self,
        file_name: &str,
        content_type: &str,
    ) -> Result<UploadToken, CloudError>;

    /// Delete a single blob by its public URL.
    async fn delete_blob(&self, url: &str) -> Result<(), CloudError>;

    /// Delete a batch of blobs by public URL.
    async fn delete_blobs(&self, urls: &[String]) -> Result<DeleteOutcome, CloudError>;

    /// Fetch a blob's bytes (archive packaging only).
    async fn fetch_blob(&self, url: &str) -> Result<Vec<u8>, CloudError>;
}
