//! The uniform data-access contract all backends implement.

use async_trait::async_trait;

use crate::models::{Category, CreateCategory, CreatePicture, Picture};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Document store request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<atelier_core::error::CoreError> for StoreError {
    fn from(err: atelier_core::error::CoreError) -> Self {
        match err {
            atelier_core::error::CoreError::NotFound { entity, id } => {
                StoreError::NotFound { entity, id }
            }
            atelier_core::error::CoreError::Conflict(msg) => StoreError::Conflict(msg),
            other => StoreError::Unavailable(other.to_string()),
        }
    }
}

/// Category and picture persistence.
///
/// The store owns metadata only. It never touches blobs: picture deletion
/// returns the blob URL so blob lifecycle stays with the caller and the
/// store remains storage-system-agnostic.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// All categories, creation time ascending. Seeds the default set into
    /// an empty store before reading; seeding is idempotent and safe under
    /// concurrent first calls.
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;

    /// Create a category with a slug id derived from its name.
    ///
    /// Duplicate behavior differs by backend: Postgres rejects with
    /// [`StoreError::Conflict`] (primary-key constraint); the document and
    /// local-file backends silently replace the existing entry.
    async fn create_category(&self, input: &CreateCategory) -> Result<Category, StoreError>;

    /// Delete a category, nullifying `category_id` on every picture that
    /// referenced it *before* removing the category record. Pictures are
    /// never deleted.
    async fn delete_category(&self, id: &str) -> Result<(), StoreError>;

    /// All pictures, upload time descending.
    async fn list_pictures(&self) -> Result<Vec<Picture>, StoreError>;

    /// Record a picture. Callers invoke this only after the blob exists in
    /// storage. No existence check on `category_id`.
    async fn create_picture(&self, input: &CreatePicture) -> Result<Picture, StoreError>;

    /// Reassign a picture's category; `None` clears the association.
    async fn update_picture_category(
        &self,
        picture_id: &str,
        category_id: Option<&str>,
    ) -> Result<(), StoreError>;

    /// Remove a picture's metadata, returning its blob URL.
    async fn delete_picture(&self, picture_id: &str) -> Result<String, StoreError>;

    /// Remove all picture metadata, returning every blob URL.
    async fn delete_all_pictures(&self) -> Result<Vec<String>, StoreError>;
}
