//! Local JSON-file backend.
//!
//! The whole gallery lives in one file, read-modify-written per mutation
//! and auto-created with the default categories on first read. A
//! process-local mutex serializes writers; concurrent processes sharing
//! one file can still clobber each other, an accepted limitation of this
//! backend.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::models::{Category, CreateCategory, CreatePicture, GalleryDocument, Picture};
use crate::store::{MetadataStore, StoreError};

pub struct LocalFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl LocalFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the document, creating it with defaults if the file is absent.
    async fn load(&self) -> Result<GalleryDocument, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                let doc = GalleryDocument::with_defaults();
                self.save(&doc).await?;
                tracing::info!(path = %self.path.display(), "Created gallery file with defaults");
                Ok(doc)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Rewrite the whole document.
    async fn save(&self, doc: &GalleryDocument) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let bytes = serde_json::to_vec_pretty(doc)?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }

    /// Load, apply `mutate`, and persist under the writer lock.
    async fn with_document<T>(
        &self,
        mutate: impl FnOnce(&mut GalleryDocument) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let _guard = self.lock.lock().await;
        let mut doc = self.load().await?;
        let value = mutate(&mut doc)?;
        self.save(&doc).await?;
        Ok(value)
    }
}

#[async_trait]
impl MetadataStore for LocalFileStore {
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        // Seeding happens inside load() when the file does not exist yet.
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.categories_ordered())
    }

    async fn create_category(&self, input: &CreateCategory) -> Result<Category, StoreError> {
        self.with_document(|doc| Ok(doc.create_category(input))).await
    }

    async fn delete_category(&self, id: &str) -> Result<(), StoreError> {
        self.with_document(|doc| Ok(doc.delete_category(id)?)).await
    }

    async fn list_pictures(&self) -> Result<Vec<Picture>, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.pictures_ordered())
    }

    async fn create_picture(&self, input: &CreatePicture) -> Result<Picture, StoreError> {
        self.with_document(|doc| Ok(doc.create_picture(input))).await
    }

    async fn update_picture_category(
        &self,
        picture_id: &str,
        category_id: Option<&str>,
    ) -> Result<(), StoreError> {
        self.with_document(|doc| Ok(doc.update_picture_category(picture_id, category_id)?))
            .await
    }

    async fn delete_picture(&self, picture_id: &str) -> Result<String, StoreError> {
        self.with_document(|doc| Ok(doc.delete_picture(picture_id)?))
            .await
    }

    async fn delete_all_pictures(&self) -> Result<Vec<String>, StoreError> {
        self.with_document(|doc| Ok(doc.delete_all_pictures())).await
    }
}
