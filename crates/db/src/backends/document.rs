//! HTTP document-store backend.
//!
//! The gallery persists as a single versioned document under a fixed item
//! key in a managed key-value config store. Every write replaces the
//! document wholesale; there is no optimistic-concurrency check, so two
//! concurrent writers can race and one write can silently clobber the
//! other. Accepted limitation of this backend.

use async_trait::async_trait;
use reqwest::StatusCode;
use tokio::sync::Mutex;

use crate::models::{Category, CreateCategory, CreatePicture, GalleryDocument, Picture};
use crate::store::{MetadataStore, StoreError};

/// Default item key the gallery document is stored under.
pub const DEFAULT_ITEM_KEY: &str = "gallery";

pub struct DocumentStore {
    http: reqwest::Client,
    base_url: String,
    token: String,
    item_key: String,
    lock: Mutex<()>,
}

impl DocumentStore {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            item_key: DEFAULT_ITEM_KEY.to_string(),
            lock: Mutex::new(()),
        }
    }

    fn item_url(&self) -> String {
        format!("{}/item/{}", self.base_url, self.item_key)
    }

    /// Fetch the document; `None` if the item does not exist yet.
    async fn read_document(&self) -> Result<Option<GalleryDocument>, StoreError> {
        let response = self
            .http
            .get(self.item_url())
            .bearer_auth(&self.token)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = response.error_for_status()?;
        Ok(Some(response.json().await?))
    }

    /// Replace the document wholesale.
    async fn write_document(&self, doc: &GalleryDocument) -> Result<(), StoreError> {
        self.http
            .put(self.item_url())
            .bearer_auth(&self.token)
            .json(doc)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Fetch the document, seeding a fresh one on first contact.
    async fn load_or_seed(&self) -> Result<GalleryDocument, StoreError> {
        match self.read_document().await? {
            Some(doc) => Ok(doc),
            None => {
                let doc = GalleryDocument::with_defaults();
                self.write_document(&doc).await?;
                tracing::info!(key = %self.item_key, "Seeded gallery document");
                Ok(doc)
            }
        }
    }

    async fn with_document<T>(
        &self,
        mutate: impl FnOnce(&mut GalleryDocument) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let _guard = self.lock.lock().await;
        let mut doc = self.load_or_seed().await?;
        let value = mutate(&mut doc)?;
        self.write_document(&doc).await?;
        Ok(value)
    }
}

#[async_trait]
impl MetadataStore for DocumentStore {
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(self.load_or_seed().await?.categories_ordered())
    }

    async fn create_category(&self, input: &CreateCategory) -> Result<Category, StoreError> {
        self.with_document(|doc| Ok(doc.create_category(input))).await
    }

    async fn delete_category(&self, id: &str) -> Result<(), StoreError> {
        self.with_document(|doc| Ok(doc.delete_category(id)?)).await
    }

    async fn list_pictures(&self) -> Result<Vec<Picture>, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(self.load_or_seed().await?.pictures_ordered())
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
