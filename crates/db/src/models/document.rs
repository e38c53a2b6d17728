//! The wholesale-replaced gallery document.
//!
//! The document and local-file backends persist the entire gallery as one
//! value and rewrite it on every mutation. The collection operations live
//! here as pure methods so both backends share one implementation of the
//! invariants (slug ids, cascade-nullify, ordering).

use atelier_core::error::CoreError;
use atelier_core::naming::{category_slug, picture_id};
use atelier_core::seed::{DEFAULT_CATEGORIES, DEFAULT_CATEGORY_COLOR};
use atelier_core::types::Timestamp;
use serde::{Deserialize, Serialize};

use crate::models::{Category, CreateCategory, CreatePicture, Picture};

/// Full gallery state as one serializable value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryDocument {
    pub categories: Vec<Category>,
    pub pictures: Vec<Picture>,
    pub last_updated: Timestamp,
}

impl GalleryDocument {
    /// An empty document pre-populated with the default category set.
    pub fn with_defaults() -> Self {
        let now = chrono::Utc::now();
        Self {
            categories: DEFAULT_CATEGORIES
                .iter()
                .map(|seed| Category {
                    id: seed.id.to_string(),
                    name: seed.name.to_string(),
                    color: seed.color.to_string(),
                    created_at: now,
                })
                .collect(),
            pictures: Vec::new(),
            last_updated: now,
        }
    }

    /// Categories ordered by creation time ascending. The sort is stable,
    /// so entries seeded in the same instant keep their insertion order.
    pub fn categories_ordered(&self) -> Vec<Category> {
        let mut categories = self.categories.clone();
        categories.sort_by_key(|c| c.created_at);
        categories
    }

    /// Pictures ordered by upload time descending (most recent first).
    pub fn pictures_ordered(&self) -> Vec<Picture> {
        let mut pictures = self.pictures.clone();
        pictures.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        pictures
    }

    /// Insert a category. A name whose slug collides with an existing id
    /// silently replaces the prior entry; these backends have no
    /// uniqueness constraint to reject it with.
    pub fn create_category(&mut self, input: &CreateCategory) -> Category {
        let category = Category {
            id: category_slug(&input.name),
            name: input.name.clone(),
            color: input
                .color
                .clone()
                .unwrap_or_else(|| DEFAULT_CATEGORY_COLOR.to_string()),
            created_at: chrono::Utc::now(),
        };
        self.categories.retain(|c| c.id != category.id);
        self.categories.push(category.clone());
        self.touch();
        category
    }

    /// Remove a category, first clearing the reference on every picture
    /// that pointed at it. Pictures themselves are never deleted.
    pub fn delete_category(&mut self, id: &str) -> Result<(), CoreError> {
        if !self.categories.iter().any(|c| c.id == id) {
            return Err(CoreError::NotFound {
                entity: "Category",
                id: id.to_string(),
            });
        }
        for picture in &mut self.pictures {
            if picture.category_id.as_deref() == Some(id) {
                picture.category_id = None;
            }
        }
        self.categories.retain(|c| c.id != id);
        self.touch();
        Ok(())
    }

    /// Record a picture with a fresh opaque id and the current time.
    /// No existence check on `category_id`; dangling refs are tolerated.
    pub fn create_picture(&mut self, input: &CreatePicture) -> Picture {
        let picture = Picture {
            id: picture_id(),
            url: input.url.clone(),
            file_name: input.file_name.clone(),
            description: input.description.clone(),
            category_id: input.category_id.clone(),
            uploaded_at: chrono::Utc::now(),
        };
        self.pictures.push(picture.clone());
        self.touch();
        picture
    }

    /// Reassign (or clear, with `None`) a picture's category.
    pub fn update_picture_category(
        &mut self,
        picture_id: &str,
        category_id: Option<&str>,
    ) -> Result<(), CoreError> {
        let picture = self
            .pictures
            .iter_mut()
            .find(|p| p.id == picture_id)
            .ok_or_else(|| CoreError::NotFound {
                entity: "Picture",
                id: picture_id.to_string(),
            })?;
        picture.category_id = category_id.map(str::to_string);
        self.touch();
        Ok(())
    }

    /// Remove a picture's metadata and return its blob URL so the caller
    /// can delete the blob independently.
    pub fn delete_picture(&mut self, picture_id: &str) -> Result<String, CoreError> {
        let index = self
            .pictures
            .iter()
            .position(|p| p.id == picture_id)
            .ok_or_else(|| CoreError::NotFound {
                entity: "Picture",
                id: picture_id.to_string(),
            })?;
        let removed = self.pictures.remove(index);
        self.touch();
        Ok(removed.url)
    }

    /// Clear all picture metadata, returning every blob URL.
    pub fn delete_all_pictures(&mut self) -> Vec<String> {
        let urls = self.pictures.drain(..).map(|p| p.url).collect();
        self.touch();
        urls
    }

    fn touch(&mut self) {
        self.last_updated = chrono::Utc::now();
    }
}
