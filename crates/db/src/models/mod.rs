//! Entity structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//!
//! Wire names are camelCase to match the public JSON API.

pub mod category;
pub mod document;
pub mod picture;

pub use category::{Category, CreateCategory};
pub use document::GalleryDocument;
pub use picture::{CreatePicture, Picture};
