use atelier_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A gallery category. `id` is the slug of `name` and doubles as the
/// foreign key on [`crate::models::Picture`].
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub color: String,
    pub created_at: Timestamp,
}

/// Input for creating a category. The id is derived from `name`; `color`
/// falls back to [`atelier_core::seed::DEFAULT_CATEGORY_COLOR`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategory {
    pub name: String,
    pub color: Option<String>,
}
