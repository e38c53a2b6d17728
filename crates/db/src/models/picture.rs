use atelier_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An uploaded picture. `url` points into object storage and is immutable
/// once set; `category_id` may dangle (treated as uncategorized) after an
/// out-of-band category deletion.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Picture {
    pub id: String,
    pub url: String,
    pub file_name: String,
    pub description: Option<String>,
    pub category_id: Option<String>,
    pub uploaded_at: Timestamp,
}

/// Input for recording a picture after its blob exists in storage.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePicture {
    pub url: String,
    pub file_name: String,
    pub category_id: Option<String>,
    pub description: Option<String>,
}
