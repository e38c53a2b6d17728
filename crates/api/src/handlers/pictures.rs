//! Handlers for the `/pictures` resource.

use atelier_core::error::CoreError;
use atelier_db::models::{CreatePicture, Picture};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AdminSession;
use crate::state::AppState;

/// GET /api/v1/pictures
///
/// Degrades to an empty list on store failure, same as the category list.
pub async fn list(State(state): State<AppState>) -> Json<Vec<Picture>> {
    match state.store.list_pictures().await {
        Ok(pictures) => Json(pictures),
        Err(err) => {
            tracing::warn!(error = %err, "Picture list degraded to empty");
            Json(Vec::new())
        }
    }
}

/// POST /api/v1/pictures
///
/// Records metadata for a blob the client has already uploaded. The blob
/// must exist before this is called; the store never verifies the URL.
pub async fn create(
    _session: AdminSession,
    State(state): State<AppState>,
    Json(input): Json<CreatePicture>,
) -> AppResult<(StatusCode, Json<Picture>)> {
    if input.url.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Picture URL is required".into(),
        )));
    }
    if input.file_name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "File name is required".into(),
        )));
    }

    let picture = state.store.create_picture(&input).await?;
    Ok((StatusCode::CREATED, Json(picture)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryRequest {
    /// `null` clears the association.
    pub category_id: Option<String>,
}

/// PATCH /api/v1/pictures/{id}
pub async fn update_category(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateCategoryRequest>,
) -> AppResult<StatusCode> {
    state
        .store
        .update_picture_category(&id, input.category_id.as_deref())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub deleted: bool,
    /// Whether the backing blob was also removed. Metadata deletion wins
    /// even when blob cleanup fails; an orphaned blob beats a dangling
    /// gallery entry.
    pub blob_removed: bool,
    pub url: String,
}

/// DELETE /api/v1/pictures/{id}
pub async fn remove(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteResponse>> {
    let url = state.store.delete_picture(&id).await?;

    let blob_removed = match state.blobs.delete_blob(&url).await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, %url, "Blob deletion failed after metadata removal");
            false
        }
    };

    Ok(Json(DeleteResponse {
        deleted: true,
        blob_removed,
        url,
    }))
}

#[derive(Debug, Serialize)]
pub struct DeleteAllResponse {
    pub deleted: usize,
}

/// DELETE /api/v1/pictures
///
/// Metadata is cleared first; blob cleanup follows. A failed or partial
/// blob batch surfaces as a 502 with the count of blobs that were
/// removed, so the caller knows the gallery is empty but storage still
/// holds orphans.
pub async fn delete_all(
    _session: AdminSession,
    State(state): State<AppState>,
) -> AppResult<Json<DeleteAllResponse>> {
    let urls = state.store.delete_all_pictures().await?;
    if urls.is_empty() {
        return Ok(Json(DeleteAllResponse { deleted: 0 }));
    }

    let total = urls.len();
    match state.blobs.delete_blobs(&urls).await {
        Ok(outcome) if outcome.failed.is_empty() => {
            Ok(Json(DeleteAllResponse { deleted: total }))
        }
        Ok(outcome) => {
            tracing::warn!(
                failed = outcome.failed.len(),
                deleted = outcome.deleted,
                "Bulk blob deletion partially failed"
            );
            Err(AppError::Core(CoreError::PartialFailure {
                completed: outcome.deleted,
                message: format!(
                    "Removed all metadata but {} of {} blobs could not be deleted",
                    outcome.failed.len(),
                    total
                ),
            }))
        }
        Err(err) => {
            tracing::error!(error = %err, "Bulk blob deletion failed outright");
            Err(AppError::Core(CoreError::PartialFailure {
                completed: 0,
                message: format!("Removed all metadata but blob deletion failed: {err}"),
            }))
        }
    }
}
