//! Handlers for the `/categories` resource.

use atelier_core::error::CoreError;
use atelier_db::models::{Category, CreateCategory};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AdminSession;
use crate::state::AppState;

/// GET /api/v1/categories
///
/// A store outage degrades to an empty list instead of failing the page;
/// the gallery stays viewable through a transient metadata outage.
pub async fn list(State(state): State<AppState>) -> Json<Vec<Category>> {
    match state.store.list_categories().await {
        Ok(categories) => Json(categories),
        Err(err) => {
            tracing::warn!(error = %err, "Category list degraded to empty");
            Json(Vec::new())
        }
    }
}

/// POST /api/v1/categories
pub async fn create(
    _session: AdminSession,
    State(state): State<AppState>,
    Json(input): Json<CreateCategory>,
) -> AppResult<(StatusCode, Json<Category>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Category name is required".into(),
        )));
    }

    let category = state.store.create_category(&input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// DELETE /api/v1/categories/{id}
///
/// Pictures referencing the category are nullified, never deleted.
pub async fn remove(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.store.delete_category(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
