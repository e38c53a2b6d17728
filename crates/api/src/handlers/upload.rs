//! Upload token issuance.

use atelier_cloud::UploadToken;
use atelier_core::upload::validate_upload;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AdminSession;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    pub file_name: String,
    pub content_type: String,
    /// Declared size in bytes. Absent means unknown; the policy cap is
    /// still advertised in the token for the client to enforce.
    pub size: Option<u64>,
}

/// POST /api/v1/upload
///
/// Validates the declared file against the upload policy and returns a
/// scoped, short-lived credential. The bytes never pass through this
/// server.
pub async fn issue_token(
    _session: AdminSession,
    State(state): State<AppState>,
    Json(input): Json<UploadRequest>,
) -> AppResult<Json<UploadToken>> {
    validate_upload(
        &input.file_name,
        &input.content_type,
        input.size.unwrap_or(0),
    )
    .map_err(crate::error::AppError::Core)?;

    let token = state
        .blobs
        .issue_upload_token(&input.file_name, &input.content_type)
        .await?;
    Ok(Json(token))
}
