use atelier_cloud::CloudError;
use atelier_core::error::CoreError;
use atelier_db::StoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps the domain, store, and cloud error types and implements
/// [`IntoResponse`] to produce consistent `{error, code}` JSON bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `atelier_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A metadata-store error.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// An object-storage error.
    #[error(transparent)]
    Cloud(#[from] CloudError),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Partial bulk failures carry their completed count in the body so
        // the operator knows how far the metadata side got.
        let completed = match &self {
            AppError::Core(CoreError::PartialFailure { completed, .. }) => Some(*completed),
            _ => None,
        };

        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Store(store) => classify_store_error(store),
            AppError::Cloud(cloud) => classify_cloud_error(cloud),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let Some(completed) = completed {
            body["completed"] = json!(completed);
        }

        (status, axum::Json(body)).into_response()
    }
}

fn classify_core_error(err: &CoreError) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::PartialFailure { completed, message } => (
            StatusCode::BAD_GATEWAY,
            "PARTIAL_FAILURE",
            format!("Completed {completed} before failing: {message}"),
        ),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

/// Classify a store error into an HTTP status, error code, and message.
///
/// The Postgres backend already maps unique violations to `Conflict`;
/// remaining database/http/io failures are sanitized to a 500.
fn classify_store_error(err: &StoreError) -> (StatusCode, &'static str, String) {
    match err {
        StoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        StoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        StoreError::Unavailable(msg) => (
            StatusCode::SERVICE_UNAVAILABLE,
            "STORE_UNAVAILABLE",
            msg.clone(),
        ),
        other => {
            tracing::error!(error = %other, "Store error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

fn classify_cloud_error(err: &CloudError) -> (StatusCode, &'static str, String) {
    match err {
        CloudError::Unavailable(msg) => {
            tracing::error!(error = %msg, "Object storage error");
            (
                StatusCode::BAD_GATEWAY,
                "STORAGE_UNAVAILABLE",
                "Object storage is unavailable".to_string(),
            )
        }
        CloudError::InvalidUrl(url) => {
            tracing::error!(url, "Blob URL outside the configured store");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        CloudError::Fetch(err) => {
            tracing::error!(error = %err, "Blob fetch error");
            (
                StatusCode::BAD_GATEWAY,
                "STORAGE_UNAVAILABLE",
                "Object storage is unavailable".to_string(),
            )
        }
    }
}
