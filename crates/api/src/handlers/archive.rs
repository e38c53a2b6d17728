//! Bulk ZIP download of the gallery (or one category of it).

use std::io::{Cursor, Write};

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use serde::Deserialize;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveQuery {
    /// Restrict the archive to one category. Absent means everything.
    pub category_id: Option<String>,
}

/// GET /api/v1/pictures/archive
///
/// Packages the selected pictures into a single ZIP, fetching each blob
/// from storage. Blobs that fail to fetch are skipped with a warning so
/// one missing object never sinks the whole download. The archive is
/// built in memory; the upload policy caps individual files, not the
/// gallery, so very large galleries pay for it here.
pub async fn download(
    State(state): State<AppState>,
    Query(query): Query<ArchiveQuery>,
) -> AppResult<Response> {
    let pictures = state.store.list_pictures().await?;

    let (folder, selected) = match &query.category_id {
        Some(id) => {
            let name = state
                .store
                .list_categories()
                .await?
                .into_iter()
                .find(|c| &c.id == id)
                .map(|c| c.name)
                .unwrap_or_else(|| id.clone());
            let selected: Vec<_> = pictures
                .into_iter()
                .filter(|p| p.category_id.as_deref() == Some(id.as_str()))
                .collect();
            (name, selected)
        }
        None => ("All Pictures".to_string(), pictures),
    };

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    let mut packed = 0usize;

    for picture in &selected {
        let bytes = match state.blobs.fetch_blob(&picture.url).await {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(error = %err, url = %picture.url, "Skipping unfetchable blob");
                continue;
            }
        };

        let entry = format!("{folder}/{}", picture.file_name);
        writer
            .start_file(entry, options)
            .map_err(|e| AppError::InternalError(format!("Archive write failed: {e}")))?;
        writer
            .write_all(&bytes)
            .map_err(|e| AppError::InternalError(format!("Archive write failed: {e}")))?;
        packed += 1;
    }

    let cursor = writer
        .finish()
        .map_err(|e| AppError::InternalError(format!("Archive finalize failed: {e}")))?;
    let body = cursor.into_inner();

    tracing::info!(packed, skipped = selected.len() - packed, %folder, "Archive built");

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/zip")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}.zip\"", header_file_name(&folder)),
        )
        .body(body.into())
        .map_err(|e| AppError::InternalError(format!("Response build failed: {e}")))
}

/// Header-safe rendition of the folder name. Quotes, backslashes, and
/// control characters would terminate or corrupt the quoted filename, so
/// they are stripped; an empty result falls back to a fixed name.
fn header_file_name(folder: &str) -> String {
    let cleaned: String = folder
        .chars()
        .filter(|c| !c.is_control() && *c != '"' && *c != '\\')
        .collect();
    if cleaned.trim().is_empty() {
        "pictures".to_string()
    } else {
        cleaned
    }
}
