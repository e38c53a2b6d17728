//! Explicit backend selection at process start.

use std::path::PathBuf;
use std::sync::Arc;

use crate::backends::document::DocumentStore;
use crate::backends::local_file::LocalFileStore;
use crate::backends::postgres::PostgresStore;
use crate::store::{MetadataStore, StoreError};

/// Which persistence backend to run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Document,
    LocalFile,
}

/// Store configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Postgres connection string (required for `postgres`).
    pub database_url: Option<String>,
    /// Document store endpoint and token (required for `document`).
    pub document_store_url: Option<String>,
    pub document_store_token: Option<String>,
    /// Gallery file path for the `local-file` backend.
    pub data_file: PathBuf,
}

/// Default gallery file for the local-file backend.
const DEFAULT_DATA_FILE: &str = "data/gallery.json";

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                 | Default             | Used by      |
    /// |-------------------------|---------------------|--------------|
    /// | `ATELIER_STORE_BACKEND` | `local-file`        | --           |
    /// | `DATABASE_URL`          | --                  | `postgres`   |
    /// | `DOCUMENT_STORE_URL`    | --                  | `document`   |
    /// | `DOCUMENT_STORE_TOKEN`  | --                  | `document`   |
    /// | `ATELIER_DATA_FILE`     | `data/gallery.json` | `local-file` |
    ///
    /// # Panics
    ///
    /// Panics if `ATELIER_STORE_BACKEND` names an unknown backend.
    pub fn from_env() -> Self {
        let backend = match std::env::var("ATELIER_STORE_BACKEND")
            .unwrap_or_else(|_| "local-file".into())
            .as_str()
        {
            "postgres" => StoreBackend::Postgres,
            "document" => StoreBackend::Document,
            "local-file" => StoreBackend::LocalFile,
            other => panic!(
                "ATELIER_STORE_BACKEND must be one of postgres|document|local-file, got '{other}'"
            ),
        };

        Self {
            backend,
            database_url: std::env::var("DATABASE_URL").ok(),
            document_store_url: std::env::var("DOCUMENT_STORE_URL").ok(),
            document_store_token: std::env::var("DOCUMENT_STORE_TOKEN").ok(),
            data_file: std::env::var("ATELIER_DATA_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_FILE)),
        }
    }
}

/// Build the configured [`MetadataStore`].
///
/// The Postgres path connects, health-checks, and migrates before
/// returning; the document and local-file paths defer their first contact
/// to the first operation (which also performs lazy seeding).
pub async fn connect(config: &StoreConfig) -> Result<Arc<dyn MetadataStore>, StoreError> {
    match config.backend {
        StoreBackend::Postgres => {
            let url = config.database_url.as_deref().ok_or_else(|| {
                StoreError::Unavailable("DATABASE_URL must be set for the postgres backend".into())
            })?;
            Ok(Arc::new(PostgresStore::connect(url).await?))
        }
        StoreBackend::Document => {
            let url = config.document_store_url.as_deref().ok_or_else(|| {
                StoreError::Unavailable(
                    "DOCUMENT_STORE_URL must be set for the document backend".into(),
                )
            })?;
            let token = config.document_store_token.as_deref().ok_or_else(|| {
                StoreError::Unavailable(
                    "DOCUMENT_STORE_TOKEN must be set for the document backend".into(),
                )
            })?;
            Ok(Arc::new(DocumentStore::new(url, token)))
        }
        StoreBackend::LocalFile => Ok(Arc::new(LocalFileStore::new(config.data_file.clone()))),
    }
}
