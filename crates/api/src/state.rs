use std::sync::Arc;

use atelier_cloud::BlobStore;
use atelier_db::MetadataStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// Cheaply cloneable; both stores sit behind `Arc` trait objects so the
/// backend is chosen once at startup and handlers stay backend-agnostic.
#[derive(Clone)]
pub struct AppState {
    /// Metadata persistence (one of the three interchangeable backends).
    pub store: Arc<dyn MetadataStore>,
    /// Object-storage boundary.
    pub blobs: Arc<dyn BlobStore>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
