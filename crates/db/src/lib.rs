//! Metadata persistence for the atelier gallery.
//!
//! One polymorphic [`MetadataStore`] contract with three interchangeable
//! backends -- Postgres, an HTTP document/config store, and a local JSON
//! file -- selected explicitly at process start via [`config::StoreConfig`].

pub mod backends;
pub mod config;
pub mod models;
pub mod store;

pub use backends::document::DocumentStore;
pub use backends::local_file::LocalFileStore;
pub use backends::postgres::{create_pool, health_check, run_migrations, PostgresStore};
pub use config::{connect, StoreBackend, StoreConfig};
pub use store::{MetadataStore, StoreError};
