//! HTTP surface for the atelier gallery.
//!
//! Thin marshalling over the metadata store and blob store: category and
//! picture CRUD, upload-token issuance, bulk delete, and archive download.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod state;
