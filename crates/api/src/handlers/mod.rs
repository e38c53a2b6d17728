//! Request handlers, one module per resource.

pub mod archive;
pub mod auth;
pub mod categories;
pub mod pictures;
pub mod upload;
