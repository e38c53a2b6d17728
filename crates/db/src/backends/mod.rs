//! The three interchangeable [`crate::MetadataStore`] backends.

pub mod document;
pub mod local_file;
pub mod postgres;
