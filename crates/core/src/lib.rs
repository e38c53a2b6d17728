//! Domain layer for the atelier gallery.
//!
//! Pure types and logic shared by the store, cloud, and API crates:
//! the error taxonomy, id/slug derivation, the default category seed
//! set, and the upload policy plus its per-file state machine.

pub mod error;
pub mod naming;
pub mod seed;
pub mod types;
pub mod upload;
