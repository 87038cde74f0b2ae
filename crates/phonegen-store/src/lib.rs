//! # phonegen-store
//!
//! Keeps the latest result list, persists it as a validated JSON record and
//! writes the plain-text export.

pub mod export;
pub mod record;
pub mod store;

pub use export::{export_to_path, write_export, ExportHeader};
pub use record::{default_filename, CorruptRecord, PersistedRecord, StoreError};
pub use store::ResultStore;
