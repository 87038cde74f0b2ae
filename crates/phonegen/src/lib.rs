//! phonegen library: application logic for the phone-number generator.

pub mod app;
pub mod config;
pub mod errors;
pub mod version;
