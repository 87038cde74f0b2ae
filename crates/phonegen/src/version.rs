//! Version information.

use phonegen_core::validator::PREFIX_TABLE_VERSION;

/// Get the version string.
#[must_use]
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Version string including the numbering-plan table revision.
#[must_use]
pub fn full_version() -> String {
    format!("phonegen {} (prefix table {PREFIX_TABLE_VERSION})", version())
}
