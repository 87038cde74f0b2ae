//! Cross-crate integration tests for the phonegen workspace live in `tests/`.
