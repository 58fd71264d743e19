//! Core utilities for the AIR transpiler.
//!
//! This crate provides the output-file model, content digests, and
//! naming utilities used across the AIR ecosystem.

mod file;
mod hash;
mod naming;
mod version;

// File operations
pub use file::{OutputFile, WriteReport, write_bundle};
// Content digests
pub use hash::{DIGEST_LEN, content_digest};
// String utilities
pub use naming::{to_camel_case, to_pascal_case, to_snake_case};
// Generator identity
pub use version::{GENERATOR_NAME, GENERATOR_VERSION, generated_by};
