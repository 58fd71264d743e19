//! Code generation and transpile orchestration for AIR documents.
//!
//! The pipeline runs in fixed order: context extraction, UI analysis,
//! target generators, then bundle post-processing (dead-file
//! detection, provenance stamping, manifest emission). Everything is
//! synchronous and pure apart from timing measurement; two calls on
//! the same AST produce the same bundle except for the manifest
//! timestamp.

pub mod analyze;
pub mod context;
pub mod deadcode;
pub mod generator;
pub mod generators;
pub mod manifest;
pub mod transpile;

pub use analyze::{UiAnalysis, analyze_ui};
pub use context::{TranspileContext, expand_crud};
pub use generator::{Generator, Target};
pub use manifest::{BundleManifest, MANIFEST_PATH};
pub use transpile::{
    PhaseTimings, TranspileOptions, TranspileOutput, TranspileStats, transpile,
};
