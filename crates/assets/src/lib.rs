//! Asset-side inputs to spawning: the frozen type registry, the declarative
//! manifest, and the template model library.
//!
//! # Invariants
//! - The type registry loads once; later loads are no-ops.
//! - Malformed descriptors are skipped, never fatal.
//! - Sub-mesh roles are decided when a template loads, not per spawn.

mod document;
mod manifest;
mod template;
mod types;

pub use document::{DocumentFormat, parse_document, read_document};
pub use manifest::{
    AssetOptions, ColliderOverride, CustomAssetEntry, Manifest, MaterialOverride,
    SystemAssetEntry,
};
pub use template::{
    JsonTemplateLoader, MemoryTemplateLoader, ModelLibrary, TemplateDocument, TemplateLoader,
    TemplateMeshDocument, TemplateModel,
};
pub use types::{AssetTypeDescriptor, TypeRegistry};

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),
    #[error("template not found: {0}")]
    TemplateNotFound(String),
    #[error("template parse error: {0}")]
    TemplateParse(String),
}

pub fn crate_info() -> &'static str {
    "stagehand-assets v0.1.0"
}
