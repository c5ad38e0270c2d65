//! Error types for catalog loading.
//!
//! Covers every way reading a catalog or config file can fail: I/O,
//! deserialization, an unrecognized file type, or a catalog that parses but
//! does not validate.

use std::path::PathBuf;

use cmdtree_core::ValidationError;
use thiserror::Error;

/// Errors that can occur while loading or saving catalogs.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The file extension is not one of `json`, `yaml` or `yml`.
    #[error("unsupported catalog format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// The catalog parsed but failed validation.
    #[error("invalid catalog: {}", summarize(.0))]
    InvalidCatalog(Vec<ValidationError>),
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Convenience alias for results with [`LoadError`].
pub type Result<T> = std::result::Result<T, LoadError>;
