//! Error types for loading record corpora and writing reports

use std::path::PathBuf;

use thiserror::Error;

/// Result type for loader operations
pub type Result<T> = std::result::Result<T, LoadError>;

/// Fatal errors raised while materializing a corpus.
///
/// Unlike [`crate::Violation`], these abort the whole load: a file that cannot
/// be read or decoded is a setup problem, not a data-quality finding.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Record file {path} is not valid UTF-8: {source}")]
    Utf8 {
        path: PathBuf,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("Failed to decode records in {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl LoadError {
    /// Path of the file or directory that caused the failure
    pub fn path(&self) -> &std::path::Path {
        match self {
            LoadError::Io { path, .. }
            | LoadError::Walk { path, .. }
            | LoadError::Utf8 { path, .. }
            | LoadError::Decode { path, .. } => path,
        }
    }

    /// Whether the file was readable but its contents could not be decoded
    pub fn is_decode(&self) -> bool {
        matches!(self, LoadError::Utf8 { .. } | LoadError::Decode { .. })
    }
}

/// Errors raised while writing a validation report
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
