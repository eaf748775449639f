//! Record Loading
//!
//! Walks a corpus directory, decodes every record file and merges the
//! per-file batches into one [`RecordSet`]. Nothing is validated here.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};
use walkdir::WalkDir;

use crate::checksum::{Checksum, FingerprintBuilder};
use crate::error::{LoadError, Result};
use crate::record::RecordSet;

/// Configuration for record loading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadConfig {
    /// Extension that marks a record file, without the leading dot
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Skip files whose root-relative path starts with one of these prefixes.
    /// Empty by default: every file under the root is visited.
    #[serde(default)]
    pub skip_prefixes: Vec<String>,
}

fn default_extension() -> String {
    "toml".to_string()
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            skip_prefixes: Vec::new(),
        }
    }
}

impl LoadConfig {
    fn matches_extension(&self, path: &Path) -> bool {
        let wanted = self.extension.trim_start_matches('.');
        path.extension().map(|ext| ext == wanted).unwrap_or(false)
    }

    fn is_skipped(&self, relative: &str) -> bool {
        self.skip_prefixes.iter().any(|p| relative.starts_with(p.as_str()))
    }
}

/// Records gathered from a corpus directory
#[derive(Debug, Clone)]
pub struct LoadedCorpus {
    /// Every record of every decoded file
    pub records: RecordSet,
    /// Number of record files decoded
    pub files: usize,
    /// Fingerprint of the decoded files' contents
    pub fingerprint: Checksum,
}

/// Load and merge every record file under `root`.
///
/// Fails on the first unreadable or undecodable file; nothing gathered before
/// the failure is returned.
pub fn load_from_directory(root: &Path, config: &LoadConfig) -> Result<LoadedCorpus> {
    let mut records = RecordSet::new();
    let mut fingerprint = FingerprintBuilder::new();

    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|source| {
            let path = source.path().unwrap_or(root).to_path_buf();
            error!(path = %path.display(), error = %source, "Error walking the path");
            LoadError::Walk { path, source }
        })?;
        let path = entry.path();
        debug!(file = %path.display(), "Visiting file");

        // `Path::is_file` follows symlinks; `entry.file_type()` does not.
        if !path.is_file() || !config.matches_extension(path) {
            continue;
        }

        let relative = path.strip_prefix(root).unwrap_or(path);
        let relative_str = relative.to_string_lossy().replace('\\', "/");
        if config.is_skipped(&relative_str) {
            debug!(file = %path.display(), "Skipping file");
            continue;
        }

        let data = fs::read(path).map_err(|source| {
            error!(file = %path.display(), error = %source, "Error reading file");
            LoadError::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let file_records = decode_records(&data, path).map_err(|e| {
            error!(file = %path.display(), error = %e, "Error decoding record file");
            e
        })?;

        info!(
            file = %path.display(),
            entities = file_records.entities.len(),
            relationship_types = file_records.relationship_types.len(),
            relationships = file_records.relationships.len(),
            "Loaded records from file"
        );

        fingerprint.add_file(relative, &data);
        records.extend(file_records);
    }

    Ok(LoadedCorpus {
        records,
        files: fingerprint.file_count(),
        fingerprint: fingerprint.finish(),
    })
}

/// Decode one record file's bytes; `path` is only used for error reporting
pub fn decode_records(data: &[u8], path: &Path) -> Result<RecordSet> {
    let content = std::str::from_utf8(data).map_err(|source| LoadError::Utf8 {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(content).map_err(|source| LoadError::Decode {
        path: path.to_path_buf(),
        source,
    })
}
