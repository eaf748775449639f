//! Validation report
//!
//! Machine-readable summary of one validation run.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::checksum::Checksum;
use crate::error::ReportError;
use crate::registry::RegistryStats;
use crate::violation::Violation;

/// Outcome of validating one corpus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub generated_at: DateTime<Utc>,
    /// Corpus root that was scanned
    pub root: PathBuf,
    /// Number of record files decoded
    pub files: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<Checksum>,
    pub stats: RegistryStats,
    pub violations: Vec<Violation>,
    /// Set when the corpus could not be loaded at all
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_error: Option<String>,
}

impl ValidationReport {
    /// Report for a corpus that loaded successfully
    pub fn new(
        root: impl Into<PathBuf>,
        files: usize,
        fingerprint: Checksum,
        stats: RegistryStats,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            root: root.into(),
            files,
            fingerprint: Some(fingerprint),
            stats,
            violations: Vec::new(),
            load_error: None,
        }
    }

    /// Report for a corpus that failed to load
    pub fn load_failed(root: impl Into<PathBuf>, error: impl ToString) -> Self {
        Self {
            generated_at: Utc::now(),
            root: root.into(),
            files: 0,
            fingerprint: None,
            stats: RegistryStats::default(),
            violations: Vec::new(),
            load_error: Some(error.to_string()),
        }
    }

    pub fn extend_violations(&mut self, violations: impl IntoIterator<Item = Violation>) {
        self.violations.extend(violations);
    }

    pub fn is_success(&self) -> bool {
        self.load_error.is_none() && self.violations.is_empty()
    }

    pub fn duplicate_count(&self) -> usize {
        self.violations.iter().filter(|v| v.is_duplicate()).count()
    }

    pub fn dangling_count(&self) -> usize {
        self.violations.iter().filter(|v| v.is_dangling()).count()
    }

    pub fn to_json(&self, pretty: bool) -> Result<String, ReportError> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Write the report as JSON, creating parent directories as needed
    pub fn write_to(&self, path: &Path, pretty: bool) -> Result<(), ReportError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json(pretty)?)?;
        Ok(())
    }
}
