//! Checksums identifying the exact corpus a run validated

use sha2::{Digest, Sha256};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// SHA256 checksum, hex encoded
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Checksum(String);

impl Checksum {
    /// Compute checksum from raw bytes
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = Sha256::digest(data);
        Self(format!("{:x}", hash))
    }

    /// Verify that content matches this checksum
    pub fn verify(&self, content: &[u8]) -> bool {
        Self::from_bytes(content) == *self
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Accumulates per-file checksums into one corpus fingerprint.
///
/// Files are sorted by path before hashing, so the fingerprint does not depend
/// on the order the directory walk visited them.
#[derive(Debug, Default)]
pub struct FingerprintBuilder {
    files: Vec<(String, Checksum)>,
}

impl FingerprintBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one file, keyed by its path relative to the corpus root
    pub fn add_file(&mut self, relative_path: &Path, content: &[u8]) {
        let key = relative_path.to_string_lossy().replace('\\', "/");
        self.files.push((key, Checksum::from_bytes(content)));
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn finish(mut self) -> Checksum {
        self.files.sort();
        let mut hasher = Sha256::new();
        for (path, checksum) in &self.files {
            hasher.update(format!("{}  {}\n", checksum, path).as_bytes());
        }
        Checksum(format!("{:x}", hasher.finalize()))
    }
}
