//! Record Registry
//!
//! Validates a corpus of record files describing a directed graph of typed
//! entities, relationship types and relationships.
//!
//! ## Features
//!
//! - **Append-only registry**: each record kind has its own code namespace;
//!   a duplicate code is rejected without overwriting the first record
//! - **Referential integrity**: every relationship must resolve its type and
//!   both endpoints
//! - **Collect-all reporting**: every violation in the corpus is returned in
//!   one run
//! - **Fail-fast loading**: an unreadable or malformed file aborts the load
//!
//! ## Corpus layout
//!
//! ```text
//! corpus/
//! ├── people/
//! │   └── staff.toml        [[entity]] ...
//! ├── types.toml            [[relationship_type]] ...
//! └── links/
//!     └── reporting.toml    [[relationship]] ...
//! ```
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//! use record_registry::{load_from_directory, LoadConfig, Registry};
//!
//! let corpus = load_from_directory(Path::new("corpus"), &LoadConfig::default())?;
//! let mut registry = Registry::new();
//! let mut violations = registry.add(corpus.records).err().unwrap_or_default();
//! violations.extend(registry.validate().err().unwrap_or_default());
//! # Ok::<(), record_registry::LoadError>(())
//! ```

pub mod checksum;
pub mod config;
pub mod error;
pub mod loader;
pub mod record;
pub mod registry;
pub mod report;
pub mod violation;

pub use checksum::Checksum;
pub use config::ValidatorConfig;
pub use error::{LoadError, ReportError, Result};
pub use loader::{decode_records, load_from_directory, LoadConfig, LoadedCorpus};
pub use record::{Entity, EntityRef, RecordKind, RecordSet, Relationship, RelationshipType};
pub use registry::{Registry, RegistryStats};
pub use report::ValidationReport;
pub use violation::{ReferenceField, Violation};
