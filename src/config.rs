//! Configuration for the record validator
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (record-validator.toml)
//! - Environment variables (RECORD_VALIDATOR__*)
//!
//! ## Example config file (record-validator.toml):
//! ```toml
//! [loader]
//! extension = "toml"
//! skip_prefixes = ["target/", ".git/", "drafts/"]
//!
//! [report]
//! path = "artifacts/validation.json"
//! pretty = true
//!
//! [logging]
//! filter = "info"
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::loader::LoadConfig;

/// Main configuration for the validator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Which files are record files
    #[serde(default)]
    pub loader: LoadConfig,

    /// Report output
    #[serde(default)]
    pub report: ReportConfig,

    /// Log filtering
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Report configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Where to write the JSON report; no report is written when unset
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Pretty-print the JSON report
    #[serde(default = "default_true")]
    pub pretty: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when RUST_LOG is not set
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_true() -> bool {
    true
}

fn default_filter() -> String {
    "info".to_string()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            path: None,
            pretty: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

impl ValidatorConfig {
    /// Load configuration, layering an explicit file over the default locations
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = [
            "record-validator.toml",
            ".record-validator.toml",
            "config/record-validator.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // Per-user config directory
        if let Some(dirs) = directories::ProjectDirs::from("dev", "familiar", "record-validator") {
            let user_config = dirs.config_dir().join("record-validator.toml");
            if user_config.exists() {
                builder = builder.add_source(File::from(user_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        // RECORD_VALIDATOR__LOADER__EXTENSION=txtpb
        builder = builder.add_source(
            Environment::with_prefix("RECORD_VALIDATOR")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, MutexGuard};
    use tempfile::tempdir;

    // Loading reads RECORD_VALIDATOR__* variables, so tests that load must not
    // overlap with the one that sets them.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_lock() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    #[test]
    fn test_default_config() {
        let config = ValidatorConfig::default();
        assert_eq!(config.loader.extension, "toml");
        assert!(config.loader.skip_prefixes.is_empty());
        assert!(config.report.path.is_none());
        assert!(config.report.pretty);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_serialize_config() {
        let config = ValidatorConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[loader]"));
        assert!(toml_str.contains("[logging]"));
    }

    #[test]
    fn test_explicit_file_overrides_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        let content = r#"
            [loader]
            extension = "txtpb"
            skip_prefixes = ["drafts/"]

            [report]
            pretty = false
        "#;
        std::fs::write(&path, content).unwrap();

        let _guard = env_lock();
        let config = ValidatorConfig::load_from(Some(&path)).unwrap();

        assert_eq!(config.loader.extension, "txtpb");
        assert_eq!(config.loader.skip_prefixes, vec!["drafts/".to_string()]);
        assert!(!config.report.pretty);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let _guard = env_lock();
        assert!(ValidatorConfig::load_from(Some(&path)).is_err());
    }

    #[test]
    fn test_save_round_trips_through_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("saved.toml");
        let mut config = ValidatorConfig::default();
        config.logging.filter = "debug".to_string();
        config.loader.skip_prefixes = vec!["target/".to_string()];
        config.save(&path).unwrap();

        let _guard = env_lock();
        let loaded = ValidatorConfig::load_from(Some(&path)).unwrap();

        assert_eq!(loaded.logging.filter, "debug");
        assert_eq!(loaded.loader, config.loader);
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[loader]\nextension = \"toml\"\n").unwrap();

        let _guard = env_lock();
        std::env::set_var("RECORD_VALIDATOR__LOADER__EXTENSION", "txtpb");
        let loaded = ValidatorConfig::load_from(Some(&path));
        std::env::remove_var("RECORD_VALIDATOR__LOADER__EXTENSION");

        let config = loaded.unwrap();
        assert_eq!(config.loader.extension, "txtpb");
        assert_eq!(config.logging.filter, "info");
    }
}
