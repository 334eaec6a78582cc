use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::core::partition::{PartitionOptions, RatioPolicy, SplitRatios};

/// Application configuration
///
/// Every field has a default, so a config file only needs the values it
/// wants to change. Command-line flags are applied on top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Dataset root holding one folder per class
    pub source_dir: PathBuf,
    /// Root of the train/val/test output tree
    pub destination_dir: PathBuf,
    pub train_scale: f64,
    pub val_scale: f64,
    pub test_scale: f64,
    pub ratio_policy: RatioPolicy,
    pub abort_on_error: bool,
    /// Fixed seed for a reproducible split; a fresh split every run when unset
    pub seed: Option<u64>,
    /// Folder receiving the sorted images, one subfolder per bin
    pub bin_output_dir: PathBuf,
    pub log_dir: PathBuf,
    pub log_to_file: bool,
    /// Filter used when `RUST_LOG` is not set
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("laji1"),
            destination_dir: PathBuf::from("laji2"),
            train_scale: 0.8,
            val_scale: 0.0,
            test_scale: 0.2,
            ratio_policy: RatioPolicy::Strict,
            abort_on_error: true,
            seed: None,
            bin_output_dir: PathBuf::from("tu"),
            log_dir: PathBuf::from("logs"),
            log_to_file: true,
            log_filter: "info".to_string(),
        }
    }
}

/// Errors raised while reading or writing the config file
#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, source: io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
    Write { path: PathBuf, source: io::Error },
    Serialize(serde_json::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "Failed to read config file {:?}: {}", path, source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "Failed to parse config file {:?}: {}", path, source)
            }
            ConfigError::Write { path, source } => {
                write!(f, "Failed to write config file {:?}: {}", path, source)
            }
            ConfigError::Serialize(e) => write!(f, "Failed to serialize config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read { source, .. } | ConfigError::Write { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            ConfigError::Serialize(e) => Some(e),
        }
    }
}

impl AppConfig {
    /// Get the path to the per-user config file (`config.json` in the
    /// platform config directory)
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "garbage-sorter").map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load the config from `path`.
    ///
    /// A missing file yields the defaults; an unreadable or malformed file
    /// is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Save the config as pretty-printed JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        fs::write(path, json).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn split_ratios(&self) -> SplitRatios {
        SplitRatios::new(self.train_scale, self.val_scale, self.test_scale)
    }

    pub fn partition_options(&self) -> PartitionOptions {
        PartitionOptions {
            ratios: self.split_ratios(),
            ratio_policy: self.ratio_policy,
            abort_on_error: self.abort_on_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.source_dir, PathBuf::from("laji1"));
        assert_eq!(config.destination_dir, PathBuf::from("laji2"));
        assert_eq!(config.split_ratios(), SplitRatios::new(0.8, 0.0, 0.2));
        assert!(config.abort_on_error);
        assert!(config.seed.is_none());
        assert_eq!(config.bin_output_dir, PathBuf::from("tu"));
    }

    #[test]
    fn test_config_save_load_roundtrip() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("nested").join("config.json");
        let config = AppConfig {
            val_scale: 0.1,
            test_scale: 0.1,
            ratio_policy: RatioPolicy::Normalize,
            seed: Some(42),
            ..AppConfig::default()
        };

        config.save(&path).unwrap();
        let loaded = AppConfig::load(&path).unwrap();

        assert_eq!(loaded, config);
        assert_eq!(loaded.partition_options().ratio_policy, RatioPolicy::Normalize);
    }

    #[test]
    fn test_config_partial_file_uses_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.json");
        fs::write(&path, r#"{ "seed": 7, "ratio_policy": "normalize" }"#).unwrap();

        let loaded = AppConfig::load(&path).unwrap();

        assert_eq!(loaded.seed, Some(7));
        assert_eq!(loaded.ratio_policy, RatioPolicy::Normalize);
        assert_eq!(loaded.train_scale, 0.8);
        assert_eq!(loaded.source_dir, PathBuf::from("laji1"));
    }

    #[test]
    fn test_config_missing_file_is_default() {
        let temp = tempfile::tempdir().unwrap();
        let loaded = AppConfig::load(&temp.path().join("absent.json")).unwrap();
        assert_eq!(loaded, AppConfig::default());
    }

    #[test]
    fn test_config_corrupt_file_is_error() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(AppConfig::load(&path), Err(ConfigError::Parse { .. })));
    }
}
