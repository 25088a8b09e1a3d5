use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::publisher::{PublishTarget, DEFAULT_TARGET_NAMES};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub publisher: PublisherConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PublisherConfig {
    /// Build output directory the targets are read from
    pub source_dir: PathBuf,
    /// Directory the targets are published into
    pub dest_dir: PathBuf,
    /// Top-level entries to mirror
    pub targets: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            publisher: PublisherConfig::default(),
        }
    }
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("dist"),
            dest_dir: PathBuf::from("."),
            targets: DEFAULT_TARGET_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicitly given path must exist and parse. Otherwise the platform
    /// config directory is consulted, and a missing file falls back to the
    /// built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::read_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::read_file(&path)?,
                _ => Self::default(),
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// `<config dir>/dist-publish/config.toml`, e.g.
    /// `~/.config/dist-publish/config.toml` on Linux.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("dist-publish").join("config.toml"))
    }

    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&raw).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.publisher.targets.is_empty() {
            return Err(ConfigError::Invalid(
                "publisher.targets must not be empty".into(),
            ));
        }
        for name in &self.publisher.targets {
            PublishTarget::new(name.clone())?;
        }
        Ok(())
    }

    /// The configured targets as validated [`PublishTarget`]s.
    pub fn publish_targets(&self) -> Result<Vec<PublishTarget>, ConfigError> {
        self.publisher
            .targets
            .iter()
            .map(|name| PublishTarget::new(name.clone()))
            .collect()
    }
}
