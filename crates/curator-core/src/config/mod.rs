//! Configuration management for Curator.
//!
//! Configuration is loaded from the platform config directory with defaults
//! that reproduce the gallery layout and the built-in category table. The
//! loaded `Config` is immutable for the rest of the run.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for Curator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Filesystem layout
    pub paths: PathsConfig,

    /// Processing settings
    pub processing: ProcessingConfig,

    /// Embedding model settings
    pub embedding: EmbeddingConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Category table, in scoring order
    pub categories: Vec<CategoryConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            paths: PathsConfig::default(),
            processing: ProcessingConfig::default(),
            embedding: EmbeddingConfig::default(),
            logging: LoggingConfig::default(),
            categories: default_categories(),
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.curator.curator/config.toml
    /// - Linux: ~/.config/curator/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\curator\config\config.toml
    ///
    /// Falls back to ~/.curator/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "curator", "curator")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".curator").join("config.toml")
            })
    }

    /// Get the resolved model directory path (with ~ expansion).
    pub fn model_dir(&self) -> PathBuf {
        let path_str = self.general.model_dir.to_string_lossy();
        let expanded = shellexpand::tilde(&path_str);
        PathBuf::from(expanded.into_owned())
    }

    /// Directory holding the configured embedding model's files.
    pub fn embedding_model_dir(&self) -> PathBuf {
        self.model_dir().join(&self.embedding.model)
    }

    /// Web root that summary URLs are relative to.
    pub fn public_dir(&self) -> PathBuf {
        self.resolve(&self.paths.public_dir)
    }

    /// Folder of photos to categorize.
    pub fn source_dir(&self) -> PathBuf {
        self.resolve(&self.paths.source_dir)
    }

    /// Gallery root with one subdirectory per category.
    pub fn gallery_dir(&self) -> PathBuf {
        self.resolve(&self.paths.gallery_dir)
    }

    /// Path of the JSON summary artifact.
    pub fn summary_file(&self) -> PathBuf {
        self.resolve(&self.paths.summary_file)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.paths.root.join(path)
        }
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}
