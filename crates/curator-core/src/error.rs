//! Error types for the Curator categorization pipeline.
//!
//! Errors are organized by stage to provide clear, actionable error messages
//! that include relevant context (file paths, stage names, specific issues).

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Curator operations.
#[derive(Error, Debug)]
pub enum CuratorError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Pipeline processing errors, organized by stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The configured source directory is missing
    #[error("Source directory not found: {0}")]
    SourceNotFound(PathBuf),

    /// Image decoding failed
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// Image embedding failed
    #[error("Embedding failed for {path}: {message}")]
    Embedding { path: PathBuf, message: String },

    /// Model or tokenizer could not be loaded or run
    #[error("Model error: {message}")]
    Model { message: String },

    /// Classification was requested against an empty category bank
    #[error("Failed to categorize {0}: no categories loaded")]
    NoCategories(PathBuf),

    /// Copying a file into the gallery failed
    #[error("Failed to place {source_path} at {dest}: {message}")]
    Placement {
        source_path: PathBuf,
        dest: PathBuf,
        message: String,
    },

    /// A destination is not under the public directory, so no site URL exists
    #[error("{path} is not inside the public directory {public_dir}")]
    OutsidePublicDir { path: PathBuf, public_dir: PathBuf },
}

/// Convenience type alias for Curator results.
pub type Result<T> = std::result::Result<T, CuratorError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
