//! Sub-configuration structs with defaults matching the gallery layout.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory where models are stored
    pub model_dir: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("~/.curator/models"),
        }
    }
}

/// Filesystem layout. Relative paths resolve against `root`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Repository root the other paths hang off
    pub root: PathBuf,

    /// Web root; summary URLs are relative to this directory
    pub public_dir: PathBuf,

    /// Folder of photos to categorize (not searched recursively)
    pub source_dir: PathBuf,

    /// Gallery root, one subdirectory per category
    pub gallery_dir: PathBuf,

    /// JSON summary artifact
    pub summary_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            public_dir: PathBuf::from("public"),
            source_dir: PathBuf::from(
                "public/images/iCloud Photos from Megan Fair/iCloud Photos from Megan Fair",
            ),
            gallery_dir: PathBuf::from("public/images/gallery"),
            summary_file: PathBuf::from("data/megan-gallery.json"),
        }
    }
}

/// Processing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// File extensions eligible for categorization (case-insensitive)
    pub supported_formats: Vec<String>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            supported_formats: vec![
                "jpg".to_string(),
                "jpeg".to_string(),
                "png".to_string(),
                "webp".to_string(),
            ],
        }
    }
}

/// Embedding model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Model directory name under `general.model_dir`
    pub model: String,

    /// Square input size of the vision encoder
    pub image_size: u32,

    /// Token sequence length of the text encoder
    pub text_max_length: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "clip-vit-base-patch32".to_string(),
            image_size: 224,
            text_max_length: 77,
        }
    }
}

/// One gallery category and the prompts that describe it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryConfig {
    /// Category name, also used as the gallery subdirectory name
    pub name: String,

    /// Descriptive text prompts averaged into the category vector
    pub prompts: Vec<String>,
}

impl CategoryConfig {
    fn new(name: &str, prompts: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            prompts: prompts.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// The built-in category table.
pub fn default_categories() -> Vec<CategoryConfig> {
    vec![
        CategoryConfig::new(
            "cabinetry",
            &[
                "a professional photo of newly refinished kitchen cabinets",
                "a craftsman sanding and painting cabinet doors",
                "luxury bathroom vanity cabinetry with smooth painted finish",
            ],
        ),
        CategoryConfig::new(
            "decks",
            &[
                "outdoor wooden deck with fresh stain on the boards",
                "carpenter refinishing backyard deck railing and stairs",
                "sunlit porch deck boards with semi transparent stain",
            ],
        ),
        CategoryConfig::new(
            "interiors",
            &[
                "interior living room walls with high end paint finish",
                "trim and crown molding detail inside a luxury home",
                "hallway drywall and interior doors freshly painted",
            ],
        ),
        CategoryConfig::new(
            "furniture-restoration",
            &[
                "antique furniture refinishing close up of a table or dresser",
                "wooden chair repair and refinishing project",
                "furniture restoration showing dresser drawers being painted",
            ],
        ),
    ]
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
