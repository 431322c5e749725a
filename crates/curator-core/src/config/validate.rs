//! Configuration validation with range and consistency checks.

use std::collections::HashSet;
use std::path::Component;

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.processing.supported_formats.is_empty() {
            return Err(ConfigError::ValidationError(
                "processing.supported_formats must not be empty".into(),
            ));
        }
        if self.embedding.image_size == 0 {
            return Err(ConfigError::ValidationError(
                "embedding.image_size must be > 0".into(),
            ));
        }
        if self.embedding.text_max_length == 0 {
            return Err(ConfigError::ValidationError(
                "embedding.text_max_length must be > 0".into(),
            ));
        }
        if self.categories.is_empty() {
            return Err(ConfigError::ValidationError(
                "at least one [[categories]] entry is required".into(),
            ));
        }

        let mut seen = HashSet::new();
        for category in &self.categories {
            let name = category.name.as_str();
            if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
                return Err(ConfigError::ValidationError(format!(
                    "category name {name:?} is not a valid directory name"
                )));
            }
            if !seen.insert(name) {
                return Err(ConfigError::ValidationError(format!(
                    "category {name:?} is defined more than once"
                )));
            }
            if category.prompts.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "category {name:?} has no prompts"
                )));
            }
        }

        // Summary URLs are computed relative to the public dir, so the gallery
        // has to live underneath it.
        let gallery = self.gallery_dir();
        let public = self.public_dir();
        let escapes = gallery
            .strip_prefix(&public)
            .map(|rest| rest.components().any(|c| c == Component::ParentDir))
            .unwrap_or(true);
        if escapes {
            return Err(ConfigError::ValidationError(format!(
                "paths.gallery_dir ({}) must be inside paths.public_dir ({})",
                gallery.display(),
                public.display()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CategoryConfig;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_formats() {
        let mut config = Config::default();
        config.processing.supported_formats.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("supported_formats"));
    }

    #[test]
    fn test_validate_rejects_zero_image_size() {
        let mut config = Config::default();
        config.embedding.image_size = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("image_size"));
    }

    #[test]
    fn test_validate_rejects_no_categories() {
        let mut config = Config::default();
        config.categories.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("categories"));
    }

    #[test]
    fn test_validate_rejects_duplicate_category() {
        let mut config = Config::default();
        let dup = config.categories[0].clone();
        config.categories.push(dup);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_validate_rejects_path_like_category_name() {
        let mut config = Config::default();
        config.categories.push(CategoryConfig {
            name: "../escape".to_string(),
            prompts: vec!["x".to_string()],
        });
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("not a valid directory name"));
    }

    #[test]
    fn test_validate_rejects_category_without_prompts() {
        let mut config = Config::default();
        config.categories[1].prompts.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("decks"));
    }

    #[test]
    fn test_validate_rejects_gallery_outside_public() {
        let mut config = Config::default();
        config.paths.gallery_dir = PathBuf::from("gallery");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("gallery_dir"));

        config.paths.gallery_dir = PathBuf::from("public/../gallery");
        assert!(config.validate().is_err());
    }
}
