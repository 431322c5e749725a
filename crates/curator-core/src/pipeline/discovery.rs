//! File discovery for finding photos in the source directory.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::ProcessingConfig;
use crate::error::PipelineError;

/// Discovers image files directly inside a directory.
pub struct FileDiscovery {
    config: ProcessingConfig,
}

/// Information about a discovered file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    /// Full path to the file
    pub path: PathBuf,
    /// Original file name, as written to the summary's `source` field
    pub file_name: String,
}

impl FileDiscovery {
    /// Create a new file discovery instance.
    pub fn new(config: ProcessingConfig) -> Self {
        Self { config }
    }

    /// List supported image files in `dir` (not recursive), sorted by path.
    ///
    /// A `limit` above zero keeps only the first `limit` files after sorting.
    pub fn discover(&self, dir: &Path, limit: usize) -> Result<Vec<DiscoveredFile>, PipelineError> {
        if !dir.is_dir() {
            return Err(PipelineError::SourceNotFound(dir.to_path_buf()));
        }

        let mut files: Vec<DiscoveredFile> = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && self.is_supported(e.path()))
            .map(|e| DiscoveredFile {
                file_name: e.file_name().to_string_lossy().into_owned(),
                path: e.into_path(),
            })
            .collect();

        // Sort by path for deterministic ordering
        files.sort_by(|a, b| a.path.cmp(&b.path));

        if limit > 0 {
            files.truncate(limit);
        }

        tracing::debug!("Discovered {} eligible file(s) in {:?}", files.len(), dir);
        Ok(files)
    }

    /// Check if a file has a supported extension.
    fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext_lower = ext.to_lowercase();
                self.config
                    .supported_formats
                    .iter()
                    .any(|fmt| fmt.trim_start_matches('.').to_lowercase() == ext_lower)
            })
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"x").unwrap();
    }

    #[test]
    fn test_is_supported() {
        let discovery = FileDiscovery::new(ProcessingConfig::default());

        assert!(discovery.is_supported(Path::new("test.jpg")));
        assert!(discovery.is_supported(Path::new("test.JPG")));
        assert!(discovery.is_supported(Path::new("test.jpeg")));
        assert!(discovery.is_supported(Path::new("test.png")));
        assert!(discovery.is_supported(Path::new("test.WebP")));
        assert!(!discovery.is_supported(Path::new("test.heic")));
        assert!(!discovery.is_supported(Path::new("test.txt")));
        assert!(!discovery.is_supported(Path::new("jpg")));
    }

    #[test]
    fn test_discover_filters_sorts_and_skips_subdirs() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "b.png");
        touch(dir.path(), "a.JPG");
        touch(dir.path(), "notes.txt");
        touch(dir.path(), "clip.mov");
        std::fs::create_dir(dir.path().join("nested.jpg")).unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        touch(&dir.path().join("sub"), "deep.jpg");

        let discovery = FileDiscovery::new(ProcessingConfig::default());
        let files = discovery.discover(dir.path(), 0).unwrap();
        let names: Vec<_> = files.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, ["a.JPG", "b.png"]);
    }

    #[test]
    fn test_discover_limit_keeps_first_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["e.jpg", "c.jpg", "a.jpg", "d.jpg", "b.jpg"] {
            touch(dir.path(), name);
        }

        let discovery = FileDiscovery::new(ProcessingConfig::default());
        let files = discovery.discover(dir.path(), 2).unwrap();
        let names: Vec<_> = files.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, ["a.jpg", "b.jpg"]);

        assert_eq!(discovery.discover(dir.path(), 0).unwrap().len(), 5);
        assert_eq!(discovery.discover(dir.path(), 50).unwrap().len(), 5);
    }

    #[test]
    fn test_discover_missing_dir_is_fatal() {
        let discovery = FileDiscovery::new(ProcessingConfig::default());
        let err = discovery
            .discover(Path::new("/nonexistent/curator/photos"), 0)
            .unwrap_err();
        assert!(matches!(err, PipelineError::SourceNotFound(_)));
    }
}
