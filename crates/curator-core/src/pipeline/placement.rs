//! Copying photos into the gallery and naming them on the site.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use filetime::FileTime;

use crate::error::PipelineError;

use super::naming::{resolve_collision, sanitize_name};

/// Places files into `{gallery_dir}/{category}/` under unique names.
pub struct GalleryWriter {
    gallery_dir: PathBuf,
    public_dir: PathBuf,
    dry_run: bool,
    /// Destinations handed out earlier in this run.
    claimed: HashSet<PathBuf>,
}

impl GalleryWriter {
    pub fn new(gallery_dir: PathBuf, public_dir: PathBuf, dry_run: bool) -> Self {
        Self {
            gallery_dir,
            public_dir,
            dry_run,
            claimed: HashSet::new(),
        }
    }

    /// Choose a destination for `source` in `category` and copy it there.
    ///
    /// The category folder is created either way. In dry-run mode the
    /// destination is reserved but the file is not copied.
    pub fn place(&mut self, source: &Path, category: &str) -> Result<PathBuf, PipelineError> {
        let dest_dir = self.gallery_dir.join(category);
        let placement_error = |dest: &Path, e: std::io::Error| PipelineError::Placement {
            source_path: source.to_path_buf(),
            dest: dest.to_path_buf(),
            message: e.to_string(),
        };
        std::fs::create_dir_all(&dest_dir).map_err(|e| placement_error(&dest_dir, e))?;

        let name = sanitize_name(source);
        let dest = resolve_collision(&dest_dir, &name, |p| {
            self.claimed.contains(p) || p.exists()
        });
        self.claimed.insert(dest.clone());

        if self.dry_run {
            tracing::debug!("Dry run: would copy {:?} -> {:?}", source, dest);
        } else {
            copy_with_times(source, &dest).map_err(|e| placement_error(&dest, e))?;
            tracing::debug!("Copied {:?} -> {:?}", source, dest);
        }

        Ok(dest)
    }

    /// Site URL for a gallery path: relative to the public directory,
    /// forward slashes, leading slash.
    pub fn public_url(&self, dest: &Path) -> Result<String, PipelineError> {
        let outside = || PipelineError::OutsidePublicDir {
            path: dest.to_path_buf(),
            public_dir: self.public_dir.clone(),
        };
        let relative = dest.strip_prefix(&self.public_dir).map_err(|_| outside())?;

        let mut url = String::new();
        for component in relative.components() {
            match component {
                Component::Normal(part) => {
                    url.push('/');
                    url.push_str(&part.to_string_lossy());
                }
                Component::CurDir => {}
                _ => return Err(outside()),
            }
        }
        Ok(url)
    }
}

/// Copy bytes and permissions, then carry over access/modification times.
fn copy_with_times(source: &Path, dest: &Path) -> std::io::Result<()> {
    std::fs::copy(source, dest)?;
    let meta = std::fs::metadata(source)?;
    filetime::set_file_times(
        dest,
        FileTime::from_last_access_time(&meta),
        FileTime::from_last_modification_time(&meta),
    )
}
