//! Run orchestration: discover → classify → place → summarize.

use std::path::PathBuf;

use crate::classify::{CategoryBank, Classifier};
use crate::config::Config;
use crate::embedding::{ClipEngine, ImageEncoder};
use crate::error::Result;
use crate::types::{Classification, SummaryRecord};

use super::discovery::{DiscoveredFile, FileDiscovery};
use super::placement::GalleryWriter;
use super::summary::Summary;

/// Options for one categorization run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Log classifications without copying files or writing the summary
    pub dry_run: bool,
    /// Remove the gallery directory before copying
    pub clean: bool,
    /// Process only the first N files after sorting (0 = all)
    pub limit: usize,
}

/// What happened to one file during a run.
#[derive(Debug, Clone)]
pub struct PlacedFile {
    /// Original file name
    pub source: String,
    /// Winning category and its score
    pub classification: Classification,
    /// Gallery path the file was (or would be) copied to
    pub dest: PathBuf,
}

/// Outcome of a completed run.
#[derive(Debug)]
pub struct RunReport {
    /// Records per category, already sorted
    pub summary: Summary,
    /// Gallery root the files went into
    pub gallery_dir: PathBuf,
    /// Where the summary was written; `None` on dry runs
    pub summary_file: Option<PathBuf>,
}

impl RunReport {
    pub fn processed(&self) -> usize {
        self.summary.total()
    }
}

/// Sorts a source folder of photos into gallery categories.
pub struct Categorizer<E> {
    config: Config,
    discovery: FileDiscovery,
    classifier: Classifier<E>,
}

impl Categorizer<ClipEngine> {
    /// Load the CLIP model and embed the configured categories.
    ///
    /// Any model or tokenizer failure is returned before a single file is
    /// touched.
    pub fn with_clip(config: Config) -> Result<Self> {
        let engine = ClipEngine::load(&config)?;
        let bank = CategoryBank::build(&config.categories, &engine)?;
        Ok(Self::new(config, Classifier::new(engine, bank)))
    }
}

impl<E: ImageEncoder> Categorizer<E> {
    pub fn new(config: Config, classifier: Classifier<E>) -> Self {
        Self {
            discovery: FileDiscovery::new(config.processing.clone()),
            config,
            classifier,
        }
    }

    /// List the files a run with this `limit` would process.
    pub fn discover(&self, limit: usize) -> Result<Vec<DiscoveredFile>> {
        Ok(self.discovery.discover(&self.config.source_dir(), limit)?)
    }

    /// Process `files` in order, calling `on_placed` after each one.
    ///
    /// The first classification or copy error aborts the run.
    pub fn run(
        &self,
        files: &[DiscoveredFile],
        options: &RunOptions,
        mut on_placed: impl FnMut(&PlacedFile),
    ) -> Result<RunReport> {
        let gallery_dir = self.config.gallery_dir();
        let mut writer = self.prepare_gallery(options)?;
        let mut summary = Summary::new();

        for file in files {
            let classification = self.classifier.classify(&file.path)?;
            let dest = writer.place(&file.path, &classification.category)?;
            let url = writer.public_url(&dest)?;

            tracing::info!(
                "{} -> {} ({:.4})",
                file.file_name,
                classification.category,
                classification.score
            );
            summary.push(
                &classification.category,
                SummaryRecord::new(url, classification.score, file.file_name.clone()),
            );
            on_placed(&PlacedFile {
                source: file.file_name.clone(),
                classification,
                dest,
            });
        }

        summary.sort();

        let summary_file = if options.dry_run {
            None
        } else {
            let path = self.config.summary_file();
            summary.save(&path)?;
            Some(path)
        };

        Ok(RunReport {
            summary,
            gallery_dir,
            summary_file,
        })
    }

    /// Apply `--clean` and create the gallery root and summary directory.
    ///
    /// This happens on dry runs too; only copies and the summary file itself
    /// are skipped.
    fn prepare_gallery(&self, options: &RunOptions) -> Result<GalleryWriter> {
        let gallery_dir = self.config.gallery_dir();

        if options.clean && gallery_dir.exists() {
            tracing::info!("Removing existing gallery at {:?}", gallery_dir);
            std::fs::remove_dir_all(&gallery_dir)?;
        }
        std::fs::create_dir_all(&gallery_dir)?;
        if let Some(parent) = self.config.summary_file().parent() {
            std::fs::create_dir_all(parent)?;
        }

        Ok(GalleryWriter::new(
            gallery_dir,
            self.config.public_dir(),
            options.dry_run,
        ))
    }
}
