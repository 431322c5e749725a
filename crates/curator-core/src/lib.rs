//! Curator Core - zero-shot photo categorization for a static gallery.
//!
//! Curator takes a flat folder of photos, assigns each one to a fixed set of
//! project categories with a local CLIP model, copies it into a per-category
//! gallery folder and writes a JSON summary the website reads.
//!
//! # Architecture
//!
//! ```text
//! Discover → Decode → Embed (CLIP) → Score vs. category bank → Copy → JSON
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use curator_core::{Categorizer, Config, RunOptions};
//!
//! fn main() -> curator_core::Result<()> {
//!     let config = Config::load()?;
//!     let categorizer = Categorizer::with_clip(config)?;
//!
//!     let files = categorizer.discover(0)?;
//!     let report = categorizer.run(&files, &RunOptions::default(), |_| {})?;
//!     println!("Processed {} images", report.processed());
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod classify;
pub mod config;
pub mod embedding;
pub mod error;
pub mod math;
pub mod pipeline;
pub mod types;

// Re-exports for convenient access
pub use classify::{CategoryBank, Classifier};
pub use config::{CategoryConfig, Config};
pub use embedding::{ClipEngine, ImageEncoder, TextEncoder};
pub use error::{ConfigError, CuratorError, PipelineError, PipelineResult, Result};
pub use pipeline::{Categorizer, PlacedFile, RunOptions, RunReport, Summary};
pub use types::{Classification, SummaryRecord};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
