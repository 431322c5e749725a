//! Gallery pipeline components.
//!
//! The stages a categorization run goes through:
//! - **discovery**: Find supported photos in the source folder
//! - **decode**: Load images upright and in RGB
//! - **naming**: Sanitize file names and resolve collisions
//! - **placement**: Copy photos into category folders
//! - **summary**: Collect and write the JSON summary
//! - **processor**: Orchestrates a full run

pub mod decode;
pub mod discovery;
pub mod naming;
pub mod placement;
pub mod processor;
pub mod summary;

// Re-exports for convenient access
pub use decode::{DecodedImage, ImageDecoder, Orientation};
pub use discovery::{DiscoveredFile, FileDiscovery};
pub use placement::GalleryWriter;
pub use processor::{Categorizer, PlacedFile, RunOptions, RunReport};
pub use summary::Summary;
