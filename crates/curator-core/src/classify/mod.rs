//! Zero-shot categorization against a fixed category table.
//!
//! Each category's prompts are embedded once into a [`CategoryBank`]; images
//! are then scored against every category vector by dot product.

pub mod bank;
pub mod classifier;

pub use bank::CategoryBank;
pub use classifier::Classifier;
