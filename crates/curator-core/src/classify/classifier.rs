//! Per-image classification: decode, embed, arg-max over the category bank.

use std::path::Path;

use crate::embedding::ImageEncoder;
use crate::error::PipelineError;
use crate::pipeline::decode::ImageDecoder;
use crate::types::Classification;

use super::bank::CategoryBank;

/// Assigns each image to its best-matching category.
pub struct Classifier<E> {
    encoder: E,
    bank: CategoryBank,
}

impl<E: ImageEncoder> Classifier<E> {
    pub fn new(encoder: E, bank: CategoryBank) -> Self {
        Self { encoder, bank }
    }

    /// Classify the image at `path`.
    ///
    /// The image is decoded upright as RGB, embedded, and scored against every
    /// category. Decoding and embedding failures are returned as errors, as
    /// is an empty bank.
    pub fn classify(&self, path: &Path) -> Result<Classification, PipelineError> {
        if self.bank.is_empty() {
            return Err(PipelineError::NoCategories(path.to_path_buf()));
        }

        let embedding = {
            let decoded = ImageDecoder::decode(path)?;
            self.encoder.embed_image(&decoded.image, path)?
        };

        let (category, score) = self
            .bank
            .best_match(&embedding)
            .ok_or_else(|| PipelineError::Embedding {
                path: path.to_path_buf(),
                message: "No category produced a comparable score".to_string(),
            })?;

        Ok(Classification {
            category: category.to_string(),
            score,
        })
    }
}
