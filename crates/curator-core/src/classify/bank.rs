//! Pre-computed category vectors for fast scoring.

use crate::config::CategoryConfig;
use crate::error::PipelineError;
use crate::embedding::TextEncoder;
use crate::math;

/// One mean text vector per category, kept in configuration order.
#[derive(Debug, Clone)]
pub struct CategoryBank {
    names: Vec<String>,
    vectors: Vec<Vec<f32>>,
}

impl CategoryBank {
    /// Embed every category's prompts and average them into one vector each.
    ///
    /// Each prompt embedding is L2-normalized before averaging; the mean is
    /// left as is, so category vectors may be shorter than unit length.
    pub fn build(
        categories: &[CategoryConfig],
        encoder: &impl TextEncoder,
    ) -> Result<Self, PipelineError> {
        let mut names = Vec::with_capacity(categories.len());
        let mut vectors = Vec::with_capacity(categories.len());

        for category in categories {
            let embeddings = encoder.encode_batch(&category.prompts)?;
            if embeddings.len() != category.prompts.len() {
                return Err(PipelineError::Model {
                    message: format!(
                        "Text encoder returned {} embeddings for {} prompts of {:?}",
                        embeddings.len(),
                        category.prompts.len(),
                        category.name
                    ),
                });
            }

            let normalized: Vec<Vec<f32>> =
                embeddings.iter().map(|e| math::l2_normalize(e)).collect();
            let vector = math::mean(&normalized).ok_or_else(|| PipelineError::Model {
                message: format!(
                    "Cannot build a vector for {:?}: no prompts or mismatched dimensions",
                    category.name
                ),
            })?;

            tracing::debug!(
                "Category {:?}: {} prompt(s), {} dims",
                category.name,
                category.prompts.len(),
                vector.len()
            );
            names.push(category.name.clone());
            vectors.push(vector);
        }

        tracing::info!("Category bank ready: {} categories", names.len());
        Ok(Self { names, vectors })
    }

    /// Create a bank from pre-computed vectors (for testing).
    #[cfg(test)]
    pub fn from_raw(entries: Vec<(&str, Vec<f32>)>) -> Self {
        let (names, vectors) = entries
            .into_iter()
            .map(|(name, v)| (name.to_string(), v))
            .unzip();
        Self { names, vectors }
    }

    /// Return the category with the strictly highest dot product.
    ///
    /// Ties go to the category that comes first. `None` when the bank is
    /// empty or no score beats negative infinity (e.g. all NaN).
    pub fn best_match(&self, embedding: &[f32]) -> Option<(&str, f32)> {
        let mut best: Option<(&str, f32)> = None;
        let mut best_score = f32::NEG_INFINITY;

        for (name, vector) in self.names.iter().zip(&self.vectors) {
            let score = math::dot(embedding, vector);
            if score > best_score {
                best = Some((name.as_str(), score));
                best_score = score;
            }
        }

        best
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
