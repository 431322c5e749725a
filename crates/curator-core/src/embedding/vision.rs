//! ONNX vision tower of the CLIP model.

use std::path::Path;
use std::sync::Mutex;

use ndarray::Array4;
use ort::session::Session;
use ort::value::Value;

use crate::error::PipelineError;

/// Projected image embedding; `last_hidden_state` lives in a different space.
const IMAGE_EMBEDS_OUTPUT: &str = "image_embeds";

const DEFAULT_INPUT: &str = "pixel_values";

/// A loaded `visual.onnx`. `Session::run` takes `&mut self`, hence the lock.
pub struct ClipVisionSession {
    session: Mutex<Session>,
    input_name: String,
}

impl ClipVisionSession {
    pub fn load(model_path: &Path) -> Result<Self, PipelineError> {
        let session = Session::builder()
            .map_err(|e| load_error("Cannot configure session for", model_path, e))?
            .commit_from_file(model_path)
            .map_err(|e| load_error("Cannot load vision encoder", model_path, e))?;

        let input_name = match session.inputs().first() {
            Some(input) => input.name().to_string(),
            None => DEFAULT_INPUT.to_string(),
        };
        tracing::debug!("Vision encoder ready ({:?} → {IMAGE_EMBEDS_OUTPUT})", input_name);

        Ok(Self {
            session: Mutex::new(session),
            input_name,
        })
    }

    /// Embed one `[1, 3, size, size]` pixel tensor. The result is unit length.
    pub fn embed(&self, pixels: &Array4<f32>, path: &Path) -> Result<Vec<f32>, PipelineError> {
        let failed = |message: String| PipelineError::Embedding {
            path: path.to_path_buf(),
            message,
        };

        let dims: Vec<i64> = pixels.shape().iter().map(|&d| d as i64).collect();
        let tensor = Value::from_array((dims, pixels.iter().copied().collect::<Vec<f32>>()))
            .map_err(|e| failed(format!("Bad pixel tensor: {e}")))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| failed("Vision session poisoned by an earlier panic".to_string()))?;
        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => tensor])
            .map_err(|e| failed(format!("Inference failed: {e}")))?;

        let (_, value) = outputs
            .iter()
            .find(|(name, _)| *name == IMAGE_EMBEDS_OUTPUT)
            .ok_or_else(|| failed(format!("No {IMAGE_EMBEDS_OUTPUT} output")))?;
        let (shape, data) = value
            .try_extract_tensor::<f32>()
            .map_err(|e| failed(format!("Unreadable {IMAGE_EMBEDS_OUTPUT}: {e}")))?;

        let mut embedding = first_row(shape, data)
            .ok_or_else(|| failed(format!("{IMAGE_EMBEDS_OUTPUT} has shape {:?}", shape)))?;
        crate::math::l2_normalize_in_place(&mut embedding);
        Ok(embedding)
    }
}

fn load_error(what: &str, path: &Path, e: impl std::fmt::Display) -> PipelineError {
    PipelineError::Model {
        message: format!("{what} {}: {e}", path.display()),
    }
}

/// The first embedding of a `[dim]` or `[batch, dim]` tensor.
fn first_row(shape: &[i64], data: &[f32]) -> Option<Vec<f32>> {
    match *shape {
        [_] => Some(data.to_vec()),
        [_, dim] => data.get(..usize::try_from(dim).ok()?).map(<[f32]>::to_vec),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_row_of_batch() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        assert_eq!(first_row(&[2, 3], &data), Some(vec![1.0, 2.0, 3.0]));
        assert_eq!(first_row(&[6], &data), Some(data.to_vec()));
    }

    #[test]
    fn test_first_row_rejects_odd_shapes() {
        assert_eq!(first_row(&[1, 1, 3], &[0.0; 3]), None);
        assert_eq!(first_row(&[1, 8], &[0.0; 3]), None);
    }

    #[test]
    fn test_missing_model_is_model_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ClipVisionSession::load(&dir.path().join("visual.onnx"))
            .err()
            .unwrap();
        assert!(matches!(err, PipelineError::Model { .. }));
    }
}
