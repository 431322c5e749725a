//! CLIP text encoder for generating prompt embeddings.
//!
//! Loads the CLIP text ONNX model and tokenizer and encodes text strings to
//! vectors aligned with the vision encoder's space.

use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;
use ort::value::Value;

use crate::error::PipelineError;

use super::{TEXT_MODEL_FILENAME, TOKENIZER_FILENAME};

/// Output holding the projected, cross-modal text embedding.
const TEXT_EMBEDS_OUTPUT: &str = "text_embeds";

/// CLIP text encoder wrapper.
///
/// Uses the same `Mutex<Session>` pattern as the vision encoder.
pub struct ClipTextEncoder {
    session: Mutex<Session>,
    tokenizer: tokenizers::Tokenizer,
    max_length: usize,
    /// Some exports take `attention_mask` alongside `input_ids`.
    wants_attention_mask: bool,
}

impl ClipTextEncoder {
    /// Load the text encoder from the model directory.
    ///
    /// Expects `text_model.onnx` and `tokenizer.json` in `model_dir`.
    pub fn new(model_dir: &Path, max_length: usize) -> Result<Self, PipelineError> {
        let text_model_path = model_dir.join(TEXT_MODEL_FILENAME);
        let tokenizer_path = model_dir.join(TOKENIZER_FILENAME);

        if !text_model_path.exists() {
            return Err(PipelineError::Model {
                message: format!(
                    "Text encoder not found at {:?}. Run `curator models download` first.",
                    text_model_path
                ),
            });
        }

        if !tokenizer_path.exists() {
            return Err(PipelineError::Model {
                message: format!(
                    "Tokenizer not found at {:?}. Run `curator models download` first.",
                    tokenizer_path
                ),
            });
        }

        let session = Session::builder()
            .map_err(|e| PipelineError::Model {
                message: format!("Failed to create ONNX session builder: {e}"),
            })?
            .commit_from_file(&text_model_path)
            .map_err(|e| PipelineError::Model {
                message: format!("Failed to load text encoder model: {e}"),
            })?;

        let tokenizer = tokenizers::Tokenizer::from_file(&tokenizer_path).map_err(|e| {
            PipelineError::Model {
                message: format!("Failed to load tokenizer: {e}"),
            }
        })?;

        let wants_attention_mask = session
            .inputs()
            .iter()
            .any(|i| i.name() == "attention_mask");

        tracing::debug!(
            "Loaded CLIP text encoder (inputs: {:?}, outputs: {:?})",
            session
                .inputs()
                .iter()
                .map(|i| i.name())
                .collect::<Vec<_>>(),
            session
                .outputs()
                .iter()
                .map(|o| o.name())
                .collect::<Vec<_>>()
        );

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            max_length,
            wants_attention_mask,
        })
    }

    /// Encode a batch of text strings to normalized embeddings.
    pub fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, PipelineError> {
        let batch_size = texts.len();
        if batch_size == 0 {
            return Ok(vec![]);
        }

        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| PipelineError::Model {
                message: format!("Tokenization failed: {e}"),
            })?;

        let token_ids: Vec<Vec<u32>> = encodings.iter().map(|e| e.get_ids().to_vec()).collect();
        let (input_ids, attention_mask) = pack_token_ids(&token_ids, self.max_length);
        let shape = vec![batch_size as i64, self.max_length as i64];

        let mut session = self.session.lock().map_err(|e| PipelineError::Model {
            message: format!("Text encoder lock poisoned: {e}"),
        })?;

        let input_ids_value =
            Value::from_array((shape.clone(), input_ids)).map_err(|e| PipelineError::Model {
                message: format!("Failed to create input tensor: {e}"),
            })?;

        let result = if self.wants_attention_mask {
            let mask_value =
                Value::from_array((shape, attention_mask)).map_err(|e| PipelineError::Model {
                    message: format!("Failed to create attention mask tensor: {e}"),
                })?;
            session.run(ort::inputs![
                "input_ids" => input_ids_value,
                "attention_mask" => mask_value
            ])
        } else {
            session.run(ort::inputs!["input_ids" => input_ids_value])
        };
        let outputs = result.map_err(|e| PipelineError::Model {
            message: format!("Text encoder inference failed: {e}"),
        })?;

        let text_embeds = outputs
            .iter()
            .find(|(name, _)| *name == TEXT_EMBEDS_OUTPUT)
            .ok_or_else(|| PipelineError::Model {
                message: format!("Text encoder did not produce {TEXT_EMBEDS_OUTPUT}"),
            })?;

        let (shape, data) =
            text_embeds
                .1
                .try_extract_tensor::<f32>()
                .map_err(|e| PipelineError::Model {
                    message: format!("Failed to extract {TEXT_EMBEDS_OUTPUT}: {e}"),
                })?;

        let embedding_dim = match shape.len() {
            2 => shape[1] as usize,
            _ => data.len() / batch_size,
        };
        if embedding_dim == 0 {
            return Err(PipelineError::Model {
                message: format!("Unexpected {TEXT_EMBEDS_OUTPUT} shape: {:?}", shape),
            });
        }

        Ok(data
            .chunks(embedding_dim)
            .take(batch_size)
            .map(crate::math::l2_normalize)
            .collect())
    }
}

/// Pack token id sequences into flat, zero-padded `[batch, max_length]`
/// input and attention-mask buffers.
///
/// Over-long sequences are cut so that their final token (end-of-text, which
/// CLIP pools on) survives in the last slot.
fn pack_token_ids(sequences: &[Vec<u32>], max_length: usize) -> (Vec<i64>, Vec<i64>) {
    let mut input_ids = vec![0i64; sequences.len() * max_length];
    let mut attention_mask = vec![0i64; sequences.len() * max_length];

    for (i, ids) in sequences.iter().enumerate() {
        let row = i * max_length;
        let kept = ids.len().min(max_length);
        for (j, &id) in ids.iter().take(kept).enumerate() {
            input_ids[row + j] = id as i64;
            attention_mask[row + j] = 1;
        }
        if ids.len() > max_length && max_length > 0 {
            if let Some(&last) = ids.last() {
                input_ids[row + max_length - 1] = last as i64;
            }
        }
    }

    (input_ids, attention_mask)
}
