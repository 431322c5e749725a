//! CLIP embedding generation.
//!
//! Images and prompts are embedded into the same vector space by a CLIP
//! ViT-B/32 model exported to ONNX and run locally via ONNX Runtime. The
//! rest of the crate only sees the [`ImageEncoder`] and [`TextEncoder`]
//! traits, so any backend that returns L2-normalized vectors will do.
//!
//! # Usage
//!
//! ```rust,ignore
//! use curator_core::{Config, ClipEngine};
//!
//! let config = Config::default();
//! let engine = ClipEngine::load(&config)?;
//! let vectors = engine.encode_batch(&["a deck".to_string()])?;
//! ```

pub(crate) mod preprocess;
pub(crate) mod text;
pub(crate) mod vision;

use std::path::{Path, PathBuf};

use image::DynamicImage;

use crate::config::Config;
use crate::error::PipelineError;

use self::preprocess::preprocess;
use self::text::ClipTextEncoder;
use self::vision::ClipVisionSession;

/// The vision encoder ONNX filename.
pub const VISUAL_MODEL_FILENAME: &str = "visual.onnx";

/// The text encoder ONNX filename.
pub const TEXT_MODEL_FILENAME: &str = "text_model.onnx";

/// The tokenizer filename.
pub const TOKENIZER_FILENAME: &str = "tokenizer.json";

/// Turns a decoded image into an L2-normalized embedding.
pub trait ImageEncoder {
    fn embed_image(&self, image: &DynamicImage, path: &Path) -> Result<Vec<f32>, PipelineError>;
}

/// Turns text prompts into L2-normalized embeddings, one per input.
pub trait TextEncoder {
    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, PipelineError>;
}

/// CLIP vision + text encoders loaded from one model directory.
pub struct ClipEngine {
    vision: ClipVisionSession,
    text: ClipTextEncoder,
    image_size: u32,
}

impl ClipEngine {
    /// Load both encoders and the tokenizer.
    ///
    /// Expects `visual.onnx`, `text_model.onnx` and `tokenizer.json` in
    /// `{model_dir}/{embedding.model}/`.
    pub fn load(config: &Config) -> Result<Self, PipelineError> {
        let dir = config.embedding_model_dir();
        let visual_path = dir.join(VISUAL_MODEL_FILENAME);

        if !visual_path.exists() {
            return Err(PipelineError::Model {
                message: format!(
                    "Vision encoder not found at {:?}. Run `curator models download` first.",
                    visual_path
                ),
            });
        }

        tracing::info!("Loading CLIP model from {:?}", dir);
        let vision = ClipVisionSession::load(&visual_path)?;
        let text = ClipTextEncoder::new(&dir, config.embedding.text_max_length)?;
        tracing::info!("CLIP model loaded successfully");

        Ok(Self {
            vision,
            text,
            image_size: config.embedding.image_size,
        })
    }

    /// Check whether all model files exist on disk.
    pub fn model_exists(config: &Config) -> bool {
        model_files(config).iter().all(|p| p.exists())
    }
}

/// Paths of every file the engine needs, in download order.
pub fn model_files(config: &Config) -> [PathBuf; 3] {
    let dir = config.embedding_model_dir();
    [
        dir.join(VISUAL_MODEL_FILENAME),
        dir.join(TEXT_MODEL_FILENAME),
        dir.join(TOKENIZER_FILENAME),
    ]
}

impl ImageEncoder for ClipEngine {
    fn embed_image(&self, image: &DynamicImage, path: &Path) -> Result<Vec<f32>, PipelineError> {
        let tensor = preprocess(image, self.image_size);
        self.vision.embed(&tensor, path)
    }
}

impl TextEncoder for ClipEngine {
    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, PipelineError> {
        self.text.encode_batch(texts)
    }
}
