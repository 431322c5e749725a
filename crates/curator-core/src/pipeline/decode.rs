//! Image decoding with content-based format detection and EXIF orientation.

use std::io::Cursor;
use std::path::Path;

use exif::{In, Reader, Tag, Value};
use image::{DynamicImage, ImageFormat};

use crate::error::PipelineError;

/// EXIF orientation, as the transform needed to display the pixels upright.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Orientation {
    #[default]
    Normal,
    MirroredHorizontal,
    Rotated180,
    MirroredVertical,
    MirroredHorizontalAnd270Cw,
    Rotated90Cw,
    MirroredHorizontalAnd90Cw,
    Rotated270Cw,
}

impl Orientation {
    /// Map the raw EXIF `Orientation` value (1-8). Unknown values are `Normal`.
    pub const fn from_exif(value: u32) -> Self {
        match value {
            2 => Self::MirroredHorizontal,
            3 => Self::Rotated180,
            4 => Self::MirroredVertical,
            5 => Self::MirroredHorizontalAnd270Cw,
            6 => Self::Rotated90Cw,
            7 => Self::MirroredHorizontalAnd90Cw,
            8 => Self::Rotated270Cw,
            _ => Self::Normal,
        }
    }

    /// Rotate/flip `img` so it displays upright.
    pub fn apply(self, img: DynamicImage) -> DynamicImage {
        match self {
            Self::Normal => img,
            Self::MirroredHorizontal => img.fliph(),
            Self::Rotated180 => img.rotate180(),
            Self::MirroredVertical => img.flipv(),
            Self::MirroredHorizontalAnd270Cw => img.fliph().rotate270(),
            Self::Rotated90Cw => img.rotate90(),
            Self::MirroredHorizontalAnd90Cw => img.fliph().rotate90(),
            Self::Rotated270Cw => img.rotate270(),
        }
    }
}

/// Result of decoding an image.
pub struct DecodedImage {
    /// Upright RGB8 pixels
    pub image: DynamicImage,
    /// Detected image format
    pub format: ImageFormat,
    /// Orientation that was applied
    pub orientation: Orientation,
}

/// Opens images the way the classifier needs them: upright and RGB.
pub struct ImageDecoder;

impl ImageDecoder {
    /// Read, decode, orient and convert an image file to RGB8.
    ///
    /// The file is read once; the buffer is dropped before returning.
    pub fn decode(path: &Path) -> Result<DecodedImage, PipelineError> {
        let bytes = std::fs::read(path).map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: format!("Cannot read file: {}", e),
        })?;
        Self::decode_bytes(&bytes, path)
    }

    /// Decode an in-memory image buffer. `path` is used for errors and as a
    /// format hint when the content is not recognized.
    pub fn decode_bytes(bytes: &[u8], path: &Path) -> Result<DecodedImage, PipelineError> {
        let mut reader = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| PipelineError::Decode {
                path: path.to_path_buf(),
                message: format!("Cannot detect image format: {}", e),
            })?;

        let format = match reader.format() {
            Some(f) => f,
            None => {
                let guessed = ImageFormat::from_path(path).map_err(|_| PipelineError::Decode {
                    path: path.to_path_buf(),
                    message: "Unrecognized image format".to_string(),
                })?;
                reader.set_format(guessed);
                guessed
            }
        };

        let image = reader.decode().map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let orientation = read_orientation(bytes);
        if orientation != Orientation::Normal {
            tracing::trace!("Applying {:?} to {:?}", orientation, path);
        }
        let image = DynamicImage::ImageRgb8(orientation.apply(image).to_rgb8());

        Ok(DecodedImage {
            image,
            format,
            orientation,
        })
    }
}

/// Read the EXIF orientation tag, defaulting to `Normal` when absent.
fn read_orientation(bytes: &[u8]) -> Orientation {
    let Ok(exif) = Reader::new().read_from_container(&mut Cursor::new(bytes)) else {
        return Orientation::Normal;
    };

    exif.get_field(Tag::Orientation, In::PRIMARY)
        .and_then(|f| match &f.value {
            Value::Short(v) => v.first().map(|&x| x as u32),
            Value::Long(v) => v.first().copied(),
            _ => None,
        })
        .map(Orientation::from_exif)
        .unwrap_or_default()
}
