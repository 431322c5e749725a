//! Image preprocessing for CLIP embedding generation.
//!
//! CLIP ViT-B/32 expects:
//! - Shortest side resized to the input size (bicubic), then a center crop
//! - Normalization: (pixel/255 - mean) / std with the CLIP channel statistics
//! - Channel order: RGB
//! - Tensor layout: NCHW [batch, channels, height, width]

use image::imageops::FilterType;
use image::DynamicImage;
use ndarray::Array4;

/// Number of color channels (RGB).
const CHANNELS: usize = 3;

/// CLIP normalization mean (per-channel).
const NORM_MEAN: [f32; 3] = [0.481_454_66, 0.457_827_5, 0.408_210_73];

/// CLIP normalization std (per-channel).
const NORM_STD: [f32; 3] = [0.268_629_54, 0.261_302_58, 0.275_777_11];

/// Preprocess an image for CLIP inference.
///
/// Scales the shortest side to `image_size`, center-crops to
/// `image_size × image_size`, normalizes, and returns an NCHW tensor suitable
/// for ONNX Runtime.
pub fn preprocess(image: &DynamicImage, image_size: u32) -> Array4<f32> {
    let (new_w, new_h) = resized_dims(image.width(), image.height(), image_size);
    let resized = image.resize_exact(new_w, new_h, FilterType::CatmullRom);
    let left = (new_w - image_size) / 2;
    let top = (new_h - image_size) / 2;
    let rgb = resized.crop_imm(left, top, image_size, image_size).to_rgb8();

    let size = image_size as usize;
    let plane = size * size;
    let mut data = vec![0f32; CHANNELS * plane];
    for (i, pixel) in rgb.as_raw().chunks_exact(CHANNELS).enumerate() {
        for (c, &val) in pixel.iter().enumerate() {
            data[c * plane + i] = (val as f32 / 255.0 - NORM_MEAN[c]) / NORM_STD[c];
        }
    }

    Array4::from_shape_vec((1, CHANNELS, size, size), data)
        .unwrap_or_else(|_| Array4::zeros((1, CHANNELS, size, size)))
}

/// Dimensions after scaling the shortest side to `image_size`.
///
/// The long side is truncated, not rounded, matching torchvision's
/// `Resize(int)`.
fn resized_dims(width: u32, height: u32, image_size: u32) -> (u32, u32) {
    let (w, h) = (width.max(1) as u64, height.max(1) as u64);
    let size = image_size as u64;
    if w < h {
        (image_size, ((size * h / w) as u32).max(image_size))
    } else {
        (((size * w / h) as u32).max(image_size), image_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_preprocess_shape_landscape() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(640, 480));
        let tensor = preprocess(&img, 224);
        assert_eq!(tensor.shape(), &[1, 3, 224, 224]);
    }

    #[test]
    fn test_preprocess_shape_portrait_and_tiny() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(30, 500));
        assert_eq!(preprocess(&img, 224).shape(), &[1, 3, 224, 224]);

        let img = DynamicImage::ImageRgb8(RgbImage::new(1, 1));
        assert_eq!(preprocess(&img, 224).shape(), &[1, 3, 224, 224]);
    }

    #[test]
    fn test_resized_long_side_truncates() {
        // 224 * 1000 / 667 = 335.8
        assert_eq!(resized_dims(1000, 667, 224), (335, 224));
        assert_eq!(resized_dims(667, 1000, 224), (224, 335));
        assert_eq!(resized_dims(640, 480, 224), (298, 224));
        assert_eq!(resized_dims(300, 300, 224), (224, 224));
    }

    #[test]
    fn test_preprocess_uses_clip_statistics() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(50, 50, Rgb([255, 0, 255])));
        let tensor = preprocess(&img, 32);

        let red = tensor[[0, 0, 16, 16]];
        let green = tensor[[0, 1, 16, 16]];
        assert!((red - (1.0 - NORM_MEAN[0]) / NORM_STD[0]).abs() < 0.02);
        assert!((green - (0.0 - NORM_MEAN[1]) / NORM_STD[1]).abs() < 0.02);
    }

    #[test]
    fn test_preprocess_center_crops() {
        // Left third black, middle white, right third black: the crop keeps the middle.
        let mut img = RgbImage::from_pixel(300, 100, Rgb([0, 0, 0]));
        for x in 100..200 {
            for y in 0..100 {
                img.put_pixel(x, y, Rgb([255, 255, 255]));
            }
        }
        let tensor = preprocess(&DynamicImage::ImageRgb8(img), 10);
        let center = tensor[[0, 0, 5, 5]];
        assert!(center > 1.5, "center pixel should be white, got {center}");
    }
}
