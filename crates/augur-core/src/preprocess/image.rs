//! Image preprocessing.
//!
//! Decodes an uploaded image and normalizes it into the fixed input tensor
//! shape shared by 224x224 RGB classifiers: aspect-preserving scale to cover
//! the target box, center crop, then per-channel normalization to [-1, 1].
//!
//! The resize uses Lanczos3. Classifiers are trained against this exact
//! resampling; a different filter shifts pixel values and changes
//! predictions numerically.

use image::imageops::FilterType;
use ndarray::{Array4, ArrayD};

use crate::error::{AugurError, AugurResult};

/// Edge length of the model input square.
pub const TARGET_SIZE: u32 = 224;

/// Decode `bytes` into a (1, 224, 224, 3) float32 tensor, NHWC, values in
/// [-1, 1].
pub fn preprocess(bytes: &[u8]) -> AugurResult<ArrayD<f32>> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| AugurError::preprocessing(format!("invalid or corrupt image file: {e}")))?;

    // Cover-and-crop: scale so the shorter side reaches 224, crop the
    // longer side centered.
    let rgb = img
        .resize_to_fill(TARGET_SIZE, TARGET_SIZE, FilterType::Lanczos3)
        .to_rgb8();

    let size = TARGET_SIZE as usize;
    let mut tensor = Array4::<f32>::zeros((1, size, size, 3));
    for (x, y, pixel) in rgb.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, y as usize, x as usize, c]] = pixel[c] as f32 / 127.5 - 1.0;
        }
    }

    Ok(tensor.into_dyn())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = ImageBuffer::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        });
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_output_shape_is_fixed() {
        // Arbitrary input dimensions, portrait and landscape.
        for (w, h) in [(64, 64), (100, 37), (300, 500)] {
            let tensor = preprocess(&png_bytes(w, h)).unwrap();
            assert_eq!(tensor.shape(), &[1, 224, 224, 3], "for input {w}x{h}");
        }
    }

    #[test]
    fn test_values_are_normalized() {
        let tensor = preprocess(&png_bytes(320, 240)).unwrap();
        for &v in tensor.iter() {
            assert!((-1.0..=1.0).contains(&v), "value {v} out of range");
        }
        // A real photo-like gradient should not be all one value.
        let min = tensor.iter().cloned().fold(f32::INFINITY, f32::min);
        let max = tensor.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        assert!(max > min);
    }

    #[test]
    fn test_normalization_endpoints() {
        // Solid black and solid white map to the range endpoints.
        let black = ImageBuffer::from_pixel(10, 10, Rgb([0u8, 0, 0]));
        let mut bytes = Vec::new();
        black
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        let tensor = preprocess(&bytes).unwrap();
        assert!(tensor.iter().all(|&v| (v - (-1.0)).abs() < 1e-6));

        let white = ImageBuffer::from_pixel(10, 10, Rgb([255u8, 255, 255]));
        let mut bytes = Vec::new();
        white
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        let tensor = preprocess(&bytes).unwrap();
        assert!(tensor.iter().all(|&v| (v - 1.0).abs() < 1e-2));
    }

    #[test]
    fn test_rejects_non_image_bytes() {
        let bytes = b"RIFF....WAVEfmt not an image".to_vec();
        let before = bytes.clone();
        let result = preprocess(&bytes);
        assert!(matches!(result, Err(AugurError::Preprocessing(_))));
        // Input buffer is read-only to the preprocessor.
        assert_eq!(bytes, before);
    }
}
