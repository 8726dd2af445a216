//! JPEG encode step.
//!
//! The search calls the encoder through the [`FrameEncoder`] trait so that the
//! codec is a single seam. [`JpegFrameEncoder`] is the production
//! implementation, backed by the `image` crate's baseline JPEG encoder, which
//! is deterministic for identical input.

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;

use crate::source::RgbFrame;
use crate::EncodeError;

/// One lossy encode of an RGB frame at a given quality.
pub trait FrameEncoder {
    /// Encode `frame` and return the codec's byte stream.
    fn encode(&mut self, frame: &RgbFrame, quality: u8) -> Result<Vec<u8>, EncodeError>;
}

/// Baseline JPEG encoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct JpegFrameEncoder;

impl FrameEncoder for JpegFrameEncoder {
    fn encode(&mut self, frame: &RgbFrame, quality: u8) -> Result<Vec<u8>, EncodeError> {
        encode_jpeg(&frame.pixels, frame.width, frame.height, quality)
    }
}

/// Encode RGB pixel data to JPEG bytes.
///
/// # Arguments
///
/// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `quality` - JPEG quality, clamped to 1-100
///
/// # Errors
///
/// Returns `EncodeError::InvalidImage` if the dimensions are zero, the pixel
/// buffer does not match them, or the codec rejects the frame.
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidImage(format!(
            "cannot encode a {}x{} frame",
            width, height
        )));
    }

    let expected_len = (width as usize) * (height as usize) * 3;
    if pixels.len() != expected_len {
        return Err(EncodeError::InvalidImage(format!(
            "expected {} bytes of RGB data, got {}",
            expected_len,
            pixels.len()
        )));
    }

    let quality = quality.clamp(1, 100);

    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::InvalidImage(format!("JPEG encoding failed: {}", e)))?;

    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> Vec<u8> {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push((x * 255 / width) as u8);
                pixels.push((y * 255 / height) as u8);
                pixels.push(((x + y) * 127 / (width + height)) as u8);
            }
        }
        pixels
    }

    #[test]
    fn test_encode_jpeg_markers() {
        let jpeg = encode_jpeg(&vec![128u8; 64 * 48 * 3], 64, 48, 85).unwrap();

        // SOI and EOI markers
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
        assert_eq!(&jpeg[jpeg.len() - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_encode_jpeg_decodes_back() {
        let jpeg = encode_jpeg(&gradient(40, 30), 40, 30, 70).unwrap();
        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (40, 30));
        assert!(!decoded.color().has_alpha());
    }

    #[test]
    fn test_lower_quality_is_smaller() {
        let pixels = gradient(120, 90);
        let high = encode_jpeg(&pixels, 120, 90, 85).unwrap();
        let low = encode_jpeg(&pixels, 120, 90, 15).unwrap();
        assert!(low.len() < high.len());
    }

    #[test]
    fn test_quality_clamping() {
        let pixels = vec![128u8; 10 * 10 * 3];
        assert!(encode_jpeg(&pixels, 10, 10, 0).is_ok());
        assert!(encode_jpeg(&pixels, 10, 10, 255).is_ok());
    }

    #[test]
    fn test_invalid_pixel_data() {
        let pixels = vec![128u8; 99 * 100 * 3];
        assert!(matches!(
            encode_jpeg(&pixels, 100, 100, 90),
            Err(EncodeError::InvalidImage(_))
        ));
    }

    #[test]
    fn test_zero_dimensions() {
        assert!(matches!(
            encode_jpeg(&[], 0, 100, 90),
            Err(EncodeError::InvalidImage(_))
        ));
    }

    #[test]
    fn test_frame_encoder_matches_free_function() {
        let frame = RgbFrame::new(16, 16, gradient(16, 16));
        let via_trait = JpegFrameEncoder.encode(&frame, 50).unwrap();
        let direct = encode_jpeg(&frame.pixels, 16, 16, 50).unwrap();
        assert_eq!(via_trait, direct);
    }
}
