//! Normalization of arbitrary source bitmaps into opaque RGB frames.
//!
//! Two steps, applied once before the candidate search:
//! 1. Color: grayscale is replicated, palette indices are expanded, and any
//!    alpha is composited onto an opaque background.
//! 2. Size: frames larger than the configured bounding box are downscaled once,
//!    preserving aspect ratio.

use tracing::debug;

use super::{resize_to_fit, ColorModel, FilterType, RgbFrame, SourceImage};
use crate::EncodeError;

/// Settings the normalizer needs from the encoder configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Maximum output width in pixels.
    pub max_width: u32,
    /// Maximum output height in pixels.
    pub max_height: u32,
    /// Resampling filter for the initial downscale.
    pub filter: FilterType,
    /// Opaque color that transparent pixels are composited onto.
    pub background: [u8; 3],
}

/// Normalize a source image into an opaque RGB frame within the bounding box.
///
/// # Errors
///
/// Returns `EncodeError::InvalidImage` if the source fails validation
/// (zero dimensions, buffer length mismatch, bad palette).
pub fn normalize(
    source: &SourceImage,
    options: &NormalizeOptions,
) -> Result<RgbFrame, EncodeError> {
    let frame = flatten_to_rgb(source, options.background)?;

    if frame.width <= options.max_width && frame.height <= options.max_height {
        return Ok(frame);
    }

    let capped = resize_to_fit(&frame, options.max_width, options.max_height, options.filter)?;
    debug!(
        from_width = frame.width,
        from_height = frame.height,
        to_width = capped.width,
        to_height = capped.height,
        "downscaled source to bounding box"
    );
    Ok(capped)
}

/// Convert any supported color model to 3-channel RGB, compositing alpha onto
/// `background`.
pub fn flatten_to_rgb(
    source: &SourceImage,
    background: [u8; 3],
) -> Result<RgbFrame, EncodeError> {
    source.validate()?;

    let pixel_count = source.pixels.len() / source.color_model.bytes_per_pixel();
    let mut out = Vec::with_capacity(pixel_count * 3);

    match &source.color_model {
        ColorModel::Rgb8 => out.extend_from_slice(&source.pixels),
        ColorModel::Rgba8 => {
            for px in source.pixels.chunks_exact(4) {
                let alpha = px[3];
                out.push(blend(px[0], alpha, background[0]));
                out.push(blend(px[1], alpha, background[1]));
                out.push(blend(px[2], alpha, background[2]));
            }
        }
        ColorModel::Luma8 => {
            for &luma in &source.pixels {
                out.extend_from_slice(&[luma, luma, luma]);
            }
        }
        ColorModel::LumaA8 => {
            for px in source.pixels.chunks_exact(2) {
                let (luma, alpha) = (px[0], px[1]);
                out.push(blend(luma, alpha, background[0]));
                out.push(blend(luma, alpha, background[1]));
                out.push(blend(luma, alpha, background[2]));
            }
        }
        ColorModel::Indexed { palette } => {
            // Indices were range-checked by validate()
            let lut: Vec<[u8; 3]> = palette
                .iter()
                .map(|&[r, g, b, a]| {
                    [
                        blend(r, a, background[0]),
                        blend(g, a, background[1]),
                        blend(b, a, background[2]),
                    ]
                })
                .collect();
            for &index in &source.pixels {
                out.extend_from_slice(&lut[usize::from(index)]);
            }
        }
    }

    Ok(RgbFrame::new(source.width, source.height, out))
}

/// Standard "over" compositing of a straight-alpha sample onto an opaque background.
#[inline]
fn blend(color: u8, alpha: u8, background: u8) -> u8 {
    let a = u32::from(alpha);
    let value = u32::from(color) * a + u32::from(background) * (255 - a);
    ((value + 127) / 255) as u8
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: flattening always yields exactly 3 bytes per pixel.
        #[test]
        fn prop_flatten_is_three_channel(
            (width, height) in (1u32..=16, 1u32..=16),
            seed in any::<u8>(),
        ) {
            let size = (width * height * 4) as usize;
            let pixels: Vec<u8> = (0..size)
                .map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed))
                .collect();
            let source = SourceImage::rgba(width, height, pixels);
            let frame = flatten_to_rgb(&source, [255u8; 3]).unwrap();
            prop_assert_eq!(frame.pixels.len(), (width * height * 3) as usize);
        }

        /// Property: a fully transparent pixel always becomes the background.
        #[test]
        fn prop_zero_alpha_is_background(
            r in any::<u8>(), g in any::<u8>(), b in any::<u8>(),
            background in any::<[u8; 3]>(),
        ) {
            let source = SourceImage::rgba(1, 1, vec![r, g, b, 0]);
            let frame = flatten_to_rgb(&source, background).unwrap();
            prop_assert_eq!(frame.pixels, background.to_vec());
        }

        /// Property: an opaque pixel keeps its color.
        #[test]
        fn prop_full_alpha_is_unchanged(
            r in any::<u8>(), g in any::<u8>(), b in any::<u8>(),
        ) {
            let source = SourceImage::rgba(1, 1, vec![r, g, b, 255]);
            let frame = flatten_to_rgb(&source, [255u8; 3]).unwrap();
            prop_assert_eq!(frame.pixels, vec![r, g, b]);
        }
    }
}
