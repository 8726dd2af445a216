//! Frame resizing for the normalizer cap and the scale tiers.
//!
//! All functions return new `RgbFrame` instances without modifying the input.

use super::{FilterType, RgbFrame};
use crate::EncodeError;

/// Resize a frame to exact dimensions.
///
/// # Errors
///
/// Returns `EncodeError::InvalidImage` if a target dimension is zero or the
/// frame buffer does not match its dimensions.
pub fn resize(
    frame: &RgbFrame,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<RgbFrame, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidImage(format!(
            "cannot resize to {}x{}",
            width, height
        )));
    }

    // Fast path: if dimensions match, just clone
    if frame.width == width && frame.height == height {
        return Ok(frame.clone());
    }

    let rgb_image = frame.to_rgb_image().ok_or_else(|| {
        EncodeError::InvalidImage("frame buffer does not match its dimensions".to_string())
    })?;

    let resized = image::imageops::resize(&rgb_image, width, height, filter.to_image_filter());

    Ok(RgbFrame::from_rgb_image(resized))
}

/// Resize a frame to fit inside a `max_width` x `max_height` box, preserving
/// aspect ratio. Frames that already fit are returned unchanged (never upscaled).
pub fn resize_to_fit(
    frame: &RgbFrame,
    max_width: u32,
    max_height: u32,
    filter: FilterType,
) -> Result<RgbFrame, EncodeError> {
    if max_width == 0 || max_height == 0 {
        return Err(EncodeError::InvalidConfig(format!(
            "bounding box must be non-zero, got {}x{}",
            max_width, max_height
        )));
    }

    let (new_width, new_height) =
        calculate_fit_dimensions(frame.width, frame.height, max_width, max_height);

    resize(frame, new_width, new_height, filter)
}

/// Resize a frame by a uniform scale factor.
pub fn resize_by_scale(
    frame: &RgbFrame,
    scale: f32,
    filter: FilterType,
) -> Result<RgbFrame, EncodeError> {
    let (width, height) = scaled_dimensions(frame.width, frame.height, scale);
    resize(frame, width, height, filter)
}

/// Dimensions after applying `scale` to both axes, never below 1x1.
pub fn scaled_dimensions(width: u32, height: u32, scale: f32) -> (u32, u32) {
    let scale = f64::from(scale);
    let scaled = |d: u32| ((f64::from(d) * scale).round() as u32).max(1);
    (scaled(width), scaled(height))
}

/// Calculate dimensions that fit within a bounding box while preserving aspect ratio.
fn calculate_fit_dimensions(
    width: u32,
    height: u32,
    max_width: u32,
    max_height: u32,
) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (0, 0);
    }

    if width <= max_width && height <= max_height {
        return (width, height);
    }

    let ratio = (f64::from(max_width) / f64::from(width))
        .min(f64::from(max_height) / f64::from(height));

    let new_width = ((f64::from(width) * ratio).round() as u32).clamp(1, max_width);
    let new_height = ((f64::from(height) * ratio).round() as u32).clamp(1, max_height);
    (new_width, new_height)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: fitted dimensions stay inside the box and never upscale.
        #[test]
        fn prop_fit_stays_in_box(
            width in 1u32..=10_000,
            height in 1u32..=10_000,
            max_width in 1u32..=4096,
            max_height in 1u32..=4096,
        ) {
            let (w, h) = calculate_fit_dimensions(width, height, max_width, max_height);
            prop_assert!(w >= 1 && h >= 1);
            prop_assert!(w <= max_width && h <= max_height);
            prop_assert!(w <= width && h <= height);
        }

        /// Property: scaling never produces a zero axis or grows the frame.
        #[test]
        fn prop_scaled_dimensions_bounded(
            width in 1u32..=10_000,
            height in 1u32..=10_000,
            scale in 0.01f32..=1.0,
        ) {
            let (w, h) = scaled_dimensions(width, height, scale);
            prop_assert!(w >= 1 && h >= 1);
            prop_assert!(w <= width && h <= height);
        }
    }
}
