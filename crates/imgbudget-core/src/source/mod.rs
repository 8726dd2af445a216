//! Source bitmaps and the normalizer stage.
//!
//! This module provides functionality for:
//! - Describing caller-supplied bitmaps in any supported color model
//! - Flattening alpha and expanding grayscale/palette data to opaque RGB
//! - Capping the initial frame size before the candidate search
//! - Resizing frames for the search's scale tiers
//!
//! File-format sniffing and byte decoding are left to the caller; this module
//! starts from already decoded pixels.

mod normalize;
mod resize;
mod types;

pub use normalize::{flatten_to_rgb, normalize, NormalizeOptions};
pub use resize::{resize, resize_by_scale, resize_to_fit, scaled_dimensions};
pub use types::{ColorModel, FilterType, RgbFrame, SourceImage};
