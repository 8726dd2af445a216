//! Budgeted encoding WASM bindings.
//!
//! This module exposes the size-constrained encoder to JavaScript.
//!
//! # Functions
//!
//! - [`encode_image_bytes`] - Decode a PNG/JPEG file and encode it within budget
//! - [`encode_rgba`] - Encode raw RGBA pixels (e.g. from a canvas) within budget
//! - [`default_config`] - The default config as a plain JS object
//! - [`effective_target`] - The character target a config resolves to
//!
//! # Example
//!
//! ```typescript
//! import { encode_image_bytes } from '@imgbudget/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! try {
//!   const image = encode_image_bytes(bytes, { maxEncodedChars: 1_000_000 });
//!   console.log(`${image.width}x${image.height} q${image.quality}, ${image.sizeMb} MB`);
//! } catch (e) {
//!   if (e.name === 'PayloadTooLarge') console.warn(`gave up at scale ${e.lastScale}`);
//! }
//! ```

use crate::load::encode_file;
use crate::types::{config_from_js, to_js_error, JsEncodedImage};
use imgbudget_core::{encode_within_budget, EncoderConfig, SourceImage};
use wasm_bindgen::prelude::*;

/// Decode an image file and encode it as base64 JPEG within the character budget.
///
/// # Arguments
///
/// * `bytes` - PNG or JPEG file contents as a `Uint8Array`
/// * `config` - Optional config object; omitted keys use their defaults
///
/// # Errors
///
/// Throws an `Error` whose `name` is:
/// - `InvalidImage` if the bytes cannot be decoded
/// - `InvalidConfig` if the config cannot be parsed or fails validation
/// - `PayloadTooLarge` if no candidate fits the budget
#[wasm_bindgen]
pub fn encode_image_bytes(bytes: &[u8], config: JsValue) -> Result<JsEncodedImage, JsValue> {
    let config = config_from_js(config)?;
    encode_file(bytes, &config)
        .map(JsEncodedImage::from_encoded)
        .map_err(to_js_error)
}

/// Encode raw RGBA pixels within the character budget.
///
/// `pixels` is row-major RGBA8 data, 4 bytes per pixel, as returned by
/// `CanvasRenderingContext2D.getImageData()`.
///
/// # Errors
///
/// Same as [`encode_image_bytes`]. A buffer whose length is not
/// `width * height * 4` is an `InvalidImage`.
#[wasm_bindgen]
pub fn encode_rgba(
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    config: JsValue,
) -> Result<JsEncodedImage, JsValue> {
    let config = config_from_js(config)?;
    let source = SourceImage::rgba(width, height, pixels);
    encode_within_budget(&source, &config)
        .map(JsEncodedImage::from_encoded)
        .map_err(to_js_error)
}

/// The default encoder config as a plain JS object.
#[wasm_bindgen]
pub fn default_config() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&EncoderConfig::default())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// The effective character target for a config: `floor(maxEncodedChars * safetyMargin)`.
#[wasm_bindgen]
pub fn effective_target(config: JsValue) -> Result<usize, JsValue> {
    let config = config_from_js(config)?;
    Ok(config.budget().effective_target())
}
