//! imgbudget WASM - WebAssembly bindings for imgbudget
//!
//! This crate provides WASM bindings to expose the imgbudget-core encoder
//! to JavaScript/TypeScript applications, so images can be fitted to a
//! model's payload limit in the browser before upload.
//!
//! # Module Structure
//!
//! - `load` - File decoding with EXIF orientation (PNG, JPEG)
//! - `types` - WASM-compatible result type and error/config conversion
//! - `encode` - Budgeted encoding bindings
//!
//! # Usage
//!
//! ```typescript
//! import init, { encode_image_bytes } from '@imgbudget/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = encode_image_bytes(bytes);
//! const block = { type: 'base64', media_type: image.mediaType, data: image.data };
//! ```

use wasm_bindgen::prelude::*;

mod encode;
mod load;
mod types;

// Re-export public types
pub use encode::{default_config, effective_target, encode_image_bytes, encode_rgba};
pub use load::load_source_image;
pub use types::JsEncodedImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
