//! WASM-compatible wrapper types and conversions.
//!
//! This module provides the JavaScript-facing result type plus the glue that
//! turns JS config objects into `EncoderConfig` and `EncodeError` into a
//! JS `Error` the caller can branch on.

use imgbudget_core::{EncodeError, EncodedImage, EncoderConfig};
use wasm_bindgen::prelude::*;

/// An encoded image payload for JavaScript.
///
/// Wraps the core `EncodedImage`. `data` is the bare base64 text; use
/// `dataUrl` when the payload goes straight into an `<img>` element.
#[wasm_bindgen]
pub struct JsEncodedImage {
    inner: EncodedImage,
}

#[wasm_bindgen]
impl JsEncodedImage {
    /// Base64 text of the JPEG stream.
    #[wasm_bindgen(getter)]
    pub fn data(&self) -> String {
        self.inner.data.clone()
    }

    /// Payload size in megabytes of base64 text.
    #[wasm_bindgen(getter = sizeMb)]
    pub fn size_mb(&self) -> f64 {
        self.inner.size_mb
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Scale factor of the accepted candidate.
    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> f32 {
        self.inner.candidate.scale
    }

    /// JPEG quality of the accepted candidate.
    #[wasm_bindgen(getter)]
    pub fn quality(&self) -> u8 {
        self.inner.candidate.quality
    }

    #[wasm_bindgen(getter = byteLength)]
    pub fn byte_length(&self) -> usize {
        self.inner.byte_length
    }

    #[wasm_bindgen(getter = textLength)]
    pub fn text_length(&self) -> usize {
        self.inner.text_length
    }

    /// Number of encodes the search performed.
    #[wasm_bindgen(getter)]
    pub fn attempts(&self) -> usize {
        self.inner.attempts
    }

    #[wasm_bindgen(getter = mediaType)]
    pub fn media_type(&self) -> String {
        EncodedImage::MEDIA_TYPE.to_string()
    }

    /// `data:` URL form of the payload.
    #[wasm_bindgen(js_name = dataUrl)]
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", EncodedImage::MEDIA_TYPE, self.inner.data)
    }
}

impl JsEncodedImage {
    /// Wrap a core result (internal use).
    pub(crate) fn from_encoded(inner: EncodedImage) -> Self {
        JsEncodedImage { inner }
    }
}

/// Parse an optional JS config object. `undefined` and `null` mean defaults.
///
/// Omitted keys fall back to their defaults; the result is validated so a bad
/// config surfaces as `InvalidConfig` before any pixel work.
pub(crate) fn config_from_js(value: JsValue) -> Result<EncoderConfig, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(EncoderConfig::default());
    }
    let config: EncoderConfig = serde_wasm_bindgen::from_value(value).map_err(|e| {
        to_js_error(EncodeError::InvalidConfig(format!(
            "cannot parse config: {}",
            e
        )))
    })?;
    config.validate().map_err(to_js_error)?;
    Ok(config)
}

/// Convert an `EncodeError` into a JS `Error` whose `name` is the error kind.
///
/// `PayloadTooLarge` errors also carry `lastScale`, `lastQuality`,
/// `textLength` and `target` properties.
pub(crate) fn to_js_error(err: EncodeError) -> JsValue {
    let js_err = js_sys::Error::new(&err.to_string());
    js_err.set_name(err.kind());

    if let EncodeError::PayloadTooLarge {
        last,
        text_length,
        target,
    } = &err
    {
        let props: [(&str, JsValue); 4] = [
            ("lastScale", JsValue::from_f64(f64::from(last.scale))),
            ("lastQuality", JsValue::from_f64(f64::from(last.quality))),
            ("textLength", JsValue::from_f64(*text_length as f64)),
            ("target", JsValue::from_f64(*target as f64)),
        ];
        for (key, value) in props {
            // Reflect::set only fails on frozen objects
            js_sys::Reflect::set(&js_err, &JsValue::from_str(key), &value).ok();
        }
    }

    js_err.into()
}
