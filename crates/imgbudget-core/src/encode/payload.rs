//! Measured payloads and their text-safe encoding.
//!
//! The transport encoding is standard base64 with padding, so the text length
//! is an exact function of the byte length: `ceil(n / 3) * 4`. Rejected
//! candidates are measured without materializing the text; only the accepted
//! payload is converted.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// Bytes per megabyte used for the informational size figure.
const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Codec output of one candidate, with its transport size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload {
    bytes: Vec<u8>,
    text_length: usize,
}

impl EncodedPayload {
    /// Wrap codec output and compute its base64 length.
    pub fn new(bytes: Vec<u8>) -> Self {
        let text_length = text_length(bytes.len());
        Self { bytes, text_length }
    }

    /// Size of the codec output in bytes.
    pub fn byte_length(&self) -> usize {
        self.bytes.len()
    }

    /// Length of the base64 text for this payload.
    pub fn text_length(&self) -> usize {
        self.text_length
    }

    /// Text length expressed in megabytes.
    pub fn size_mb(&self) -> f64 {
        self.text_length as f64 / BYTES_PER_MB
    }

    /// Base64-encode the payload.
    pub fn into_text(self) -> String {
        let text = STANDARD.encode(&self.bytes);
        debug_assert_eq!(text.len(), self.text_length);
        text
    }
}

/// Length of the padded base64 encoding of `byte_length` bytes.
pub fn text_length(byte_length: usize) -> usize {
    byte_length.div_ceil(3) * 4
}
