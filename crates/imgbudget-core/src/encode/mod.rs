//! Encode step: codec output plus its transport measurement.
//!
//! This module provides functionality for:
//! - Encoding opaque RGB frames to JPEG at a given quality
//! - Measuring the base64 length of the result without building the string
//! - Producing the base64 text for the accepted candidate
//!
//! All operations are synchronous and single-threaded.

mod jpeg;
mod payload;

pub use jpeg::{encode_jpeg, FrameEncoder, JpegFrameEncoder};
pub use payload::{text_length, EncodedPayload};
