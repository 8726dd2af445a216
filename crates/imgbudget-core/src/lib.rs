//! imgbudget Core - size-constrained image encoding
//!
//! This crate turns an arbitrary decoded bitmap into a base64 JPEG payload that
//! is guaranteed to fit under a hard character ceiling, keeping as much
//! resolution and quality as that ceiling allows.
//!
//! # Pipeline
//!
//! 1. [`source::normalize`] flattens alpha, expands grayscale/palette data and
//!    caps the frame to a bounding box.
//! 2. [`search`] walks the (scale, quality) ladder, encoding each candidate.
//! 3. [`budget::Budget::fits`] accepts the first candidate whose base64 length
//!    is within `floor(max_encoded_chars * safety_margin)`.
//!
//! # Example
//!
//! ```ignore
//! use imgbudget_core::{encode_within_budget, EncoderConfig, SourceImage};
//!
//! let image = SourceImage::rgba(width, height, rgba_pixels);
//! let payload = encode_within_budget(&image, &EncoderConfig::default())?;
//! println!("{:.2} MB at {}", payload.size_mb, payload.candidate);
//! ```

pub mod budget;
pub mod config;
pub mod encode;
pub mod error;
pub mod search;
pub mod source;

pub use budget::Budget;
pub use config::EncoderConfig;
pub use error::EncodeError;
pub use search::{encode_within_budget, encode_within_budget_with, Candidate, EncodedImage};
pub use source::{ColorModel, FilterType, SourceImage};
