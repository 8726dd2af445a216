//! Candidate search over the (scale, quality) ladder.
//!
//! # Algorithm
//!
//! ```text
//! for scale in scale_ladder            (1.0 first, descending)
//!     tier = frame resized by scale    (no resize at 1.0)
//!     stop if tier's shortest side < min_dimension (only for scale < 1.0)
//!     for quality in quality_ladder    (descending)
//!         payload = encode(tier, quality)
//!         accept if budget.fits(base64 length of payload)
//! fail with PayloadTooLarge
//! ```
//!
//! The first fitting candidate wins, so the search keeps the most resolution
//! it can and only drops a scale tier after its whole quality ladder failed.
//! Sizes are always measured by encoding; nothing is estimated. Each tier and
//! each payload is dropped before the next one is built.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::EncoderConfig;
use crate::encode::{EncodedPayload, FrameEncoder, JpegFrameEncoder};
use crate::source::{normalize, resize_by_scale, scaled_dimensions, RgbFrame, SourceImage};
use crate::EncodeError;

/// One (scale, quality) trial point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Scale factor applied to the normalized frame, in (0, 1].
    pub scale: f32,
    /// JPEG quality, in 1..=100.
    pub quality: u8,
}

impl Candidate {
    pub fn new(scale: f32, quality: u8) -> Self {
        Self { scale, quality }
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scale {:.2}, quality {}", self.scale, self.quality)
    }
}

/// An accepted payload.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedImage {
    /// Base64 text of the JPEG stream.
    pub data: String,
    /// Text length in megabytes, for display.
    pub size_mb: f64,
    /// The candidate that met the budget.
    pub candidate: Candidate,
    /// Width of the encoded JPEG.
    pub width: u32,
    /// Height of the encoded JPEG.
    pub height: u32,
    /// Size of the JPEG stream in bytes.
    pub byte_length: usize,
    /// Length of `data` in characters.
    pub text_length: usize,
    /// Number of encodes performed, including the accepted one.
    pub attempts: usize,
}

impl EncodedImage {
    /// Media type of the payload carried in `data`.
    pub const MEDIA_TYPE: &'static str = "image/jpeg";

    fn accept(
        payload: EncodedPayload,
        candidate: Candidate,
        tier: &RgbFrame,
        attempts: usize,
    ) -> Self {
        let size_mb = payload.size_mb();
        let byte_length = payload.byte_length();
        let text_length = payload.text_length();
        Self {
            data: payload.into_text(),
            size_mb,
            candidate,
            width: tier.width,
            height: tier.height,
            byte_length,
            text_length,
            attempts,
        }
    }

    pub fn media_type(&self) -> &'static str {
        Self::MEDIA_TYPE
    }
}

/// Normalize `source` and search for the best JPEG that fits the budget.
///
/// This is a pure function of its inputs: the same image and configuration
/// always produce the same bytes.
///
/// # Errors
///
/// - `EncodeError::InvalidConfig` if `config` fails validation
/// - `EncodeError::InvalidImage` if `source` cannot be normalized
/// - `EncodeError::PayloadTooLarge` if no candidate meets the budget
pub fn encode_within_budget(
    source: &SourceImage,
    config: &EncoderConfig,
) -> Result<EncodedImage, EncodeError> {
    encode_within_budget_with(source, config, &mut JpegFrameEncoder)
}

/// Same as [`encode_within_budget`] with a caller-supplied encode step.
pub fn encode_within_budget_with<E: FrameEncoder + ?Sized>(
    source: &SourceImage,
    config: &EncoderConfig,
    encoder: &mut E,
) -> Result<EncodedImage, EncodeError> {
    config.validate()?;
    let frame = normalize(source, &config.normalize_options())?;
    search(&frame, config, encoder)
}

fn search<E: FrameEncoder + ?Sized>(
    frame: &RgbFrame,
    config: &EncoderConfig,
    encoder: &mut E,
) -> Result<EncodedImage, EncodeError> {
    let budget = config.budget();
    let target = budget.effective_target();
    let mut attempts = 0;
    let mut last = None;

    for &scale in &config.scale_ladder {
        let Some(tier) = scale_tier(frame, scale, config)? else {
            debug!(
                scale,
                min_dimension = config.min_dimension,
                "scale tier below minimum dimension, stopping"
            );
            break;
        };

        for &quality in &config.quality_ladder {
            let candidate = Candidate::new(scale, quality);
            let bytes = encoder
                .encode(&tier, quality)
                .map_err(|err| with_context(err, candidate))?;
            let payload = EncodedPayload::new(bytes);
            attempts += 1;
            debug!(
                scale,
                quality,
                width = tier.width,
                height = tier.height,
                text_length = payload.text_length(),
                target,
                "encoded candidate"
            );

            if budget.fits(payload.text_length()) {
                info!(
                    scale,
                    quality,
                    attempts,
                    text_length = payload.text_length(),
                    "accepted candidate"
                );
                return Ok(EncodedImage::accept(payload, candidate, &tier, attempts));
            }
            last = Some((candidate, payload.text_length()));
        }
    }

    match last {
        Some((last, text_length)) => {
            warn!(%last, text_length, target, attempts, "no candidate fits the budget");
            Err(EncodeError::PayloadTooLarge {
                last,
                text_length,
                target,
            })
        }
        None => Err(EncodeError::InvalidConfig(
            "search ladder produced no candidates".to_string(),
        )),
    }
}

/// Frame for one scale tier, or `None` once the tier falls below the floor.
/// The full-scale tier is always returned as-is.
fn scale_tier<'a>(
    frame: &'a RgbFrame,
    scale: f32,
    config: &EncoderConfig,
) -> Result<Option<Cow<'a, RgbFrame>>, EncodeError> {
    if scale >= 1.0 {
        return Ok(Some(Cow::Borrowed(frame)));
    }

    let (width, height) = scaled_dimensions(frame.width, frame.height, scale);
    if width.min(height) < config.min_dimension {
        return Ok(None);
    }

    resize_by_scale(frame, scale, config.filter)
        .map(|tier| Some(Cow::Owned(tier)))
        .map_err(|err| with_context(err, format_args!("scale {:.2}", scale)))
}

/// Prefix an `InvalidImage` raised mid-search with what was being attempted.
fn with_context(err: EncodeError, context: impl fmt::Display) -> EncodeError {
    match err {
        EncodeError::InvalidImage(msg) => {
            EncodeError::InvalidImage(format!("{}: {}", context, msg))
        }
        other => other,
    }
}
