//! Error taxonomy for the payload encoder.

use thiserror::Error;

use crate::search::Candidate;

/// Errors returned by [`encode_within_budget`](crate::encode_within_budget).
///
/// Every variant is terminal for the call that produced it. The encoder never
/// retries with a different strategy; the caller decides whether to ask for a
/// smaller image or a different budget.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    /// The source bitmap cannot be normalized (zero dimensions, inconsistent
    /// buffer, bad palette index, undecodable bytes, codec rejection).
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    /// Every scale tier down to the minimum-dimension floor was tried at
    /// every quality step without meeting the budget.
    #[error("Payload too large: {text_length} chars at ({last}), budget is {target}")]
    PayloadTooLarge {
        /// The last (scale, quality) pair that was encoded.
        last: Candidate,
        /// Text-encoded length of that last attempt.
        text_length: usize,
        /// Effective target the attempt had to meet.
        target: usize,
    },

    /// The configuration was rejected before any encoding happened.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl EncodeError {
    /// Stable name of the error kind, suitable for structured reporting.
    pub fn kind(&self) -> &'static str {
        match self {
            EncodeError::InvalidImage(_) => "InvalidImage",
            EncodeError::PayloadTooLarge { .. } => "PayloadTooLarge",
            EncodeError::InvalidConfig(_) => "InvalidConfig",
        }
    }

    /// The last candidate attempted, if the search got that far.
    pub fn last_candidate(&self) -> Option<Candidate> {
        match self {
            EncodeError::PayloadTooLarge { last, .. } => Some(*last),
            _ => None,
        }
    }
}
