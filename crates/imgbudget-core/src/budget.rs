//! Budget evaluation for text-encoded payloads.
//!
//! The budget is expressed in characters of the *text-encoded* payload (base64),
//! because that is what the downstream consumer actually limits. The raw JPEG
//! byte count is never compared against the ceiling.
//!
//! # Effective Target
//!
//! ```text
//! effective_target = floor(max_encoded_chars * safety_margin)
//! fits(text_length) = text_length <= effective_target
//! ```
//!
//! [`Budget::fits`] is the only acceptance predicate in the crate. The search
//! loop and the full-scale short-circuit both call it.

use serde::{Deserialize, Serialize};

use crate::EncodeError;

/// Default hard ceiling on the base64 payload length (5 MiB).
pub const DEFAULT_MAX_ENCODED_CHARS: usize = 5 * 1024 * 1024;

/// Default fraction of the ceiling the payload may use.
pub const DEFAULT_SAFETY_MARGIN: f64 = 0.95;

/// Size ceiling for one encoded payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    /// Hard ceiling on the returned text length, in characters.
    pub max_encoded_chars: usize,
    /// Fraction of the ceiling to target, in (0, 1].
    pub safety_margin: f64,
}

impl Default for Budget {
    fn default() -> Self {
        Self {
            max_encoded_chars: DEFAULT_MAX_ENCODED_CHARS,
            safety_margin: DEFAULT_SAFETY_MARGIN,
        }
    }
}

impl Budget {
    /// Create a validated budget.
    ///
    /// # Errors
    ///
    /// Returns `EncodeError::InvalidConfig` if `max_encoded_chars` is zero or
    /// `safety_margin` is not in (0, 1].
    pub fn new(max_encoded_chars: usize, safety_margin: f64) -> Result<Self, EncodeError> {
        let budget = Self {
            max_encoded_chars,
            safety_margin,
        };
        budget.validate()?;
        Ok(budget)
    }

    /// Check the budget invariants.
    pub fn validate(&self) -> Result<(), EncodeError> {
        if self.max_encoded_chars == 0 {
            return Err(EncodeError::InvalidConfig(
                "maxEncodedChars must be greater than zero".to_string(),
            ));
        }
        if !self.safety_margin.is_finite() || self.safety_margin <= 0.0 || self.safety_margin > 1.0
        {
            return Err(EncodeError::InvalidConfig(format!(
                "safetyMargin must be in (0, 1], got {}",
                self.safety_margin
            )));
        }
        Ok(())
    }

    /// Largest text length that is accepted.
    ///
    /// Never above `max_encoded_chars`, even where the `f64` product rounds up
    /// (ceilings past 2^53).
    #[inline]
    pub fn effective_target(&self) -> usize {
        let target = (self.max_encoded_chars as f64 * self.safety_margin).floor() as usize;
        target.min(self.max_encoded_chars)
    }

    /// Whether a payload of `text_length` characters fits the budget.
    #[inline]
    pub fn fits(&self, text_length: usize) -> bool {
        text_length <= self.effective_target()
    }
}
