//! Encoder configuration.
//!
//! Everything the search needs is supplied by the caller through
//! [`EncoderConfig`]; nothing is read from globals or the environment. The
//! struct deserializes from camelCase keys and every key is optional:
//!
//! ```json
//! {
//!   "maxEncodedChars": 5242880,
//!   "safetyMargin": 0.95,
//!   "scaleLadder": [1.0, 0.85, 0.7, 0.6, 0.5, 0.4, 0.3],
//!   "qualityLadder": [85, 70, 50, 30, 15],
//!   "minDimension": 240,
//!   "maxWidth": 1568,
//!   "maxHeight": 1568,
//!   "filter": "lanczos3",
//!   "background": [255, 255, 255]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::budget::{Budget, DEFAULT_MAX_ENCODED_CHARS, DEFAULT_SAFETY_MARGIN};
use crate::source::{FilterType, NormalizeOptions};
use crate::EncodeError;

/// Default scale tiers, tried from full resolution downward.
pub const DEFAULT_SCALE_LADDER: [f32; 7] = [1.0, 0.85, 0.7, 0.6, 0.5, 0.4, 0.3];

/// Default JPEG quality steps tried within each scale tier.
pub const DEFAULT_QUALITY_LADDER: [u8; 5] = [85, 70, 50, 30, 15];

/// Default shortest-side floor below which the search gives up.
pub const DEFAULT_MIN_DIMENSION: u32 = 240;

/// Default bounding box edge for the initial downscale.
pub const DEFAULT_MAX_DIMENSION: u32 = 1568;

/// Largest dimension a baseline JPEG frame header can describe.
pub const JPEG_MAX_DIMENSION: u32 = 65_535;

/// Background that transparent pixels are flattened onto.
pub const DEFAULT_BACKGROUND: [u8; 3] = [255, 255, 255];

/// Full configuration for one encode call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EncoderConfig {
    /// Hard ceiling on the returned text length.
    pub max_encoded_chars: usize,
    /// Fraction of the ceiling to target.
    pub safety_margin: f64,
    /// Scale factors, strictly descending, starting at 1.0.
    pub scale_ladder: Vec<f32>,
    /// JPEG qualities, strictly descending, each in 1..=100.
    pub quality_ladder: Vec<u8>,
    /// Shortest side a reduced scale tier may have.
    pub min_dimension: u32,
    /// Bounding box width for the initial downscale.
    pub max_width: u32,
    /// Bounding box height for the initial downscale.
    pub max_height: u32,
    /// Resampling filter for every resize.
    pub filter: FilterType,
    /// Color used under transparent pixels.
    pub background: [u8; 3],
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            max_encoded_chars: DEFAULT_MAX_ENCODED_CHARS,
            safety_margin: DEFAULT_SAFETY_MARGIN,
            scale_ladder: DEFAULT_SCALE_LADDER.to_vec(),
            quality_ladder: DEFAULT_QUALITY_LADDER.to_vec(),
            min_dimension: DEFAULT_MIN_DIMENSION,
            max_width: DEFAULT_MAX_DIMENSION,
            max_height: DEFAULT_MAX_DIMENSION,
            filter: FilterType::default(),
            background: DEFAULT_BACKGROUND,
        }
    }
}

impl EncoderConfig {
    /// Replace the budget.
    pub fn with_budget(mut self, budget: Budget) -> Self {
        self.max_encoded_chars = budget.max_encoded_chars;
        self.safety_margin = budget.safety_margin;
        self
    }

    /// Replace the initial bounding box.
    pub fn with_max_dimensions(mut self, max_width: u32, max_height: u32) -> Self {
        self.max_width = max_width;
        self.max_height = max_height;
        self
    }

    /// The budget part of the configuration.
    pub fn budget(&self) -> Budget {
        Budget {
            max_encoded_chars: self.max_encoded_chars,
            safety_margin: self.safety_margin,
        }
    }

    /// The normalizer part of the configuration.
    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            max_width: self.max_width,
            max_height: self.max_height,
            filter: self.filter,
            background: self.background,
        }
    }

    /// Upper bound on the number of encodes one search can perform.
    pub fn max_attempts(&self) -> usize {
        self.scale_ladder.len() * self.quality_ladder.len()
    }

    /// Check every invariant the search relies on.
    ///
    /// # Errors
    ///
    /// Returns `EncodeError::InvalidConfig` naming the offending option.
    pub fn validate(&self) -> Result<(), EncodeError> {
        self.budget().validate()?;
        validate_scale_ladder(&self.scale_ladder)?;
        validate_quality_ladder(&self.quality_ladder)?;

        if self.min_dimension == 0 {
            return Err(invalid("minDimension must be at least 1"));
        }
        for (name, value) in [("maxWidth", self.max_width), ("maxHeight", self.max_height)] {
            if value == 0 || value > JPEG_MAX_DIMENSION {
                return Err(EncodeError::InvalidConfig(format!(
                    "{} must be in 1..={}, got {}",
                    name, JPEG_MAX_DIMENSION, value
                )));
            }
        }
        Ok(())
    }
}

fn validate_scale_ladder(ladder: &[f32]) -> Result<(), EncodeError> {
    match ladder.first() {
        None => return Err(invalid("scaleLadder must not be empty")),
        // The first rung doubles as the full-scale short-circuit
        Some(&first) if first != 1.0 => {
            return Err(EncodeError::InvalidConfig(format!(
                "scaleLadder must start at 1.0, got {}",
                first
            )))
        }
        Some(_) => {}
    }
    if let Some(&bad) = ladder.iter().find(|s| !(s.is_finite() && **s > 0.0 && **s <= 1.0)) {
        return Err(EncodeError::InvalidConfig(format!(
            "scaleLadder entries must be in (0, 1], got {}",
            bad
        )));
    }
    if ladder.windows(2).any(|pair| pair[1] >= pair[0]) {
        return Err(invalid("scaleLadder must be strictly descending"));
    }
    Ok(())
}

fn validate_quality_ladder(ladder: &[u8]) -> Result<(), EncodeError> {
    if ladder.is_empty() {
        return Err(invalid("qualityLadder must not be empty"));
    }
    if let Some(&bad) = ladder.iter().find(|q| !(1..=100).contains(*q)) {
        return Err(EncodeError::InvalidConfig(format!(
            "qualityLadder entries must be in 1..=100, got {}",
            bad
        )));
    }
    if ladder.windows(2).any(|pair| pair[1] >= pair[0]) {
        return Err(invalid("qualityLadder must be strictly descending"));
    }
    Ok(())
}

fn invalid(message: &str) -> EncodeError {
    EncodeError::InvalidConfig(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EncoderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_attempts(), 35);
        assert_eq!(config.budget(), Budget::default());
    }

    #[test]
    fn test_builders() {
        let config = EncoderConfig::default()
            .with_budget(Budget::new(10, 0.5).unwrap())
            .with_max_dimensions(1280, 720);
        assert_eq!(config.max_encoded_chars, 10);
        assert_eq!(config.normalize_options().max_width, 1280);
        assert_eq!(config.normalize_options().max_height, 720);
    }

    #[test]
    fn test_rejects_bad_budget() {
        let mut config = EncoderConfig::default();
        config.safety_margin = 1.5;
        assert!(matches!(config.validate(), Err(EncodeError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_empty_ladders() {
        let mut config = EncoderConfig::default();
        config.scale_ladder.clear();
        assert!(config.validate().is_err());

        let mut config = EncoderConfig::default();
        config.quality_ladder.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_scale_ladder_must_start_at_full_scale() {
        let mut config = EncoderConfig::default();
        config.scale_ladder = vec![0.9, 0.5];
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid configuration: scaleLadder must start at 1.0, got 0.9"
        );
    }

    #[test]
    fn test_scale_ladder_must_descend() {
        let mut config = EncoderConfig::default();
        config.scale_ladder = vec![1.0, 0.5, 0.5];
        assert!(config.validate().is_err());

        config.scale_ladder = vec![1.0, 0.4, 0.6];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_scale_ladder_range() {
        let mut config = EncoderConfig::default();
        config.scale_ladder = vec![1.0, 0.0];
        assert!(config.validate().is_err());

        config.scale_ladder = vec![1.0, -0.5];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_quality_ladder_rules() {
        let mut config = EncoderConfig::default();
        config.quality_ladder = vec![90, 0];
        assert!(config.validate().is_err());

        config.quality_ladder = vec![101];
        assert!(config.validate().is_err());

        config.quality_ladder = vec![50, 70];
        assert!(config.validate().is_err());

        config.quality_ladder = vec![100];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_dimension_limits() {
        let mut config = EncoderConfig::default();
        config.min_dimension = 0;
        assert!(config.validate().is_err());

        let config = EncoderConfig::default().with_max_dimensions(0, 720);
        assert!(config.validate().is_err());

        let config = EncoderConfig::default().with_max_dimensions(70_000, 720);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EncoderConfig =
            serde_json::from_str(r#"{"maxEncodedChars": 1000, "qualityLadder": [60, 20]}"#)
                .unwrap();
        assert_eq!(config.max_encoded_chars, 1000);
        assert_eq!(config.quality_ladder, vec![60, 20]);
        assert_eq!(config.scale_ladder, DEFAULT_SCALE_LADDER.to_vec());
        assert_eq!(config.filter, FilterType::Lanczos3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_roundtrip_uses_camel_case() {
        let json = serde_json::to_value(EncoderConfig::default()).unwrap();
        assert_eq!(json["maxEncodedChars"], 5 * 1024 * 1024);
        assert_eq!(json["minDimension"], 240);
        assert_eq!(json["filter"], "lanczos3");
        assert!(json.get("max_encoded_chars").is_none());
    }
}
