//! Recognizer configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::{CONFIDENCE_THRESHOLD, SEQUENCE_LENGTH};

/// Tunables for the streaming loop. Every field has a default, so a partial JSON document
/// (or `{}`) is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizerConfig {
    /// Window capacity N; the model's time axis.
    pub sequence_length: usize,
    /// Minimum top-class probability required to publish a label.
    pub confidence_threshold: f32,
    /// When set, a no-hand frame empties the window and clears the displayed result.
    /// When unset both are held until a hand returns.
    pub clear_on_hand_loss: bool,
    /// Run one classification on an all-zero window before streaming starts.
    pub warm_up: bool,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            sequence_length: SEQUENCE_LENGTH,
            confidence_threshold: CONFIDENCE_THRESHOLD,
            clear_on_hand_loss: false,
            warm_up: true,
        }
    }
}

impl RecognizerConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sequence_length == 0 {
            return Err(ConfigError::InvalidSequenceLength);
        }
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(ConfigError::InvalidThreshold(self.confidence_threshold));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = RecognizerConfig::from_json_str("{}").expect("empty config parses");
        assert_eq!(config, RecognizerConfig::default());
        assert_eq!(config.sequence_length, 30);
        assert!(!config.clear_on_hand_loss);
    }

    #[test]
    fn partial_document_overrides_fields() {
        let config =
            RecognizerConfig::from_json_str(r#"{"confidence_threshold":0.85,"clear_on_hand_loss":true}"#)
                .expect("partial config parses");
        assert_eq!(config.confidence_threshold, 0.85);
        assert!(config.clear_on_hand_loss);
        assert_eq!(config.sequence_length, 30);
    }

    #[test]
    fn rejects_zero_window() {
        let err = RecognizerConfig::from_json_str(r#"{"sequence_length":0}"#).expect_err("zero window");
        assert!(matches!(err, ConfigError::InvalidSequenceLength));
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let err = RecognizerConfig::from_json_str(r#"{"confidence_threshold":1.5}"#).expect_err("threshold above 1");
        assert!(matches!(err, ConfigError::InvalidThreshold(_)));

        let nan = RecognizerConfig {
            confidence_threshold: f32::NAN,
            ..RecognizerConfig::default()
        };
        assert!(nan.validate().is_err());
    }
}
