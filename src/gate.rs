//! Inference gate: picks the top class and decides whether it is worth showing.
//!
//! Mirrors a per-joint confidence gate: above threshold the fresh value wins, below it the
//! last good value is kept. Here the "last good value" lives in [`crate::display::DisplayState`];
//! the gate only reports which way the decision went.

use serde::{Deserialize, Serialize};

use crate::error::ClassificationError;
use crate::labels::LabelTable;
use crate::VERY_HIGH_CONFIDENCE;

/// The top class of one classification cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub index: usize,
    pub label: String,
    pub confidence: f32,
}

/// Outcome of one gate evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    /// Confidence cleared the threshold; the prediction replaces whatever is displayed.
    Publish(Prediction),
    /// Below threshold; the display keeps its previous value.
    Hold(Prediction),
}

impl GateDecision {
    pub fn prediction(&self) -> &Prediction {
        match self {
            Self::Publish(p) | Self::Hold(p) => p,
        }
    }

    pub fn is_publish(&self) -> bool {
        matches!(self, Self::Publish(_))
    }
}

/// Display tier for a confidence value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    VeryHigh,
    High,
    Low,
}

impl ConfidenceLevel {
    pub fn classify(confidence: f32, threshold: f32) -> Self {
        if confidence >= VERY_HIGH_CONFIDENCE {
            Self::VeryHigh
        } else if confidence >= threshold {
            Self::High
        } else {
            Self::Low
        }
    }
}

/// Index and value of the largest non-NaN entry. Ties go to the lowest index.
pub fn argmax(distribution: &[f32]) -> Option<(usize, f32)> {
    distribution
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, p)| !p.is_nan())
        .fold(None, |best, (i, p)| match best {
            Some((_, bp)) if bp >= p => best,
            _ => Some((i, p)),
        })
}

#[derive(Debug, Clone)]
pub struct InferenceGate {
    threshold: f32,
    labels: LabelTable,
}

impl InferenceGate {
    pub fn new(threshold: f32, labels: LabelTable) -> Self {
        Self { threshold, labels }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    pub fn evaluate(&self, distribution: &[f32]) -> Result<GateDecision, ClassificationError> {
        let (index, confidence) =
            argmax(distribution).ok_or(ClassificationError::EmptyDistribution)?;
        let label = self
            .labels
            .get(index)
            .ok_or(ClassificationError::UnknownLabel(index))?
            .to_string();

        let prediction = Prediction {
            index,
            label,
            confidence,
        };
        if confidence >= self.threshold {
            Ok(GateDecision::Publish(prediction))
        } else {
            Ok(GateDecision::Hold(prediction))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> InferenceGate {
        let labels = LabelTable::from_gestures(["Đau", "Bác sĩ", "Cần giúp"]).expect("non-empty gesture list");
        InferenceGate::new(0.7, labels)
    }

    #[test]
    fn argmax_picks_largest_and_skips_nan() {
        assert_eq!(argmax(&[0.1, 0.6, 0.3]), Some((1, 0.6)));
        assert_eq!(argmax(&[f32::NAN, 0.2, 0.1]), Some((1, 0.2)));
        assert_eq!(argmax(&[0.5, 0.5]), Some((0, 0.5)));
        assert_eq!(argmax(&[]), None);
        assert_eq!(argmax(&[f32::NAN]), None);
    }

    #[test]
    fn publishes_at_or_above_threshold() {
        let decision = gate().evaluate(&[0.95, 0.03, 0.02]).expect("well-formed distribution");
        assert_eq!(
            decision,
            GateDecision::Publish(Prediction {
                index: 0,
                label: "Đau".to_string(),
                confidence: 0.95,
            })
        );

        assert!(gate().evaluate(&[0.1, 0.2, 0.7]).expect("well-formed distribution").is_publish());
    }

    #[test]
    fn holds_below_threshold() {
        let decision = gate().evaluate(&[0.2, 0.69, 0.11]).expect("well-formed distribution");
        assert!(!decision.is_publish());
        assert_eq!(decision.prediction().label, "Bác sĩ");
    }

    #[test]
    fn unknown_index_is_an_error() {
        let err = gate().evaluate(&[0.0, 0.0, 0.0, 0.99]).expect_err("index has no label");
        assert!(matches!(err, ClassificationError::UnknownLabel(3)));
    }

    #[test]
    fn empty_distribution_is_an_error() {
        assert!(matches!(
            gate().evaluate(&[]),
            Err(ClassificationError::EmptyDistribution)
        ));
    }

    #[test]
    fn confidence_tiers() {
        assert_eq!(ConfidenceLevel::classify(0.95, 0.7), ConfidenceLevel::VeryHigh);
        assert_eq!(ConfidenceLevel::classify(0.9, 0.7), ConfidenceLevel::VeryHigh);
        assert_eq!(ConfidenceLevel::classify(0.75, 0.7), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::classify(0.5, 0.7), ConfidenceLevel::Low);
    }
}
