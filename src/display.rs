//! Hand-presence phase and the displayed result.
//!
//! Two orthogonal pieces of state:
//! - [`TrackingPhase`]: `NoHand` → `Buffering` → `Ready`, driven by every frame.
//! - [`DisplayState`]: the last published prediction, replaced only by a newer published one.
//!   It survives `NoHand` frames and low-confidence cycles (hold-last-good-value).

use serde::{Deserialize, Serialize};

use crate::gate::{ConfidenceLevel, Prediction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingPhase {
    /// Last frame had no hand.
    #[default]
    NoHand,
    /// Hand present, window not yet full.
    Buffering,
    /// Hand present, window full; every such frame is classified.
    Ready,
}

impl TrackingPhase {
    /// Phase after a frame with a hand was pushed into a window of the given readiness.
    pub fn after_push(window_ready: bool) -> Self {
        if window_ready {
            Self::Ready
        } else {
            Self::Buffering
        }
    }

    pub fn hand_detected(&self) -> bool {
        !matches!(self, Self::NoHand)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayState {
    current: Option<Prediction>,
}

impl DisplayState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the displayed prediction, including with an identical label.
    pub fn publish(&mut self, prediction: Prediction) {
        self.current = Some(prediction);
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&Prediction> {
        self.current.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }
}

/// What the result panel should say.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DisplayStatus {
    /// A published label is on screen.
    Showing { label: String, level: ConfidenceLevel },
    /// Nothing published and no hand in view.
    NoHand,
    /// Nothing published, hand in view, window still filling.
    Collecting { frames: usize, capacity: usize },
    /// Nothing published, window full, no cycle has cleared the threshold yet.
    Analyzing,
}

/// Read-only view of the recognizer handed to the rendering side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySnapshot {
    pub prediction: Option<Prediction>,
    pub hand_detected: bool,
    pub phase: TrackingPhase,
    pub window_len: usize,
    pub window_capacity: usize,
    pub status: DisplayStatus,
}

impl DisplaySnapshot {
    pub fn build(
        display: &DisplayState,
        phase: TrackingPhase,
        window_len: usize,
        window_capacity: usize,
        threshold: f32,
    ) -> Self {
        let status = match (display.current(), phase) {
            (Some(p), _) => DisplayStatus::Showing {
                label: p.label.clone(),
                level: ConfidenceLevel::classify(p.confidence, threshold),
            },
            (None, TrackingPhase::NoHand) => DisplayStatus::NoHand,
            (None, _) if window_len < window_capacity => DisplayStatus::Collecting {
                frames: window_len,
                capacity: window_capacity,
            },
            (None, _) => DisplayStatus::Analyzing,
        };

        Self {
            prediction: display.current().cloned(),
            hand_detected: phase.hand_detected(),
            phase,
            window_len,
            window_capacity,
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction(label: &str, confidence: f32) -> Prediction {
        Prediction {
            index: 0,
            label: label.to_string(),
            confidence,
        }
    }

    #[test]
    fn starts_empty_in_no_hand() {
        assert!(DisplayState::new().is_empty());
        assert_eq!(TrackingPhase::default(), TrackingPhase::NoHand);
        assert!(!TrackingPhase::NoHand.hand_detected());
    }

    #[test]
    fn publish_overwrites_same_label() {
        let mut display = DisplayState::new();
        display.publish(prediction("Đau", 0.8));
        display.publish(prediction("Đau", 0.93));
        assert_eq!(display.current(), Some(&prediction("Đau", 0.93)));
    }

    #[test]
    fn status_follows_phase_when_nothing_published() {
        let display = DisplayState::new();

        let s = DisplaySnapshot::build(&display, TrackingPhase::NoHand, 12, 30, 0.7);
        assert_eq!(s.status, DisplayStatus::NoHand);

        let s = DisplaySnapshot::build(&display, TrackingPhase::Buffering, 12, 30, 0.7);
        assert_eq!(
            s.status,
            DisplayStatus::Collecting {
                frames: 12,
                capacity: 30
            }
        );

        let s = DisplaySnapshot::build(&display, TrackingPhase::Ready, 30, 30, 0.7);
        assert_eq!(s.status, DisplayStatus::Analyzing);
    }

    #[test]
    fn published_label_is_shown_even_without_hand() {
        let mut display = DisplayState::new();
        display.publish(prediction("Thuốc", 0.72));

        let s = DisplaySnapshot::build(&display, TrackingPhase::NoHand, 30, 30, 0.7);
        assert!(!s.hand_detected);
        assert_eq!(
            s.status,
            DisplayStatus::Showing {
                label: "Thuốc".to_string(),
                level: ConfidenceLevel::High
            }
        );
    }

    #[test]
    fn snapshot_serialises_with_status_tag() {
        let s = DisplaySnapshot::build(&DisplayState::new(), TrackingPhase::Buffering, 3, 30, 0.7);
        let json = serde_json::to_value(&s).expect("serialisable");
        assert_eq!(json["status"]["status"], "collecting");
        assert_eq!(json["phase"], "buffering");
    }
}
