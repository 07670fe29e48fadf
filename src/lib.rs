//! V-Sign streaming recognition core.
//!
//! This crate turns a stream of hand-tracker results into sign-language labels:
//! - [`encoder`]: flattens 0–2 detected hands into a fixed-width [`encoder::EncodedVector`].
//! - [`window`]: a sliding FIFO of the last N vectors.
//! - [`gate`]: argmax + confidence threshold over the classifier's output.
//! - [`display`]: hand-presence phase and the hold-last-good-value result.
//! - [`recognizer`]: the streaming-loop object that owns all of the above.
//! - [`session`]: async driver with single-flight inference.
//!
//! Hand tracking and neural-network inference are external collaborators, injected through
//! the [`LandmarkSource`] and [`Classifier`] traits.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod config;
pub mod display;
pub mod encoder;
pub mod error;
pub mod gate;
pub mod labels;
pub mod landmarks;
pub mod recognizer;
pub mod replay;
pub mod session;
pub mod stats;
pub mod window;

pub use config::RecognizerConfig;
pub use display::{DisplaySnapshot, DisplayState, DisplayStatus, TrackingPhase};
pub use encoder::{encode, EncodedVector};
pub use error::{
    ClassificationError, ClassifierError, ConfigError, LabelError, RecognizerError, SourceError,
};
pub use gate::{ConfidenceLevel, GateDecision, InferenceGate, Prediction};
pub use labels::{LabelTable, ModelMetadata};
pub use landmarks::{DetectionResult, HandLandmarks, Landmark};
pub use recognizer::{FrameOutcome, PendingInference, Recognizer};
pub use replay::{RecordingSource, ScriptedSource};
pub use session::Session;
pub use stats::{FrameRateMeter, RecognizerStats};
pub use window::SequenceWindow;

/// Keypoints per detected hand.
pub const POINTS_PER_HAND: usize = 21;

/// `x, y, z`.
pub const COORDS_PER_POINT: usize = 3;

/// Hand slots in an encoded frame.
pub const MAX_HANDS: usize = 2;

/// Values contributed by one hand.
pub const HAND_WIDTH: usize = POINTS_PER_HAND * COORDS_PER_POINT;

/// Width W of an encoded frame.
pub const VECTOR_WIDTH: usize = HAND_WIDTH * MAX_HANDS;

/// Default window capacity N.
pub const SEQUENCE_LENGTH: usize = 30;

/// Default minimum probability for a label to be published.
pub const CONFIDENCE_THRESHOLD: f32 = 0.7;

/// Confidence at which the UI shows the "very sure" tier.
pub const VERY_HIGH_CONFIDENCE: f32 = 0.9;

/// Classifier input of shape `[batch, frames, width]`, stored row-major with the oldest
/// frame first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputTensor {
    pub shape: [usize; 3],
    pub data: Vec<f32>,
}

impl InputTensor {
    /// An all-zero `[1, frames, W]` tensor.
    pub fn zeros(frames: usize) -> Self {
        Self {
            shape: [1, frames, VECTOR_WIDTH],
            data: vec![0.0; frames * VECTOR_WIDTH],
        }
    }

    /// For classifier implementations: rejects an input whose shape is not the model's.
    pub fn check_shape(&self, expected: [usize; 3]) -> Result<(), ClassifierError> {
        if self.shape != expected || self.data.len() != expected.iter().product::<usize>() {
            return Err(ClassifierError::ShapeMismatch {
                expected,
                got: self.shape,
            });
        }
        Ok(())
    }

    /// Frame `i` of the single batch entry.
    pub fn frame(&self, i: usize) -> Option<&[f32]> {
        let width = self.shape[2];
        self.data.get(i * width..(i + 1) * width)
    }
}

/// The sequence classifier contract.
///
/// Implementations wrap an inference runtime; the recognizer treats them as a black box
/// that maps a `[1, N, W]` tensor to a probability distribution over the label set.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, input: &InputTensor) -> Result<Vec<f32>, ClassifierError>;
}

/// The hand-tracker contract.
///
/// Each call captures the next frame and reports the hands found in it. `Ok(None)` means
/// the capture has ended. An error is a failure to run at all (no camera, permission
/// denied) and ends the session.
///
/// [`Session`] may drop a pending `detect` future when an inference completes first, so
/// implementations should not lose a frame if cancelled before returning.
#[async_trait]
pub trait LandmarkSource: Send {
    async fn detect(&mut self) -> Result<Option<DetectionResult>, SourceError>;
}
