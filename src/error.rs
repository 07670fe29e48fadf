//! Error types for each collaborator boundary.

use thiserror::Error;

/// Failure reported by a [`crate::Classifier`] implementation.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// Produced by [`crate::InputTensor::check_shape`].
    #[error("input tensor shape {got:?} does not match model input {expected:?}")]
    ShapeMismatch {
        expected: [usize; 3],
        got: [usize; 3],
    },
    #[error("classifier backend failed: {0}")]
    Backend(String),
}

/// Failure reported by a [`crate::LandmarkSource`]. Always fatal to the session.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("landmark source unavailable: {0}")]
    Unavailable(String),
    #[error("malformed recording: {0}")]
    Recording(String),
    #[error("failed to read recording: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse recording: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum LabelError {
    #[error("failed to read label file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse label file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("label key {0:?} is not a class index")]
    InvalidIndex(String),
    #[error("class index {0} is listed more than once")]
    DuplicateIndex(usize),
    #[error("label table is empty")]
    Empty,
    #[error("model metadata mismatch: {0}")]
    MetadataMismatch(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("sequence_length must be at least 1")]
    InvalidSequenceLength,
    #[error("confidence_threshold must be within [0, 1], got {0}")]
    InvalidThreshold(f32),
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single classification cycle that produced no usable prediction.
///
/// Never fatal: the cycle is logged and skipped, the window keeps accumulating.
#[derive(Debug, Error)]
pub enum ClassificationError {
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
    #[error("classifier returned an empty or all-NaN distribution")]
    EmptyDistribution,
    #[error("class index {0} has no label")]
    UnknownLabel(usize),
}

/// Errors that stop the recognizer from starting or end a session.
#[derive(Debug, Error)]
pub enum RecognizerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Labels(#[from] LabelError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("classifier warm-up failed: {0}")]
    WarmUp(#[source] ClassifierError),
}
