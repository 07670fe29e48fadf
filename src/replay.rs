//! Landmark sources that replay pre-recorded tracker output instead of a live camera.

use std::collections::VecDeque;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::SourceError;
use crate::landmarks::{DetectionResult, HandLandmarks, Landmark};
use crate::LandmarkSource;

/// Yields a fixed list of detection results, then ends.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    frames: VecDeque<DetectionResult>,
    interval: Option<Duration>,
}

impl ScriptedSource {
    pub fn new(frames: impl IntoIterator<Item = DetectionResult>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            interval: None,
        }
    }

    /// Waits `interval` before each frame, approximating a live capture rate.
    pub fn paced(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

#[async_trait]
impl LandmarkSource for ScriptedSource {
    async fn detect(&mut self) -> Result<Option<DetectionResult>, SourceError> {
        if let Some(interval) = self.interval {
            if !self.frames.is_empty() {
                tokio::time::sleep(interval).await;
            }
        }
        Ok(self.frames.pop_front())
    }
}

#[derive(Debug, Deserialize)]
struct Recording {
    #[serde(default)]
    gesture: Option<String>,
    sequences: Vec<RecordedSequence>,
}

#[derive(Debug, Deserialize)]
struct RecordedSequence {
    frames: Vec<RecordedFrame>,
    #[serde(default)]
    duration_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RecordedFrame {
    #[serde(default)]
    landmarks: Vec<Landmark>,
}

/// Replays a recorded-sequence file of the kind collected for training.
///
/// Each recorded frame holds one hand's landmarks; an empty landmark list replays as a
/// frame with no hand. Sequences are concatenated in file order.
#[derive(Debug, Clone)]
pub struct RecordingSource {
    gesture: Option<String>,
    inner: ScriptedSource,
}

impl RecordingSource {
    pub fn from_json_str(json: &str) -> Result<Self, SourceError> {
        let recording: Recording = serde_json::from_str(json)?;

        let mut frames = Vec::new();
        let mut interval = None;
        for (s, sequence) in recording.sequences.iter().enumerate() {
            if interval.is_none() && !sequence.frames.is_empty() {
                interval = sequence
                    .duration_ms
                    .map(|ms| Duration::from_millis(ms) / sequence.frames.len() as u32);
            }

            for (f, frame) in sequence.frames.iter().enumerate() {
                if frame.landmarks.is_empty() {
                    frames.push(DetectionResult::empty());
                    continue;
                }
                let hand = HandLandmarks::from_slice(&frame.landmarks).ok_or_else(|| {
                    SourceError::Recording(format!(
                        "sequence {s} frame {f} has {} landmarks",
                        frame.landmarks.len()
                    ))
                })?;
                frames.push(DetectionResult::with_hands(vec![hand]));
            }
        }

        debug!(
            gesture = recording.gesture.as_deref().unwrap_or("?"),
            frames = frames.len(),
            "recording loaded"
        );

        let mut inner = ScriptedSource::new(frames);
        inner.interval = interval;
        Ok(Self {
            gesture: recording.gesture,
            inner,
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Replays as fast as the consumer pulls, ignoring the recorded duration.
    pub fn unpaced(mut self) -> Self {
        self.inner.interval = None;
        self
    }

    /// Gesture name the file was recorded for, if it says.
    pub fn gesture(&self) -> Option<&str> {
        self.gesture.as_deref()
    }

    pub fn remaining(&self) -> usize {
        self.inner.remaining()
    }
}

#[async_trait]
impl LandmarkSource for RecordingSource {
    async fn detect(&mut self) -> Result<Option<DetectionResult>, SourceError> {
        self.inner.detect().await
    }
}
