//! The streaming-loop object.
//!
//! A [`Recognizer`] owns every piece of per-session state (window, display, phase, stats)
//! and is mutated from exactly one place at a time through `&mut self`. Frames go in through
//! [`Recognizer::ingest`] or [`Recognizer::on_frame`]; classification is split into
//! [`Recognizer::begin_inference`] / [`Recognizer::complete_inference`] so a driver can run
//! the classifier off the frame path.

use std::sync::Arc;

use tracing::{debug, info, instrument, trace, warn};

use crate::config::RecognizerConfig;
use crate::display::{DisplaySnapshot, DisplayState, TrackingPhase};
use crate::encoder::encode;
use crate::error::{ClassificationError, ClassifierError, RecognizerError};
use crate::gate::{GateDecision, InferenceGate};
use crate::labels::LabelTable;
use crate::landmarks::DetectionResult;
use crate::stats::RecognizerStats;
use crate::window::SequenceWindow;
use crate::{Classifier, InputTensor};

/// What one frame did to the recognizer.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutcome {
    pub hand_detected: bool,
    pub window_len: usize,
    /// The window was full after this frame, so a classification should run.
    pub inference_due: bool,
    /// Set by [`Recognizer::on_frame`] when a classification ran and succeeded.
    pub decision: Option<GateDecision>,
}

/// A classification started against a snapshot of the window.
#[derive(Debug, Clone)]
pub struct PendingInference {
    generation: u64,
    pub tensor: InputTensor,
}

impl PendingInference {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

pub struct Recognizer {
    config: RecognizerConfig,
    classifier: Arc<dyn Classifier>,
    gate: InferenceGate,
    window: SequenceWindow,
    display: DisplayState,
    phase: TrackingPhase,
    stats: RecognizerStats,
    /// Bumped whenever the window is discarded; results computed on an older window are dropped.
    generation: u64,
}

impl std::fmt::Debug for Recognizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recognizer")
            .field("config", &self.config)
            .field("labels_len", &self.gate.labels().len())
            .field("window_len", &self.window.len())
            .field("phase", &self.phase)
            .field("display", &self.display.current())
            .finish()
    }
}

impl Recognizer {
    /// Builds a recognizer. Fails if the config is invalid; the label table is non-empty by
    /// construction.
    pub fn new(
        config: RecognizerConfig,
        classifier: Arc<dyn Classifier>,
        labels: LabelTable,
    ) -> Result<Self, RecognizerError> {
        config.validate()?;

        info!(
            sequence_length = config.sequence_length,
            threshold = config.confidence_threshold,
            clear_on_hand_loss = config.clear_on_hand_loss,
            labels = labels.len(),
            "recognizer created"
        );

        Ok(Self {
            gate: InferenceGate::new(config.confidence_threshold, labels),
            window: SequenceWindow::new(config.sequence_length),
            display: DisplayState::new(),
            phase: TrackingPhase::NoHand,
            stats: RecognizerStats::default(),
            generation: 0,
            classifier,
            config,
        })
    }

    /// [`Recognizer::new`] followed by [`Recognizer::warm_up`]: the recognizer is only
    /// handed out once the classifier has proven usable.
    pub async fn start(
        config: RecognizerConfig,
        classifier: Arc<dyn Classifier>,
        labels: LabelTable,
    ) -> Result<Self, RecognizerError> {
        let recognizer = Self::new(config, classifier, labels)?;
        recognizer.warm_up().await?;
        Ok(recognizer)
    }

    /// Runs one classification on an all-zero window so the runtime is hot before the
    /// first real frame. A failure here means the model is unusable.
    #[instrument(skip(self))]
    pub async fn warm_up(&self) -> Result<(), RecognizerError> {
        if !self.config.warm_up {
            return Ok(());
        }

        let input = InputTensor::zeros(self.config.sequence_length);
        self.classifier
            .classify(&input)
            .await
            .map_err(RecognizerError::WarmUp)?;

        info!("classifier warmed up");
        Ok(())
    }

    /// Encodes and buffers one frame. Never calls the classifier.
    pub fn ingest(&mut self, result: &DetectionResult) -> FrameOutcome {
        self.stats.frames += 1;

        let Some(vector) = encode(result) else {
            self.stats.frames_without_hand += 1;
            if self.phase != TrackingPhase::NoHand {
                debug!(window = self.window.len(), "hand lost");
            }
            self.phase = TrackingPhase::NoHand;

            if self.config.clear_on_hand_loss {
                self.discard_window();
                self.display.clear();
            }

            return FrameOutcome {
                hand_detected: false,
                window_len: self.window.len(),
                inference_due: false,
                decision: None,
            };
        };

        let ready = self.window.push(vector);
        self.stats.vectors_pushed += 1;
        self.phase = TrackingPhase::after_push(ready);

        debug!(
            "buffered frame {}/{}",
            self.window.len(),
            self.window.capacity()
        );

        FrameOutcome {
            hand_detected: true,
            window_len: self.window.len(),
            inference_due: ready,
            decision: None,
        }
    }

    /// Snapshots the full window for classification. `None` unless the window is full.
    pub fn begin_inference(&mut self) -> Option<PendingInference> {
        if !self.window.is_ready() {
            return None;
        }
        self.stats.inferences_run += 1;
        Some(PendingInference {
            generation: self.generation,
            tensor: self.window.to_tensor(),
        })
    }

    /// Records that an inference was due but not started because one was still running.
    pub fn skip_inference(&mut self) {
        self.stats.inferences_skipped += 1;
        trace!("classifier busy, skipping this window");
    }

    /// Feeds a classifier result back in. Errors are logged and counted, never propagated:
    /// the window is left as it is and the next full frame tries again.
    pub fn complete_inference(
        &mut self,
        generation: u64,
        result: Result<Vec<f32>, ClassifierError>,
    ) -> Option<GateDecision> {
        if generation != self.generation {
            debug!("dropping result for a discarded window");
            return None;
        }

        let outcome = result
            .map_err(ClassificationError::from)
            .and_then(|distribution| self.apply_distribution(&distribution));

        match outcome {
            Ok(decision) => Some(decision),
            Err(error) => {
                self.stats.inferences_failed += 1;
                warn!(%error, "classification failed, window kept");
                None
            }
        }
    }

    /// Runs the gate over a distribution and updates the display on publish.
    pub fn apply_distribution(
        &mut self,
        distribution: &[f32],
    ) -> Result<GateDecision, ClassificationError> {
        let decision = self.gate.evaluate(distribution)?;

        match &decision {
            GateDecision::Publish(prediction) => {
                self.stats.published += 1;
                info!(
                    label = %prediction.label,
                    confidence = prediction.confidence,
                    "prediction published"
                );
                self.display.publish(prediction.clone());
            }
            GateDecision::Hold(prediction) => {
                self.stats.held += 1;
                debug!(
                    label = %prediction.label,
                    confidence = prediction.confidence,
                    "confidence below threshold, keeping previous result"
                );
            }
        }

        Ok(decision)
    }

    /// Ingests a frame and, if the window is full, classifies it inline.
    pub async fn on_frame(&mut self, result: &DetectionResult) -> FrameOutcome {
        let mut outcome = self.ingest(result);
        if !outcome.inference_due {
            return outcome;
        }

        if let Some(pending) = self.begin_inference() {
            let result = self.classifier.classify(&pending.tensor).await;
            outcome.decision = self.complete_inference(pending.generation, result);
        }
        outcome
    }

    pub fn snapshot(&self) -> DisplaySnapshot {
        DisplaySnapshot::build(
            &self.display,
            self.phase,
            self.window.len(),
            self.window.capacity(),
            self.config.confidence_threshold,
        )
    }

    /// Back to the initial state: empty window, empty display, `NoHand`.
    pub fn reset(&mut self) {
        self.discard_window();
        self.display.clear();
        self.phase = TrackingPhase::NoHand;
    }

    fn discard_window(&mut self) {
        self.window.clear();
        self.generation += 1;
    }

    pub(crate) fn record_frame_rate(&mut self, fps: u32) {
        self.stats.fps = fps;
    }

    pub fn classifier(&self) -> Arc<dyn Classifier> {
        Arc::clone(&self.classifier)
    }

    pub fn config(&self) -> &RecognizerConfig {
        &self.config
    }

    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    pub fn phase(&self) -> TrackingPhase {
        self.phase
    }

    pub fn window(&self) -> &SequenceWindow {
        &self.window
    }

    pub fn stats(&self) -> &RecognizerStats {
        &self.stats
    }

    /// Identifies the current window contents; changes whenever the window is discarded.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn hand_detected(&self) -> bool {
        self.phase.hand_detected()
    }
}
