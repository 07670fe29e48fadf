//! Async driver connecting a [`LandmarkSource`] to a [`Recognizer`].
//!
//! Frames are ingested as they arrive. Classification runs on a spawned task against a
//! snapshot of the window, so a slow classifier delays results but never frame intake.
//! At most one classification is in flight; a window that becomes due while one is
//! running is skipped rather than queued.

use std::time::Instant;

use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument};

use crate::display::DisplaySnapshot;
use crate::error::{ClassifierError, RecognizerError};
use crate::recognizer::Recognizer;
use crate::stats::FrameRateMeter;
use crate::LandmarkSource;

type InferenceResult = (u64, Result<Vec<f32>, ClassifierError>);

pub struct Session {
    recognizer: Recognizer,
    snapshots: watch::Sender<DisplaySnapshot>,
}

impl Session {
    /// Wraps a recognizer. The receiver sees a fresh snapshot whenever the display,
    /// phase or window fill changes.
    pub fn new(recognizer: Recognizer) -> (Self, watch::Receiver<DisplaySnapshot>) {
        let (snapshots, rx) = watch::channel(recognizer.snapshot());
        (
            Self {
                recognizer,
                snapshots,
            },
            rx,
        )
    }

    /// Drives the session until the source ends, fails, or `shutdown` flips to `true`.
    ///
    /// Hands the recognizer back so the caller can inspect final state and stats.
    #[instrument(skip_all)]
    pub async fn run<S>(
        mut self,
        source: &mut S,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<Recognizer, RecognizerError>
    where
        S: LandmarkSource + ?Sized,
    {
        let mut in_flight: JoinSet<InferenceResult> = JoinSet::new();
        let mut fps = FrameRateMeter::new(Instant::now());
        let mut shutdown_open = true;

        info!("session started");

        if *shutdown.borrow_and_update() {
            info!("session shut down before the first frame");
            return Ok(self.recognizer);
        }

        loop {
            tokio::select! {
                biased;

                changed = shutdown.changed(), if shutdown_open => {
                    let stop = match changed {
                        Ok(()) => *shutdown.borrow(),
                        Err(_) => {
                            shutdown_open = false;
                            false
                        }
                    };
                    if stop {
                        info!("session shut down");
                        break;
                    }
                }

                Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                    self.finish_inference(joined);
                }

                frame = source.detect() => {
                    let Some(result) = frame? else {
                        debug!("source ended");
                        while let Some(joined) = in_flight.join_next().await {
                            self.finish_inference(joined);
                        }
                        break;
                    };

                    if let Some(rate) = fps.tick(Instant::now()) {
                        self.recognizer.record_frame_rate(rate);
                        debug!(fps = rate, "frame rate");
                    }

                    let outcome = self.recognizer.ingest(&result);
                    if outcome.inference_due {
                        if in_flight.is_empty() {
                            self.spawn_inference(&mut in_flight);
                        } else {
                            self.recognizer.skip_inference();
                        }
                    }
                    self.publish_snapshot();
                }
            }
        }

        Ok(self.recognizer)
    }

    fn spawn_inference(&mut self, in_flight: &mut JoinSet<InferenceResult>) {
        let Some(pending) = self.recognizer.begin_inference() else {
            return;
        };
        let classifier = self.recognizer.classifier();
        in_flight.spawn(async move {
            let result = classifier.classify(&pending.tensor).await;
            (pending.generation(), result)
        });
    }

    fn finish_inference(&mut self, joined: Result<InferenceResult, tokio::task::JoinError>) {
        let (generation, result) = match joined {
            Ok(done) => done,
            // A panicked task carries no generation; count it against the live window.
            Err(e) => (
                self.recognizer.generation(),
                Err(ClassifierError::Backend(format!("inference task failed: {e}"))),
            ),
        };
        self.recognizer.complete_inference(generation, result);
        self.publish_snapshot();
    }

    fn publish_snapshot(&self) {
        let snapshot = self.recognizer.snapshot();
        self.snapshots.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });
    }
}
