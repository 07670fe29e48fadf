//! Counters and a frames-per-second meter.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognizerStats {
    pub frames: u64,
    pub frames_without_hand: u64,
    pub vectors_pushed: u64,
    pub inferences_run: u64,
    pub inferences_failed: u64,
    /// Inferences not started because one was already in flight.
    pub inferences_skipped: u64,
    pub published: u64,
    pub held: u64,
    /// Most recent frames-per-second reading from the session driver.
    pub fps: u32,
}

/// Counts frames and reports a whole-number rate once per second.
#[derive(Debug, Clone)]
pub struct FrameRateMeter {
    window_start: Instant,
    frames_in_window: u32,
    last_fps: u32,
}

impl FrameRateMeter {
    const WINDOW: Duration = Duration::from_secs(1);

    pub fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            frames_in_window: 0,
            last_fps: 0,
        }
    }

    /// Records one frame. Returns the new rate when a full second has elapsed.
    pub fn tick(&mut self, now: Instant) -> Option<u32> {
        self.frames_in_window += 1;

        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < Self::WINDOW {
            return None;
        }

        self.last_fps = (self.frames_in_window as f64 / elapsed.as_secs_f64()).round() as u32;
        self.frames_in_window = 0;
        self.window_start = now;
        Some(self.last_fps)
    }

    pub fn fps(&self) -> u32 {
        self.last_fps
    }
}
