//! Hand-landmark primitives produced by the hand tracker.
//!
//! These are the only shapes the recognizer consumes from the tracker. Points are in the
//! tracker's normalized image space: `x`/`y` in `[0, 1]`, `z` a relative depth.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::POINTS_PER_HAND;

/// A single detected keypoint.
///
/// Internally uses [`nalgebra::Vector3<f32>`]; serialises as `{ "x": .., "y": .., "z": .. }`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawLandmark", into = "RawLandmark")]
pub struct Landmark(pub Vector3<f32>);

#[derive(Serialize, Deserialize)]
struct RawLandmark {
    x: f32,
    y: f32,
    z: f32,
}

impl From<RawLandmark> for Landmark {
    fn from(raw: RawLandmark) -> Self {
        Self::new(raw.x, raw.y, raw.z)
    }
}

impl From<Landmark> for RawLandmark {
    fn from(lm: Landmark) -> Self {
        Self {
            x: lm.x(),
            y: lm.y(),
            z: lm.z(),
        }
    }
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self(Vector3::new(x, y, z))
    }

    pub fn x(&self) -> f32 {
        self.0.x
    }

    pub fn y(&self) -> f32 {
        self.0.y
    }

    pub fn z(&self) -> f32 {
        self.0.z
    }
}

impl Default for Landmark {
    fn default() -> Self {
        Self(Vector3::zeros())
    }
}

/// The 21 keypoints of one detected hand, in tracker order (wrist first).
///
/// The point count is part of the type, so a short or long hand cannot be built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandLandmarks {
    pub points: [Landmark; POINTS_PER_HAND],
}

impl HandLandmarks {
    pub fn new(points: [Landmark; POINTS_PER_HAND]) -> Self {
        Self { points }
    }

    /// Builds a hand from a slice, returning `None` unless it holds exactly 21 points.
    pub fn from_slice(points: &[Landmark]) -> Option<Self> {
        let points: [Landmark; POINTS_PER_HAND] = points.try_into().ok()?;
        Some(Self { points })
    }

    /// Flattens the hand into `x, y, z` triples in point order.
    pub fn coords(&self) -> impl Iterator<Item = f32> + '_ {
        self.points.iter().flat_map(|p| [p.x(), p.y(), p.z()])
    }
}

/// One frame's worth of tracker output: zero, one or two hands in detector order.
///
/// Slots are not identity-tracked across frames; whichever hand the tracker lists first is
/// hand #1 for that frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    #[serde(default)]
    pub hands: Vec<HandLandmarks>,
}

impl DetectionResult {
    /// A frame in which the tracker found nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_hands(hands: Vec<HandLandmarks>) -> Self {
        Self { hands }
    }

    pub fn has_hand(&self) -> bool {
        !self.hands.is_empty()
    }
}
