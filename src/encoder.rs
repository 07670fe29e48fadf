//! Frame encoder: one detection result in, one fixed-width vector out.

use tracing::debug;

use crate::landmarks::DetectionResult;
use crate::{HAND_WIDTH, MAX_HANDS, VECTOR_WIDTH};

/// A flattened frame of exactly [`VECTOR_WIDTH`] values.
///
/// Layout: hand #1 `x,y,z` × 21, then hand #2 `x,y,z` × 21. An absent second hand is
/// all zeros, so a two-hand frame whose second hand sits exactly at the origin is
/// indistinguishable from a one-hand frame.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedVector([f32; VECTOR_WIDTH]);

impl EncodedVector {
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// The 63 values belonging to hand slot `slot`; `None` past the last slot.
    pub fn hand(&self, slot: usize) -> Option<&[f32]> {
        let start = slot.checked_mul(HAND_WIDTH)?;
        self.0.get(start..start.checked_add(HAND_WIDTH)?)
    }
}

impl AsRef<[f32]> for EncodedVector {
    fn as_ref(&self) -> &[f32] {
        &self.0
    }
}

/// Encodes a detection result.
///
/// Returns `None` when no hand was detected; the caller must not advance the window for
/// such a frame. Hands beyond [`MAX_HANDS`] are ignored.
pub fn encode(result: &DetectionResult) -> Option<EncodedVector> {
    if result.hands.is_empty() {
        return None;
    }

    if result.hands.len() > MAX_HANDS {
        debug!(
            detected = result.hands.len(),
            "more hands than slots, encoding the first {MAX_HANDS}"
        );
    }

    let mut out = [0.0; VECTOR_WIDTH];
    for (slot, hand) in result.hands.iter().take(MAX_HANDS).enumerate() {
        let base = slot * HAND_WIDTH;
        for (dst, v) in out[base..base + HAND_WIDTH].iter_mut().zip(hand.coords()) {
            *dst = v;
        }
    }

    Some(EncodedVector(out))
}
