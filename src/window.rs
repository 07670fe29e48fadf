//! Sliding window of encoded frames.
//!
//! A strict FIFO of at most `capacity` vectors. Pushing into a full window evicts the
//! oldest vector first, so the window always holds the most recent frames in
//! chronological order.

use std::collections::VecDeque;

use crate::encoder::EncodedVector;
use crate::{InputTensor, VECTOR_WIDTH};

#[derive(Debug, Clone)]
pub struct SequenceWindow {
    frames: VecDeque<EncodedVector>,
    capacity: usize,
}

impl SequenceWindow {
    /// Creates an empty window. `capacity` must be non-zero; the config layer enforces this.
    pub fn new(capacity: usize) -> Self {
        Self {
            frames: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a vector, evicting the oldest one if the window was full.
    ///
    /// Returns `true` when the window is exactly at capacity afterwards (ready for inference).
    pub fn push(&mut self, vector: EncodedVector) -> bool {
        if self.frames.len() == self.capacity {
            self.frames.pop_front();
        }
        self.frames.push_back(vector);
        self.is_ready()
    }

    pub fn is_ready(&self) -> bool {
        self.frames.len() == self.capacity
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &EncodedVector> {
        self.frames.iter()
    }

    /// Snapshots the window as a `[1, len, W]` tensor, oldest frame first.
    pub fn to_tensor(&self) -> InputTensor {
        let mut data = Vec::with_capacity(self.frames.len() * VECTOR_WIDTH);
        for frame in &self.frames {
            data.extend_from_slice(frame.as_slice());
        }
        InputTensor {
            shape: [1, self.frames.len(), VECTOR_WIDTH],
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::encode;
    use crate::landmarks::{DetectionResult, HandLandmarks, Landmark};
    use crate::POINTS_PER_HAND;

    /// A vector whose first coordinate tags the push number.
    fn tagged(tag: usize) -> EncodedVector {
        let mut points = [Landmark::default(); POINTS_PER_HAND];
        points[0] = Landmark::new(tag as f32, 0.0, 0.0);
        encode(&DetectionResult::with_hands(vec![HandLandmarks::new(points)])).expect("hand frame encodes")
    }

    fn tags(window: &SequenceWindow) -> Vec<usize> {
        window.iter().map(|v| v.as_slice()[0] as usize).collect()
    }

    #[test]
    fn fills_up_to_capacity() {
        let mut window = SequenceWindow::new(30);
        for i in 1..30 {
            assert!(!window.push(tagged(i)));
            assert_eq!(window.len(), i);
        }
        assert!(window.push(tagged(30)));
        assert_eq!(window.len(), 30);
    }

    #[test]
    fn length_is_capped_and_stays_ready() {
        let mut window = SequenceWindow::new(5);
        for i in 1..=17 {
            let ready = window.push(tagged(i));
            assert_eq!(window.len(), i.min(5));
            assert_eq!(ready, i >= 5);
        }
    }

    #[test]
    fn eviction_is_fifo() {
        let mut window = SequenceWindow::new(4);
        for i in 1..=10 {
            window.push(tagged(i));
        }
        assert_eq!(tags(&window), vec![7, 8, 9, 10]);
    }

    #[test]
    fn tensor_is_oldest_first() {
        let mut window = SequenceWindow::new(3);
        for i in 1..=4 {
            window.push(tagged(i));
        }

        let tensor = window.to_tensor();
        assert_eq!(tensor.shape, [1, 3, VECTOR_WIDTH]);
        assert_eq!(tensor.data.len(), 3 * VECTOR_WIDTH);
        assert_eq!(tensor.data[0], 2.0);
        assert_eq!(tensor.data[VECTOR_WIDTH], 3.0);
        assert_eq!(tensor.data[2 * VECTOR_WIDTH], 4.0);
    }

    #[test]
    fn clear_empties_the_window() {
        let mut window = SequenceWindow::new(2);
        window.push(tagged(1));
        window.push(tagged(2));
        window.clear();
        assert!(window.is_empty());
        assert!(!window.is_ready());
    }
}
