//! Stroke accounting
//!
//! Thresholds pointer travel into discrete strokes for the host counter.
//! Distance is measured from the last *qualifying* position, so sub-threshold
//! jitter never adds up to a stroke.

use glam::Vec2;

use crate::OFF_SURFACE;

#[derive(Debug, Clone)]
pub struct StrokeAccumulator {
    threshold: f32,
    /// Last position that emitted (or seeded) a stroke; `None` = off-surface
    anchor: Option<Vec2>,
    /// Strokes emitted over the accumulator's lifetime
    emitted: u64,
}

impl StrokeAccumulator {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            anchor: OFF_SURFACE,
            emitted: 0,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn anchor(&self) -> Option<Vec2> {
        self.anchor
    }

    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Feed one sample. Returns true when it completes a stroke.
    pub fn observe(&mut self, pos: Vec2) -> bool {
        let Some(anchor) = self.anchor else {
            // First sample on the surface only establishes where we are
            self.anchor = Some(pos);
            return false;
        };

        if anchor.distance(pos) >= self.threshold {
            self.anchor = Some(pos);
            self.emitted += 1;
            log::debug!("stroke #{} at ({:.1}, {:.1})", self.emitted, pos.x, pos.y);
            true
        } else {
            false
        }
    }

    /// Forget the anchor so the next sample cannot complete a stroke
    pub fn reset(&mut self) {
        self.anchor = OFF_SURFACE;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sweep(acc: &mut StrokeAccumulator, from: f32, to: f32) -> u64 {
        let mut strokes = 0;
        let mut x = from;
        while x <= to {
            if acc.observe(Vec2::new(x, 40.0)) {
                strokes += 1;
            }
            x += 1.0;
        }
        strokes
    }

    #[test]
    fn test_first_sample_only_anchors() {
        let mut acc = StrokeAccumulator::new(12.0);
        assert!(!acc.observe(Vec2::new(500.0, 500.0)));
        assert_eq!(acc.anchor(), Some(Vec2::new(500.0, 500.0)));
        assert_eq!(acc.emitted(), 0);
    }

    #[test]
    fn test_one_stroke_per_threshold_span() {
        let mut acc = StrokeAccumulator::new(12.0);
        // 0..=60 is 60 units of travel
        assert_eq!(sweep(&mut acc, 0.0, 60.0), 5);
        assert_eq!(acc.anchor(), Some(Vec2::new(60.0, 40.0)));
    }

    #[test]
    fn test_sub_threshold_moves_do_not_accumulate() {
        let mut acc = StrokeAccumulator::new(12.0);
        acc.observe(Vec2::ZERO);
        // Oscillate within the threshold around the anchor
        for i in 0..50 {
            let x = if i % 2 == 0 { 11.0 } else { -11.0 };
            assert!(!acc.observe(Vec2::new(x, 0.0)));
        }
        assert_eq!(acc.anchor(), Some(Vec2::ZERO));
    }

    #[test]
    fn test_reset_blocks_small_move() {
        let mut acc = StrokeAccumulator::new(12.0);
        sweep(&mut acc, 0.0, 30.0);
        acc.reset();
        assert!(!acc.observe(Vec2::new(35.0, 40.0)));
        assert!(!acc.observe(Vec2::new(40.0, 40.0)));
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut once = StrokeAccumulator::new(12.0);
        let mut twice = StrokeAccumulator::new(12.0);
        for acc in [&mut once, &mut twice] {
            acc.observe(Vec2::ZERO);
            acc.observe(Vec2::new(20.0, 0.0));
        }
        once.reset();
        twice.reset();
        twice.reset();
        assert_eq!(once.anchor(), twice.anchor());
        assert_eq!(once.emitted(), twice.emitted());
    }

    proptest! {
        #[test]
        fn prop_straight_line_counts_floor(len in 0u32..400, threshold in 1u32..40) {
            let mut acc = StrokeAccumulator::new(threshold as f32);
            let strokes = sweep(&mut acc, 0.0, len as f32);
            prop_assert_eq!(strokes, (len / threshold) as u64);
        }
    }
}
