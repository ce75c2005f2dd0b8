//! Fixed-rate tick scheduling
//!
//! The host calls `advance` once per animation frame; the clock answers with
//! how many fixed ticks are due so lifecycle updates run at a steady rate no
//! matter how irregular frames are.

use crate::consts::{MAX_FRAME_GAP_MS, MAX_SUBSTEPS, TICK_MS};

#[derive(Debug, Clone)]
pub struct FrameClock {
    tick_ms: f64,
    accumulator: f64,
    last_time: Option<f64>,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(TICK_MS)
    }
}

impl FrameClock {
    pub fn new(tick_ms: f64) -> Self {
        Self {
            tick_ms,
            accumulator: 0.0,
            last_time: None,
        }
    }

    /// Feed a frame timestamp (ms). Returns the number of ticks to run.
    pub fn advance(&mut self, now: f64) -> u32 {
        let dt = match self.last_time {
            Some(last) => (now - last).clamp(0.0, MAX_FRAME_GAP_MS),
            // First frame runs exactly one tick
            None => self.tick_ms,
        };
        self.last_time = Some(now);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= self.tick_ms && substeps < MAX_SUBSTEPS {
            self.accumulator -= self.tick_ms;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            // Drop the backlog instead of spiralling
            self.accumulator = self.accumulator.min(self.tick_ms);
        }
        substeps
    }

    /// Forget timing history (after unmount / remount)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.last_time = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_runs_one_tick() {
        let mut clock = FrameClock::new(10.0);
        assert_eq!(clock.advance(1234.0), 1);
    }

    #[test]
    fn test_steady_frames_accumulate() {
        let mut clock = FrameClock::new(10.0);
        clock.advance(0.0);
        assert_eq!(clock.advance(5.0), 0);
        assert_eq!(clock.advance(10.0), 1);
        assert_eq!(clock.advance(35.0), 2);
        // 5ms left over from the last frame
        assert_eq!(clock.advance(40.0), 1);
    }

    #[test]
    fn test_long_gap_is_clamped() {
        let mut clock = FrameClock::new(10.0);
        clock.advance(0.0);
        assert_eq!(clock.advance(60_000.0), MAX_SUBSTEPS);
        assert!(clock.advance(60_000.0) <= 1);
    }

    #[test]
    fn test_time_going_backwards_runs_nothing() {
        let mut clock = FrameClock::new(10.0);
        clock.advance(100.0);
        assert_eq!(clock.advance(50.0), 0);
    }
}
