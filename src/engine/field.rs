//! Ambient field component
//!
//! The single long-lived object a host mounts: it owns the motion
//! preference, the sampler, the stroke accumulator and one strategy, and it
//! is driven entirely by host calls (pointer, resize, frame, reset).

use glam::Vec2;

use super::clock::FrameClock;
use super::motion::MotionPreference;
use super::parallax::HeroWord;
use super::pointer::{PointerSampler, SurfaceRect, SurfaceSize};
use super::strategy::{RenderSurfaceStrategy, StrategyKind, SurfaceOutput, build_strategy};
use super::stroke::StrokeAccumulator;
use crate::settings::FieldSettings;

/// Host callback receiving the running stroke count
pub type StrokeCallback = Box<dyn FnMut(u64)>;

pub struct AmbientField {
    motion: MotionPreference,
    force_reduced_motion: bool,
    sampler: PointerSampler,
    strokes: StrokeAccumulator,
    /// Host-visible counter (zeroed by reset)
    stroke_count: u64,
    strategy: Box<dyn RenderSurfaceStrategy>,
    clock: FrameClock,
    on_stroke: Option<StrokeCallback>,
}

impl AmbientField {
    pub fn new(settings: &FieldSettings, motion: MotionPreference, seed: u64) -> Self {
        Self::with_strategy(settings, motion, build_strategy(settings, seed))
    }

    pub fn with_strategy(
        settings: &FieldSettings,
        motion: MotionPreference,
        mut strategy: Box<dyn RenderSurfaceStrategy>,
    ) -> Self {
        let reduced = settings.force_reduced_motion || motion.is_reduced_motion_preferred();
        if reduced {
            strategy.on_reduced_motion(true);
        }
        log::info!(
            "Ambient field created ({}, reduced motion: {})",
            strategy.kind().as_str(),
            reduced
        );
        Self {
            motion,
            force_reduced_motion: settings.force_reduced_motion,
            sampler: PointerSampler::new(),
            strokes: StrokeAccumulator::new(settings.stroke_threshold),
            stroke_count: 0,
            strategy,
            clock: FrameClock::default(),
            on_stroke: None,
        }
    }

    pub fn set_on_stroke(&mut self, callback: impl FnMut(u64) + 'static) {
        self.on_stroke = Some(Box::new(callback));
    }

    pub fn kind(&self) -> StrategyKind {
        self.strategy.kind()
    }

    pub fn motion(&self) -> &MotionPreference {
        &self.motion
    }

    pub fn reduced_motion(&self) -> bool {
        self.force_reduced_motion || self.motion.is_reduced_motion_preferred()
    }

    pub fn strokes(&self) -> u64 {
        self.stroke_count
    }

    pub fn sampler(&self) -> &PointerSampler {
        &self.sampler
    }

    pub fn output(&self) -> SurfaceOutput<'_> {
        self.strategy.output()
    }

    pub fn take_dirty(&mut self) -> bool {
        self.strategy.take_dirty()
    }

    /// Pointer moved to viewport position `client`. `rect` is the surface's
    /// bounding box at the time of the event, `None` if it is unavailable.
    pub fn pointer_move(&mut self, client: Vec2, rect: Option<SurfaceRect>, now: f64) {
        if self.reduced_motion() {
            return;
        }
        let Some(sample) = self.sampler.sample(client, rect) else {
            return;
        };

        self.strategy.on_pointer_move(&sample, now);

        if self.strokes.observe(sample.pos) {
            self.stroke_count += 1;
            if let Some(callback) = self.on_stroke.as_mut() {
                callback(self.stroke_count);
            }
        }
    }

    pub fn resize(&mut self, surface: SurfaceSize) {
        self.strategy.on_resize(surface);
    }

    /// Animation frame at `now`; runs however many fixed ticks are due
    pub fn frame(&mut self, now: f64) -> u32 {
        let ticks = self.clock.advance(now);
        for _ in 0..ticks {
            self.strategy.tick(now);
        }
        ticks
    }

    /// One lifecycle step, bypassing the frame clock
    pub fn tick(&mut self, now: f64) {
        self.strategy.tick(now);
    }

    /// Clear accumulated visuals and the stroke counter
    pub fn reset(&mut self) {
        self.strategy.on_reset();
        self.strokes.reset();
        self.stroke_count = 0;
    }

    /// Reduced-motion change notification from the host
    pub fn set_reduced_motion(&mut self, reduced: bool) {
        let before = self.reduced_motion();
        self.motion.set(reduced);
        let after = self.reduced_motion();
        if before != after {
            log::info!("Reduced motion {}", if after { "on" } else { "off" });
            self.strategy.on_reduced_motion(after);
            self.strokes.reset();
        }
    }

    pub fn set_word(&mut self, word: &str) {
        self.strategy.set_word(word);
    }

    pub fn word(&self) -> Option<HeroWord> {
        self.strategy.word()
    }

    /// Forget frame timing (remount)
    pub fn rewind_clock(&mut self) {
        self.clock.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::blobs::BlobEngine;
    use std::cell::Cell;
    use std::rc::Rc;

    fn rect() -> Option<SurfaceRect> {
        Some(SurfaceRect::new(0.0, 0.0, 800.0, 600.0))
    }

    fn blob_field() -> AmbientField {
        let settings = FieldSettings::from_preset(StrategyKind::Blobs);
        let mut field = AmbientField::new(&settings, MotionPreference::new(false), 9);
        field.resize(SurfaceSize::new(800.0, 600.0, 1.0));
        field
    }

    fn live_blobs(field: &AmbientField) -> usize {
        match field.output() {
            SurfaceOutput::Blobs(blobs) => blobs.len(),
            _ => panic!("not a blob field"),
        }
    }

    #[test]
    fn test_callback_fires_per_stroke() {
        let mut field = blob_field();
        let seen = Rc::new(Cell::new(0));
        let sink = seen.clone();
        field.set_on_stroke(move |n| sink.set(n));

        for x in 0..=48 {
            field.pointer_move(Vec2::new(x as f32, 100.0), rect(), x as f64);
        }
        assert_eq!(field.strokes(), 4);
        assert_eq!(seen.get(), 4);
    }

    #[test]
    fn test_reset_zeroes_counter_and_blocks_small_move() {
        let mut field = blob_field();
        for x in 0..=30 {
            field.pointer_move(Vec2::new(x as f32, 100.0), rect(), x as f64 * 20.0);
        }
        assert!(field.strokes() > 0);
        assert!(live_blobs(&field) > 0);

        field.reset();
        assert_eq!(field.strokes(), 0);
        assert_eq!(live_blobs(&field), 0);
        field.pointer_move(Vec2::new(35.0, 100.0), rect(), 1000.0);
        field.pointer_move(Vec2::new(40.0, 100.0), rect(), 1001.0);
        assert_eq!(field.strokes(), 0);
    }

    #[test]
    fn test_reset_twice_matches_once() {
        let mut field = blob_field();
        for x in 0..=30 {
            field.pointer_move(Vec2::new(x as f32, 0.0), rect(), x as f64 * 20.0);
        }
        field.reset();
        field.reset();
        assert_eq!(field.strokes(), 0);
        assert_eq!(live_blobs(&field), 0);
    }

    #[test]
    fn test_reduced_motion_gates_everything() {
        let settings = FieldSettings::from_preset(StrategyKind::Blobs);
        let mut field = AmbientField::new(&settings, MotionPreference::new(true), 9);
        field.resize(SurfaceSize::new(800.0, 600.0, 1.0));
        for x in 0..200 {
            field.pointer_move(Vec2::new(x as f32 * 3.0, 10.0), rect(), x as f64 * 150.0);
            field.frame(x as f64 * 150.0);
        }
        assert_eq!(field.strokes(), 0);
        match field.output() {
            SurfaceOutput::Blobs(blobs) => {
                assert_eq!(blobs.len(), 2);
                assert!(blobs.iter().all(|b| b.opacity == 1.0));
            }
            _ => panic!("not a blob field"),
        }
    }

    #[test]
    fn test_live_motion_change() {
        let mut field = blob_field();
        let pref = field.motion().clone();
        field.set_reduced_motion(true);
        assert!(pref.is_reduced_motion_preferred());
        assert_eq!(live_blobs(&field), 2);

        field.set_reduced_motion(false);
        assert_eq!(live_blobs(&field), 0);
        field.pointer_move(Vec2::new(10.0, 10.0), rect(), 0.0);
        assert_eq!(live_blobs(&field), 1);
    }

    #[test]
    fn test_forced_reduced_motion_overrides_system() {
        let mut settings = FieldSettings::from_preset(StrategyKind::Canvas);
        settings.force_reduced_motion = true;
        let mut field = AmbientField::new(&settings, MotionPreference::new(false), 1);
        field.set_reduced_motion(false);
        assert!(field.reduced_motion());
    }

    #[test]
    fn test_dropped_samples_do_nothing() {
        let mut field = blob_field();
        field.pointer_move(Vec2::new(10.0, 10.0), None, 0.0);
        assert_eq!(live_blobs(&field), 0);
        assert_eq!(field.sampler().dropped(), 1);
    }

    #[test]
    fn test_frame_drives_blob_expiry() {
        let settings = FieldSettings::from_preset(StrategyKind::Blobs);
        let mut field = AmbientField::with_strategy(
            &settings,
            MotionPreference::new(false),
            Box::new(BlobEngine::new(&settings, 3)),
        );
        field.pointer_move(Vec2::new(50.0, 50.0), rect(), 0.0);
        let mut now = 0.0;
        while now < 4000.0 {
            field.frame(now);
            now += 16.0;
        }
        assert_eq!(live_blobs(&field), 0);
    }

    #[test]
    fn test_host_word_and_field_agree() {
        let settings = FieldSettings::from_preset(StrategyKind::Parallax);
        let mut field = AmbientField::new(&settings, MotionPreference::new(false), 2);
        assert_eq!(field.word(), Some(HeroWord::Assumptions));
        field.set_word("ego");
        let mut now = 0.0;
        while now < 12_000.0 {
            field.frame(now);
            now += 16.0;
        }
        assert_eq!(field.word(), Some(HeroWord::Ego));
        assert_eq!(blob_field().word(), None);
    }

    #[test]
    fn test_direct_tick_ignores_clock() {
        let mut field = blob_field();
        field.pointer_move(Vec2::new(50.0, 50.0), rect(), 0.0);
        field.tick(3599.0);
        assert_eq!(live_blobs(&field), 1);
        field.tick(3600.0);
        assert_eq!(live_blobs(&field), 0);
    }

    #[test]
    fn test_canvas_field_paints_and_counts() {
        let settings = FieldSettings::from_preset(StrategyKind::Canvas);
        let mut field = AmbientField::new(&settings, MotionPreference::new(false), 5);
        field.resize(SurfaceSize::new(200.0, 100.0, 1.0));
        assert!(field.take_dirty());
        for x in 10..=40 {
            field.pointer_move(Vec2::new(x as f32, 50.0), rect(), 0.0);
        }
        assert!(field.take_dirty());
        assert_eq!(field.strokes(), 2);
        assert!(matches!(field.output(), SurfaceOutput::Raster(_)));
    }
}
