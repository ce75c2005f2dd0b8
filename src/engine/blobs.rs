//! Ephemeral blob field
//!
//! Soft radial highlights spawned along the pointer path. Each blob fades
//! in, holds, fades out and is then removed; the live set is capped and
//! spawns are throttled.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::pointer::{PointerSample, SurfaceSize};
use super::strategy::{RenderSurfaceStrategy, StrategyKind, SurfaceOutput};
use crate::consts::*;
use crate::settings::{Envelope, FieldSettings};

/// Cool highlight palette (rgb, peak alpha)
pub const BLOB_COLORS: [([u8; 3], f32); 4] = [
    ([79, 70, 229], 0.45),   // deep indigo
    ([165, 180, 252], 0.42), // light indigo
    ([94, 234, 212], 0.38),  // teal
    ([148, 163, 184], 0.35), // slate
];

/// Static composition used under reduced motion: (x%, y%, size, palette index)
const STATIC_BLOBS: [(f32, f32, f32, usize); 2] = [(0.25, 0.30, 520.0, 0), (0.75, 0.70, 480.0, 2)];

/// One live blob. Only `opacity` changes after spawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Blob {
    pub id: u32,
    /// Top-left corner (spawn centre minus half the size)
    pub pos: Vec2,
    /// Diameter
    pub size: f32,
    pub color: [u8; 3],
    pub peak_alpha: f32,
    /// Spawn time (ms)
    pub created_at: f64,
    /// Derived from age on every tick
    pub opacity: f32,
}

impl Blob {
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }
}

/// Opacity for a blob of the given age, `None` once it has expired
pub fn envelope_opacity(envelope: &Envelope, age_ms: f64) -> Option<f32> {
    let age = age_ms.max(0.0);
    if age >= envelope.lifetime_ms() {
        return None;
    }
    let opacity = if age < envelope.fade_in_ms {
        age / envelope.fade_in_ms
    } else if age < envelope.hold_until_ms() {
        1.0
    } else {
        1.0 - (age - envelope.hold_until_ms()) / envelope.fade_out_ms
    };
    Some(opacity.clamp(0.0, 1.0) as f32)
}

pub struct BlobEngine {
    /// Insertion order = age order
    blobs: Vec<Blob>,
    cap: usize,
    spawn_interval_ms: f64,
    envelope: Envelope,
    last_spawn: Option<f64>,
    next_id: u32,
    surface: Option<SurfaceSize>,
    reduced_motion: bool,
    rng: Pcg32,
}

impl BlobEngine {
    pub fn new(settings: &FieldSettings, seed: u64) -> Self {
        Self {
            blobs: Vec::with_capacity(settings.blob_cap + 1),
            cap: settings.blob_cap,
            spawn_interval_ms: settings.spawn_interval_ms,
            envelope: settings.envelope,
            last_spawn: None,
            next_id: 1,
            surface: None,
            reduced_motion: false,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Live blobs, oldest first
    pub fn blobs(&self) -> &[Blob] {
        &self.blobs
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    /// Allocate a new blob ID
    fn next_blob_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn a blob centred at `center` unless one was spawned less than the
    /// throttle interval ago. Returns the new blob's ID.
    pub fn spawn(&mut self, center: Vec2, now: f64) -> Option<u32> {
        if let Some(last) = self.last_spawn {
            if now - last < self.spawn_interval_ms {
                return None;
            }
        }
        self.last_spawn = Some(now);

        let (color, peak_alpha) = BLOB_COLORS[self.rng.random_range(0..BLOB_COLORS.len())];
        let size = self.rng.random_range(BLOB_SIZE_MIN..BLOB_SIZE_MAX);
        let id = self.next_blob_id();
        self.blobs.push(Blob {
            id,
            pos: center - Vec2::splat(size / 2.0),
            size,
            color,
            peak_alpha,
            created_at: now,
            opacity: 0.0,
        });

        if self.blobs.len() > self.cap {
            let excess = self.blobs.len() - self.cap;
            self.blobs.drain(..excess);
        }
        Some(id)
    }

    /// Recompute opacity from age and drop expired blobs
    pub fn tick(&mut self, now: f64) {
        let envelope = self.envelope;
        self.blobs.retain_mut(|blob| match envelope_opacity(&envelope, now - blob.created_at) {
            Some(opacity) => {
                blob.opacity = opacity;
                true
            }
            None => false,
        });
    }

    /// Drop every blob immediately and forget the throttle
    pub fn reset(&mut self) {
        self.blobs.clear();
        self.last_spawn = None;
    }

    /// Two fixed, fully opaque blobs at proportional positions
    pub fn static_composition(surface: SurfaceSize) -> Vec<Blob> {
        STATIC_BLOBS
            .iter()
            .enumerate()
            .map(|(i, &(fx, fy, size, color))| {
                let center = Vec2::new(surface.width * fx, surface.height * fy);
                let (rgb, peak_alpha) = BLOB_COLORS[color];
                Blob {
                    id: i as u32,
                    pos: center - Vec2::splat(size / 2.0),
                    size,
                    color: rgb,
                    peak_alpha,
                    created_at: 0.0,
                    opacity: 1.0,
                }
            })
            .collect()
    }

    fn show_static(&mut self) {
        self.blobs.clear();
        if let Some(surface) = self.surface {
            self.blobs.extend(Self::static_composition(surface));
        }
    }
}

impl RenderSurfaceStrategy for BlobEngine {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Blobs
    }

    fn on_pointer_move(&mut self, sample: &PointerSample, now: f64) {
        if self.reduced_motion {
            return;
        }
        self.spawn(sample.pos, now);
    }

    fn on_resize(&mut self, surface: SurfaceSize) {
        self.surface = Some(surface);
        if self.reduced_motion {
            self.show_static();
        }
    }

    fn tick(&mut self, now: f64) {
        if !self.reduced_motion {
            BlobEngine::tick(self, now);
        }
    }

    fn on_reset(&mut self) {
        self.reset();
        if self.reduced_motion {
            self.show_static();
        }
    }

    fn on_reduced_motion(&mut self, reduced: bool) {
        self.reduced_motion = reduced;
        if reduced {
            self.show_static();
        } else {
            self.reset();
        }
    }

    fn output(&self) -> SurfaceOutput<'_> {
        SurfaceOutput::Blobs(self.blobs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn engine() -> BlobEngine {
        BlobEngine::new(&FieldSettings::from_preset(StrategyKind::Blobs), 42)
    }

    #[test]
    fn test_envelope_phases() {
        let env = Envelope::default();
        assert_eq!(envelope_opacity(&env, 0.0), Some(0.0));
        assert!((envelope_opacity(&env, 100.0).unwrap() - 0.5).abs() < 1e-6);
        assert_eq!(envelope_opacity(&env, 200.0), Some(1.0));
        assert_eq!(envelope_opacity(&env, 2799.0), Some(1.0));
        assert!((envelope_opacity(&env, 3000.0).unwrap() - 0.75).abs() < 1e-6);
        assert_eq!(envelope_opacity(&env, 3600.0), None);
        assert_eq!(envelope_opacity(&env, -50.0), Some(0.0));
    }

    #[test]
    fn test_spawn_geometry() {
        let mut engine = engine();
        let id = engine.spawn(Vec2::new(500.0, 300.0), 0.0).unwrap();
        let blob = &engine.blobs()[0];
        assert_eq!(blob.id, id);
        assert!((BLOB_SIZE_MIN..BLOB_SIZE_MAX).contains(&blob.size));
        assert!((blob.center() - Vec2::new(500.0, 300.0)).length() < 1e-3);
        assert!(BLOB_COLORS.iter().any(|(c, _)| *c == blob.color));
    }

    #[test]
    fn test_spawn_is_throttled() {
        let mut engine = engine();
        let spawned = (0..10)
            .filter(|i| engine.spawn(Vec2::splat(10.0), 1000.0 + *i as f64 * 5.0).is_some())
            .count();
        assert_eq!(spawned, 1);
        assert!(engine.spawn(Vec2::splat(10.0), 1100.0).is_some());
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut engine = engine();
        let a = engine.spawn(Vec2::ZERO, 0.0).unwrap();
        let b = engine.spawn(Vec2::ZERO, 100.0).unwrap();
        engine.reset();
        let c = engine.spawn(Vec2::ZERO, 200.0).unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let mut engine = engine();
        for i in 0..30 {
            engine.spawn(Vec2::ZERO, i as f64 * 100.0);
        }
        assert_eq!(engine.len(), BLOB_CAP);
        assert_eq!(engine.blobs()[0].id, 5);
        assert_eq!(engine.blobs()[BLOB_CAP - 1].id, 30);
    }

    #[test]
    fn test_tick_ages_and_expires() {
        let mut engine = engine();
        engine.spawn(Vec2::ZERO, 0.0);
        engine.spawn(Vec2::ZERO, 2900.0);

        engine.tick(3000.0);
        assert_eq!(engine.len(), 2);
        assert!((engine.blobs()[0].opacity - 0.75).abs() < 1e-6);
        assert!((engine.blobs()[1].opacity - 0.5).abs() < 1e-6);

        engine.tick(3600.0);
        assert_eq!(engine.len(), 1);
        assert_eq!(engine.blobs()[0].created_at, 2900.0);
    }

    #[test]
    fn test_reset_clears_and_rearms_throttle() {
        let mut engine = engine();
        engine.spawn(Vec2::ZERO, 0.0);
        engine.reset();
        assert!(engine.is_empty());
        assert!(engine.spawn(Vec2::ZERO, 10.0).is_some());
        engine.reset();
        engine.reset();
        assert!(engine.is_empty());
    }

    #[test]
    fn test_reduced_motion_renders_static_pair() {
        let mut engine = engine();
        engine.on_resize(SurfaceSize::new(1000.0, 800.0, 1.0));
        engine.on_reduced_motion(true);

        let sample = PointerSample {
            pos: Vec2::new(10.0, 10.0),
            normalized: Vec2::ZERO,
        };
        for i in 0..20 {
            engine.on_pointer_move(&sample, i as f64 * 200.0);
            RenderSurfaceStrategy::tick(&mut engine, i as f64 * 200.0);
        }
        let blobs = engine.blobs();
        assert_eq!(blobs.len(), 2);
        assert!(blobs.iter().all(|b| b.opacity == 1.0));
        assert!((blobs[0].center() - Vec2::new(250.0, 240.0)).length() < 1e-3);
    }

    proptest! {
        #[test]
        fn prop_population_never_exceeds_cap(gaps in prop::collection::vec(0u32..400, 1..200)) {
            let mut engine = engine();
            let mut now = 0.0;
            for gap in gaps {
                now += gap as f64;
                engine.spawn(Vec2::splat(gap as f32), now);
                prop_assert!(engine.len() <= BLOB_CAP);
                engine.tick(now);
                prop_assert!(engine.len() <= BLOB_CAP);
            }
        }
    }
}
