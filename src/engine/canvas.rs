//! Persistent canvas brush
//!
//! Soft gradient stamps accumulate along the pointer path. Content survives
//! resizes (snapshot → resize → restore) and is only wiped by an explicit
//! reset. Pixels live wherever the `BrushPainter` keeps them.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::brush::{BrushPainter, RasterPainter, Stamp};
use super::pointer::{PointerSample, SurfaceSize};
use super::raster::{Raster, Rgba};
use super::strategy::{RenderSurfaceStrategy, StrategyKind, SurfaceOutput};
use crate::consts::*;
use crate::error::{AmbientError, Result};
use crate::{OFF_SURFACE, lerp_vec};

/// Warm editorial brush palette (rgb, peak alpha)
pub const PAINT_COLORS: [([u8; 3], f32); 4] = [
    ([255, 186, 73], 0.9),   // amber
    ([255, 145, 77], 0.85),  // coral
    ([244, 208, 160], 0.8),  // sand
    ([148, 163, 184], 0.75), // cool neutral
];

/// Background the canvas is washed with on init and reset
pub const BASE_WASH: Rgba = Rgba::WHITE;

pub struct CanvasEngine {
    painter: Box<dyn BrushPainter>,
    /// `None` until the first successful initialize
    surface: Option<SurfaceSize>,
    last_paint: Option<Vec2>,
    paint_step: f32,
    rng: Pcg32,
    reduced_motion: bool,
    dirty: bool,
    /// Pointer moves that arrived before the surface was sized
    skipped: u64,
}

impl CanvasEngine {
    /// Engine painting into an in-memory raster
    pub fn new(paint_step: f32, seed: u64) -> Self {
        Self::with_painter(paint_step, seed, Box::new(RasterPainter::new()))
    }

    pub fn with_painter(paint_step: f32, seed: u64, painter: Box<dyn BrushPainter>) -> Self {
        Self {
            painter,
            surface: None,
            last_paint: OFF_SURFACE,
            paint_step,
            rng: Pcg32::seed_from_u64(seed),
            reduced_motion: false,
            dirty: false,
            skipped: 0,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.surface.is_some()
    }

    pub fn raster(&self) -> Option<&Raster> {
        self.painter.raster()
    }

    pub fn last_paint(&self) -> Option<Vec2> {
        self.last_paint
    }

    pub fn skipped_moves(&self) -> u64 {
        self.skipped
    }

    /// Size the backing store for the surface and apply the base wash
    pub fn initialize(&mut self, surface: SurfaceSize) -> Result<()> {
        Self::check_surface(surface)?;
        self.painter.resize(surface, BASE_WASH, false)?;
        self.surface = Some(surface);
        self.dirty = true;
        let (w, h) = surface.device_pixels();
        log::info!("Canvas initialized {}x{} @{}x", w, h, surface.device_pixel_ratio);
        Ok(())
    }

    /// Resize the backing store, keeping what has been painted so far
    pub fn handle_resize(&mut self, surface: SurfaceSize) -> Result<()> {
        if !self.is_initialized() {
            return self.initialize(surface);
        }
        Self::check_surface(surface)?;
        // Newly exposed area gets the wash; the old pixels go back on top
        self.painter.resize(surface, BASE_WASH, true)?;
        self.surface = Some(surface);
        self.dirty = true;
        let (w, h) = surface.device_pixels();
        log::info!("Canvas content restored after resize ({}x{})", w, h);
        Ok(())
    }

    fn check_surface(surface: SurfaceSize) -> Result<()> {
        if surface.is_empty() {
            return Err(AmbientError::EmptySurface {
                width: surface.width,
                height: surface.height,
            });
        }
        Ok(())
    }

    /// Paint one soft stamp centred at `center`
    pub fn paint_stamp(&mut self, center: Vec2) -> Option<Stamp> {
        self.surface?;

        let (color, peak_alpha) = PAINT_COLORS[self.rng.random_range(0..PAINT_COLORS.len())];
        let stamp = Stamp {
            center,
            radius: self.rng.random_range(STAMP_RADIUS_MIN..STAMP_RADIUS_MAX),
            color,
            peak_alpha,
            global_alpha: self.rng.random_range(STAMP_ALPHA_MIN..STAMP_ALPHA_MAX),
        };

        if let Err(e) = self.painter.stamp(&stamp) {
            log::warn!("Stamp skipped: {}", e);
            return None;
        }
        self.dirty = true;
        Some(stamp)
    }

    /// Paint evenly spaced stamps from `from` to `to` (both included).
    /// Returns the number of stamps painted.
    pub fn paint_stroke(&mut self, from: Option<Vec2>, to: Vec2) -> usize {
        let Some(from) = from else {
            return self.paint_stamp(to).map_or(0, |_| 1);
        };

        let distance = from.distance(to);
        if distance <= self.paint_step {
            return 0;
        }

        let steps = (distance / self.paint_step).ceil() as usize;
        let mut painted = 0;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            if self.paint_stamp(lerp_vec(from, to, t)).is_some() {
                painted += 1;
            }
        }
        painted
    }

    /// Clear everything and re-apply the base wash once
    pub fn reset(&mut self) {
        if self.is_initialized() {
            match self.painter.wash(BASE_WASH) {
                Ok(()) => self.dirty = true,
                Err(e) => log::warn!("Canvas wash failed: {}", e),
            }
        }
        self.last_paint = OFF_SURFACE;
        log::info!("Canvas reset");
    }
}

impl RenderSurfaceStrategy for CanvasEngine {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Canvas
    }

    fn on_pointer_move(&mut self, sample: &PointerSample, _now: f64) {
        if self.reduced_motion {
            return;
        }
        if !self.is_initialized() {
            self.skipped += 1;
            if self.skipped == 1 {
                log::warn!("Canvas not initialized, stamps skipped until first resize");
            }
            return;
        }
        if self.paint_stroke(self.last_paint, sample.pos) > 0 {
            self.last_paint = Some(sample.pos);
        }
    }

    fn on_resize(&mut self, surface: SurfaceSize) {
        if let Err(e) = self.handle_resize(surface) {
            log::warn!("Canvas resize skipped: {}", e);
        }
    }

    fn tick(&mut self, _now: f64) {}

    fn on_reset(&mut self) {
        self.reset();
    }

    fn on_reduced_motion(&mut self, reduced: bool) {
        self.reduced_motion = reduced;
        if reduced {
            // Static fallback is the plain wash
            self.reset();
        }
    }

    fn output(&self) -> SurfaceOutput<'_> {
        match (self.raster(), self.surface) {
            (Some(raster), _) => SurfaceOutput::Raster(raster),
            (None, Some(_)) => SurfaceOutput::Painted,
            (None, None) => SurfaceOutput::Empty,
        }
    }

    fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
