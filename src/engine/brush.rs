//! Brush painting backends
//!
//! The canvas engine decides where stamps go; a `BrushPainter` puts them on
//! a surface. In the browser that is the page's own 2D context. The software
//! `RasterPainter` paints the same operations into a `Raster` so pixel
//! behaviour can be checked natively.

use glam::Vec2;

use super::pointer::SurfaceSize;
use super::raster::{CompositeMode, GradientStop, PaintContext, Raster, Rgba};
use crate::error::Result;

/// Parameters chosen for one stamp
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stamp {
    pub center: Vec2,
    pub radius: f32,
    pub color: [u8; 3],
    pub peak_alpha: f32,
    pub global_alpha: f32,
}

impl Stamp {
    /// Gradient from full color-alpha at the centre to transparent at the rim
    pub fn stops(&self) -> [GradientStop; 4] {
        let a = self.peak_alpha;
        [
            GradientStop::new(0.0, self.color, a),
            GradientStop::new(0.4, self.color, a * 0.7),
            GradientStop::new(0.7, self.color, a * 0.3),
            GradientStop::new(1.0, self.color, 0.0),
        ]
    }
}

/// Drawing surface the brush paints through. Coordinates are logical
/// pixels; the backend applies the device pixel ratio.
pub trait BrushPainter {
    /// Size the backing store for `surface` and wash it. With `keep`, the
    /// previous device pixels are put back at the origin, unscaled.
    fn resize(&mut self, surface: SurfaceSize, wash: Rgba, keep: bool) -> Result<()>;

    /// Clear everything and apply the wash
    fn wash(&mut self, color: Rgba) -> Result<()>;

    /// Paint one stamp with normal blending. Transient state must not leak.
    fn stamp(&mut self, stamp: &Stamp) -> Result<()>;

    /// Pixels, for backends that keep them in memory
    fn raster(&self) -> Option<&Raster> {
        None
    }
}

/// Software backend over `PaintContext`
#[derive(Debug, Default)]
pub struct RasterPainter {
    ctx: Option<PaintContext>,
    surface: Option<SurfaceSize>,
}

impl RasterPainter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn context(&self) -> Option<&PaintContext> {
        self.ctx.as_ref()
    }

    fn fill_wash(ctx: &mut PaintContext, surface: SurfaceSize, color: Rgba) {
        ctx.save();
        ctx.set_composite(CompositeMode::SourceOver);
        ctx.set_global_alpha(1.0);
        ctx.fill_rect(Vec2::ZERO, Vec2::new(surface.width, surface.height), color);
        ctx.restore();
    }
}

impl BrushPainter for RasterPainter {
    fn resize(&mut self, surface: SurfaceSize, wash: Rgba, keep: bool) -> Result<()> {
        let (w, h) = surface.device_pixels();
        let snapshot = if keep {
            self.ctx.as_ref().map(|ctx| ctx.raster().clone())
        } else {
            None
        };

        let ctx = self
            .ctx
            .get_or_insert_with(|| PaintContext::new(w, h, surface.device_pixel_ratio));
        ctx.resize(w, h, surface.device_pixel_ratio);
        Self::fill_wash(ctx, surface, wash);
        if let Some(snapshot) = snapshot {
            ctx.raster_mut().put_image(&snapshot, 0, 0);
        }
        self.surface = Some(surface);
        Ok(())
    }

    fn wash(&mut self, color: Rgba) -> Result<()> {
        if let (Some(ctx), Some(surface)) = (self.ctx.as_mut(), self.surface) {
            ctx.raster_mut().clear();
            Self::fill_wash(ctx, surface, color);
        }
        Ok(())
    }

    fn stamp(&mut self, stamp: &Stamp) -> Result<()> {
        let Some(ctx) = self.ctx.as_mut() else {
            return Ok(());
        };
        ctx.save();
        ctx.set_composite(CompositeMode::SourceOver);
        ctx.set_global_alpha(stamp.global_alpha);
        ctx.fill_radial(stamp.center, stamp.radius, &stamp.stops());
        ctx.restore();
        Ok(())
    }

    fn raster(&self) -> Option<&Raster> {
        self.ctx.as_ref().map(PaintContext::raster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stamp_at(center: Vec2) -> Stamp {
        Stamp {
            center,
            radius: 10.0,
            color: [255, 0, 0],
            peak_alpha: 0.9,
            global_alpha: 0.3,
        }
    }

    #[test]
    fn test_stamp_does_not_leak_state() {
        let mut painter = RasterPainter::new();
        painter.resize(SurfaceSize::new(40.0, 40.0, 1.0), Rgba::WHITE, false).unwrap();
        let before = painter.context().unwrap().state();
        painter.stamp(&stamp_at(Vec2::splat(20.0))).unwrap();
        assert_eq!(painter.context().unwrap().state(), before);
    }

    #[test]
    fn test_stamp_before_resize_is_noop() {
        let mut painter = RasterPainter::new();
        painter.stamp(&stamp_at(Vec2::ZERO)).unwrap();
        assert!(painter.raster().is_none());
    }

    #[test]
    fn test_resize_without_keep_drops_content() {
        let mut painter = RasterPainter::new();
        let size = SurfaceSize::new(40.0, 40.0, 1.0);
        painter.resize(size, Rgba::WHITE, false).unwrap();
        painter.stamp(&stamp_at(Vec2::splat(20.0))).unwrap();
        painter.resize(size, Rgba::WHITE, false).unwrap();
        assert_eq!(painter.raster().unwrap().pixel(20, 20), Some(Rgba::WHITE));
    }

    #[test]
    fn test_stops_taper_to_transparent() {
        let stops = stamp_at(Vec2::ZERO).stops();
        assert_eq!(stops.map(|s| s.offset), [0.0, 0.4, 0.7, 1.0]);
        assert!(stops.windows(2).all(|w| w[1].alpha < w[0].alpha));
        assert_eq!(stops[3].alpha, 0.0);
    }
}
