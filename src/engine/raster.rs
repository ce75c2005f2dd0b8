//! Software raster surface
//!
//! RGBA8 pixels with straight alpha, the layout `ImageData` expects, plus a
//! small 2D-context look-alike (state stack, global alpha, composite mode,
//! logical→device scale) that the brush paints through.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// One pixel (straight alpha)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Device-pixel backing store
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl Raster {
    /// New fully transparent raster
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba::TRANSPARENT; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x < self.width && y < self.height {
            Some(self.pixels[self.index(x, y)])
        } else {
            None
        }
    }

    pub fn fill(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    pub fn clear(&mut self) {
        self.fill(Rgba::TRANSPARENT);
    }

    /// Reallocate at a new size. Like assigning `canvas.width`, this drops
    /// all content.
    pub fn resize(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height);
    }

    /// Copy `src` in at (dx, dy) without scaling or blending, clipped to
    /// this raster (`putImageData` semantics)
    pub fn put_image(&mut self, src: &Raster, dx: i32, dy: i32) {
        for sy in 0..src.height {
            let ty = sy as i64 + dy as i64;
            if ty < 0 || ty >= self.height as i64 {
                continue;
            }
            for sx in 0..src.width {
                let tx = sx as i64 + dx as i64;
                if tx < 0 || tx >= self.width as i64 {
                    continue;
                }
                let dst = self.index(tx as u32, ty as u32);
                self.pixels[dst] = src.pixels[src.index(sx, sy)];
            }
        }
    }

    /// Raw RGBA bytes, row-major
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    fn composite(&mut self, x: u32, y: u32, rgb: [f32; 3], alpha: f32, mode: CompositeMode) {
        let idx = self.index(x, y);
        let dst = self.pixels[idx];
        self.pixels[idx] = match mode {
            CompositeMode::Copy => Rgba::new(
                rgb[0].round() as u8,
                rgb[1].round() as u8,
                rgb[2].round() as u8,
                (alpha * 255.0).round() as u8,
            ),
            CompositeMode::SourceOver => {
                let da = dst.a as f32 / 255.0;
                let out_a = alpha + da * (1.0 - alpha);
                if out_a <= f32::EPSILON {
                    Rgba::TRANSPARENT
                } else {
                    let channel = |s: f32, d: u8| {
                        ((s * alpha + d as f32 * da * (1.0 - alpha)) / out_a)
                            .round()
                            .clamp(0.0, 255.0) as u8
                    };
                    Rgba::new(
                        channel(rgb[0], dst.r),
                        channel(rgb[1], dst.g),
                        channel(rgb[2], dst.b),
                        (out_a * 255.0).round() as u8,
                    )
                }
            }
        };
    }
}

/// How new paint combines with existing pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositeMode {
    /// Normal alpha blending
    #[default]
    SourceOver,
    /// Replace destination pixels
    Copy,
}

/// Transient drawing state saved / restored around each operation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawState {
    pub composite: CompositeMode,
    pub global_alpha: f32,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            composite: CompositeMode::SourceOver,
            global_alpha: 1.0,
        }
    }
}

/// Radial gradient stop: color and alpha at `offset` (0 = centre, 1 = edge)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: [u8; 3],
    pub alpha: f32,
}

impl GradientStop {
    pub fn new(offset: f32, color: [u8; 3], alpha: f32) -> Self {
        Self {
            offset,
            color,
            alpha,
        }
    }
}

/// Sample a stop list (sorted by offset) at `t`
fn sample_gradient(stops: &[GradientStop], t: f32) -> ([f32; 3], f32) {
    let to_f = |c: [u8; 3]| [c[0] as f32, c[1] as f32, c[2] as f32];
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return ([0.0; 3], 0.0);
    };
    if t <= first.offset {
        return (to_f(first.color), first.alpha);
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = (b.offset - a.offset).max(f32::EPSILON);
            let k = (t - a.offset) / span;
            let (ca, cb) = (to_f(a.color), to_f(b.color));
            let rgb = [
                ca[0] + (cb[0] - ca[0]) * k,
                ca[1] + (cb[1] - ca[1]) * k,
                ca[2] + (cb[2] - ca[2]) * k,
            ];
            return (rgb, a.alpha + (b.alpha - a.alpha) * k);
        }
    }
    (to_f(last.color), last.alpha)
}

/// A raster plus 2D-context style drawing state
#[derive(Debug, Clone)]
pub struct PaintContext {
    raster: Raster,
    /// Logical → device pixel scale
    scale: f32,
    state: DrawState,
    saved: Vec<DrawState>,
}

impl PaintContext {
    pub fn new(width: u32, height: u32, scale: f32) -> Self {
        Self {
            raster: Raster::new(width, height),
            scale,
            state: DrawState::default(),
            saved: Vec::new(),
        }
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    pub fn raster_mut(&mut self) -> &mut Raster {
        &mut self.raster
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Resizing a canvas resets its transform and state
    pub fn resize(&mut self, width: u32, height: u32, scale: f32) {
        self.raster.resize(width, height);
        self.scale = scale;
        self.state = DrawState::default();
        self.saved.clear();
    }

    pub fn state(&self) -> DrawState {
        self.state
    }

    pub fn save(&mut self) {
        self.saved.push(self.state);
    }

    pub fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.state = state;
        }
    }

    pub fn set_composite(&mut self, mode: CompositeMode) {
        self.state.composite = mode;
    }

    pub fn set_global_alpha(&mut self, alpha: f32) {
        if alpha.is_finite() && (0.0..=1.0).contains(&alpha) {
            self.state.global_alpha = alpha;
        }
    }

    /// Fill a logical-coordinate rectangle with a solid color
    pub fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgba) {
        let (x0, y0, x1, y1) = self.device_bounds(origin, origin + size);
        let rgb = [color.r as f32, color.g as f32, color.b as f32];
        let alpha = color.a as f32 / 255.0 * self.state.global_alpha;
        for y in y0..y1 {
            for x in x0..x1 {
                self.raster.composite(x, y, rgb, alpha, self.state.composite);
            }
        }
    }

    /// Fill a logical-coordinate circle with a radial gradient
    pub fn fill_radial(&mut self, center: Vec2, radius: f32, stops: &[GradientStop]) {
        if !(radius > 0.0) {
            return;
        }
        let (x0, y0, x1, y1) =
            self.device_bounds(center - Vec2::splat(radius), center + Vec2::splat(radius));
        for y in y0..y1 {
            for x in x0..x1 {
                let logical = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) / self.scale;
                let t = logical.distance(center) / radius;
                if t > 1.0 {
                    continue;
                }
                let (rgb, alpha) = sample_gradient(stops, t);
                let alpha = alpha * self.state.global_alpha;
                if alpha <= 0.0 {
                    continue;
                }
                self.raster.composite(x, y, rgb, alpha, self.state.composite);
            }
        }
    }

    /// Clip a logical box to device pixel bounds [x0, x1) × [y0, y1)
    fn device_bounds(&self, min: Vec2, max: Vec2) -> (u32, u32, u32, u32) {
        let clamp_x = |v: f32| (v * self.scale).clamp(0.0, self.raster.width as f32);
        let clamp_y = |v: f32| (v * self.scale).clamp(0.0, self.raster.height as f32);
        (
            clamp_x(min.x).floor() as u32,
            clamp_y(min.y).floor() as u32,
            clamp_x(max.x).ceil() as u32,
            clamp_y(max.y).ceil() as u32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_over_on_opaque_keeps_alpha() {
        let mut ctx = PaintContext::new(4, 4, 1.0);
        ctx.fill_rect(Vec2::ZERO, Vec2::splat(4.0), Rgba::WHITE);
        ctx.set_global_alpha(0.5);
        ctx.fill_rect(Vec2::ZERO, Vec2::splat(2.0), Rgba::new(0, 0, 0, 255));
        let px = ctx.raster().pixel(0, 0).unwrap();
        assert_eq!(px.a, 255);
        assert!((px.r as i32 - 128).abs() <= 1);
        assert_eq!(ctx.raster().pixel(3, 3), Some(Rgba::WHITE));
    }

    #[test]
    fn test_copy_replaces_pixels() {
        let mut ctx = PaintContext::new(2, 2, 1.0);
        ctx.fill_rect(Vec2::ZERO, Vec2::splat(2.0), Rgba::WHITE);
        ctx.set_composite(CompositeMode::Copy);
        ctx.fill_rect(Vec2::ZERO, Vec2::splat(1.0), Rgba::new(10, 20, 30, 0));
        assert_eq!(ctx.raster().pixel(0, 0), Some(Rgba::new(10, 20, 30, 0)));
    }

    #[test]
    fn test_save_restore_round_trips_state() {
        let mut ctx = PaintContext::new(1, 1, 1.0);
        let before = ctx.state();
        ctx.save();
        ctx.set_global_alpha(0.2);
        ctx.set_composite(CompositeMode::Copy);
        ctx.restore();
        assert_eq!(ctx.state(), before);
        // Unbalanced restore is a no-op
        ctx.restore();
        assert_eq!(ctx.state(), before);
    }

    #[test]
    fn test_radial_fill_fades_to_edge() {
        let mut ctx = PaintContext::new(40, 40, 1.0);
        let stops = [
            GradientStop::new(0.0, [255, 0, 0], 1.0),
            GradientStop::new(1.0, [255, 0, 0], 0.0),
        ];
        ctx.fill_radial(Vec2::splat(20.0), 15.0, &stops);
        let centre = ctx.raster().pixel(20, 20).unwrap();
        let near_edge = ctx.raster().pixel(33, 20).unwrap();
        assert!(centre.a > 240);
        assert!(near_edge.a < centre.a);
        assert_eq!(ctx.raster().pixel(0, 0), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn test_scale_maps_logical_to_device() {
        let mut ctx = PaintContext::new(20, 20, 2.0);
        ctx.fill_rect(Vec2::ZERO, Vec2::splat(5.0), Rgba::WHITE);
        assert_eq!(ctx.raster().pixel(9, 9), Some(Rgba::WHITE));
        assert_eq!(ctx.raster().pixel(10, 10), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn test_put_image_clips() {
        let mut src = Raster::new(3, 3);
        src.fill(Rgba::WHITE);
        let mut dst = Raster::new(2, 2);
        dst.put_image(&src, -1, 0);
        assert_eq!(dst.pixel(0, 0), Some(Rgba::WHITE));
        assert_eq!(dst.pixel(1, 1), Some(Rgba::WHITE));
        assert_eq!(dst.as_bytes().len(), 16);
    }
}
