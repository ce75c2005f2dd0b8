//! Pointer sampling
//!
//! Converts viewport pointer coordinates into surface-local samples.

use glam::Vec2;

/// Surface bounding box in viewport coordinates (`getBoundingClientRect`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl SurfaceRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// A rect mid-layout (zero area or NaN) cannot place a sample
    pub fn is_laid_out(&self) -> bool {
        [self.left, self.top, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.width > 0.0
            && self.height > 0.0
    }

    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Logical surface size plus the device pixel ratio of the backing store
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSize {
    pub width: f32,
    pub height: f32,
    pub device_pixel_ratio: f32,
}

impl SurfaceSize {
    pub fn new(width: f32, height: f32, device_pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            // `devicePixelRatio || 1`
            device_pixel_ratio: if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
                device_pixel_ratio
            } else {
                1.0
            },
        }
    }

    pub fn from_rect(rect: &SurfaceRect, device_pixel_ratio: f32) -> Self {
        Self::new(rect.width, rect.height, device_pixel_ratio)
    }

    pub fn is_empty(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0)
    }

    /// Backing store dimensions in device pixels
    pub fn device_pixels(&self) -> (u32, u32) {
        (
            (self.width * self.device_pixel_ratio).ceil().max(0.0) as u32,
            (self.height * self.device_pixel_ratio).ceil().max(0.0) as u32,
        )
    }
}

/// One pointer position on the surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    /// Surface-local position (logical px)
    pub pos: Vec2,
    /// Position mapped to [-1, 1] on both axes, centre = 0
    pub normalized: Vec2,
}

/// Turns raw pointer events into samples, dropping the ones that arrive
/// while the surface is not laid out
#[derive(Debug, Default)]
pub struct PointerSampler {
    dropped: u64,
}

impl PointerSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// `local = client - rect.origin`. Returns `None` for an unusable rect.
    pub fn sample(&mut self, client: Vec2, rect: Option<SurfaceRect>) -> Option<PointerSample> {
        let Some(rect) = rect.filter(SurfaceRect::is_laid_out) else {
            self.dropped += 1;
            return None;
        };
        if !client.is_finite() {
            self.dropped += 1;
            return None;
        }

        let pos = client - rect.origin();
        let normalized = (pos / rect.size() - Vec2::splat(0.5)) * 2.0;
        Some(PointerSample { pos, normalized })
    }

    /// Samples discarded because of a missing or mid-layout surface
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
