//! Hero Ambience - pointer-reactive background engine for hero sections
//!
//! Core modules:
//! - `engine`: Deterministic animation core (sampling, strokes, strategies)
//! - `renderer`: Turns strategy output into drawable styles / pixels
//! - `platform`: Host subscriptions and the browser binding
//! - `settings`: Data-driven presets for each strategy

pub mod engine;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;

pub use engine::{AmbientField, StrategyKind};
pub use error::AmbientError;
pub use settings::{Envelope, FieldSettings};

use glam::Vec2;

/// Engine configuration constants
pub mod consts {
    /// Fixed lifecycle timestep (60 Hz)
    pub const TICK_MS: f64 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Frame gaps longer than this (background tab) are clamped
    pub const MAX_FRAME_GAP_MS: f64 = 100.0;

    /// Distance the pointer must travel to count one stroke
    pub const STROKE_THRESHOLD: f32 = 12.0;

    /// Canvas brush: interpolation step between stamps
    pub const PAINT_STEP: f32 = 1.0;
    /// Canvas brush: stamp radius range (logical px)
    pub const STAMP_RADIUS_MIN: f32 = 50.0;
    pub const STAMP_RADIUS_MAX: f32 = 80.0;
    /// Canvas brush: per-stamp global alpha range
    pub const STAMP_ALPHA_MIN: f32 = 0.15;
    pub const STAMP_ALPHA_MAX: f32 = 0.30;

    /// Blob field: minimum interval between spawns
    pub const SPAWN_INTERVAL_MS: f64 = 100.0;
    /// Blob field: max concurrently live blobs
    pub const BLOB_CAP: usize = 26;
    /// Blob field: diameter range (px)
    pub const BLOB_SIZE_MIN: f32 = 380.0;
    pub const BLOB_SIZE_MAX: f32 = 560.0;
    /// Blob field: opacity envelope
    pub const BLOB_FADE_IN_MS: f64 = 200.0;
    pub const BLOB_HOLD_MS: f64 = 2600.0;
    pub const BLOB_FADE_OUT_MS: f64 = 800.0;

    /// Parallax: per-frame smoothing factor
    pub const PARALLAX_LERP: f32 = 0.06;
    /// Parallax: base offset and per-layer increment (px)
    pub const PARALLAX_BASE_PX: f32 = 24.0;
    pub const PARALLAX_STEP_PX: f32 = 8.0;
    /// Parallax: rotating word period
    pub const WORD_PERIOD_MS: f64 = 3000.0;
}

/// Position the pointer engines use for "not on the surface yet"
pub const OFF_SURFACE: Option<Vec2> = None;

/// Linear interpolation between two points
#[inline]
pub fn lerp_vec(a: Vec2, b: Vec2, t: f32) -> Vec2 {
    a + (b - a) * t
}

/// Map an RGBA color with a straight alpha in 0..=1 to a CSS `rgba()` string
pub fn css_rgba(rgb: [u8; 3], alpha: f32) -> String {
    format!(
        "rgba({},{},{},{})",
        rgb[0],
        rgb[1],
        rgb[2],
        (alpha.clamp(0.0, 1.0) * 1000.0).round() / 1000.0
    )
}
