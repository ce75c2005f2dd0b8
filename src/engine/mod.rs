//! Deterministic ambient animation core
//!
//! Everything that decides what the background looks like lives here. This
//! module must stay free of browser types:
//! - Time is passed in as milliseconds, never read from a clock
//! - Randomness comes from a seeded `Pcg32` only
//! - Stable iteration order (blobs keep insertion order)

pub mod blobs;
pub mod brush;
pub mod canvas;
pub mod clock;
pub mod field;
pub mod motion;
pub mod parallax;
pub mod pointer;
pub mod raster;
pub mod strategy;
pub mod stroke;

pub use blobs::{Blob, BlobEngine, envelope_opacity};
pub use brush::{BrushPainter, RasterPainter, Stamp};
pub use canvas::CanvasEngine;
pub use clock::FrameClock;
pub use field::AmbientField;
pub use motion::MotionPreference;
pub use parallax::{HeroWord, ParallaxField, ParallaxLayer, RotatingWords};
pub use pointer::{PointerSample, PointerSampler, SurfaceRect, SurfaceSize};
pub use raster::{CompositeMode, DrawState, GradientStop, PaintContext, Raster, Rgba};
pub use strategy::{RenderSurfaceStrategy, StrategyKind, SurfaceOutput, build_strategy};
pub use stroke::StrokeAccumulator;
