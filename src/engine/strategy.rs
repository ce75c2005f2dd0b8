//! Render surface strategies
//!
//! The field does sampling and stroke accounting; a strategy decides what
//! the pointer leaves behind.

use serde::{Deserialize, Serialize};

use super::blobs::{Blob, BlobEngine};
use super::canvas::CanvasEngine;
use super::parallax::{HeroWord, ParallaxField, ParallaxLayer};
use super::pointer::{PointerSample, SurfaceSize};
use super::raster::Raster;
use crate::settings::FieldSettings;

/// Available strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Persistent brush canvas
    #[default]
    Canvas,
    /// Ephemeral fading blobs
    Blobs,
    /// Word-keyed parallax blobs
    Parallax,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Canvas => "canvas",
            StrategyKind::Blobs => "blobs",
            StrategyKind::Parallax => "parallax",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "canvas" | "brush" => Some(StrategyKind::Canvas),
            "blobs" | "blob" => Some(StrategyKind::Blobs),
            "parallax" => Some(StrategyKind::Parallax),
            _ => None,
        }
    }

    /// Whether pointer events should be taken from the whole viewport
    /// rather than the surface element
    pub fn full_bleed(&self) -> bool {
        matches!(self, StrategyKind::Parallax)
    }
}

/// What the host should draw this frame
#[derive(Debug, Clone, Copy)]
pub enum SurfaceOutput<'a> {
    /// Nothing drawable yet (uninitialized surface)
    Empty,
    /// In-memory pixels the host must copy out
    Raster(&'a Raster),
    /// Already drawn onto the host surface by the painter
    Painted,
    Blobs(&'a [Blob]),
    Layers(&'a [ParallaxLayer]),
}

pub trait RenderSurfaceStrategy {
    fn kind(&self) -> StrategyKind;

    /// A sample the field accepted (motion allowed, surface laid out)
    fn on_pointer_move(&mut self, sample: &PointerSample, now: f64);

    fn on_resize(&mut self, surface: SurfaceSize);

    /// Fixed-rate lifecycle step
    fn tick(&mut self, now: f64);

    /// Forcibly expire everything
    fn on_reset(&mut self);

    /// Switch between the static fallback and the live composition
    fn on_reduced_motion(&mut self, reduced: bool);

    /// Hero word changed (only the parallax field cares)
    fn set_word(&mut self, _word: &str) {}

    /// Word the output currently shows, if the strategy is word-keyed
    fn word(&self) -> Option<HeroWord> {
        None
    }

    fn output(&self) -> SurfaceOutput<'_>;

    /// Whether output changed since the last call
    fn take_dirty(&mut self) -> bool {
        true
    }
}

/// Instantiate the strategy named by the settings
pub fn build_strategy(settings: &FieldSettings, seed: u64) -> Box<dyn RenderSurfaceStrategy> {
    match settings.strategy {
        StrategyKind::Canvas => Box::new(CanvasEngine::new(settings.paint_step, seed)),
        StrategyKind::Blobs => Box::new(BlobEngine::new(settings, seed)),
        StrategyKind::Parallax => Box::new(ParallaxField::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip() {
        for kind in [StrategyKind::Canvas, StrategyKind::Blobs, StrategyKind::Parallax] {
            assert_eq!(StrategyKind::parse(kind.as_str()), Some(kind));
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
        assert_eq!(StrategyKind::parse("Brush"), Some(StrategyKind::Canvas));
        assert_eq!(StrategyKind::parse("confetti"), None);
    }

    #[test]
    fn test_build_strategy_matches_settings() {
        for kind in [StrategyKind::Canvas, StrategyKind::Blobs, StrategyKind::Parallax] {
            let strategy = build_strategy(&FieldSettings::from_preset(kind), 1);
            assert_eq!(strategy.kind(), kind);
        }
    }

    #[test]
    fn test_uninitialized_canvas_outputs_nothing() {
        let strategy = build_strategy(&FieldSettings::from_preset(StrategyKind::Canvas), 1);
        assert!(matches!(strategy.output(), SurfaceOutput::Empty));
    }
}
