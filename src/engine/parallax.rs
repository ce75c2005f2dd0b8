//! Word-keyed parallax field
//!
//! Four large soft blobs per hero word, drifting against the pointer with a
//! smoothed (lerped) offset. The hero word rotates on a fixed period.

use glam::Vec2;

use super::pointer::{PointerSample, SurfaceSize};
use super::strategy::{RenderSurfaceStrategy, StrategyKind, SurfaceOutput};
use crate::consts::*;
use crate::lerp_vec;

/// Rotating hero words, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeroWord {
    #[default]
    Assumptions,
    Noise,
    Guesswork,
    Opinions,
    Hype,
    Ego,
}

impl HeroWord {
    pub const ALL: [HeroWord; 6] = [
        HeroWord::Assumptions,
        HeroWord::Noise,
        HeroWord::Guesswork,
        HeroWord::Opinions,
        HeroWord::Hype,
        HeroWord::Ego,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HeroWord::Assumptions => "assumptions",
            HeroWord::Noise => "noise",
            HeroWord::Guesswork => "guesswork",
            HeroWord::Opinions => "opinions",
            HeroWord::Hype => "hype",
            HeroWord::Ego => "ego",
        }
    }

    /// Unknown words fall back to `Assumptions`
    pub fn parse(s: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|w| w.as_str().eq_ignore_ascii_case(s.trim()))
            .unwrap_or_default()
    }

    pub fn next(&self) -> Self {
        let idx = Self::ALL.iter().position(|w| w == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// (x%, y%, size px, rgb, alpha, scale) for each of the four layers
    fn preset(&self) -> [(f32, f32, f32, [u8; 3], f32, f32); 4] {
        const INDIGO: [u8; 3] = [79, 70, 229];
        const LIGHT: [u8; 3] = [165, 180, 252];
        const TEAL: [u8; 3] = [94, 234, 212];
        const SLATE: [u8; 3] = [148, 163, 184];
        match self {
            HeroWord::Assumptions => [
                (20.0, 25.0, 680.0, INDIGO, 0.45, 1.0),
                (75.0, 20.0, 640.0, LIGHT, 0.42, 1.0),
                (30.0, 70.0, 660.0, TEAL, 0.38, 1.0),
                (80.0, 75.0, 620.0, SLATE, 0.35, 1.0),
            ],
            HeroWord::Noise => [
                (25.0, 30.0, 700.0, INDIGO, 0.48, 1.03),
                (70.0, 25.0, 650.0, LIGHT, 0.40, 1.03),
                (35.0, 65.0, 670.0, TEAL, 0.35, 1.03),
                (75.0, 70.0, 630.0, SLATE, 0.32, 1.03),
            ],
            HeroWord::Guesswork => [
                (18.0, 22.0, 690.0, INDIGO, 0.42, 1.0),
                (72.0, 28.0, 660.0, LIGHT, 0.45, 1.0),
                (28.0, 68.0, 680.0, TEAL, 0.40, 1.0),
                (78.0, 72.0, 640.0, SLATE, 0.38, 1.0),
            ],
            HeroWord::Opinions => [
                (22.0, 28.0, 670.0, INDIGO, 0.40, 1.03),
                (68.0, 22.0, 640.0, LIGHT, 0.38, 1.03),
                (32.0, 72.0, 690.0, TEAL, 0.45, 1.03),
                (73.0, 68.0, 620.0, SLATE, 0.35, 1.03),
            ],
            HeroWord::Hype => [
                (25.0, 32.0, 710.0, INDIGO, 0.46, 1.03),
                (65.0, 26.0, 670.0, LIGHT, 0.43, 1.03),
                (35.0, 60.0, 680.0, TEAL, 0.42, 1.03),
                (70.0, 65.0, 650.0, SLATE, 0.40, 1.03),
            ],
            HeroWord::Ego => [
                (20.0, 35.0, 680.0, INDIGO, 0.44, 1.0),
                (70.0, 30.0, 660.0, LIGHT, 0.40, 1.0),
                (30.0, 65.0, 670.0, TEAL, 0.38, 1.0),
                (75.0, 70.0, 640.0, SLATE, 0.48, 1.0),
            ],
        }
    }
}

/// Cycles hero words every `WORD_PERIOD_MS` until the host picks one
#[derive(Debug, Clone)]
pub struct RotatingWords {
    current: HeroWord,
    period_ms: f64,
    last_switch: Option<f64>,
    /// Host drives the word; internal rotation is off
    pinned: bool,
}

impl Default for RotatingWords {
    fn default() -> Self {
        Self {
            current: HeroWord::default(),
            period_ms: WORD_PERIOD_MS,
            last_switch: None,
            pinned: false,
        }
    }
}

impl RotatingWords {
    pub fn current(&self) -> HeroWord {
        self.current
    }

    /// Advance the clock; returns the new word when it changes
    pub fn tick(&mut self, now: f64) -> Option<HeroWord> {
        if self.pinned {
            return None;
        }
        let Some(last) = self.last_switch else {
            self.last_switch = Some(now);
            return None;
        };
        if now - last >= self.period_ms {
            self.current = self.current.next();
            self.last_switch = Some(now);
            Some(self.current)
        } else {
            None
        }
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    /// Show `word` from now on and stop rotating
    pub fn pin(&mut self, word: HeroWord) {
        self.current = word;
        self.pinned = true;
    }
}

/// One positioned parallax blob, ready to draw
#[derive(Debug, Clone, PartialEq)]
pub struct ParallaxLayer {
    /// Anchor in percent of the surface (blob centred on it)
    pub anchor_pct: Vec2,
    pub size: f32,
    pub color: [u8; 3],
    pub alpha: f32,
    pub scale: f32,
    /// Pointer-driven translation (px)
    pub offset: Vec2,
}

pub struct ParallaxField {
    words: RotatingWords,
    /// Normalized pointer target in [-1, 1]
    target: Vec2,
    smooth: Vec2,
    reduced_motion: bool,
    layers: Vec<ParallaxLayer>,
}

impl Default for ParallaxField {
    fn default() -> Self {
        Self::new()
    }
}

impl ParallaxField {
    pub fn new() -> Self {
        let mut field = Self {
            words: RotatingWords::default(),
            target: Vec2::ZERO,
            smooth: Vec2::ZERO,
            reduced_motion: false,
            layers: Vec::with_capacity(4),
        };
        field.rebuild_layers();
        field
    }

    pub fn word(&self) -> HeroWord {
        self.words.current()
    }

    pub fn smooth(&self) -> Vec2 {
        self.smooth
    }

    pub fn layers(&self) -> &[ParallaxLayer] {
        &self.layers
    }

    pub fn is_word_pinned(&self) -> bool {
        self.words.is_pinned()
    }

    /// Host-chosen word. The host owns the word from here on.
    pub fn set_word(&mut self, word: HeroWord) {
        self.words.pin(word);
        self.rebuild_layers();
    }

    /// One smoothing step toward the pointer target
    pub fn step(&mut self) {
        self.smooth = lerp_vec(self.smooth, self.target, PARALLAX_LERP);
    }

    fn rebuild_layers(&mut self) {
        let smooth = if self.reduced_motion { Vec2::ZERO } else { self.smooth };
        self.layers.clear();
        self.layers.extend(self.word().preset().iter().enumerate().map(
            |(i, &(x, y, size, color, alpha, scale))| ParallaxLayer {
                anchor_pct: Vec2::new(x, y),
                size,
                color,
                alpha,
                scale,
                offset: smooth * (PARALLAX_BASE_PX + i as f32 * PARALLAX_STEP_PX),
            },
        ));
    }
}

impl RenderSurfaceStrategy for ParallaxField {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Parallax
    }

    fn on_pointer_move(&mut self, sample: &PointerSample, _now: f64) {
        if !self.reduced_motion {
            self.target = sample.normalized;
        }
    }

    fn on_resize(&mut self, _surface: SurfaceSize) {}

    fn tick(&mut self, now: f64) {
        if self.reduced_motion {
            return;
        }
        if let Some(word) = self.words.tick(now) {
            log::debug!("hero word -> {}", word.as_str());
        }
        self.step();
        self.rebuild_layers();
    }

    fn on_reset(&mut self) {
        self.target = Vec2::ZERO;
        self.smooth = Vec2::ZERO;
        self.rebuild_layers();
    }

    fn on_reduced_motion(&mut self, reduced: bool) {
        self.reduced_motion = reduced;
        self.rebuild_layers();
    }

    fn set_word(&mut self, word: &str) {
        ParallaxField::set_word(self, HeroWord::parse(word));
    }

    fn word(&self) -> Option<HeroWord> {
        Some(ParallaxField::word(self))
    }

    fn output(&self) -> SurfaceOutput<'_> {
        SurfaceOutput::Layers(&self.layers)
    }
}
