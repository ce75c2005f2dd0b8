//! Rendering of strategy output
//!
//! Blob and parallax output become absolutely positioned elements with a
//! radial-gradient background. The canvas brush paints through
//! `dom::CanvasPainter` directly. Style computation is plain Rust so it can
//! be tested off the web.

#[cfg(target_arch = "wasm32")]
pub mod dom;

use crate::css_rgba;
use crate::engine::{Blob, ParallaxLayer, SurfaceOutput};

/// Blur applied to parallax layers
pub const LAYER_BLUR_PX: f32 = 140.0;

/// Inline style for one overlay element, as (property, value) pairs
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElementStyle {
    pub props: Vec<(&'static str, String)>,
}

impl ElementStyle {
    pub fn get(&self, prop: &str) -> Option<&str> {
        self.props
            .iter()
            .find(|(name, _)| *name == prop)
            .map(|(_, value)| value.as_str())
    }

    fn set(&mut self, prop: &'static str, value: String) {
        self.props.push((prop, value));
    }
}

fn radial_background(rgb: [u8; 3], alpha: f32) -> String {
    format!("radial-gradient(circle, {} 0%, transparent 70%)", css_rgba(rgb, alpha))
}

pub fn blob_style(blob: &Blob) -> ElementStyle {
    let mut style = ElementStyle::default();
    style.set("left", format!("{:.1}px", blob.pos.x));
    style.set("top", format!("{:.1}px", blob.pos.y));
    style.set("width", format!("{:.1}px", blob.size));
    style.set("height", format!("{:.1}px", blob.size));
    style.set("background", radial_background(blob.color, blob.peak_alpha));
    style.set("opacity", format!("{:.3}", blob.opacity));
    style
}

pub fn layer_style(layer: &ParallaxLayer) -> ElementStyle {
    let mut style = ElementStyle::default();
    style.set("left", format!("{}%", layer.anchor_pct.x));
    style.set("top", format!("{}%", layer.anchor_pct.y));
    style.set("width", format!("{}px", layer.size));
    style.set("height", format!("{}px", layer.size));
    style.set("background", radial_background(layer.color, layer.alpha));
    style.set("filter", format!("blur({}px)", LAYER_BLUR_PX));
    style.set(
        "transform",
        format!(
            "translate3d({:.2}px, {:.2}px, 0) translate(-50%, -50%) scale({})",
            layer.offset.x, layer.offset.y, layer.scale
        ),
    );
    style
}

/// Overlay element styles for the output, empty for canvas output
pub fn overlay_styles(output: SurfaceOutput<'_>) -> Vec<ElementStyle> {
    match output {
        SurfaceOutput::Blobs(blobs) => blobs.iter().map(blob_style).collect(),
        SurfaceOutput::Layers(layers) => layers.iter().map(layer_style).collect(),
        SurfaceOutput::Raster(_) | SurfaceOutput::Painted | SurfaceOutput::Empty => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{BlobEngine, ParallaxField, StrategyKind};
    use crate::settings::FieldSettings;
    use glam::Vec2;

    #[test]
    fn test_blob_style() {
        let blob = Blob {
            id: 1,
            pos: Vec2::new(10.0, -20.0),
            size: 400.0,
            color: [79, 70, 229],
            peak_alpha: 0.45,
            created_at: 0.0,
            opacity: 0.5,
        };
        let style = blob_style(&blob);
        assert_eq!(style.get("left"), Some("10.0px"));
        assert_eq!(style.get("top"), Some("-20.0px"));
        assert_eq!(style.get("width"), Some("400.0px"));
        assert_eq!(style.get("opacity"), Some("0.500"));
        assert_eq!(
            style.get("background"),
            Some("radial-gradient(circle, rgba(79,70,229,0.45) 0%, transparent 70%)")
        );
    }

    #[test]
    fn test_layer_style_centres_on_anchor() {
        let field = ParallaxField::new();
        let style = layer_style(&field.layers()[0]);
        assert_eq!(style.get("left"), Some("20%"));
        assert_eq!(style.get("top"), Some("25%"));
        assert_eq!(
            style.get("transform"),
            Some("translate3d(0.00px, 0.00px, 0) translate(-50%, -50%) scale(1)")
        );
        assert_eq!(style.get("filter"), Some("blur(140px)"));
    }

    #[test]
    fn test_overlay_styles_follow_output() {
        let mut engine = BlobEngine::new(&FieldSettings::from_preset(StrategyKind::Blobs), 1);
        engine.spawn(Vec2::ZERO, 0.0);
        engine.spawn(Vec2::ZERO, 500.0);
        assert_eq!(overlay_styles(SurfaceOutput::Blobs(engine.blobs())).len(), 2);
        assert!(overlay_styles(SurfaceOutput::Empty).is_empty());
    }
}
