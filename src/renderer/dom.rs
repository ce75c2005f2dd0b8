//! DOM / 2D-canvas output (WASM only)

use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement};

use super::ElementStyle;
use crate::css_rgba;
use crate::engine::{BrushPainter, Rgba, Stamp, SurfaceSize};
use crate::error::{AmbientError, Result};

fn canvas_error(e: JsValue) -> AmbientError {
    AmbientError::CanvasOperation(format!("{:?}", e))
}

/// Brush backend drawing straight into the page's canvas
pub struct CanvasPainter {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    surface: Option<SurfaceSize>,
}

impl CanvasPainter {
    pub fn new(canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d) -> Self {
        Self {
            canvas,
            ctx,
            surface: None,
        }
    }

    fn fill_wash(&self, surface: SurfaceSize, color: Rgba) -> std::result::Result<(), JsValue> {
        self.ctx.save();
        let result = self.ctx.set_global_composite_operation("source-over").map(|()| {
            self.ctx.set_global_alpha(1.0);
            self.ctx
                .set_fill_style_str(&css_rgba([color.r, color.g, color.b], color.a as f32 / 255.0));
            self.ctx
                .fill_rect(0.0, 0.0, surface.width as f64, surface.height as f64);
        });
        self.ctx.restore();
        result
    }

    fn draw_stamp(&self, stamp: &Stamp) -> std::result::Result<(), JsValue> {
        let (x, y, r) = (stamp.center.x as f64, stamp.center.y as f64, stamp.radius as f64);
        let gradient = self.ctx.create_radial_gradient(x, y, 0.0, x, y, r)?;
        for stop in stamp.stops() {
            gradient.add_color_stop(stop.offset, &css_rgba(stop.color, stop.alpha))?;
        }
        self.ctx.set_global_composite_operation("source-over")?;
        self.ctx.set_global_alpha(stamp.global_alpha as f64);
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.ctx.begin_path();
        self.ctx.arc(x, y, r, 0.0, TAU)?;
        self.ctx.fill();
        Ok(())
    }
}

impl BrushPainter for CanvasPainter {
    fn resize(&mut self, surface: SurfaceSize, wash: Rgba, keep: bool) -> Result<()> {
        let (old_w, old_h) = (self.canvas.width(), self.canvas.height());
        let snapshot = if keep && old_w > 0 && old_h > 0 {
            Some(
                self.ctx
                    .get_image_data(0.0, 0.0, old_w as f64, old_h as f64)
                    .map_err(canvas_error)?,
            )
        } else {
            None
        };

        let (w, h) = surface.device_pixels();
        self.canvas.set_width(w);
        self.canvas.set_height(h);
        // Assigning the size reset the transform
        let dpr = surface.device_pixel_ratio as f64;
        self.ctx
            .set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)
            .map_err(canvas_error)?;
        self.surface = Some(surface);

        self.fill_wash(surface, wash).map_err(canvas_error)?;
        if let Some(snapshot) = snapshot {
            self.ctx
                .put_image_data(&snapshot, 0.0, 0.0)
                .map_err(canvas_error)?;
        }
        Ok(())
    }

    fn wash(&mut self, color: Rgba) -> Result<()> {
        let Some(surface) = self.surface else {
            return Ok(());
        };
        self.ctx
            .clear_rect(0.0, 0.0, surface.width as f64, surface.height as f64);
        self.fill_wash(surface, color).map_err(canvas_error)
    }

    fn stamp(&mut self, stamp: &Stamp) -> Result<()> {
        self.ctx.save();
        let result = self.draw_stamp(stamp);
        self.ctx.restore();
        result.map_err(canvas_error)
    }
}

/// Absolutely positioned overlay elements, reconciled by index
pub struct Overlay {
    document: Document,
    container: HtmlElement,
    nodes: Vec<HtmlElement>,
}

impl Overlay {
    pub fn new(document: Document, container: HtmlElement) -> Self {
        Self {
            document,
            container,
            nodes: Vec::new(),
        }
    }

    pub fn apply(&mut self, styles: &[ElementStyle]) -> std::result::Result<(), JsValue> {
        while self.nodes.len() > styles.len() {
            if let Some(node) = self.nodes.pop() {
                node.remove();
            }
        }
        while self.nodes.len() < styles.len() {
            let node: HtmlElement = self.document.create_element("div")?.dyn_into()?;
            let css = node.style();
            css.set_property("position", "absolute")?;
            css.set_property("border-radius", "9999px")?;
            css.set_property("pointer-events", "none")?;
            css.set_property("will-change", "transform, opacity")?;
            self.container.append_child(&node)?;
            self.nodes.push(node);
        }

        for (node, style) in self.nodes.iter().zip(styles) {
            let css = node.style();
            for (prop, value) in &style.props {
                css.set_property(prop, value)?;
            }
        }
        Ok(())
    }

    /// Remove every overlay element
    pub fn clear(&mut self) {
        for node in self.nodes.drain(..) {
            node.remove();
        }
    }
}

impl Drop for Overlay {
    fn drop(&mut self) {
        self.clear();
    }
}
