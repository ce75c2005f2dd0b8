//! Browser binding (WASM only)
//!
//! `HeroAmbience` is what a page mounts behind its hero content. Every
//! listener and the animation-frame loop are owned subscriptions, released
//! on `unmount` (or when the JS side frees the object).

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Event, EventTarget, HtmlCanvasElement, HtmlElement, MediaQueryList,
    MediaQueryListEvent, MouseEvent, Window,
};

use super::{EventHost, EventSource, Mount};
use crate::engine::{
    AmbientField, CanvasEngine, MotionPreference, StrategyKind, SurfaceRect, SurfaceSize,
};
use crate::error::{AmbientError, Result};
use crate::renderer::dom::{CanvasPainter, Overlay};
use crate::renderer::overlay_styles;
use crate::settings::FieldSettings;

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // A second module instance on the page already owns the logger
    let _ = console_log::init_with_level(log::Level::Info);
}

fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Where output goes
enum Target {
    /// The canvas engine paints through its own `CanvasPainter`
    Canvas,
    Overlay(Overlay),
    /// Context or container could not be acquired; nothing is drawn
    Inert,
}

/// State shared between the binding and its listeners
struct Shared {
    window: Window,
    element: Option<HtmlElement>,
    media: Option<MediaQueryList>,
    settings: FieldSettings,
    field: RefCell<AmbientField>,
    target: RefCell<Target>,
    /// Stroke total waiting to be reported once the field is released
    pending_strokes: Rc<Cell<Option<u64>>>,
    on_stroke: RefCell<Option<js_sys::Function>>,
}

impl Shared {
    fn surface_rect(&self) -> Option<SurfaceRect> {
        let rect = self.element.as_ref()?.get_bounding_client_rect();
        Some(SurfaceRect::new(
            rect.left() as f32,
            rect.top() as f32,
            rect.width() as f32,
            rect.height() as f32,
        ))
    }

    fn surface_size(&self) -> Option<SurfaceSize> {
        let rect = self.surface_rect()?;
        Some(SurfaceSize::from_rect(&rect, self.window.device_pixel_ratio() as f32))
    }

    fn resize(&self) {
        match self.surface_size() {
            Some(size) => self.field.borrow_mut().resize(size),
            None => log::warn!("Resize skipped: surface element missing"),
        }
        self.render();
    }

    fn pointer_move(&self, event: &MouseEvent) {
        let client = Vec2::new(event.client_x() as f32, event.client_y() as f32);
        let rect = self.surface_rect();
        self.field.borrow_mut().pointer_move(client, rect, now_ms());
        self.report_strokes();
    }

    fn motion_changed(&self, reduced: bool) {
        self.field.borrow_mut().set_reduced_motion(reduced);
        self.render();
    }

    fn frame(&self) {
        self.field.borrow_mut().frame(now_ms());
        self.render();
    }

    /// Invoke the JS stroke callback outside of any field borrow
    fn report_strokes(&self) {
        let Some(total) = self.pending_strokes.take() else {
            return;
        };
        let callback = self.on_stroke.borrow().clone();
        if let Some(callback) = callback {
            if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_f64(total as f64)) {
                log::warn!("onStroke threw: {:?}", e);
            }
        }
    }

    fn render(&self) {
        let mut field = self.field.borrow_mut();
        if !field.take_dirty() {
            return;
        }
        if let Target::Overlay(overlay) = &mut *self.target.borrow_mut() {
            if let Err(e) = overlay.apply(&overlay_styles(field.output())) {
                log::warn!("Render skipped: {:?}", e);
            }
        }
    }
}

/// One live subscription; dropping the closure is what frees it
pub enum Subscription {
    Listener {
        target: EventTarget,
        event: &'static str,
        closure: Closure<dyn FnMut(Event)>,
    },
    Frame {
        handle: Rc<Cell<Option<i32>>>,
        slot: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
    },
}

/// `EventHost` backed by DOM listeners and `requestAnimationFrame`
pub struct WebHost {
    shared: Rc<Shared>,
}

impl WebHost {
    fn listen(
        &self,
        source: EventSource,
        target: EventTarget,
        event: &'static str,
        closure: Closure<dyn FnMut(Event)>,
    ) -> Result<Subscription> {
        target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .map_err(|e| AmbientError::ListenerRejected {
                event: source,
                reason: format!("{:?}", e),
            })?;
        Ok(Subscription::Listener {
            target,
            event,
            closure,
        })
    }

    fn start_frames(&self) -> Result<Subscription> {
        let handle: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
        let slot: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));

        let shared = self.shared.clone();
        let next_slot = slot.clone();
        let next_handle = handle.clone();
        *slot.borrow_mut() = Some(Closure::wrap(Box::new(move |_time: f64| {
            shared.frame();
            if let Some(cb) = next_slot.borrow().as_ref() {
                match shared.window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                    Ok(id) => next_handle.set(Some(id)),
                    Err(e) => {
                        log::error!("Animation frame rejected: {:?}", e);
                        next_handle.set(None);
                    }
                }
            }
        }) as Box<dyn FnMut(f64)>));

        let first = match slot.borrow().as_ref() {
            Some(cb) => self
                .shared
                .window
                .request_animation_frame(cb.as_ref().unchecked_ref()),
            None => Err(JsValue::NULL),
        };
        match first {
            Ok(id) => {
                handle.set(Some(id));
                Ok(Subscription::Frame { handle, slot })
            }
            Err(e) => {
                // Break the closure's self-reference
                slot.borrow_mut().take();
                Err(AmbientError::ListenerRejected {
                    event: EventSource::Frame,
                    reason: format!("{:?}", e),
                })
            }
        }
    }
}

impl EventHost for WebHost {
    type Handle = Subscription;

    fn subscribe(&mut self, source: EventSource) -> Result<Subscription> {
        match source {
            EventSource::MotionChange => {
                let media = self.shared.media.clone().ok_or(AmbientError::ListenerRejected {
                    event: source,
                    reason: "matchMedia unavailable".into(),
                })?;
                let shared = self.shared.clone();
                let closure = Closure::wrap(Box::new(move |event: Event| {
                    if let Some(event) = event.dyn_ref::<MediaQueryListEvent>() {
                        shared.motion_changed(event.matches());
                    }
                }) as Box<dyn FnMut(Event)>);
                self.listen(source, media.into(), "change", closure)
            }
            EventSource::PointerMove => {
                let full_bleed = self.shared.field.borrow().kind().full_bleed();
                let target: EventTarget = match (&self.shared.element, full_bleed) {
                    (Some(element), false) => element.clone().into(),
                    _ => self.shared.window.clone().into(),
                };
                let shared = self.shared.clone();
                let closure = Closure::wrap(Box::new(move |event: Event| {
                    if let Some(event) = event.dyn_ref::<MouseEvent>() {
                        shared.pointer_move(event);
                    }
                }) as Box<dyn FnMut(Event)>);
                self.listen(source, target, "pointermove", closure)
            }
            EventSource::Resize => {
                let shared = self.shared.clone();
                let closure = Closure::wrap(Box::new(move |_event: Event| {
                    shared.resize();
                }) as Box<dyn FnMut(Event)>);
                self.listen(source, self.shared.window.clone().into(), "resize", closure)
            }
            EventSource::Frame => self.start_frames(),
        }
    }

    fn unsubscribe(&mut self, handle: Subscription) {
        match handle {
            Subscription::Listener {
                target,
                event,
                closure,
            } => {
                if let Err(e) =
                    target.remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
                {
                    log::warn!("removeEventListener({}) failed: {:?}", event, e);
                }
            }
            Subscription::Frame { handle, slot } => {
                if let Some(id) = handle.take() {
                    if let Err(e) = self.shared.window.cancel_animation_frame(id) {
                        log::warn!("cancelAnimationFrame failed: {:?}", e);
                    }
                }
                slot.borrow_mut().take();
            }
        }
    }
}

/// Drawing surface acquired for the element
enum Acquired {
    Canvas(CanvasPainter),
    Overlay(Overlay),
}

/// Acquire the output surface for the element and strategy
fn acquire_target(window: &Window, element: Option<&HtmlElement>, canvas_strategy: bool) -> Result<Acquired> {
    let element = element.ok_or_else(|| AmbientError::SurfaceUnavailable("element not found".into()))?;

    if canvas_strategy {
        let canvas = element
            .dyn_ref::<HtmlCanvasElement>()
            .cloned()
            .ok_or_else(|| AmbientError::SurfaceUnavailable("canvas strategy needs a <canvas>".into()))?;
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or(AmbientError::ContextUnavailable)?;
        return Ok(Acquired::Canvas(CanvasPainter::new(canvas, ctx)));
    }

    // Overlay elements cannot live inside a <canvas>
    let container = if element.is::<HtmlCanvasElement>() {
        element
            .parent_element()
            .and_then(|p| p.dyn_into::<HtmlElement>().ok())
            .ok_or_else(|| AmbientError::SurfaceUnavailable("canvas has no parent".into()))?
    } else {
        element.clone()
    };
    let document = window
        .document()
        .ok_or_else(|| AmbientError::SurfaceUnavailable("no document".into()))?;
    Ok(Acquired::Overlay(Overlay::new(document, container)))
}

/// Pointer-reactive hero background
#[wasm_bindgen]
pub struct HeroAmbience {
    host: Option<WebHost>,
    mount: Option<Mount<WebHost>>,
}

#[wasm_bindgen]
impl HeroAmbience {
    /// Bind to the element with `element_id`. `settings_json` overrides the
    /// stored settings. Never throws: problems are logged and leave an
    /// inert instance.
    #[wasm_bindgen(constructor)]
    pub fn new(element_id: &str, settings_json: Option<String>) -> HeroAmbience {
        let Some(window) = web_sys::window() else {
            log::error!("No window; hero ambience disabled");
            return HeroAmbience {
                host: None,
                mount: None,
            };
        };

        let settings = match settings_json.as_deref().map(FieldSettings::from_json) {
            Some(Ok(settings)) => settings,
            Some(Err(e)) => {
                log::warn!("{}; falling back to stored settings", e);
                FieldSettings::load()
            }
            None => FieldSettings::load(),
        };

        let element = window
            .document()
            .and_then(|d| d.get_element_by_id(element_id))
            .and_then(|e| e.dyn_into::<HtmlElement>().ok());
        let media = window.match_media(REDUCED_MOTION_QUERY).ok().flatten();
        let reduced = media.as_ref().is_some_and(MediaQueryList::matches);

        let seed = settings.seed.unwrap_or_else(|| now_ms() as u64);
        let motion = MotionPreference::new(reduced);
        let canvas_strategy = settings.strategy == StrategyKind::Canvas;
        let (target, mut field) = match acquire_target(&window, element.as_ref(), canvas_strategy) {
            Ok(Acquired::Canvas(painter)) => {
                let engine = CanvasEngine::with_painter(settings.paint_step, seed, Box::new(painter));
                (Target::Canvas, AmbientField::with_strategy(&settings, motion, Box::new(engine)))
            }
            Ok(Acquired::Overlay(overlay)) => (
                Target::Overlay(overlay),
                AmbientField::new(&settings, motion, seed),
            ),
            Err(e) => {
                log::error!("Hero ambience inert: {}", e);
                (Target::Inert, AmbientField::new(&settings, motion, seed))
            }
        };

        let pending_strokes = Rc::new(Cell::new(None));
        let sink = pending_strokes.clone();
        field.set_on_stroke(move |total| sink.set(Some(total)));

        log::info!("Hero ambience created with seed: {}", seed);

        let shared = Rc::new(Shared {
            window,
            element,
            media,
            settings,
            field: RefCell::new(field),
            target: RefCell::new(target),
            pending_strokes,
            on_stroke: RefCell::new(None),
        });
        HeroAmbience {
            host: Some(WebHost { shared }),
            mount: None,
        }
    }

    /// Called with the running stroke total whenever a stroke completes
    #[wasm_bindgen(js_name = setOnStroke)]
    pub fn set_on_stroke(&self, callback: Option<js_sys::Function>) {
        if let Some(host) = &self.host {
            *host.shared.on_stroke.borrow_mut() = callback;
        }
    }

    pub fn mount(&mut self) {
        if self.mount.is_some() {
            return;
        }
        let Some(host) = self.host.as_mut() else {
            return;
        };
        if matches!(*host.shared.target.borrow(), Target::Inert) {
            log::warn!("Mount skipped: no drawable surface");
            return;
        }

        let reduced = host.shared.media.as_ref().is_some_and(MediaQueryList::matches);
        host.shared.field.borrow_mut().set_reduced_motion(reduced);
        host.shared.resize();

        match Mount::attach(host, &EventSource::ALL) {
            Ok(mount) => self.mount = Some(mount),
            Err(e) => log::error!("Hero ambience not animated: {}", e),
        }
    }

    pub fn unmount(&mut self) {
        let (Some(mount), Some(host)) = (self.mount.take(), self.host.as_mut()) else {
            return;
        };
        mount.detach(host);
        host.shared.field.borrow_mut().rewind_clock();
        if let Target::Overlay(overlay) = &mut *host.shared.target.borrow_mut() {
            overlay.clear();
        }
    }

    /// Clear the background and the stroke counter
    pub fn reset(&self) {
        if let Some(host) = &self.host {
            host.shared.field.borrow_mut().reset();
            host.shared.render();
        }
    }

    /// Switch the hero word (parallax presets)
    #[wasm_bindgen(js_name = setWord)]
    pub fn set_word(&self, word: &str) {
        if let Some(host) = &self.host {
            host.shared.field.borrow_mut().set_word(word);
        }
    }

    /// Pin the settings this instance runs with for later page loads
    #[wasm_bindgen(js_name = persistSettings)]
    pub fn persist_settings(&self) {
        if let Some(host) = &self.host {
            host.shared.settings.save();
        }
    }

    /// Hero word the background is showing (parallax strategy only)
    #[wasm_bindgen(getter)]
    pub fn word(&self) -> Option<String> {
        let host = self.host.as_ref()?;
        let word = host.shared.field.borrow().word()?;
        Some(word.as_str().to_string())
    }

    pub fn strokes(&self) -> f64 {
        self.host
            .as_ref()
            .map_or(0.0, |host| host.shared.field.borrow().strokes() as f64)
    }

    #[wasm_bindgen(getter)]
    pub fn mounted(&self) -> bool {
        self.mount.is_some()
    }
}

impl Drop for HeroAmbience {
    fn drop(&mut self) {
        self.unmount();
    }
}
