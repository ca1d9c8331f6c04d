//! Browser host and the `wasm-bindgen` entry point.
//!
//! [`DomHost`] turns DOM mouse events into [`PointerSink`] calls. A press is
//! only accepted over the canvas, while motion and release are tracked on the
//! whole document so a drag survives leaving the canvas. Move positions are
//! made canvas-relative with the canvas's bounding rectangle.
//!
//! [`LessonApp`] is what the page script constructs. It owns the engine; the
//! page renders the instruction/feedback panel from [`LessonApp::view_json`]
//! and wires its Check/Continue buttons to [`LessonApp::check`] and
//! [`LessonApp::advance`].

use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, EventTarget, HtmlCanvasElement, MouseEvent};

use crate::camera::Point;
use crate::config::LessonConfig;
use crate::engine::{Engine, EngineCore};
use crate::error::LessonError;
use crate::host::{PointerHost, PointerSink};
use crate::lesson::Lesson;
use crate::render::CanvasRenderer;
use crate::stage::CheckOutcome;

type MouseClosure = Closure<dyn FnMut(MouseEvent)>;

fn host_err(value: JsValue) -> LessonError {
    LessonError::Host(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}

/// Pointer host over a canvas element and its document.
pub struct DomHost {
    canvas: HtmlCanvasElement,
    document: Document,
}

impl DomHost {
    /// # Errors
    ///
    /// [`LessonError::Host`] if there is no window or document.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, LessonError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| LessonError::Host("no document".into()))?;
        Ok(Self { canvas, document })
    }
}

/// The three listeners of one subscription. Dropping removes them.
pub struct DomListeners {
    canvas: HtmlCanvasElement,
    document: Document,
    down: MouseClosure,
    moved: MouseClosure,
    up: MouseClosure,
}

impl DomListeners {
    fn bindings(&self) -> [(&EventTarget, &'static str, &MouseClosure); 3] {
        [
            (AsRef::<EventTarget>::as_ref(&self.canvas), "mousedown", &self.down),
            (AsRef::<EventTarget>::as_ref(&self.document), "mousemove", &self.moved),
            (AsRef::<EventTarget>::as_ref(&self.document), "mouseup", &self.up),
        ]
    }

    fn attach(&self) -> Result<(), LessonError> {
        for (target, kind, callback) in self.bindings() {
            target
                .add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())
                .map_err(host_err)?;
        }
        Ok(())
    }
}

impl Drop for DomListeners {
    fn drop(&mut self) {
        for (target, kind, callback) in self.bindings() {
            if let Err(e) = target.remove_event_listener_with_callback(kind, callback.as_ref().unchecked_ref()) {
                log::warn!("removing {kind} listener failed: {e:?}");
            }
        }
    }
}

impl PointerHost for DomHost {
    type Guard = DomListeners;

    fn subscribe(&self, sink: Rc<dyn PointerSink>) -> Result<DomListeners, LessonError> {
        let down = {
            let sink = Rc::clone(&sink);
            MouseClosure::wrap(Box::new(move |e: MouseEvent| {
                sink.pointer_down(Point::new(f64::from(e.offset_x()), f64::from(e.offset_y())));
            }))
        };
        let moved = {
            let sink = Rc::clone(&sink);
            let canvas = self.canvas.clone();
            MouseClosure::wrap(Box::new(move |e: MouseEvent| {
                let rect = canvas.get_bounding_client_rect();
                sink.pointer_move(Point::new(f64::from(e.client_x()) - rect.x(), f64::from(e.client_y()) - rect.y()));
            }))
        };
        let up = MouseClosure::wrap(Box::new(move |_e: MouseEvent| sink.pointer_up()));

        let listeners =
            DomListeners { canvas: self.canvas.clone(), document: self.document.clone(), down, moved, up };
        // On failure `listeners` drops here and detaches whatever was attached.
        listeners.attach()?;
        Ok(listeners)
    }
}

fn init_logging(config: &LessonConfig) -> Result<(), LessonError> {
    console_error_panic_hook::set_once();
    let level = config.level()?;
    if let Err(e) = console_log::init_with_level(level) {
        // A second LessonApp on the same page keeps the first logger.
        log::debug!("logger already set: {e}");
    }
    Ok(())
}

fn to_js(err: LessonError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// The lesson as seen from JavaScript.
#[wasm_bindgen]
pub struct LessonApp {
    engine: Engine<DomHost, CanvasRenderer>,
    width: f64,
    height: f64,
}

#[wasm_bindgen]
impl LessonApp {
    /// Size `canvas` for the grid, draw the first stage and start listening.
    ///
    /// # Errors
    ///
    /// A message string for bad config, a missing 2D context, or a failed first draw.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, config_json: &str) -> Result<LessonApp, JsValue> {
        let config = LessonConfig::from_json(config_json).map_err(to_js)?;
        init_logging(&config).map_err(to_js)?;

        let camera = config.camera();
        let (width, height) = camera.surface_size();
        canvas.set_width(px(width));
        canvas.set_height(px(height));

        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let lesson = Lesson::new(config.plan.stages()).map_err(to_js)?;
        let core = EngineCore::new(lesson, CanvasRenderer::new(ctx, camera), camera);
        let engine = Engine::start(DomHost::new(canvas).map_err(to_js)?, core).map_err(to_js)?;
        log::info!("lesson ready: plan {:?}, {width}x{height}px", config.plan);
        Ok(Self { engine, width, height })
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Current stage view as JSON: index, count, name, instructions,
    /// `has_check`, interactive, feedback, `continue_label`, terminal.
    ///
    /// # Errors
    ///
    /// If the engine is busy or serialization fails.
    #[wasm_bindgen(js_name = viewJson)]
    pub fn view_json(&self) -> Result<String, JsValue> {
        let view = self.engine.view().map_err(to_js)?;
        serde_json::to_string(&view).map_err(|e| to_js(e.into()))
    }

    /// Check the current stage. `true` on a pass.
    ///
    /// # Errors
    ///
    /// If the engine is busy handling an event.
    pub fn check(&mut self) -> Result<bool, JsValue> {
        Ok(self.engine.check().map_err(to_js)? == CheckOutcome::Pass)
    }

    /// Move to the next stage.
    ///
    /// # Errors
    ///
    /// If the stage has not been passed, the lesson is finished, or drawing fails.
    pub fn advance(&mut self) -> Result<(), JsValue> {
        self.engine.advance().map_err(to_js)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn px(len: f64) -> u32 {
    len.ceil() as u32
}
