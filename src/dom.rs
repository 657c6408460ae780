//! Browser implementations of the layer engine's page seams.
//!
//! - [`DomHost`]: one `<canvas>` per code object, appended to the container.
//! - [`WindowViewport`]: the window's inner size.
//! - [`GlooTimer`]: `setTimeout` via `gloo-timers`; dropping the handle
//!   clears the timeout.

use gloo_timers::callback::Timeout;
use layers::error::LayerError;
use layers::resize::Timer;
use layers::surface::SurfaceHost;
use layers::viewport::{Viewport, ViewportSource};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlCanvasElement, Window};

/// Attribute stamped on each canvas so layers can be told apart in devtools.
pub const CODE_OBJECT_ATTR: &str = "data-code-object-id";

/// Creates layer canvases inside the container element.
///
/// The container is looked up on every attach, so a page that drops it
/// after startup fails loudly instead of drawing into a detached node.
pub struct DomHost {
    document: Document,
    container_id: String,
}

impl DomHost {
    #[must_use]
    pub fn new(document: Document, container_id: impl Into<String>) -> Self {
        Self { document, container_id: container_id.into() }
    }
}

impl SurfaceHost for DomHost {
    type Surface = HtmlCanvasElement;

    fn attach(&mut self, id: &str) -> Result<HtmlCanvasElement, LayerError> {
        let container = self
            .document
            .get_element_by_id(&self.container_id)
            .ok_or_else(|| LayerError::Configuration(format!("no #{} element in page", self.container_id)))?;
        let canvas = self
            .document
            .create_element("canvas")
            .map_err(|err| LayerError::Configuration(js_message(&err)))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| LayerError::Configuration("created element is not a canvas".to_owned()))?;
        canvas
            .set_attribute(CODE_OBJECT_ATTR, id)
            .map_err(|err| LayerError::Configuration(js_message(&err)))?;
        container
            .append_child(&canvas)
            .map_err(|err| LayerError::Configuration(js_message(&err)))?;
        Ok(canvas)
    }

    fn detach(&mut self, surface: &HtmlCanvasElement) {
        surface.remove();
    }
}

/// Reads the window's inner size on demand.
pub struct WindowViewport {
    window: Window,
}

impl WindowViewport {
    #[must_use]
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl ViewportSource for WindowViewport {
    fn viewport(&self) -> Viewport {
        Viewport::new(css_px(self.window.inner_width()), css_px(self.window.inner_height()))
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn css_px(value: Result<JsValue, JsValue>) -> u32 {
    let px = match value {
        Ok(v) => v.as_f64(),
        Err(_) => None,
    };
    px.map_or(0, |px| px.max(0.0).min(f64::from(u32::MAX)).round() as u32)
}

/// `setTimeout`-backed [`Timer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTimer;

impl Timer for GlooTimer {
    type Handle = Timeout;

    fn defer(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> Timeout {
        Timeout::new(delay_ms, task)
    }
}

/// Best-effort human-readable text for a thrown JS value.
pub fn js_message(err: &JsValue) -> String {
    if let Some(text) = err.as_string() {
        return text;
    }
    if let Some(error) = err.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    format!("{err:?}")
}
