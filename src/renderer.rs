//! Wires the page, the session, and the layer engine together.

use std::cell::RefCell;
use std::rc::Rc;

use events::ConnectQuery;
use layers::manager::LayerManager;
use layers::resize::ResizeBroadcaster;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::config::RendererConfig;
use crate::dom::{DomHost, GlooTimer, WindowViewport};
use crate::processing::ProcessingRuntime;
use crate::session::Session;

/// The layer engine as it runs in the browser.
pub type DomLayers = LayerManager<DomHost, ProcessingRuntime, WindowViewport>;

/// Everything that has to stay alive for the page's lifetime.
pub struct Renderer {
    _session: Session,
    _resize: Rc<RefCell<ResizeBroadcaster<GlooTimer, DomLayers>>>,
    _on_window_resize: Closure<dyn FnMut()>,
}

impl Renderer {
    /// Build the layer engine, start listening for window resizes, and
    /// subscribe to the playground's session events.
    ///
    /// # Errors
    ///
    /// Fails when the page has no window/document or the socket cannot be
    /// opened.
    pub fn mount(config: &RendererConfig) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;

        let layers = Rc::new(RefCell::new(LayerManager::new(
            DomHost::new(document, config.container_id.clone()),
            ProcessingRuntime,
            WindowViewport::new(window.clone()),
        )));

        let resize = Rc::new(RefCell::new(ResizeBroadcaster::new(
            GlooTimer,
            config.resize_debounce_ms,
            Rc::clone(&layers),
        )));
        let resize_for_cb = Rc::clone(&resize);
        let on_window_resize = Closure::wrap(Box::new(move || {
            resize_for_cb.borrow_mut().notify();
        }) as Box<dyn FnMut()>);
        window.add_event_listener_with_callback("resize", on_window_resize.as_ref().unchecked_ref())?;

        let mut session = Session::connect(&ConnectQuery::renderer(config.playground_id.clone()))
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        let layers_for_events = layers;
        session.subscribe(move |event| {
            let name = event.name();
            let Ok(mut layers) = layers_for_events.try_borrow_mut() else {
                log::error!("layers busy, `{name}` event lost");
                return;
            };
            if let Err(err) = layers.handle(event) {
                log::error!("cannot apply `{name}` event, page is misconfigured: {err}");
            }
        });

        Ok(Self {
            _session: session,
            _resize: resize,
            _on_window_resize: on_window_resize,
        })
    }
}
