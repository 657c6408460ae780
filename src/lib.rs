//! Browser entry point of the playground renderer.
//!
//! This crate is compiled to WebAssembly and loaded by the renderer page. It
//! reads the playground id from the container element, connects to the
//! playground's socket.io session, and mirrors every code object as its own
//! Processing.js sketch on its own canvas, stacked in the container. The
//! lifecycle logic lives in the `layers` crate; this crate supplies the DOM,
//! Processing.js and socket.io implementations it runs against.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Startup configuration from the container's `data-*` attributes |
//! | [`dom`] | Canvas surfaces, window viewport, `setTimeout` timer |
//! | [`processing`] | Processing.js bindings as a sketch runtime |
//! | [`session`] | socket.io bindings and event decoding |
//! | [`renderer`] | Wiring and page-lifetime ownership |

pub mod config;
pub mod dom;
pub mod processing;
pub mod renderer;
pub mod session;

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

use crate::config::{DEFAULT_CONTAINER_ID, RendererConfig};
use crate::renderer::Renderer;

thread_local! {
    static RENDERER: RefCell<Option<Renderer>> = const { RefCell::new(None) };
}

/// Called by the wasm-bindgen glue once the module is instantiated.
///
/// # Errors
///
/// Any configuration problem is returned to the page as a startup failure.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let config = RendererConfig::from_page(DEFAULT_CONTAINER_ID).map_err(|err| JsValue::from_str(&err.to_string()))?;
    if console_log::init_with_level(config.log_level).is_err() {
        log::debug!("logger already installed");
    }

    let renderer = Renderer::mount(&config)?;
    log::info!("renderer mounted for playground {}", config.playground_id);
    RENDERER.with(|slot| *slot.borrow_mut() = Some(renderer));
    Ok(())
}
