//! Session event source: the page's socket.io client.
//!
//! Connection handling, reconnection and framing all belong to socket.io.
//! This module only opens the socket with the renderer's query, subscribes
//! to the three code-object events, and turns each payload into a
//! [`SessionEvent`] before passing it on.
//!
//! ERROR HANDLING
//! ==============
//! A payload that cannot be decoded is logged and dropped; the socket keeps
//! delivering later events.

use std::rc::Rc;

use events::{ConnectQuery, EVENT_NAMES, EventError, SessionEvent, decode_event};
use js_sys::JSON;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::dom::js_message;

#[wasm_bindgen]
extern "C" {
    /// A socket.io client socket.
    pub type Socket;

    #[wasm_bindgen(catch, js_name = io)]
    fn io(options: &JsValue) -> Result<Socket, JsValue>;

    #[wasm_bindgen(method)]
    fn connect(this: &Socket) -> Socket;

    #[wasm_bindgen(method)]
    fn on(this: &Socket, event: &str, callback: &js_sys::Function);
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("socket.io: {0}")]
    Socket(String),
    #[error("payload is not JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Event(#[from] EventError),
}

/// An open socket plus the event callbacks registered on it.
pub struct Session {
    socket: Socket,
    handlers: Vec<Closure<dyn FnMut(JsValue)>>,
}

impl Session {
    /// Open the socket for one playground.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Socket`] if `io` is missing or throws.
    pub fn connect(query: &ConnectQuery) -> Result<Self, SessionError> {
        let options = serde_json::to_string(&serde_json::json!({ "query": query }))?;
        let options = JSON::parse(&options).map_err(|err| SessionError::Socket(js_message(&err)))?;
        let socket = io(&options).map_err(|err| SessionError::Socket(js_message(&err)))?.connect();
        log::info!("renderer joining playground {}", query.playground_id);
        Ok(Self { socket, handlers: Vec::new() })
    }

    /// Deliver every decoded code-object event to `handler`.
    pub fn subscribe(&mut self, handler: impl Fn(SessionEvent) + 'static) {
        let handler: Rc<dyn Fn(SessionEvent)> = Rc::new(handler);
        for name in EVENT_NAMES {
            let handler = Rc::clone(&handler);
            let callback = Closure::wrap(Box::new(move |payload: JsValue| match decode_payload(name, &payload) {
                Ok(event) => handler(event),
                Err(err) => log::warn!("dropping `{name}` event: {err}"),
            }) as Box<dyn FnMut(JsValue)>);
            self.socket.on(name, callback.as_ref().unchecked_ref());
            self.handlers.push(callback);
        }
    }
}

fn decode_payload(name: &str, payload: &JsValue) -> Result<SessionEvent, SessionError> {
    let text: String = JSON::stringify(payload)
        .map_err(|err| SessionError::Socket(js_message(&err)))?
        .into();
    let value: serde_json::Value = serde_json::from_str(&text)?;
    Ok(decode_event(name, value)?)
}
