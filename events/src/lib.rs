//! Session event model for the playground renderer.
//!
//! The playground server pushes code-object lifecycle events over socket.io.
//! This crate owns their wire representation: event names, the JSON payload
//! shapes, and [`decode_event`], which turns a `(name, payload)` pair into a
//! typed [`SessionEvent`]. Transport is someone else's job; nothing here
//! touches a socket.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque, session-unique identifier of a code object.
pub type CodeObjectId = String;

/// A single code object was removed from the playground.
pub const CODE_DELETE: &str = "code delete";
/// A single code object was created or edited.
pub const CODE_UPDATE: &str = "code update";
/// The whole playground state, sent on join and after server-side resets.
pub const FULL_UPDATE: &str = "playground full update";

/// Every inbound event name the renderer subscribes to.
pub const EVENT_NAMES: [&str; 3] = [CODE_DELETE, CODE_UPDATE, FULL_UPDATE];

/// Error returned by [`decode_event`].
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// The event name is not one the renderer understands.
    #[error("unknown session event: {0}")]
    UnknownEvent(String),
    /// The payload did not match the shape expected for the event.
    #[error("malformed `{event}` payload: {source}")]
    Payload {
        event: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Payload of a [`CODE_DELETE`] event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeDelete {
    pub code_object_id: CodeObjectId,
}

/// Payload of a [`CODE_UPDATE`] event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeUpdate {
    pub code_object_id: CodeObjectId,
    /// Sketch source text.
    pub code: String,
}

/// One entry of a [`FULL_UPDATE`] payload. Fields other than `code` are
/// ignored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeObject {
    pub code: String,
}

/// Full playground state in the order the server sent it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    entries: Vec<(CodeObjectId, CodeObject)>,
}

impl Snapshot {
    /// Decode a `{ <id>: { code, ... }, ... }` object, keeping key order.
    ///
    /// # Errors
    ///
    /// Returns the underlying serde error when the payload is not an object
    /// of code objects.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let objects: Map<String, Value> = serde_json::from_value(value)?;
        objects
            .into_iter()
            .map(|(id, object)| serde_json::from_value::<CodeObject>(object).map(|object| (id, object)))
            .collect()
    }

    /// Iterate `(id, object)` pairs in payload order.
    pub fn iter(&self) -> impl Iterator<Item = (&CodeObjectId, &CodeObject)> {
        self.entries.iter().map(|(id, object)| (id, object))
    }

    /// Identifiers in payload order.
    pub fn ids(&self) -> impl Iterator<Item = &CodeObjectId> {
        self.entries.iter().map(|(id, _)| id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(CodeObjectId, CodeObject)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (CodeObjectId, CodeObject)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}

impl IntoIterator for Snapshot {
    type Item = (CodeObjectId, CodeObject);
    type IntoIter = std::vec::IntoIter<(CodeObjectId, CodeObject)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// A decoded inbound session event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    CodeDelete(CodeDelete),
    CodeUpdate(CodeUpdate),
    FullUpdate(Snapshot),
}

impl SessionEvent {
    /// Wire name of the event.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::CodeDelete(_) => CODE_DELETE,
            Self::CodeUpdate(_) => CODE_UPDATE,
            Self::FullUpdate(_) => FULL_UPDATE,
        }
    }
}

/// Decode an inbound event from its socket.io name and JSON payload.
///
/// # Errors
///
/// Returns [`EventError::UnknownEvent`] for names outside [`EVENT_NAMES`] and
/// [`EventError::Payload`] when the payload has the wrong shape.
pub fn decode_event(name: &str, payload: Value) -> Result<SessionEvent, EventError> {
    match name {
        CODE_DELETE => serde_json::from_value(payload)
            .map(SessionEvent::CodeDelete)
            .map_err(|source| EventError::Payload { event: CODE_DELETE, source }),
        CODE_UPDATE => serde_json::from_value(payload)
            .map(SessionEvent::CodeUpdate)
            .map_err(|source| EventError::Payload { event: CODE_UPDATE, source }),
        FULL_UPDATE => Snapshot::from_value(payload)
            .map(SessionEvent::FullUpdate)
            .map_err(|source| EventError::Payload { event: FULL_UPDATE, source }),
        other => Err(EventError::UnknownEvent(other.to_owned())),
    }
}

/// Query sent when opening the socket, identifying the playground and the
/// kind of client joining it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectQuery {
    pub playground_id: String,
    pub client: String,
}

impl ConnectQuery {
    /// Client label the server uses to tell renderers apart from editors.
    pub const RENDERER: &'static str = "renderer";

    /// Query for a renderer joining `playground_id`.
    #[must_use]
    pub fn renderer(playground_id: impl Into<String>) -> Self {
        Self { playground_id: playground_id.into(), client: Self::RENDERER.to_owned() }
    }
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
