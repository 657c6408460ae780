//! Error taxonomy for layer lifecycle operations.

/// Failure raised while creating, configuring, or driving a layer.
///
/// `Compile` and `Runtime` belong to a single code object and are contained
/// by the manager. `Configuration` means the host page itself is broken and
/// is always returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayerError {
    /// The sketch source is not valid for the sketch language.
    #[error("compile error: {0}")]
    Compile(String),
    /// The sketch threw during startup, teardown, or a resize.
    #[error("runtime error: {0}")]
    Runtime(String),
    /// The host page is missing something the renderer needs.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl LayerError {
    /// Whether this error must stop event handling instead of being contained
    /// to one code object.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}
