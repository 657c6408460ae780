//! Viewport dimensions.

use std::cell::Cell;
use std::rc::Rc;

/// Size of the browser viewport in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Where the current viewport size is read from.
///
/// Read at the moment a sketch is configured or resized, never cached by the
/// manager.
pub trait ViewportSource {
    fn viewport(&self) -> Viewport;
}

impl ViewportSource for Viewport {
    fn viewport(&self) -> Viewport {
        *self
    }
}

impl ViewportSource for Cell<Viewport> {
    fn viewport(&self) -> Viewport {
        self.get()
    }
}

impl<T: ViewportSource + ?Sized> ViewportSource for Rc<T> {
    fn viewport(&self) -> Viewport {
        (**self).viewport()
    }
}
