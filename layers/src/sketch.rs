//! Sketch runtime seam and the adapter that configures every sketch.
//!
//! The runtime (Processing.js in the browser) compiles source text and runs
//! it against a surface. Before a sketch draws its first frame the adapter
//! runs [`configure`] on it through the runtime's on-load hook:
//!
//! 1. paint a fully transparent background,
//! 2. install [`BackgroundPolicy::TransparentByDefault`] so later
//!    `background()` calls without alpha stay transparent,
//! 3. size the drawing area to the current viewport.

#[cfg(test)]
#[path = "sketch_test.rs"]
mod sketch_test;

use crate::background::BackgroundPolicy;
use crate::consts::CLEAR_BACKGROUND;
use crate::error::LayerError;
use crate::viewport::{Viewport, ViewportSource};

/// Drawing primitives a sketch exposes to its host.
pub trait SketchCanvas {
    /// Call the sketch's `background()` the way sketch code would, with the
    /// installed policy applied.
    ///
    /// # Errors
    ///
    /// Returns [`LayerError::Runtime`] if the runtime throws.
    fn background(&mut self, args: &[f64]) -> Result<(), LayerError>;

    /// Replace the policy applied to every later `background()` call.
    ///
    /// # Errors
    ///
    /// Returns [`LayerError::Runtime`] if the primitive cannot be wrapped.
    fn install_background_policy(&mut self, policy: BackgroundPolicy) -> Result<(), LayerError>;

    /// Resize the drawing area.
    ///
    /// # Errors
    ///
    /// Returns [`LayerError::Runtime`] if the runtime throws.
    fn size(&mut self, viewport: Viewport) -> Result<(), LayerError>;
}

/// A running sketch bound to one surface.
pub trait Sketch: SketchCanvas {
    /// Stop the sketch's draw loop.
    ///
    /// # Errors
    ///
    /// Returns [`LayerError::Runtime`] if the sketch throws while exiting.
    fn exit(&mut self) -> Result<(), LayerError>;
}

/// Hook run by the runtime after loading a sketch and before its first frame.
pub type OnLoad = Box<dyn FnOnce(&mut dyn SketchCanvas) -> Result<(), LayerError>>;

/// Compiles and starts sketches.
pub trait SketchRuntime {
    type Surface;
    type Program;
    type Sketch: Sketch;

    /// Compile source text into a runnable program.
    ///
    /// # Errors
    ///
    /// Returns [`LayerError::Compile`] for invalid source.
    fn compile(&self, source: &str) -> Result<Self::Program, LayerError>;

    /// Bind `program` to `surface` and start it, calling `on_load` before the
    /// first frame.
    ///
    /// # Errors
    ///
    /// Returns [`LayerError::Runtime`] if the sketch or `on_load` fails during
    /// startup.
    fn start(
        &self,
        surface: &Self::Surface,
        program: Self::Program,
        on_load: OnLoad,
    ) -> Result<Self::Sketch, LayerError>;
}

/// Pre-first-frame configuration applied to every sketch.
///
/// # Errors
///
/// Propagates the first runtime error from the canvas.
pub fn configure(canvas: &mut dyn SketchCanvas, viewport: Viewport) -> Result<(), LayerError> {
    canvas.background(&CLEAR_BACKGROUND)?;
    canvas.install_background_policy(BackgroundPolicy::TransparentByDefault)?;
    canvas.size(viewport)
}

/// Wraps a [`SketchRuntime`] so every sketch it starts is configured and sized
/// to the viewport.
pub struct SketchAdapter<R, V> {
    runtime: R,
    viewport: V,
}

impl<R: SketchRuntime, V: ViewportSource> SketchAdapter<R, V> {
    #[must_use]
    pub fn new(runtime: R, viewport: V) -> Self {
        Self { runtime, viewport }
    }

    /// # Errors
    ///
    /// Returns [`LayerError::Compile`] for invalid source.
    pub fn compile(&self, source: &str) -> Result<R::Program, LayerError> {
        self.runtime.compile(source)
    }

    /// Start `program` on `surface` with [`configure`] as its on-load hook.
    ///
    /// # Errors
    ///
    /// Returns [`LayerError::Runtime`] if startup fails.
    pub fn instantiate(&self, surface: &R::Surface, program: R::Program) -> Result<R::Sketch, LayerError> {
        let viewport = self.viewport.viewport();
        self.runtime
            .start(surface, program, Box::new(move |canvas| configure(canvas, viewport)))
    }

    /// Size a running sketch to the current viewport.
    ///
    /// # Errors
    ///
    /// Returns [`LayerError::Runtime`] if the sketch throws.
    pub fn resize(&self, sketch: &mut R::Sketch) -> Result<(), LayerError> {
        sketch.size(self.viewport.viewport())
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport.viewport()
    }

    #[must_use]
    pub fn runtime(&self) -> &R {
        &self.runtime
    }
}
