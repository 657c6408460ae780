//! Layer lifecycle manager.
//!
//! DESIGN
//! ======
//! Each code object id is either `Absent` (no sketch) or `Active` (a running
//! sketch bound to that id's surface). The manager is the only thing that
//! creates or tears down surfaces and sketches, and it handles one event to
//! completion before the next, so no locking is involved.
//!
//! Updates replace the sketch but reuse the surface: repeated edits to one
//! code object churn sketch instances without ever allocating a second
//! canvas for it.
//!
//! ERROR HANDLING
//! ==============
//! Compile and runtime errors belong to one code object. They are logged
//! with its id at the `on_update` / `on_resize` boundary and go no further;
//! every other id is untouched. Errors from a sketch's own `exit` are
//! ignored. A configuration error (no container) is returned, since nothing
//! can render until the page is fixed.

#[cfg(test)]
#[path = "manager_test.rs"]
mod manager_test;

use events::{CodeObjectId, SessionEvent, Snapshot};

use crate::error::LayerError;
use crate::registry::Registry;
use crate::resize::ResizeTarget;
use crate::sketch::{Sketch, SketchAdapter, SketchRuntime};
use crate::surface::{SurfaceFactory, SurfaceHost};
use crate::viewport::ViewportSource;

/// Lifecycle state of one code object id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerState {
    /// No sketch is running for the id. A surface may still be allocated.
    Absent,
    /// A sketch is running on the id's surface.
    Active,
}

/// Keeps live surfaces and sketches in one-to-one correspondence with the
/// session's code objects.
pub struct LayerManager<H, R, V>
where
    H: SurfaceHost,
    R: SketchRuntime<Surface = H::Surface>,
    V: ViewportSource,
{
    surfaces: SurfaceFactory<H>,
    sketches: Registry<R::Sketch>,
    adapter: SketchAdapter<R, V>,
}

impl<H, R, V> LayerManager<H, R, V>
where
    H: SurfaceHost,
    R: SketchRuntime<Surface = H::Surface>,
    V: ViewportSource,
{
    #[must_use]
    pub fn new(host: H, runtime: R, viewport: V) -> Self {
        Self {
            surfaces: SurfaceFactory::new(host),
            sketches: Registry::new(),
            adapter: SketchAdapter::new(runtime, viewport),
        }
    }

    /// Apply one decoded session event.
    ///
    /// # Errors
    ///
    /// Only configuration errors are returned; per-object failures are
    /// logged and contained.
    pub fn handle(&mut self, event: SessionEvent) -> Result<(), LayerError> {
        match event {
            SessionEvent::CodeDelete(delete) => {
                log::info!("canvas deleted for {}", delete.code_object_id);
                self.on_delete(&delete.code_object_id);
                Ok(())
            }
            SessionEvent::CodeUpdate(update) => {
                log::info!("code received for {}", update.code_object_id);
                self.on_update(&update.code_object_id, &update.code).map(|_| ())
            }
            SessionEvent::FullUpdate(snapshot) => self.on_full_resync(snapshot),
        }
    }

    /// Tear down the sketch and surface for `id`. Unknown ids are a no-op.
    pub fn on_delete(&mut self, id: &str) {
        self.teardown_sketch(id);
        self.surfaces.destroy(id);
    }

    /// Replace the sketch for `id` with one compiled from `source`, reusing
    /// the id's surface when it has one.
    ///
    /// Returns the id's state after the update: `Absent` when the new sketch
    /// failed to compile or start.
    ///
    /// # Errors
    ///
    /// Returns [`LayerError::Configuration`] when no surface can be created.
    pub fn on_update(&mut self, id: &str, source: &str) -> Result<LayerState, LayerError> {
        match self.replace_sketch(id, source) {
            Ok(()) => Ok(LayerState::Active),
            Err(err) if err.is_fatal() => Err(err),
            Err(err) => {
                log::error!("error in code object {id}, code not rendered: {err}");
                Ok(LayerState::Absent)
            }
        }
    }

    /// Drop every tracked layer, then rebuild from `snapshot` in its order.
    ///
    /// # Errors
    ///
    /// Stops at the first configuration error.
    pub fn on_full_resync(&mut self, snapshot: Snapshot) -> Result<(), LayerError> {
        let mut tracked = self.sketches.ids();
        tracked.extend(self.surfaces.ids());
        tracked.sort();
        tracked.dedup();
        for id in &tracked {
            self.on_delete(id);
        }

        for (id, object) in snapshot {
            self.on_update(&id, &object.code)?;
        }
        Ok(())
    }

    /// Size every running sketch to the current viewport. A sketch that
    /// fails to resize is logged and skipped. Returns how many succeeded.
    pub fn on_resize(&mut self) -> usize {
        let mut resized = 0;
        for (id, sketch) in self.sketches.iter_mut() {
            match self.adapter.resize(sketch) {
                Ok(()) => resized += 1,
                Err(err) => log::warn!("resize failed for code object {id}: {err}"),
            }
        }
        resized
    }

    #[must_use]
    pub fn state(&self, id: &str) -> LayerState {
        if self.sketches.has(id) { LayerState::Active } else { LayerState::Absent }
    }

    /// Ids with a running sketch, sorted.
    #[must_use]
    pub fn active_ids(&self) -> Vec<CodeObjectId> {
        self.sketches.ids()
    }

    /// Ids with an allocated surface, sorted.
    #[must_use]
    pub fn surface_ids(&self) -> Vec<CodeObjectId> {
        self.surfaces.ids()
    }

    #[must_use]
    pub fn has_surface(&self, id: &str) -> bool {
        self.surfaces.has(id)
    }

    #[must_use]
    pub fn surface(&self, id: &str) -> Option<&H::Surface> {
        self.surfaces.get(id)
    }

    #[must_use]
    pub fn sketch(&self, id: &str) -> Option<&R::Sketch> {
        self.sketches.get(id)
    }

    fn replace_sketch(&mut self, id: &str, source: &str) -> Result<(), LayerError> {
        self.teardown_sketch(id);
        let (surface, created) = self.surfaces.acquire(id)?;
        if created {
            log::info!("canvas created for {id}");
        } else {
            log::info!("canvas reused for {id}");
        }
        let program = self.adapter.compile(source)?;
        let sketch = self.adapter.instantiate(surface, program)?;
        self.sketches.put(id, sketch);
        Ok(())
    }

    /// Stop and forget the sketch for `id`. Never fails: a sketch that
    /// throws on exit is still dropped.
    fn teardown_sketch(&mut self, id: &str) {
        let Some(mut sketch) = self.sketches.remove(id) else {
            return;
        };
        if let Err(err) = sketch.exit() {
            log::debug!("ignoring exit failure for code object {id}: {err}");
        }
    }
}

impl<H, R, V> ResizeTarget for LayerManager<H, R, V>
where
    H: SurfaceHost,
    R: SketchRuntime<Surface = H::Surface>,
    V: ViewportSource,
{
    fn resize_all(&mut self) -> usize {
        self.on_resize()
    }
}
