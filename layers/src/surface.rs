//! Rendering surfaces and the factory that keys them by code object.
//!
//! A surface is whatever a sketch draws into; in the browser it is a
//! `<canvas>` element appended to the shared container. [`SurfaceHost`] is the
//! seam to the page, [`SurfaceFactory`] adds the one-surface-per-id bookkeeping
//! on top.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use events::CodeObjectId;

use crate::error::LayerError;
use crate::registry::Registry;

/// Creates and removes surfaces inside the single shared container.
pub trait SurfaceHost {
    type Surface;

    /// Build a new surface for `id` and append it to the container.
    ///
    /// # Errors
    ///
    /// Returns [`LayerError::Configuration`] when the container is missing.
    fn attach(&mut self, id: &str) -> Result<Self::Surface, LayerError>;

    /// Detach `surface` from its parent.
    fn detach(&mut self, surface: &Self::Surface);
}

/// Owns every surface, at most one per code object id.
pub struct SurfaceFactory<H: SurfaceHost> {
    host: H,
    surfaces: Registry<H::Surface>,
}

impl<H: SurfaceHost> SurfaceFactory<H> {
    #[must_use]
    pub fn new(host: H) -> Self {
        Self { host, surfaces: Registry::new() }
    }

    /// Create a surface for `id`, attach it, and register it.
    ///
    /// A surface already registered under `id` is detached first so the
    /// container never holds two canvases for one code object.
    ///
    /// # Errors
    ///
    /// Propagates the host's [`LayerError::Configuration`].
    pub fn create(&mut self, id: &str) -> Result<&H::Surface, LayerError> {
        self.destroy(id);
        self.acquire(id).map(|(surface, _)| surface)
    }

    /// The surface for `id`, attaching a new one only when none is
    /// registered. The flag is `true` for a freshly attached surface.
    ///
    /// # Errors
    ///
    /// Propagates the host's [`LayerError::Configuration`].
    pub fn acquire(&mut self, id: &str) -> Result<(&H::Surface, bool), LayerError> {
        let host = &mut self.host;
        let (surface, attached) = self.surfaces.get_or_try_insert_with(id, || host.attach(id))?;
        Ok((&*surface, attached))
    }

    /// Detach and forget the surface for `id`. Returns `false` when there was
    /// none.
    pub fn destroy(&mut self, id: &str) -> bool {
        let Some(surface) = self.surfaces.remove(id) else {
            return false;
        };
        self.host.detach(&surface);
        true
    }

    #[must_use]
    pub fn has(&self, id: &str) -> bool {
        self.surfaces.has(id)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&H::Surface> {
        self.surfaces.get(id)
    }

    #[must_use]
    pub fn ids(&self) -> Vec<CodeObjectId> {
        self.surfaces.ids()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}
