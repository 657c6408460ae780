//! Layer lifecycle engine for the playground renderer.
//!
//! Every code object in a playground is drawn by its own sketch on its own
//! canvas, stacked in one container. This crate keeps the set of live
//! canvases and sketches in step with the session: it reacts to
//! create/update/delete/full-resync events, isolates one sketch's failures
//! from the others, and resizes everything when the viewport changes.
//!
//! Nothing here touches the browser. The DOM and the sketch runtime are
//! reached through the [`surface::SurfaceHost`] and [`sketch::SketchRuntime`]
//! traits; the wasm entry crate provides the real implementations and the
//! tests provide fakes.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`manager`] | [`manager::LayerManager`], the per-id state machine |
//! | [`registry`] | Id-keyed storage used for both surfaces and sketches |
//! | [`surface`] | Surface host trait and the id-keyed surface factory |
//! | [`sketch`] | Sketch runtime traits and the configuring adapter |
//! | [`background`] | Transparent-by-default background policy and color resolution |
//! | [`viewport`] | Viewport dimensions and where they come from |
//! | [`resize`] | Reset-on-retrigger debouncer and the resize broadcaster |
//! | [`error`] | [`error::LayerError`] |
//! | [`consts`] | Shared constants |

pub mod background;
pub mod consts;
pub mod error;
pub mod manager;
pub mod registry;
pub mod resize;
pub mod sketch;
pub mod surface;
pub mod viewport;

#[cfg(test)]
mod testing;
