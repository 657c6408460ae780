//! Shared constants for the layers crate.

// ── Resize ──────────────────────────────────────────────────────

/// Quiet period after the last window resize before sketches are resized.
pub const RESIZE_DEBOUNCE_MS: u32 = 1000;

// ── Background ──────────────────────────────────────────────────

/// Alpha appended to background calls that leave it out.
pub const TRANSPARENT_ALPHA: f64 = 0.0;

/// `background(0, 0)`: black at zero alpha, applied before a sketch's first frame.
pub const CLEAR_BACKGROUND: [f64; 2] = [0.0, TRANSPARENT_ALPHA];
