//! Debounced viewport resizing.
//!
//! Browsers fire `resize` continuously while a window is dragged. The
//! [`Debouncer`] keeps a single pending task and replaces it on every
//! trigger, so the task only runs once the notifications have stopped for a
//! full delay. [`ResizeBroadcaster`] uses it to run one resize pass over every
//! live sketch.

#[cfg(test)]
#[path = "resize_test.rs"]
mod resize_test;

use std::cell::RefCell;
use std::rc::Rc;

/// Schedules single-shot deferred tasks.
pub trait Timer {
    /// Dropping the handle cancels the task if it has not run yet.
    type Handle;

    fn defer(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> Self::Handle;
}

/// Runs only the most recently triggered task, `delay_ms` after its trigger.
pub struct Debouncer<T: Timer> {
    timer: T,
    delay_ms: u32,
    pending: Option<T::Handle>,
}

impl<T: Timer> Debouncer<T> {
    #[must_use]
    pub fn new(timer: T, delay_ms: u32) -> Self {
        Self { timer, delay_ms, pending: None }
    }

    /// Cancel any pending task and schedule `task` a full delay from now.
    pub fn trigger(&mut self, task: impl FnOnce() + 'static) {
        self.cancel();
        self.pending = Some(self.timer.defer(self.delay_ms, Box::new(task)));
    }

    /// Drop the pending task, if any.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    #[must_use]
    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }
}

/// Something that can resize all of its live layers at once.
pub trait ResizeTarget {
    /// Returns how many layers were resized.
    fn resize_all(&mut self) -> usize;
}

/// Turns raw window resize notifications into debounced resize passes.
pub struct ResizeBroadcaster<T: Timer, M: ResizeTarget + 'static> {
    debouncer: Debouncer<T>,
    target: Rc<RefCell<M>>,
}

impl<T: Timer, M: ResizeTarget + 'static> ResizeBroadcaster<T, M> {
    #[must_use]
    pub fn new(timer: T, delay_ms: u32, target: Rc<RefCell<M>>) -> Self {
        Self { debouncer: Debouncer::new(timer, delay_ms), target }
    }

    /// Record a window resize; the pass runs once notifications go quiet.
    pub fn notify(&mut self) {
        let target = Rc::clone(&self.target);
        self.debouncer.trigger(move || match target.try_borrow_mut() {
            Ok(mut target) => {
                let resized = target.resize_all();
                log::debug!("resized {resized} layers to viewport");
            }
            Err(err) => log::warn!("resize pass skipped, layers busy: {err}"),
        });
    }
}
