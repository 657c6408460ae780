//! Test doubles for the page and the sketch runtime.
//!
//! Sketch sources drive the fakes: a source containing one of the marker
//! strings below fails at the matching step.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::background::BackgroundPolicy;
use crate::error::LayerError;
use crate::resize::Timer;
use crate::sketch::{OnLoad, Sketch, SketchCanvas, SketchRuntime};
use crate::surface::SurfaceHost;
use crate::viewport::Viewport;

pub const SYNTAX_ERROR: &str = "syntax error";
pub const THROW_IN_SETUP: &str = "throw in setup";
pub const THROW_ON_EXIT: &str = "throw on exit";
pub const THROW_ON_RESIZE: &str = "throw on resize";

// =============================================================
// Surfaces
// =============================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeSurface {
    pub serial: u64,
    pub id: String,
}

/// What the fake container currently holds.
#[derive(Debug, Default)]
pub struct FakeDom {
    pub attached: Vec<FakeSurface>,
    pub container_missing: bool,
    next_serial: u64,
}

impl FakeDom {
    pub fn attached_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.attached.iter().map(|s| s.id.clone()).collect();
        ids.sort();
        ids
    }
}

#[derive(Clone, Default)]
pub struct FakeHost {
    pub dom: Rc<RefCell<FakeDom>>,
}

impl SurfaceHost for FakeHost {
    type Surface = FakeSurface;

    fn attach(&mut self, id: &str) -> Result<FakeSurface, LayerError> {
        let mut dom = self.dom.borrow_mut();
        if dom.container_missing {
            return Err(LayerError::Configuration("no #container element".to_owned()));
        }
        dom.next_serial += 1;
        let surface = FakeSurface { serial: dom.next_serial, id: id.to_owned() };
        dom.attached.push(surface.clone());
        Ok(surface)
    }

    fn detach(&mut self, surface: &FakeSurface) {
        self.dom
            .borrow_mut()
            .attached
            .retain(|attached| attached.serial != surface.serial);
    }
}

// =============================================================
// Sketches
// =============================================================

/// Upper bound of a color channel in Processing's default color mode.
const CHANNEL_MAX: f64 = 255.0;

/// The color a `background()` call paints, each channel in `0.0..=255.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    /// Resolve an argument list the way Processing's default color mode
    /// does. `None` for arities Processing rejects.
    pub fn from_args(args: &[f64]) -> Option<Self> {
        let color = match *args {
            [gray] => Self::new(gray, gray, gray, CHANNEL_MAX),
            [gray, alpha] => Self::new(gray, gray, gray, alpha),
            [r, g, b] => Self::new(r, g, b, CHANNEL_MAX),
            [r, g, b, a] => Self::new(r, g, b, a),
            _ => return None,
        };
        Some(color)
    }

    fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self {
            r: r.clamp(0.0, CHANNEL_MAX),
            g: g.clamp(0.0, CHANNEL_MAX),
            b: b.clamp(0.0, CHANNEL_MAX),
            a: a.clamp(0.0, CHANNEL_MAX),
        }
    }

    pub fn is_transparent(&self) -> bool {
        self.a <= 0.0
    }
}

#[derive(Debug, Default)]
pub struct RuntimeLog {
    /// `(sketch serial, source)` for every sketch that finished startup.
    pub started: Vec<(u64, String)>,
    /// Serials of sketches whose `exit` was called.
    pub exited: Vec<u64>,
    next_serial: u64,
}

impl RuntimeLog {
    /// Sketches that started and were never exited.
    pub fn live(&self) -> Vec<u64> {
        self.started
            .iter()
            .map(|(serial, _)| *serial)
            .filter(|serial| !self.exited.contains(serial))
            .collect()
    }
}

#[derive(Clone, Default)]
pub struct FakeRuntime {
    pub log: Rc<RefCell<RuntimeLog>>,
}

#[derive(Debug)]
pub struct FakeProgram {
    source: String,
}

#[derive(Debug)]
pub struct FakeSketch {
    pub serial: u64,
    pub surface: FakeSurface,
    pub source: String,
    pub policy: BackgroundPolicy,
    pub painted: Vec<Rgba>,
    pub size: Option<Viewport>,
    pub running: bool,
    log: Rc<RefCell<RuntimeLog>>,
}

impl SketchCanvas for FakeSketch {
    fn background(&mut self, args: &[f64]) -> Result<(), LayerError> {
        let color = Rgba::from_args(&self.policy.apply(args)).ok_or_else(|| {
            LayerError::Runtime(format!("background() takes 1 to 4 arguments, got {}", args.len()))
        })?;
        self.painted.push(color);
        Ok(())
    }

    fn install_background_policy(&mut self, policy: BackgroundPolicy) -> Result<(), LayerError> {
        self.policy = policy;
        Ok(())
    }

    fn size(&mut self, viewport: Viewport) -> Result<(), LayerError> {
        if self.running && self.source.contains(THROW_ON_RESIZE) {
            return Err(LayerError::Runtime("size() threw".to_owned()));
        }
        self.size = Some(viewport);
        Ok(())
    }
}

impl Sketch for FakeSketch {
    fn exit(&mut self) -> Result<(), LayerError> {
        self.running = false;
        self.log.borrow_mut().exited.push(self.serial);
        if self.source.contains(THROW_ON_EXIT) {
            return Err(LayerError::Runtime("exit() threw".to_owned()));
        }
        Ok(())
    }
}

impl SketchRuntime for FakeRuntime {
    type Surface = FakeSurface;
    type Program = FakeProgram;
    type Sketch = FakeSketch;

    fn compile(&self, source: &str) -> Result<FakeProgram, LayerError> {
        if source.contains(SYNTAX_ERROR) {
            return Err(LayerError::Compile(format!("unexpected token in {source:?}")));
        }
        Ok(FakeProgram { source: source.to_owned() })
    }

    fn start(&self, surface: &FakeSurface, program: FakeProgram, on_load: OnLoad) -> Result<FakeSketch, LayerError> {
        let serial = {
            let mut log = self.log.borrow_mut();
            log.next_serial += 1;
            log.next_serial
        };
        let mut sketch = FakeSketch {
            serial,
            surface: surface.clone(),
            source: program.source,
            policy: BackgroundPolicy::Passthrough,
            painted: Vec::new(),
            size: None,
            running: false,
            log: Rc::clone(&self.log),
        };
        on_load(&mut sketch)?;
        if sketch.source.contains(THROW_IN_SETUP) {
            return Err(LayerError::Runtime("setup() threw".to_owned()));
        }
        sketch.running = true;
        self.log.borrow_mut().started.push((serial, sketch.source.clone()));
        Ok(sketch)
    }
}

// =============================================================
// Timer
// =============================================================

struct Scheduled {
    key: u64,
    due_ms: u64,
    task: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct ManualClock {
    now_ms: u64,
    next_key: u64,
    tasks: Vec<Scheduled>,
}

/// Timer driven by [`ManualTimer::advance`] instead of wall-clock time.
#[derive(Clone, Default)]
pub struct ManualTimer {
    clock: Rc<RefCell<ManualClock>>,
}

pub struct ManualHandle {
    key: u64,
    clock: Weak<RefCell<ManualClock>>,
}

impl Drop for ManualHandle {
    fn drop(&mut self) {
        if let Some(clock) = self.clock.upgrade() {
            clock.borrow_mut().tasks.retain(|task| task.key != self.key);
        }
    }
}

impl Timer for ManualTimer {
    type Handle = ManualHandle;

    fn defer(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> ManualHandle {
        let mut clock = self.clock.borrow_mut();
        clock.next_key += 1;
        let key = clock.next_key;
        let due_ms = clock.now_ms + u64::from(delay_ms);
        clock.tasks.push(Scheduled { key, due_ms, task });
        ManualHandle { key, clock: Rc::downgrade(&self.clock) }
    }
}

impl ManualTimer {
    /// Move time forward and run every task that came due, in due order.
    pub fn advance(&self, ms: u64) {
        let due = {
            let mut clock = self.clock.borrow_mut();
            clock.now_ms += ms;
            let now = clock.now_ms;
            let (mut due, waiting): (Vec<Scheduled>, Vec<Scheduled>) =
                clock.tasks.drain(..).partition(|task| task.due_ms <= now);
            clock.tasks = waiting;
            due.sort_by_key(|task| task.due_ms);
            due
        };
        for scheduled in due {
            (scheduled.task)();
        }
    }

    pub fn pending(&self) -> usize {
        self.clock.borrow().tasks.len()
    }
}
