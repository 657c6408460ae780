//! Processing.js as the layer engine's sketch runtime.
//!
//! Compilation and instantiation are split so the on-load hook can be set on
//! the compiled sketch before `new Processing(canvas, sketch)` runs `setup()`.
//! The hook receives the live Processing instance; [`ProcessingSketch`] wraps
//! it for both the hook and the running sketch.
//!
//! The transparent background policy is installed by swapping the instance's
//! `background` property for a Rust closure that rewrites the arguments and
//! forwards them to the original function. The closure is owned by the
//! sketch and dropped with it after `exit()`.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Array, Function, Reflect};
use layers::background::{BackgroundArg, BackgroundCall, BackgroundPolicy};
use layers::error::LayerError;
use layers::sketch::{OnLoad, Sketch, SketchCanvas, SketchRuntime};
use layers::viewport::Viewport;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

use crate::dom::js_message;

#[wasm_bindgen]
extern "C" {
    /// A running Processing.js sketch.
    #[wasm_bindgen(js_name = Processing)]
    pub type ProcessingJs;

    #[wasm_bindgen(catch, constructor, js_class = "Processing")]
    fn new(canvas: &HtmlCanvasElement, sketch: &JsValue) -> Result<ProcessingJs, JsValue>;

    #[wasm_bindgen(catch, static_method_of = ProcessingJs, js_class = "Processing", js_name = compile)]
    fn compile(code: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, method)]
    fn exit(this: &ProcessingJs) -> Result<(), JsValue>;

    #[wasm_bindgen(catch, method)]
    fn size(this: &ProcessingJs, width: u32, height: u32) -> Result<(), JsValue>;
}

const BACKGROUND: &str = "background";

/// Up to four color arguments; trailing `undefined`s are absent arguments.
type BackgroundHook = Closure<dyn FnMut(JsValue, JsValue, JsValue, JsValue) -> Result<JsValue, JsValue>>;

/// The page's global `Processing` runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessingRuntime;

/// A compiled, not yet started, Processing sketch.
pub struct ProcessingProgram {
    sketch: JsValue,
}

impl SketchRuntime for ProcessingRuntime {
    type Surface = HtmlCanvasElement;
    type Program = ProcessingProgram;
    type Sketch = ProcessingSketch;

    fn compile(&self, source: &str) -> Result<ProcessingProgram, LayerError> {
        let sketch = ProcessingJs::compile(source).map_err(|err| LayerError::Compile(js_message(&err)))?;
        Ok(ProcessingProgram { sketch })
    }

    fn start(
        &self,
        surface: &HtmlCanvasElement,
        program: ProcessingProgram,
        on_load: OnLoad,
    ) -> Result<ProcessingSketch, LayerError> {
        let hooks: Rc<RefCell<Vec<BackgroundHook>>> = Rc::new(RefCell::new(Vec::new()));
        let hooks_for_load = Rc::clone(&hooks);
        let load = Closure::once_into_js(move |instance: JsValue| -> Result<(), JsValue> {
            let mut canvas = ProcessingSketch { instance: instance.unchecked_into(), hooks: hooks_for_load };
            on_load(&mut canvas).map_err(|err| JsValue::from_str(&err.to_string()))
        });
        Reflect::set(&program.sketch, &JsValue::from_str("onLoad"), &load)
            .map_err(|err| LayerError::Runtime(js_message(&err)))?;

        let instance =
            ProcessingJs::new(surface, &program.sketch).map_err(|err| LayerError::Runtime(js_message(&err)))?;
        Ok(ProcessingSketch { instance, hooks })
    }
}

/// A Processing.js instance plus the closures installed on it.
pub struct ProcessingSketch {
    instance: ProcessingJs,
    hooks: Rc<RefCell<Vec<BackgroundHook>>>,
}

impl ProcessingSketch {
    fn background_fn(&self) -> Result<Function, LayerError> {
        Reflect::get(&self.instance, &JsValue::from_str(BACKGROUND))
            .map_err(|err| LayerError::Runtime(js_message(&err)))?
            .dyn_into::<Function>()
            .map_err(|_| LayerError::Runtime("sketch has no background() function".to_owned()))
    }
}

impl SketchCanvas for ProcessingSketch {
    fn background(&mut self, args: &[f64]) -> Result<(), LayerError> {
        let js_args: Array = args.iter().map(|v| JsValue::from_f64(*v)).collect();
        self.background_fn()?
            .apply(&self.instance, &js_args)
            .map(|_| ())
            .map_err(|err| LayerError::Runtime(js_message(&err)))
    }

    fn install_background_policy(&mut self, policy: BackgroundPolicy) -> Result<(), LayerError> {
        let original = self.background_fn()?;
        let target: JsValue = self.instance.clone().into();
        let hook: BackgroundHook = Closure::wrap(Box::new(move |a: JsValue, b: JsValue, c: JsValue, d: JsValue| {
            let args = rewrite_background_args(policy, [a, b, c, d]);
            original.apply(&target, &args)
        }) as Box<dyn FnMut(JsValue, JsValue, JsValue, JsValue) -> Result<JsValue, JsValue>>);
        Reflect::set(&self.instance, &JsValue::from_str(BACKGROUND), hook.as_ref())
            .map_err(|err| LayerError::Runtime(js_message(&err)))?;
        self.hooks.borrow_mut().push(hook);
        Ok(())
    }

    fn size(&mut self, viewport: Viewport) -> Result<(), LayerError> {
        self.instance
            .size(viewport.width, viewport.height)
            .map_err(|err| LayerError::Runtime(js_message(&err)))
    }
}

impl Sketch for ProcessingSketch {
    fn exit(&mut self) -> Result<(), LayerError> {
        self.instance
            .exit()
            .map_err(|err| LayerError::Runtime(js_message(&err)))
    }
}

/// Apply `policy` to a JS `background()` call.
fn rewrite_background_args(policy: BackgroundPolicy, raw: [JsValue; 4]) -> Array {
    let slots = raw.each_ref().map(background_arg);
    match policy.rewrite(&slots) {
        BackgroundCall::Numbers(numbers) => numbers.into_iter().map(JsValue::from_f64).collect(),
        BackgroundCall::Forward(count) => raw.into_iter().take(count).collect(),
    }
}

fn background_arg(value: &JsValue) -> BackgroundArg {
    if value.is_undefined() {
        return BackgroundArg::Absent;
    }
    value.as_f64().map_or(BackgroundArg::Other, BackgroundArg::Number)
}
