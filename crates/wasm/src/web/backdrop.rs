//! The exported animation handle.
//!
//! Engine, canvas surface and scheduler live in one `Rc<RefCell<_>>` shared by
//! the `requestAnimationFrame` closure and the window listeners. Everything
//! runs on the main thread between frames, so borrows never overlap.

use std::cell::RefCell;
use std::rc::Rc;

use backdrop_core::error::EngineError;
use backdrop_core::frame_loop::{AnimationLoop, FrameHandle, FrameScheduler};
use backdrop_core::viewport::SurfaceSize;
use backdrop_core::Engine;
use backdrop_engines::EngineKind;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, Event, EventTarget, HtmlCanvasElement, MouseEvent, Window,
};

use super::canvas::Canvas2dSurface;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn js_error(e: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&e.to_string()).into()
}

/// `requestAnimationFrame` as a [`FrameScheduler`]. Every request re-queues
/// the same closure.
struct RafScheduler {
    window: Window,
    callback: FrameCallback,
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) -> Result<FrameHandle, EngineError> {
        let callback = self.callback.borrow();
        let callback = callback
            .as_ref()
            .ok_or_else(|| EngineError::Scheduler("frame callback released".into()))?;
        let id = self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .map_err(|e| EngineError::Scheduler(format!("{e:?}")))?;
        u64::try_from(id)
            .map(FrameHandle)
            .map_err(|_| EngineError::Scheduler(format!("invalid frame id {id}")))
    }

    fn cancel_frame(&mut self, handle: FrameHandle) -> Result<(), EngineError> {
        let id = i32::try_from(handle.0)
            .map_err(|_| EngineError::Scheduler(format!("invalid frame id {}", handle.0)))?;
        self.window
            .cancel_animation_frame(id)
            .map_err(|e| EngineError::Scheduler(format!("{e:?}")))
    }
}

struct State {
    anim: AnimationLoop<EngineKind>,
    surface: Canvas2dSurface,
    scheduler: RafScheduler,
}

/// A registered DOM listener, removed again on drop.
struct Listener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            closure,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

/// Sizes the canvas backing store to the window and returns the new size.
fn fit_canvas(window: &Window, canvas: &HtmlCanvasElement) -> Result<SurfaceSize, JsValue> {
    let width = window.inner_width()?.as_f64().unwrap_or(0.0).max(0.0).floor();
    let height = window.inner_height()?.as_f64().unwrap_or(0.0).max(0.0).floor();
    canvas.set_width(width as u32);
    canvas.set_height(height as u32);
    SurfaceSize::new(width, height).map_err(js_error)
}

/// A running backdrop on one canvas. Dropping it (or `free()` from JS) stops
/// the loop and detaches its listeners.
#[wasm_bindgen]
pub struct Backdrop {
    state: Rc<RefCell<State>>,
    frame: FrameCallback,
    listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl Backdrop {
    /// Starts `engine` ("particles" or "wave") on the canvas with id
    /// `canvas_id`. `params_json` may be empty for defaults.
    pub fn start(
        canvas_id: &str,
        engine: &str,
        seed: u64,
        params_json: &str,
    ) -> Result<Backdrop, JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| js_error(format!("canvas '{canvas_id}' not found")))?
            .dyn_into::<HtmlCanvasElement>()?;
        let ctx = canvas
            .get_context("2d")?
            .ok_or("2d context unavailable")?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let params = if params_json.trim().is_empty() {
            serde_json::json!({})
        } else {
            serde_json::from_str(params_json).map_err(js_error)?
        };
        let mut engine = EngineKind::from_name(engine, seed, &params).map_err(js_error)?;
        engine.resize(fit_canvas(&window, &canvas)?);

        let frame: FrameCallback = Rc::new(RefCell::new(None));
        let state = Rc::new(RefCell::new(State {
            anim: AnimationLoop::new(engine),
            surface: Canvas2dSurface::new(ctx),
            scheduler: RafScheduler {
                window: window.clone(),
                callback: frame.clone(),
            },
        }));

        {
            let state = state.clone();
            *frame.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
                let mut guard = state.borrow_mut();
                let State {
                    anim,
                    surface,
                    scheduler,
                } = &mut *guard;
                if let Err(e) = anim.on_frame(now, surface, scheduler) {
                    warn!("backdrop loop halted: {e}");
                }
            }) as Box<dyn FnMut(f64)>));
        }

        let mut listeners = Vec::with_capacity(3);
        {
            let state = state.clone();
            let win = window.clone();
            listeners.push(Listener::attach(&window, "resize", move |_| {
                match fit_canvas(&win, &canvas) {
                    Ok(size) => state.borrow_mut().anim.engine_mut().resize(size),
                    Err(e) => warn!("resize failed: {e:?}"),
                }
            })?);
        }
        {
            let state = state.clone();
            listeners.push(Listener::attach(&window, "mousemove", move |event| {
                if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                    let (x, y) = (f64::from(mouse.client_x()), f64::from(mouse.client_y()));
                    state.borrow_mut().anim.engine_mut().pointer_moved(x, y);
                }
            })?);
        }
        {
            let state = state.clone();
            let root = document.document_element().ok_or("no document element")?;
            listeners.push(Listener::attach(&root, "mouseleave", move |_| {
                state.borrow_mut().anim.engine_mut().pointer_left();
            })?);
        }

        {
            let mut guard = state.borrow_mut();
            let State { anim, scheduler, .. } = &mut *guard;
            anim.start(scheduler).map_err(js_error)?;
        }
        debug!("backdrop started on #{canvas_id}");

        Ok(Backdrop {
            state,
            frame,
            listeners,
        })
    }

    /// Cancels the pending frame and detaches listeners. Further calls are
    /// no-ops.
    pub fn stop(&mut self) -> Result<(), JsValue> {
        let stopped = {
            let mut guard = self.state.borrow_mut();
            let State { anim, scheduler, .. } = &mut *guard;
            anim.stop(scheduler)
        };
        self.listeners.clear();
        // Releasing the closure breaks the state <-> callback cycle.
        self.frame.borrow_mut().take();
        stopped.map(|_| ()).map_err(js_error)
    }

    pub fn is_running(&self) -> bool {
        self.state.borrow().anim.is_running()
    }

    /// Frames rendered since start.
    pub fn frames(&self) -> u64 {
        self.state.borrow().anim.frames()
    }

    /// Current engine parameters as a JSON string.
    pub fn params(&self) -> String {
        self.state.borrow().anim.engine().params().to_string()
    }
}

impl Drop for Backdrop {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            warn!("backdrop stop on drop failed: {e:?}");
        }
    }
}
