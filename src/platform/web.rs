//! Browser host (wasm32 only)
//!
//! - Window geometry from `innerWidth` / `innerHeight`
//! - Canvas `width`/`height` plus CSS size
//! - `requestAnimationFrame` / `cancelAnimationFrame`
//! - `performance.now()`

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, Window};

use super::{Clock, DrawingSurface, FrameHandle, FrameScheduler, GraphicsContext, HostWindow};
use crate::consts::FULLSCREEN_ATTRIBUTE;
use crate::engine::Engine;
use crate::error::StartupError;
use crate::frame_loop::FrameLoop;
use crate::viewport::SurfaceMode;

/// Closure invoked by `requestAnimationFrame`
pub type FrameCallback = Closure<dyn FnMut(f64)>;

/// Shared slot holding the frame callback once the loop exists
pub type CallbackSlot = Rc<RefCell<Option<FrameCallback>>>;

pub fn window() -> Result<Window, StartupError> {
    web_sys::window().ok_or(StartupError::NoWindow)
}

/// Look up the drawing canvas by id
pub fn find_canvas(id: &str) -> Result<HtmlCanvasElement, StartupError> {
    let document = window()?.document().ok_or(StartupError::NoWindow)?;
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        .ok_or_else(|| StartupError::SurfaceMissing(id.to_string()))
}

/// Fullscreen iff the canvas carries the marker attribute
pub fn surface_mode(canvas: &HtmlCanvasElement) -> SurfaceMode {
    SurfaceMode::from_marker(canvas.has_attribute(FULLSCREEN_ATTRIBUTE))
}

/// Tell the user startup cannot continue
pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

pub struct BrowserWindow {
    window: Window,
}

impl BrowserWindow {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl HostWindow for BrowserWindow {
    fn inner_size(&self) -> (u32, u32) {
        let read = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let width = read(self.window.inner_width());
        let height = read(self.window.inner_height());
        (width as u32, height as u32)
    }
}

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self { canvas }
    }
}

impl DrawingSurface for CanvasSurface {
    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn set_display_size(&mut self, width: u32, height: u32) {
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{}px", width));
        let _ = style.set_property("height", &format!("{}px", height));
    }
}

/// `requestAnimationFrame` scheduler
///
/// The callback lives in a shared slot because it refers back to the loop that
/// owns this scheduler; `install_frame_callback` fills it in.
pub struct AnimationFrames {
    window: Window,
    callback: CallbackSlot,
}

impl AnimationFrames {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            callback: Rc::new(RefCell::new(None)),
        }
    }

    pub fn callback_slot(&self) -> CallbackSlot {
        self.callback.clone()
    }
}

impl FrameScheduler for AnimationFrames {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        let slot = self.callback.borrow();
        let Some(callback) = slot.as_ref() else {
            log::error!("Frame requested before the frame callback was installed");
            return None;
        };
        match self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
        {
            Ok(id) => Some(FrameHandle(id)),
            Err(e) => {
                log::error!("requestAnimationFrame failed: {:?}", e);
                None
            }
        }
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Err(e) = self.window.cancel_animation_frame(handle.0) {
            log::warn!("cancelAnimationFrame failed: {:?}", e);
        }
    }
}

pub struct PerformanceClock {
    window: Window,
}

impl PerformanceClock {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Clock for PerformanceClock {
    fn now(&self) -> f64 {
        match self.window.performance() {
            Some(performance) => performance.now(),
            None => js_sys::Date::now(),
        }
    }
}

/// Point the animation-frame callback at `frame_loop`.
///
/// The closure and the loop keep each other alive for the rest of the page's
/// life, the same as a forgotten closure.
pub fn install_frame_callback<E, W, S, G>(
    frame_loop: &Rc<RefCell<FrameLoop<E, W, S, G, AnimationFrames>>>,
) where
    E: Engine + 'static,
    W: HostWindow + 'static,
    S: DrawingSurface + 'static,
    G: GraphicsContext + 'static,
{
    let slot = frame_loop.borrow().scheduler().callback_slot();
    let loop_ref = frame_loop.clone();
    let closure = Closure::<dyn FnMut(f64)>::new(move |time: f64| {
        let report = loop_ref.borrow_mut().step(time);
        log::trace!("Frame at {:.2}: {:?}", time, report);
    });
    *slot.borrow_mut() = Some(closure);
}
