//! `requestAnimationFrame` as a [`FrameScheduler`].

use plexus_core::FrameScheduler;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::Window;

/// Requests animation frames that all invoke the same callback.
pub struct BrowserScheduler {
    window: Window,
    callback: Closure<dyn FnMut(f64)>,
}

impl BrowserScheduler {
    pub fn new(window: Window, callback: Closure<dyn FnMut(f64)>) -> Self {
        Self { window, callback }
    }
}

impl FrameScheduler for BrowserScheduler {
    type Handle = i32;

    fn request_frame(&mut self) -> Option<i32> {
        self.window
            .request_animation_frame(self.callback.as_ref().unchecked_ref())
            .map_err(|e| log::warn!("requestAnimationFrame failed: {e:?}"))
            .ok()
    }

    fn cancel_frame(&mut self, handle: i32) {
        let _ = self.window.cancel_animation_frame(handle);
    }
}
