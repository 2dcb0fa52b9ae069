#![deny(unsafe_code)]
//! Browser binding: mounts a particle field onto a `<canvas>`.
//!
//! ```js
//! const backdrop = ContactBackdrop.mount(canvas, 42);
//! // later
//! backdrop?.unmount();
//! ```

mod browser;
mod canvas;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use plexus_core::Palette;
use plexus_field::{mount, FieldConfig, Mounted};
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

pub use browser::BrowserScheduler;
pub use canvas::{CanvasContainer, CanvasSurface};

type Backdrop = Mounted<CanvasContainer, BrowserScheduler>;
type Slot = Rc<RefCell<Option<Backdrop>>>;

/// A particle field animating on a canvas until unmounted.
#[wasm_bindgen]
pub struct ContactBackdrop {
    slot: Slot,
}

#[wasm_bindgen]
impl ContactBackdrop {
    /// Starts the default field on `canvas`. Returns `undefined` when the
    /// canvas has no layout size or no 2D context.
    pub fn mount(canvas: HtmlCanvasElement, seed: u32) -> Option<ContactBackdrop> {
        start(canvas, seed, Palette::contact(), FieldConfig::default())
    }

    /// Like `mount`, with a named palette and a JSON object of field
    /// parameters.
    #[wasm_bindgen(js_name = mountWith)]
    pub fn mount_with(
        canvas: HtmlCanvasElement,
        seed: u32,
        palette: &str,
        params: &str,
    ) -> Result<Option<ContactBackdrop>, JsError> {
        let palette = Palette::from_name(palette)?;
        let params: serde_json::Value = serde_json::from_str(params)?;
        Ok(start(canvas, seed, palette, FieldConfig::from_json(&params)))
    }

    /// Removes the resize listener and cancels the pending frame. Safe to
    /// call more than once.
    pub fn unmount(&self) {
        let taken = self.slot.borrow_mut().take();
        if let Some(mut backdrop) = taken {
            backdrop.teardown();
        }
    }

    #[wasm_bindgen(getter, js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.slot
            .borrow()
            .as_ref()
            .is_some_and(|backdrop| backdrop.is_running())
    }
}

fn start(
    canvas: HtmlCanvasElement,
    seed: u32,
    palette: Palette,
    config: FieldConfig,
) -> Option<ContactBackdrop> {
    let window = web_sys::window()?;
    let slot: Slot = Rc::new(RefCell::new(None));

    let frame_slot = Rc::downgrade(&slot);
    let on_frame = Closure::<dyn FnMut(f64)>::new(move |_timestamp: f64| {
        with_backdrop(&frame_slot, |b| {
            b.on_pending_frame();
        });
    });
    let resize_slot = Rc::downgrade(&slot);
    let on_resize = Closure::<dyn FnMut()>::new(move || {
        with_backdrop(&resize_slot, Backdrop::on_resize);
    });

    let container = CanvasContainer::new(window.clone(), canvas, on_resize);
    let scheduler = BrowserScheduler::new(window, on_frame);
    let backdrop = mount(container, scheduler, palette, config, u64::from(seed))?;
    *slot.borrow_mut() = Some(backdrop);
    Some(ContactBackdrop { slot })
}

/// Runs `f` on the mounted backdrop, if it is still alive.
fn with_backdrop(slot: &Weak<RefCell<Option<Backdrop>>>, f: impl FnOnce(&mut Backdrop)) {
    let Some(slot) = slot.upgrade() else {
        return;
    };
    let Ok(mut guard) = slot.try_borrow_mut() else {
        log::debug!("backdrop busy; skipping callback");
        return;
    };
    if let Some(backdrop) = guard.as_mut() {
        f(backdrop);
    }
}
