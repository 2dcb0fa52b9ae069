//! `<canvas>` 2D context as a [`DrawingSurface`], and the canvas element as a
//! [`Container`].

use std::f64::consts::TAU;

use plexus_core::{DVec2, DrawingSurface, Glow, Rgba, Size};
use plexus_field::Container;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    size: Size,
}

impl CanvasSurface {
    fn trace_path(&self, points: &[DVec2]) {
        self.ctx.begin_path();
        let mut it = points.iter();
        if let Some(first) = it.next() {
            self.ctx.move_to(first.x, first.y);
        }
        for p in it {
            self.ctx.line_to(p.x, p.y);
        }
        self.ctx.close_path();
    }

    fn set_glow(&self, glow: Option<Glow>) {
        match glow {
            Some(g) => {
                self.ctx.set_shadow_blur(g.blur);
                self.ctx.set_shadow_color(&g.color.to_css());
            }
            None => self.ctx.set_shadow_blur(0.0),
        }
    }
}

impl DrawingSurface for CanvasSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn clear(&mut self) {
        self.ctx.clear_rect(0.0, 0.0, self.size.width, self.size.height);
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, offset: DVec2) {
        let _ = self.ctx.translate(offset.x, offset.y);
    }

    fn rotate(&mut self, angle: f64) {
        let _ = self.ctx.rotate(angle);
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, fill: Rgba, glow: Option<Glow>) {
        self.set_glow(glow);
        self.ctx.set_fill_style_str(&fill.to_css());
        self.ctx.begin_path();
        let _ = self.ctx.arc(center.x, center.y, radius.max(0.0), 0.0, TAU);
        self.ctx.fill();
        self.set_glow(None);
    }

    fn fill_polygon(&mut self, points: &[DVec2], fill: Rgba, glow: Option<Glow>) {
        self.set_glow(glow);
        self.ctx.set_fill_style_str(&fill.to_css());
        self.trace_path(points);
        self.ctx.fill();
        self.set_glow(None);
    }

    fn stroke_polygon(&mut self, points: &[DVec2], stroke: Rgba, width: f64) {
        self.ctx.set_stroke_style_str(&stroke.to_css());
        self.ctx.set_line_width(width);
        self.trace_path(points);
        self.ctx.stroke();
    }

    fn stroke_gradient_line(&mut self, from: DVec2, to: DVec2, start: Rgba, end: Rgba, width: f64) {
        let gradient = self.ctx.create_linear_gradient(from.x, from.y, to.x, to.y);
        let _ = gradient.add_color_stop(0.0, &start.to_css());
        let _ = gradient.add_color_stop(1.0, &end.to_css());
        self.ctx.set_stroke_style_canvas_gradient(&gradient);
        self.ctx.set_line_width(width);
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.stroke();
    }
}

/// Whole-pixel size of a layout box, truncated the way the canvas element
/// truncates its `width` and `height` attributes.
fn backing_size(width: f64, height: f64) -> Option<Size> {
    Size::new(width.trunc(), height.trunc()).ok()
}

/// A canvas element sized to its layout box, with a window resize listener.
pub struct CanvasContainer {
    window: Window,
    canvas: HtmlCanvasElement,
    on_resize: Closure<dyn FnMut()>,
    watching: bool,
}

impl CanvasContainer {
    pub fn new(window: Window, canvas: HtmlCanvasElement, on_resize: Closure<dyn FnMut()>) -> Self {
        Self {
            window,
            canvas,
            on_resize,
            watching: false,
        }
    }

    fn set_backing_size(&self, size: Size) {
        self.canvas.set_width(size.width as u32);
        self.canvas.set_height(size.height as u32);
    }
}

impl Container for CanvasContainer {
    type Surface = CanvasSurface;

    fn rendered_size(&self) -> Option<Size> {
        let rect = self.canvas.get_bounding_client_rect();
        backing_size(rect.width(), rect.height())
    }

    fn acquire_surface(&mut self, size: Size) -> Option<CanvasSurface> {
        let ctx = self
            .canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        self.set_backing_size(size);
        Some(CanvasSurface { ctx, size })
    }

    fn resize_surface(&mut self, surface: &mut CanvasSurface, size: Size) {
        self.set_backing_size(size);
        surface.size = size;
    }

    fn watch_resize(&mut self) {
        if self.watching {
            return;
        }
        let listener = self.on_resize.as_ref().unchecked_ref();
        match self.window.add_event_listener_with_callback("resize", listener) {
            Ok(()) => self.watching = true,
            Err(e) => log::warn!("could not watch window resize: {e:?}"),
        }
    }

    fn unwatch_resize(&mut self) {
        if !self.watching {
            return;
        }
        let listener = self.on_resize.as_ref().unchecked_ref();
        let _ = self
            .window
            .remove_event_listener_with_callback("resize", listener);
        self.watching = false;
    }
}
