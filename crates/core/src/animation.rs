//! The `Animation` trait every frame-driven effect implements.
//!
//! The trait is object-safe so a driver can hold a `Box<dyn Animation>`
//! without knowing which effect it runs.

use serde::Serialize;
use serde_json::Value;

use crate::surface::{DrawingSurface, Size};

/// Counts of what one frame drew.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FrameStats {
    pub shapes: usize,
    pub particles: usize,
    pub links: usize,
}

/// A frame-driven 2D animation.
///
/// A frame is `clear`, `step`, `render`, in that order; [`Animation::advance`]
/// performs all three. Stepping is total: no frame can fail.
pub trait Animation {
    /// Advances every entity by one frame.
    fn step(&mut self);

    /// Draws the current state. Does not clear the surface.
    fn render(&self, surface: &mut dyn DrawingSurface) -> FrameStats;

    /// Changes the bounds entities are kept within. Entity state is kept.
    fn resize(&mut self, size: Size);

    /// Current parameter values as a JSON object.
    fn params(&self) -> Value;

    /// Schema describing all parameters, their types, and defaults.
    fn param_schema(&self) -> Value;

    /// Runs one complete frame.
    fn advance(&mut self, surface: &mut dyn DrawingSurface) -> FrameStats {
        surface.clear();
        self.step();
        self.render(surface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, Recorder};
    use serde_json::json;

    /// Minimal animation used to check trait object safety and `advance` order.
    struct Blink {
        size: Size,
        frames: usize,
    }

    impl Animation for Blink {
        fn step(&mut self) {
            self.frames += 1;
        }

        fn render(&self, surface: &mut dyn DrawingSurface) -> FrameStats {
            surface.save();
            surface.restore();
            FrameStats {
                particles: self.frames,
                ..FrameStats::default()
            }
        }

        fn resize(&mut self, size: Size) {
            self.size = size;
        }

        fn params(&self) -> Value {
            json!({ "frames": self.frames })
        }

        fn param_schema(&self) -> Value {
            json!({ "frames": { "type": "integer", "default": 0 } })
        }
    }

    fn blink() -> Blink {
        Blink {
            size: Size::new(8.0, 8.0).unwrap(),
            frames: 0,
        }
    }

    #[test]
    fn animation_trait_is_object_safe() {
        let mut anim: Box<dyn Animation> = Box::new(blink());
        anim.step();
        assert_eq!(anim.params()["frames"], 1);
        assert!(anim.param_schema().get("frames").is_some());
    }

    #[test]
    fn advance_clears_then_steps_then_renders() {
        let mut anim = blink();
        let mut rec = Recorder::new(anim.size);
        let stats = anim.advance(&mut rec);
        assert_eq!(stats.particles, 1);
        assert_eq!(
            rec.commands(),
            &[DrawCommand::Clear, DrawCommand::Save, DrawCommand::Restore]
        );
    }

    #[test]
    fn resize_through_trait_object() {
        let mut anim = blink();
        let dyn_ref: &mut dyn Animation = &mut anim;
        dyn_ref.resize(Size::new(3.0, 5.0).unwrap());
        assert_eq!(anim.size, Size::new(3.0, 5.0).unwrap());
    }

    #[test]
    fn frame_stats_serializes_counts() {
        let v = serde_json::to_value(FrameStats {
            shapes: 3,
            particles: 50,
            links: 7,
        })
        .unwrap();
        assert_eq!(v["links"], 7);
    }
}
