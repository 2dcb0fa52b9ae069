//! Large, faint hexagon outlines drifting behind the particles.
//!
//! Unlike particles, hexagons wrap around the surface: once a hexagon is
//! fully past an edge (using its own size as margin) it reappears just
//! outside the opposite edge.

use std::f64::consts::TAU;

use plexus_core::{DVec2, DrawingSurface, Palette, Size, Xorshift64};

use crate::config::FieldConfig;

const SIZE_MIN: f64 = 40.0;
const SIZE_MAX: f64 = 100.0;
const SPIN: f64 = 0.0025;
const DRIFT: f64 = 0.1;
const OPACITY_MIN: f64 = 0.05;
const OPACITY_MAX: f64 = 0.15;
const SIDES: usize = 6;

#[derive(Debug, Clone, PartialEq)]
pub struct HexShape {
    pub position: DVec2,
    pub velocity: DVec2,
    /// Circumradius, also the wrap margin.
    pub size: f64,
    pub swatch: usize,
    pub rotation: f64,
    pub rotation_speed: f64,
    /// Constant for the shape's lifetime.
    pub opacity: f64,
}

impl HexShape {
    pub fn spawn(rng: &mut Xorshift64, bounds: Size, palette_len: usize) -> Self {
        let position = rng.point_in(bounds);
        let size = rng.between(SIZE_MIN, SIZE_MAX);
        let swatch = rng.index(palette_len);
        let rotation = rng.angle();
        let rotation_speed = rng.centered(SPIN);
        let velocity = DVec2::new(rng.centered(DRIFT), rng.centered(DRIFT));
        let opacity = rng.between(OPACITY_MIN, OPACITY_MAX);
        Self {
            position,
            velocity,
            size,
            swatch,
            rotation,
            rotation_speed,
            opacity,
        }
    }

    pub fn update(&mut self, bounds: Size) {
        self.position += self.velocity;
        self.rotation += self.rotation_speed;

        let margin = self.size;
        self.position.x = wrap(self.position.x, bounds.width, margin);
        self.position.y = wrap(self.position.y, bounds.height, margin);
    }

    /// Vertices of the hexagon in its local frame, starting on the +x axis.
    pub fn outline(&self) -> [DVec2; SIDES] {
        std::array::from_fn(|i| {
            let angle = TAU * i as f64 / SIDES as f64;
            DVec2::new(angle.cos(), angle.sin()) * self.size
        })
    }

    pub fn draw(&self, surface: &mut dyn DrawingSurface, palette: &Palette, config: &FieldConfig) {
        let stroke = palette.swatch(self.swatch).color.with_alpha(self.opacity);
        surface.save();
        surface.translate(self.position);
        surface.rotate(self.rotation);
        surface.stroke_polygon(&self.outline(), stroke, config.shape_stroke_width);
        surface.restore();
    }
}

/// Toroidal wrap of one coordinate over `[-margin, extent + margin]`.
fn wrap(v: f64, extent: f64, margin: f64) -> f64 {
    if v < -margin {
        extent + margin
    } else if v > extent + margin {
        -margin
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plexus_core::{DrawCommand, Recorder};

    fn bounds() -> Size {
        Size::new(400.0, 300.0).unwrap()
    }

    fn hex(position: DVec2, velocity: DVec2) -> HexShape {
        HexShape {
            position,
            velocity,
            size: 50.0,
            swatch: 2,
            rotation: 0.0,
            rotation_speed: 0.001,
            opacity: 0.1,
        }
    }

    #[test]
    fn spawn_respects_initial_ranges() {
        let mut rng = Xorshift64::new(3);
        for _ in 0..500 {
            let s = HexShape::spawn(&mut rng, bounds(), 4);
            assert!(bounds().contains(s.position));
            assert!((SIZE_MIN..SIZE_MAX).contains(&s.size));
            assert!((OPACITY_MIN..OPACITY_MAX).contains(&s.opacity));
            assert!((-SPIN..SPIN).contains(&s.rotation_speed));
            assert!((-DRIFT..DRIFT).contains(&s.velocity.x));
            assert!(s.swatch < 4);
        }
    }

    #[test]
    fn exiting_right_reappears_left_on_same_frame() {
        let mut s = hex(DVec2::new(449.95, 100.0), DVec2::new(0.1, 0.0));
        s.update(bounds());
        assert_eq!(s.position.x, -50.0);
        assert_eq!(s.velocity.x, 0.1);
    }

    #[test]
    fn exiting_left_reappears_right() {
        let mut s = hex(DVec2::new(-49.95, 100.0), DVec2::new(-0.1, 0.0));
        s.update(bounds());
        assert_eq!(s.position.x, 450.0);
    }

    #[test]
    fn exiting_bottom_reappears_top() {
        let mut s = hex(DVec2::new(100.0, 349.95), DVec2::new(0.0, 0.1));
        s.update(bounds());
        assert_eq!(s.position.y, -50.0);
    }

    #[test]
    fn exiting_top_reappears_bottom() {
        let mut s = hex(DVec2::new(100.0, -49.95), DVec2::new(0.0, -0.1));
        s.update(bounds());
        assert_eq!(s.position.y, 350.0);
    }

    #[test]
    fn partially_outside_is_not_wrapped() {
        let mut s = hex(DVec2::new(420.0, 100.0), DVec2::new(0.1, 0.0));
        s.update(bounds());
        assert!((s.position.x - 420.1).abs() < 1e-12);
    }

    #[test]
    fn update_advances_rotation() {
        let mut s = hex(DVec2::new(100.0, 100.0), DVec2::ZERO);
        s.update(bounds());
        assert!((s.rotation - 0.001).abs() < 1e-15);
    }

    #[test]
    fn outline_is_regular_hexagon() {
        let s = hex(DVec2::ZERO, DVec2::ZERO);
        let pts = s.outline();
        assert!((pts[0] - DVec2::new(50.0, 0.0)).length() < 1e-12);
        for p in &pts {
            assert!((p.length() - 50.0).abs() < 1e-9);
        }
        for i in 0..SIDES {
            let side = (pts[(i + 1) % SIDES] - pts[i]).length();
            assert!((side - 50.0).abs() < 1e-9, "side {i} = {side}");
        }
    }

    #[test]
    fn draw_strokes_outline_at_constant_opacity() {
        let palette = Palette::contact();
        let s = hex(DVec2::new(10.0, 10.0), DVec2::ZERO);
        let mut rec = Recorder::new(bounds());
        s.draw(&mut rec, &palette, &FieldConfig::default());
        match &rec.commands()[3] {
            DrawCommand::StrokePolygon {
                points,
                stroke,
                width,
            } => {
                assert_eq!(points.len(), 6);
                assert_eq!(stroke.alpha, 0.1);
                assert_eq!(stroke.rgb, palette.swatch(2).color);
                assert_eq!(*width, 2.0);
            }
            other => panic!("expected hexagon stroke, got {other:?}"),
        }
    }
}
