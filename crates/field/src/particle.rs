//! Drifting, pulsing particles that bounce off the surface edges.

use plexus_core::{DVec2, DrawingSurface, Glyph, Glow, Palette, Size, Xorshift64};

use crate::config::FieldConfig;

const SIZE_MIN: f64 = 1.0;
const SIZE_MAX: f64 = 3.0;
/// Half-width of the per-axis drift range.
const DRIFT: f64 = 0.15;
const PULSE_SPEED_MIN: f64 = 0.01;
const PULSE_SPEED_MAX: f64 = 0.04;
const SPIN: f64 = 0.01;

const OPACITY_BASE: f64 = 0.3;
const OPACITY_SWING: f64 = 0.4;
const RADIUS_SWING: f64 = 0.5;
/// Diamond half-diagonal as a multiple of the radius.
const DIAMOND_SCALE: f64 = 1.5;
const CIRCLE_GLOW_ALPHA: f64 = 0.8;
const DIAMOND_GLOW_ALPHA: f64 = 0.7;

/// A small glyph drifting at constant speed.
///
/// Velocity is fixed at creation and only ever changes sign on contact with
/// an edge. `opacity` and `radius` are derived from `pulse_phase` each update.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: DVec2,
    pub velocity: DVec2,
    /// Base radius.
    pub size: f64,
    /// Radius drawn this frame.
    pub radius: f64,
    /// Palette index.
    pub swatch: usize,
    pub opacity: f64,
    pub pulse_phase: f64,
    pub pulse_speed: f64,
    pub rotation: f64,
    pub rotation_speed: f64,
}

impl Particle {
    /// Spawns a particle uniformly over `bounds`.
    ///
    /// The order of PRNG draws is fixed; changing it changes every seeded scene.
    pub fn spawn(rng: &mut Xorshift64, bounds: Size, palette_len: usize) -> Self {
        let position = rng.point_in(bounds);
        let size = rng.between(SIZE_MIN, SIZE_MAX);
        let swatch = rng.index(palette_len);
        let velocity = DVec2::new(rng.centered(DRIFT), rng.centered(DRIFT));
        let opacity = rng.between(0.3, 0.9);
        let pulse_speed = rng.between(PULSE_SPEED_MIN, PULSE_SPEED_MAX);
        let pulse_phase = rng.angle();
        let rotation = rng.angle();
        let rotation_speed = rng.centered(SPIN);
        Self {
            position,
            velocity,
            size,
            radius: size,
            swatch,
            opacity,
            pulse_phase,
            pulse_speed,
            rotation,
            rotation_speed,
        }
    }

    /// Moves one frame, reflecting and clamping at the edges of `bounds`,
    /// then advances the pulse and spin.
    pub fn update(&mut self, bounds: Size) {
        self.position += self.velocity;

        if self.position.x < 0.0 || self.position.x > bounds.width {
            self.velocity.x = -self.velocity.x;
        }
        if self.position.y < 0.0 || self.position.y > bounds.height {
            self.velocity.y = -self.velocity.y;
        }
        self.position = self
            .position
            .clamp(DVec2::ZERO, DVec2::new(bounds.width, bounds.height));

        self.pulse_phase += self.pulse_speed;
        let pulse = self.pulse_phase.sin();
        self.opacity = OPACITY_BASE + OPACITY_SWING * pulse;
        self.radius = self.size + RADIUS_SWING * pulse;

        self.rotation += self.rotation_speed;
    }

    /// Draws the particle's glyph in its own translated, rotated frame.
    pub fn draw(&self, surface: &mut dyn DrawingSurface, palette: &Palette, config: &FieldConfig) {
        let swatch = palette.swatch(self.swatch);
        let fill = swatch.color.with_alpha(config.alpha(self.opacity));

        surface.save();
        surface.translate(self.position);
        surface.rotate(self.rotation);
        match swatch.glyph {
            Glyph::Circle => {
                let glow = Glow {
                    blur: config.circle_glow,
                    color: swatch
                        .color
                        .with_alpha(config.alpha(self.opacity * CIRCLE_GLOW_ALPHA)),
                };
                surface.fill_circle(DVec2::ZERO, self.radius, fill, Some(glow));
            }
            Glyph::Diamond => {
                let glow = Glow {
                    blur: config.diamond_glow,
                    color: swatch
                        .color
                        .with_alpha(config.alpha(self.opacity * DIAMOND_GLOW_ALPHA)),
                };
                surface.fill_polygon(&diamond(self.radius * DIAMOND_SCALE), fill, Some(glow));
            }
        }
        surface.restore();
    }
}

/// Square rotated 45° with the given half-diagonal, centered on the origin.
fn diamond(half: f64) -> [DVec2; 4] {
    [
        DVec2::new(-half, 0.0),
        DVec2::new(0.0, -half),
        DVec2::new(half, 0.0),
        DVec2::new(0.0, half),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use plexus_core::{DrawCommand, Recorder};

    fn bounds() -> Size {
        Size::new(400.0, 300.0).unwrap()
    }

    fn still(position: DVec2, velocity: DVec2) -> Particle {
        Particle {
            position,
            velocity,
            size: 2.0,
            radius: 2.0,
            swatch: 0,
            opacity: 0.5,
            pulse_phase: 0.0,
            pulse_speed: 0.02,
            rotation: 0.0,
            rotation_speed: 0.0,
        }
    }

    #[test]
    fn spawn_respects_initial_ranges() {
        let mut rng = Xorshift64::new(5);
        for _ in 0..500 {
            let p = Particle::spawn(&mut rng, bounds(), 4);
            assert!(bounds().contains(p.position));
            assert!((SIZE_MIN..SIZE_MAX).contains(&p.size));
            assert_eq!(p.radius, p.size);
            assert!(p.swatch < 4);
            assert!((-DRIFT..DRIFT).contains(&p.velocity.x));
            assert!((-DRIFT..DRIFT).contains(&p.velocity.y));
            assert!((0.3..0.9).contains(&p.opacity));
            assert!((PULSE_SPEED_MIN..PULSE_SPEED_MAX).contains(&p.pulse_speed));
            assert!((-SPIN..SPIN).contains(&p.rotation_speed));
        }
    }

    #[test]
    fn spawn_is_deterministic_per_seed() {
        let a = Particle::spawn(&mut Xorshift64::new(77), bounds(), 4);
        let b = Particle::spawn(&mut Xorshift64::new(77), bounds(), 4);
        assert_eq!(a, b);
    }

    #[test]
    fn right_edge_contact_flips_velocity_and_clamps() {
        let mut p = still(DVec2::new(399.95, 100.0), DVec2::new(0.1, 0.0));
        p.update(bounds());
        assert_eq!(p.velocity.x, -0.1);
        assert_eq!(p.position.x, 400.0);
    }

    #[test]
    fn left_edge_contact_flips_velocity_and_clamps() {
        let mut p = still(DVec2::new(0.05, 100.0), DVec2::new(-0.1, 0.0));
        p.update(bounds());
        assert_eq!(p.velocity.x, 0.1);
        assert_eq!(p.position.x, 0.0);
    }

    #[test]
    fn vertical_edges_flip_only_y() {
        let mut p = still(DVec2::new(200.0, 299.9), DVec2::new(0.1, 0.15));
        p.update(bounds());
        assert_eq!(p.velocity, DVec2::new(0.1, -0.15));
        assert_eq!(p.position.y, 300.0);

        let mut q = still(DVec2::new(200.0, 0.1), DVec2::new(0.0, -0.15));
        q.update(bounds());
        assert_eq!(q.velocity.y, 0.15);
        assert_eq!(q.position.y, 0.0);
    }

    #[test]
    fn interior_motion_keeps_velocity() {
        let mut p = still(DVec2::new(200.0, 150.0), DVec2::new(0.1, -0.05));
        p.update(bounds());
        assert_eq!(p.velocity, DVec2::new(0.1, -0.05));
        assert!((p.position - DVec2::new(200.1, 149.95)).length() < 1e-12);
    }

    #[test]
    fn far_outside_position_is_pulled_back_after_shrink() {
        let mut p = still(DVec2::new(900.0, 700.0), DVec2::new(0.1, 0.1));
        p.update(bounds());
        assert!(bounds().contains(p.position));
        assert_eq!(p.velocity, DVec2::new(-0.1, -0.1));
    }

    #[test]
    fn pulse_drives_opacity_and_radius() {
        let mut p = still(DVec2::new(10.0, 10.0), DVec2::ZERO);
        p.pulse_phase = std::f64::consts::FRAC_PI_2 - p.pulse_speed;
        p.update(bounds());
        assert!((p.opacity - 0.7).abs() < 1e-9);
        assert!((p.radius - 2.5).abs() < 1e-9);
    }

    #[test]
    fn circle_swatch_draws_glowing_circle_in_local_frame() {
        let palette = Palette::contact();
        let mut p = still(DVec2::new(10.0, 20.0), DVec2::ZERO);
        p.swatch = 0;
        p.rotation = 0.25;
        let mut rec = Recorder::new(bounds());
        p.draw(&mut rec, &palette, &FieldConfig::default());
        let cmds = rec.commands();
        assert_eq!(cmds[0], DrawCommand::Save);
        assert_eq!(cmds[1], DrawCommand::Translate(DVec2::new(10.0, 20.0)));
        assert_eq!(cmds[2], DrawCommand::Rotate(0.25));
        match &cmds[3] {
            DrawCommand::FillCircle {
                center,
                radius,
                fill,
                glow,
            } => {
                assert_eq!(*center, DVec2::ZERO);
                assert_eq!(*radius, 2.0);
                assert_eq!(fill.rgb, palette.swatch(0).color);
                assert_eq!(fill.alpha, 0.5);
                let glow = glow.unwrap();
                assert_eq!(glow.blur, 20.0);
                assert!((glow.color.alpha - 0.4).abs() < 1e-12);
            }
            other => panic!("expected circle, got {other:?}"),
        }
        assert_eq!(cmds[4], DrawCommand::Restore);
    }

    #[test]
    fn diamond_swatch_draws_scaled_diamond() {
        let palette = Palette::contact();
        let mut p = still(DVec2::new(10.0, 20.0), DVec2::ZERO);
        p.swatch = 1;
        let mut rec = Recorder::new(bounds());
        p.draw(&mut rec, &palette, &FieldConfig::default());
        match &rec.commands()[3] {
            DrawCommand::FillPolygon { points, glow, .. } => {
                assert_eq!(points.len(), 4);
                assert_eq!(points[2], DVec2::new(3.0, 0.0));
                assert_eq!(glow.unwrap().blur, 15.0);
            }
            other => panic!("expected diamond, got {other:?}"),
        }
    }

    #[test]
    fn negative_opacity_is_clamped_at_draw_time_only() {
        let palette = Palette::contact();
        let mut p = still(DVec2::new(10.0, 20.0), DVec2::ZERO);
        p.opacity = -0.1;
        let mut rec = Recorder::new(bounds());
        p.draw(&mut rec, &palette, &FieldConfig::default());
        match &rec.commands()[3] {
            DrawCommand::FillCircle { fill, .. } => assert_eq!(fill.alpha, 0.0),
            other => panic!("expected circle, got {other:?}"),
        }
        assert_eq!(p.opacity, -0.1);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn stays_in_bounds_and_pulse_stays_in_range(
                seed: u64,
                w in 1.0_f64..2000.0,
                h in 1.0_f64..2000.0,
                frames in 1_usize..400,
            ) {
                let bounds = Size::new(w, h).unwrap();
                let mut rng = Xorshift64::new(seed);
                let mut p = Particle::spawn(&mut rng, bounds, 4);
                let speed = p.velocity.abs();
                for _ in 0..frames {
                    p.update(bounds);
                    prop_assert!(bounds.contains(p.position), "{:?} outside {w}x{h}", p.position);
                    prop_assert!(p.opacity >= -0.1 - 1e-12 && p.opacity <= 0.7 + 1e-12);
                    prop_assert!((p.radius - p.size).abs() <= 0.5 + 1e-12);
                    prop_assert_eq!(p.velocity.abs(), speed);
                }
            }
        }
    }
}
