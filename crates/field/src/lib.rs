#![deny(unsafe_code)]
//! Particle network animation.
//!
//! A [`ParticleField`] holds a fixed set of small particles that drift,
//! pulse, and spin inside the surface bounds, plus a few large hexagon
//! outlines that drift and wrap behind them. Each frame draws the hexagons,
//! then the particles, then a gradient line between every pair of particles
//! closer than the link distance.
//!
//! Entities are created once from a seed and live until the field is
//! dropped; resizing changes the bounds only.

pub mod config;
pub mod frame_loop;
pub mod link;
pub mod mount;
pub mod particle;
pub mod shape;

pub use config::FieldConfig;
pub use frame_loop::FrameLoop;
pub use link::{link_opacity, links, Link};
pub use mount::{mount, Container, Mounted};
pub use particle::Particle;
pub use shape::HexShape;

use plexus_core::{Animation, DrawingSurface, FrameStats, Palette, Size, Xorshift64};
use serde_json::Value;

/// The particle network component.
#[derive(Debug, Clone)]
pub struct ParticleField {
    size: Size,
    palette: Palette,
    config: FieldConfig,
    particles: Vec<Particle>,
    shapes: Vec<HexShape>,
}

impl ParticleField {
    /// Seeds `config.particle_count` particles, then `config.shape_count`
    /// hexagons, uniformly over `size`.
    pub fn new(size: Size, palette: Palette, config: FieldConfig, seed: u64) -> Self {
        let mut rng = Xorshift64::new(seed);
        let particles = (0..config.particle_count)
            .map(|_| Particle::spawn(&mut rng, size, palette.len()))
            .collect();
        let shapes = (0..config.shape_count)
            .map(|_| HexShape::spawn(&mut rng, size, palette.len()))
            .collect();
        Self {
            size,
            palette,
            config,
            particles,
            shapes,
        }
    }

    /// Creates a field from a JSON params object, see [`FieldConfig::from_json`].
    pub fn from_json(size: Size, palette: Palette, seed: u64, params: &Value) -> Self {
        Self::new(size, palette, FieldConfig::from_json(params), seed)
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn shapes(&self) -> &[HexShape] {
        &self.shapes
    }

    /// Links the current particle positions would draw.
    pub fn links(&self) -> impl Iterator<Item = Link> + '_ {
        links(&self.particles, &self.config)
    }
}

impl Animation for ParticleField {
    fn step(&mut self) {
        let bounds = self.size;
        self.shapes.iter_mut().for_each(|s| s.update(bounds));
        self.particles.iter_mut().for_each(|p| p.update(bounds));
    }

    fn render(&self, surface: &mut dyn DrawingSurface) -> FrameStats {
        for shape in &self.shapes {
            shape.draw(surface, &self.palette, &self.config);
        }
        for particle in &self.particles {
            particle.draw(surface, &self.palette, &self.config);
        }
        let mut linked = 0;
        for l in self.links() {
            link::draw_link(surface, &l, &self.particles, &self.palette, &self.config);
            linked += 1;
        }
        FrameStats {
            shapes: self.shapes.len(),
            particles: self.particles.len(),
            links: linked,
        }
    }

    fn resize(&mut self, size: Size) {
        self.size = size;
    }

    fn params(&self) -> Value {
        self.config.to_json()
    }

    fn param_schema(&self) -> Value {
        FieldConfig::schema()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plexus_core::{DrawCommand, ManualScheduler, Recorder};
    use serde_json::json;

    fn size(w: f64, h: f64) -> Size {
        Size::new(w, h).unwrap()
    }

    fn field(seed: u64) -> ParticleField {
        ParticleField::new(size(400.0, 300.0), Palette::contact(), FieldConfig::default(), seed)
    }

    #[test]
    fn new_creates_configured_entity_counts() {
        let f = field(1);
        assert_eq!(f.particles().len(), 50);
        assert_eq!(f.shapes().len(), 3);
    }

    #[test]
    fn from_json_applies_overrides() {
        let f = ParticleField::from_json(
            size(100.0, 100.0),
            Palette::ember(),
            9,
            &json!({"particle_count": 7, "shape_count": 0}),
        );
        assert_eq!(f.particles().len(), 7);
        assert!(f.shapes().is_empty());
        assert_eq!(f.params()["particle_count"], 7);
    }

    #[test]
    fn from_json_with_huge_counts_spawns_the_maximum() {
        let f = ParticleField::from_json(
            size(100.0, 100.0),
            Palette::contact(),
            1,
            &json!({"particle_count": 1u64 << 60, "shape_count": 1u64 << 40}),
        );
        assert_eq!(f.particles().len(), config::MAX_PARTICLE_COUNT);
        assert_eq!(f.shapes().len(), config::MAX_SHAPE_COUNT);
    }

    #[test]
    fn same_seed_same_scene() {
        let mut a = field(12345);
        let mut b = field(12345);
        for _ in 0..30 {
            a.step();
            b.step();
        }
        assert_eq!(a.particles(), b.particles());
        assert_eq!(a.shapes(), b.shapes());
    }

    #[test]
    fn different_seed_different_scene() {
        assert_ne!(field(1).particles(), field(2).particles());
    }

    #[test]
    fn render_order_is_shapes_particles_links() {
        let mut f = field(4);
        f.step();
        let mut rec = Recorder::new(f.size());
        let stats = f.render(&mut rec);

        let kinds: Vec<u8> = rec
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::StrokePolygon { .. } => Some(0),
                DrawCommand::FillCircle { .. } | DrawCommand::FillPolygon { .. } => Some(1),
                DrawCommand::GradientLine { .. } => Some(2),
                _ => None,
            })
            .collect();
        assert!(kinds.windows(2).all(|w| w[0] <= w[1]), "out of order: {kinds:?}");
        assert_eq!(kinds.iter().filter(|&&k| k == 0).count(), 3);
        assert_eq!(kinds.iter().filter(|&&k| k == 1).count(), 50);
        assert_eq!(stats.links, rec.line_count());
        assert_eq!(stats.links, f.links().count());
    }

    #[test]
    fn glyph_follows_swatch_every_frame() {
        let mut f = field(21);
        let palette = Palette::contact();
        let mut rec = Recorder::new(f.size());
        for _ in 0..5 {
            rec.take();
            f.advance(&mut rec);
            let glyphs: Vec<bool> = rec
                .commands()
                .iter()
                .filter_map(|c| match c {
                    DrawCommand::FillCircle { .. } => Some(true),
                    DrawCommand::FillPolygon { .. } => Some(false),
                    _ => None,
                })
                .collect();
            let expected: Vec<bool> = f
                .particles()
                .iter()
                .map(|p| palette.swatch(p.swatch).glyph == plexus_core::Glyph::Circle)
                .collect();
            assert_eq!(glyphs, expected);
        }
    }

    #[test]
    fn resize_preserves_entities_and_phase_state() {
        let mut f = field(33);
        for _ in 0..10 {
            f.step();
        }
        let particles = f.particles().to_vec();
        let shapes = f.shapes().to_vec();

        f.resize(size(800.0, 600.0));
        assert_eq!(f.size(), size(800.0, 600.0));
        assert_eq!(f.particles(), particles.as_slice());
        assert_eq!(f.shapes(), shapes.as_slice());

        f.resize(size(120.0, 90.0));
        f.step();
        assert_eq!(f.particles().len(), 50);
        for (after, before) in f.particles().iter().zip(&particles) {
            assert!(f.size().contains(after.position));
            assert_eq!(after.velocity.abs(), before.velocity.abs());
            assert_eq!(after.pulse_speed, before.pulse_speed);
            assert_eq!(after.pulse_phase, before.pulse_phase + before.pulse_speed);
        }
    }

    #[test]
    fn param_schema_covers_params() {
        let f = field(1);
        let schema = f.param_schema();
        for key in f.params().as_object().unwrap().keys() {
            assert!(schema.get(key).is_some(), "schema missing {key}");
        }
    }

    #[test]
    fn object_safety() {
        let boxed: Box<dyn Animation> = Box::new(field(1));
        assert_eq!(boxed.params()["shape_count"], 3);
    }

    #[test]
    fn seeded_run_of_120_frames_stays_bounded_and_links() {
        // 400x300 splits into 20 cells of 80x75 whose diagonal is under 120,
        // so 50 particles always put two within link distance.
        let s = size(400.0, 300.0);
        let f = ParticleField::new(s, Palette::contact(), FieldConfig::default(), 2024);
        let mut fl = FrameLoop::new(f, ManualScheduler::new());
        let mut rec = Recorder::new(s);
        fl.start();

        let mut frames = 0;
        let mut frames_with_links = 0;
        while frames < 120 {
            let stats = fl.pump(&mut rec).unwrap();
            frames += 1;
            if stats.links > 0 {
                frames_with_links += 1;
            }
            for p in fl.animation().particles() {
                assert!(s.contains(p.position), "frame {frames}: {:?}", p.position);
                assert!(p.opacity >= -0.1 - 1e-12 && p.opacity <= 0.7 + 1e-12);
            }
            rec.take();
        }

        assert_eq!(fl.frames(), 120);
        assert_eq!(fl.animation().particles().len(), 50);
        assert_eq!(fl.animation().shapes().len(), 3);
        assert_eq!(frames_with_links, 120);
        fl.teardown();
        assert!(fl.scheduler().pending().is_none());
    }
}
