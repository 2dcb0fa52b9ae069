//! Proximity links between particles, recomputed every frame.
//!
//! Every unordered pair is checked; there is no spatial index.

use plexus_core::{DrawingSurface, Palette};

use crate::config::FieldConfig;
use crate::particle::Particle;

/// Two particles close enough to be joined this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub a: usize,
    pub b: usize,
    pub distance: f64,
    /// Line alpha at both ends.
    pub opacity: f64,
}

/// Alpha of a link at `distance`, or `None` at or beyond the link distance.
///
/// Fades linearly from `link_opacity` at 0 to 0 at `link_distance`.
pub fn link_opacity(distance: f64, config: &FieldConfig) -> Option<f64> {
    if distance < config.link_distance {
        Some((1.0 - distance / config.link_distance) * config.link_opacity)
    } else {
        None
    }
}

/// All links among `particles`, ordered by `(a, b)` with `a < b`.
pub fn links<'a>(
    particles: &'a [Particle],
    config: &'a FieldConfig,
) -> impl Iterator<Item = Link> + 'a {
    particles.iter().enumerate().flat_map(move |(a, pa)| {
        particles[a + 1..]
            .iter()
            .enumerate()
            .filter_map(move |(offset, pb)| {
                let distance = pa.position.distance(pb.position);
                link_opacity(distance, config).map(|opacity| Link {
                    a,
                    b: a + 1 + offset,
                    distance,
                    opacity,
                })
            })
    })
}

/// Strokes a link with a gradient between the two endpoint colors.
pub fn draw_link(
    surface: &mut dyn DrawingSurface,
    link: &Link,
    particles: &[Particle],
    palette: &Palette,
    config: &FieldConfig,
) {
    let pa = &particles[link.a];
    let pb = &particles[link.b];
    surface.stroke_gradient_line(
        pa.position,
        pb.position,
        palette.swatch(pa.swatch).color.with_alpha(link.opacity),
        palette.swatch(pb.swatch).color.with_alpha(link.opacity),
        config.link_width,
    );
}
