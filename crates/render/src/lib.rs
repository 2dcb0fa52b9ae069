#![deny(unsafe_code)]
//! Headless rendering of a particle field.
//!
//! [`Raster`] is a CPU implementation of the drawing surface;
//! [`HeadlessContainer`] lets a field be mounted onto one without a browser.
//! [`run`] drives a [`Seed`] for a number of frames, which is what the CLI
//! uses to produce stills and frame sequences.

pub mod headless;
pub mod raster;

#[cfg(feature = "png")]
pub mod snapshot;

pub use headless::HeadlessContainer;
pub use raster::Raster;

use plexus_core::{FieldError, FrameStats, ManualScheduler, Palette, Seed, Size};
use plexus_field::{mount, FieldConfig, ParticleField};

/// Builds the field a seed describes, without running any frames.
pub fn field_from_seed(seed: &Seed) -> Result<ParticleField, FieldError> {
    seed.validate()?;
    let palette = Palette::from_name(&seed.palette)?;
    let size = Size::new(seed.width as f64, seed.height as f64)?;
    Ok(ParticleField::from_json(size, palette, seed.seed, &seed.params))
}

/// Runs `frames` frames of the scene `seed` describes and returns the last
/// one. `on_frame` sees each frame right after it is drawn, numbered from 0.
/// Mounting draws the first frame, so at least one frame is always drawn.
pub fn run<F>(seed: &Seed, frames: usize, mut on_frame: F) -> Result<Raster, FieldError>
where
    F: FnMut(usize, &Raster, &FrameStats) -> Result<(), FieldError>,
{
    seed.validate()?;
    let palette = Palette::from_name(&seed.palette)?;
    let config = FieldConfig::from_json(&seed.params);
    let container = HeadlessContainer::new(seed.width, seed.height);
    let mut mounted = mount(container, ManualScheduler::new(), palette, config, seed.seed)
        .ok_or(FieldError::InvalidDimensions)?;

    for n in 0..frames {
        let drawn = match n {
            0 => mounted.last_stats(),
            _ => mounted.on_pending_frame(),
        };
        let Some(stats) = drawn else {
            break;
        };
        on_frame(n, mounted.surface(), &stats)?;
    }
    log::info!(
        "rendered {} frames of {}x{} ({})",
        mounted.frame_loop().frames(),
        seed.width,
        seed.height,
        seed.palette
    );

    let last = mounted.surface().clone();
    mounted.teardown();
    Ok(last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use plexus_core::Animation;

    #[test]
    fn field_from_seed_applies_params() {
        let mut seed = Seed::new("glacier", 120, 80, 3);
        seed.params = serde_json::json!({"particle_count": 12});
        let field = field_from_seed(&seed).unwrap();
        assert_eq!(field.particles().len(), 12);
        assert_eq!(field.palette(), &Palette::glacier());
    }

    #[test]
    fn field_from_seed_rejects_unknown_palette_and_zero_size() {
        assert!(matches!(
            field_from_seed(&Seed::new("neon", 10, 10, 1)),
            Err(FieldError::UnknownPalette(_))
        ));
        assert!(matches!(
            field_from_seed(&Seed::new("contact", 0, 10, 1)),
            Err(FieldError::InvalidDimensions)
        ));
    }

    #[test]
    fn run_visits_every_frame_in_order() {
        let seed = Seed::new("contact", 160, 120, 8);
        let mut seen = Vec::new();
        let last = run(&seed, 6, |n, raster, stats| {
            assert_eq!((raster.width(), raster.height()), (160, 120));
            assert_eq!(stats.particles, 50);
            seen.push(n);
            Ok(())
        })
        .unwrap();
        assert_eq!(seen, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(last.width(), 160);
    }

    #[test]
    fn run_stops_on_callback_error() {
        let seed = Seed::new("contact", 40, 40, 8);
        let mut calls = 0;
        let result = run(&seed, 10, |n, _, _| {
            calls += 1;
            if n == 2 {
                Err(FieldError::Io("disk full".into()))
            } else {
                Ok(())
            }
        });
        assert!(matches!(result, Err(FieldError::Io(_))));
        assert_eq!(calls, 3);
    }

    #[test]
    fn run_with_zero_frames_returns_mounted_frame() {
        let seed = Seed::new("contact", 64, 48, 5);
        let mut calls = 0;
        let raster = run(&seed, 0, |_, _, _| {
            calls += 1;
            Ok(())
        })
        .unwrap();
        assert_eq!(calls, 0);

        let mut field = field_from_seed(&seed).unwrap();
        let mut direct = Raster::new(64, 48).unwrap();
        field.advance(&mut direct);
        assert_eq!(raster.to_rgba8(None), direct.to_rgba8(None));
    }

    #[test]
    fn run_is_reproducible() {
        let seed = Seed::new("ember", 64, 48, 77);
        let a = run(&seed, 10, |_, _, _| Ok(())).unwrap();
        let b = run(&seed, 10, |_, _, _| Ok(())).unwrap();
        assert_eq!(a.to_rgba8(None), b.to_rgba8(None));
    }

    #[test]
    fn run_matches_stepping_the_field_directly() {
        let seed = Seed::new("contact", 64, 48, 5);
        let raster = run(&seed, 4, |_, _, _| Ok(())).unwrap();

        let mut field = field_from_seed(&seed).unwrap();
        let mut direct = Raster::new(64, 48).unwrap();
        for _ in 0..4 {
            field.advance(&mut direct);
        }
        assert_eq!(raster.to_rgba8(None), direct.to_rgba8(None));
    }
}
