#![deny(unsafe_code)]
//! Core types and traits for plexus, a decorative particle-network animation.
//!
//! Provides the `Animation` trait, the `DrawingSurface` trait and its
//! recording implementation, color and palette types, the `Xorshift64` PRNG,
//! `Seed`, parameter helpers, and frame scheduling primitives.

pub mod animation;
pub mod color;
pub mod error;
pub mod palette;
pub mod params;
pub mod prng;
pub mod schedule;
pub mod seed;
pub mod surface;

pub use animation::{Animation, FrameStats};
pub use color::{Rgb, Rgba};
pub use error::FieldError;
pub use palette::{Glyph, Palette, Swatch};
pub use prng::Xorshift64;
pub use schedule::{CancelToken, FrameId, FrameScheduler, ManualScheduler};
pub use seed::Seed;
pub use surface::{DrawCommand, DrawingSurface, Glow, Recorder, Size};

pub use glam::DVec2;
