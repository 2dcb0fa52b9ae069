//! Reproducible description of a rendered scene.
//!
//! A [`Seed`] captures everything needed to recreate a frame: palette name,
//! surface dimensions, parameter overrides, PRNG seed, and frame count.

use crate::error::FieldError;
use crate::palette::Palette;
use serde::{Deserialize, Serialize};

/// Reproducible description of a rendered scene.
///
/// Two identical `Seed` values rendered by the same binary produce
/// bit-identical frames.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Seed {
    pub palette: String,
    pub width: usize,
    pub height: usize,
    #[serde(default = "empty_params")]
    pub params: serde_json::Value,
    pub seed: u64,
    #[serde(default)]
    pub frames: usize,
}

fn empty_params() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl Seed {
    /// Creates a Seed with empty params and zero frames.
    pub fn new(palette: &str, width: usize, height: usize, seed: u64) -> Self {
        Self {
            palette: palette.to_string(),
            width,
            height,
            params: empty_params(),
            seed,
            frames: 0,
        }
    }

    /// Checks the seed can be rendered: non-zero dimensions whose product
    /// fits in `usize`, and a built-in palette name.
    pub fn validate(&self) -> Result<(), FieldError> {
        match self.width.checked_mul(self.height) {
            Some(area) if area > 0 => {}
            _ => return Err(FieldError::InvalidDimensions),
        }
        Palette::from_name(&self.palette).map(drop)
    }
}
