//! Seeded random draws for spawning entities.
//!
//! Every random value a field needs at creation comes from one [`Xorshift64`]
//! stream in a fixed order, so a seed plus a surface size reproduces the same
//! scene on every platform. Nothing random happens after spawning.

use glam::DVec2;
use std::f64::consts::TAU;

use crate::surface::Size;

/// Xorshift64 with shifts (13, 7, 17).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    /// Zero is a fixed point of xorshift, so it is swapped for this.
    const ZERO_SEED: u64 = 0x5EED_DEAD_BEEF_CAFE;

    pub fn new(seed: u64) -> Self {
        let state = match seed {
            0 => Self::ZERO_SEED,
            s => s,
        };
        Self { state }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform in [0, 1), built from the top 53 bits.
    pub fn unit(&mut self) -> f64 {
        const SCALE: f64 = 1.0 / (1u64 << 53) as f64;
        (self.next_u64() >> 11) as f64 * SCALE
    }

    /// Uniform in [lo, hi).
    pub fn between(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.unit()
    }

    /// Uniform in [-half, half); the signed drift used for velocity and spin.
    pub fn centered(&mut self, half: f64) -> f64 {
        (self.unit() - 0.5) * 2.0 * half
    }

    /// Uniform angle in [0, 2π).
    pub fn angle(&mut self) -> f64 {
        self.unit() * TAU
    }

    /// Uniform index in [0, len). Returns 0 for an empty range.
    pub fn index(&mut self, len: usize) -> usize {
        match len {
            0 => 0,
            n => (self.next_u64() % n as u64) as usize,
        }
    }

    /// Uniform point inside `bounds`, x drawn before y.
    pub fn point_in(&mut self, bounds: Size) -> DVec2 {
        let x = self.between(0.0, bounds.width);
        let y = self.between(0.0, bounds.height);
        DVec2::new(x, y)
    }
}
