//! Color types for palettes and draw calls.
//!
//! [`Rgb`] is an 8-bit sRGB triple, the same precision a 2D canvas fill style
//! carries. [`Rgba`] pairs it with a straight (non-premultiplied) alpha.

use crate::error::FieldError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// 8-bit sRGB color.
///
/// Serializes as a hex string `"#rrggbb"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// sRGB color with straight alpha in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub alpha: f64,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses a hex color string like "#ff00aa" or "ff00aa" (case insensitive).
    ///
    /// Returns `FieldError::InvalidColor` if the input is not a valid 6-digit hex color.
    pub fn from_hex(hex: &str) -> Result<Rgb, FieldError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(FieldError::InvalidColor(format!(
                "expected 6 hex digits, got '{hex}'"
            )));
        }
        let channel = |range: std::ops::Range<usize>, name: &str| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|e| FieldError::InvalidColor(format!("invalid {name} component: {e}")))
        };
        Ok(Rgb {
            r: channel(0..2, "red")?,
            g: channel(2..4, "green")?,
            b: channel(4..6, "blue")?,
        })
    }

    /// Formats the color as `"#rrggbb"`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Channels scaled to [0, 1].
    pub fn to_unit(self) -> [f64; 3] {
        [
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
        ]
    }

    /// Returns this color with the given alpha.
    pub fn with_alpha(self, alpha: f64) -> Rgba {
        Rgba { rgb: self, alpha }
    }
}

impl Rgba {
    /// CSS `rgba(r, g, b, a)` form accepted by a 2D canvas fill or stroke style.
    pub fn to_css(self) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            self.rgb.r, self.rgb.g, self.rgb.b, self.alpha
        )
    }

    /// Returns the color with alpha clamped to [0, 1].
    pub fn clamped(self) -> Rgba {
        Rgba {
            rgb: self.rgb,
            alpha: if self.alpha.is_nan() {
                0.0
            } else {
                self.alpha.clamp(0.0, 1.0)
            },
        }
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
