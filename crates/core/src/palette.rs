//! The fixed set of colors a field draws with.
//!
//! Each [`Swatch`] carries the [`Glyph`] its particles render as, so the
//! shape of a particle follows from the color it was assigned at creation.
//! Palettes are immutable values handed to the field at construction.

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::error::FieldError;

/// How a particle of a given swatch is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Glyph {
    /// Filled circle with a soft glow.
    Circle,
    /// Filled square rotated 45°.
    Diamond,
}

/// A named palette color and its particle glyph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Swatch {
    pub name: String,
    pub color: Rgb,
    pub glyph: Glyph,
}

impl Swatch {
    pub fn new(name: impl Into<String>, color: Rgb, glyph: Glyph) -> Self {
        Self {
            name: name.into(),
            color,
            glyph,
        }
    }
}

/// An ordered, non-empty list of swatches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPalette")]
pub struct Palette {
    swatches: Vec<Swatch>,
}

/// Serialized form of [`Palette`], checked by [`Palette::new`] on the way in.
#[derive(Deserialize)]
struct RawPalette {
    swatches: Vec<Swatch>,
}

impl TryFrom<RawPalette> for Palette {
    type Error = FieldError;

    fn try_from(raw: RawPalette) -> Result<Self, Self::Error> {
        Self::new(raw.swatches)
    }
}

/// Names accepted by [`Palette::from_name`].
const PALETTE_NAMES: &[&str] = &["contact", "ember", "glacier"];

impl Palette {
    /// Creates a palette from swatches. Requires at least one swatch.
    pub fn new(swatches: Vec<Swatch>) -> Result<Self, FieldError> {
        if swatches.is_empty() {
            return Err(FieldError::InvalidPalette(
                "palette requires at least 1 swatch".to_string(),
            ));
        }
        Ok(Self { swatches })
    }

    /// Builds a palette from `(name, hex, glyph)` triples.
    pub fn from_hex(entries: &[(&str, &str, Glyph)]) -> Result<Self, FieldError> {
        let swatches = entries
            .iter()
            .map(|&(name, hex, glyph)| Ok(Swatch::new(name, Rgb::from_hex(hex)?, glyph)))
            .collect::<Result<Vec<_>, FieldError>>()?;
        Self::new(swatches)
    }

    /// Number of swatches.
    pub fn len(&self) -> usize {
        self.swatches.len()
    }

    /// Always false for a constructed palette.
    pub fn is_empty(&self) -> bool {
        self.swatches.is_empty()
    }

    /// Swatch at `index`, wrapping around the palette length.
    pub fn swatch(&self, index: usize) -> &Swatch {
        &self.swatches[index % self.swatches.len()]
    }

    pub fn swatches(&self) -> &[Swatch] {
        &self.swatches
    }

    /// Looks up a built-in palette by name.
    pub fn from_name(name: &str) -> Result<Self, FieldError> {
        match name {
            "contact" => Ok(Self::contact()),
            "ember" => Ok(Self::ember()),
            "glacier" => Ok(Self::glacier()),
            other => Err(FieldError::UnknownPalette(other.to_string())),
        }
    }

    /// Names of all built-in palettes.
    pub fn list_names() -> &'static [&'static str] {
        PALETTE_NAMES
    }

    // -- Built-in palettes --

    /// Neon blue, purple, cyan, pink. Blue and cyan draw as circles.
    pub fn contact() -> Self {
        Self {
            swatches: vec![
                Swatch::new("blue", Rgb::new(59, 130, 246), Glyph::Circle),
                Swatch::new("purple", Rgb::new(168, 85, 247), Glyph::Diamond),
                Swatch::new("cyan", Rgb::new(34, 211, 238), Glyph::Circle),
                Swatch::new("pink", Rgb::new(236, 72, 153), Glyph::Diamond),
            ],
        }
    }

    /// Warm oranges and reds.
    pub fn ember() -> Self {
        Self {
            swatches: vec![
                Swatch::new("amber", Rgb::new(245, 158, 11), Glyph::Circle),
                Swatch::new("red", Rgb::new(239, 68, 68), Glyph::Diamond),
                Swatch::new("gold", Rgb::new(250, 204, 21), Glyph::Circle),
                Swatch::new("rose", Rgb::new(244, 63, 94), Glyph::Diamond),
            ],
        }
    }

    /// Pale blues and teals.
    pub fn glacier() -> Self {
        Self {
            swatches: vec![
                Swatch::new("sky", Rgb::new(125, 211, 252), Glyph::Circle),
                Swatch::new("teal", Rgb::new(45, 212, 191), Glyph::Diamond),
                Swatch::new("ice", Rgb::new(224, 242, 254), Glyph::Circle),
                Swatch::new("indigo", Rgb::new(129, 140, 248), Glyph::Diamond),
            ],
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::contact()
    }
}
