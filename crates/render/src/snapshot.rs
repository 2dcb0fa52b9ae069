//! PNG output of a [`Raster`].
//!
//! Feature-gated behind `png` (default on) so the rasterizer can be used
//! without pulling in the `image` crate.

use plexus_core::{FieldError, Rgb};
use std::path::Path;

use crate::raster::Raster;

/// Writes the raster as a PNG.
///
/// With a `background` the image is opaque; without, it keeps the raster's
/// transparency. Returns `FieldError::InvalidDimensions` if a dimension
/// overflows `u32`, or `FieldError::Io` on write failure.
pub fn write_png(raster: &Raster, background: Option<Rgb>, path: &Path) -> Result<(), FieldError> {
    let w = u32::try_from(raster.width()).map_err(|_| FieldError::InvalidDimensions)?;
    let h = u32::try_from(raster.height()).map_err(|_| FieldError::InvalidDimensions)?;
    let img = image::RgbaImage::from_raw(w, h, raster.to_rgba8(background))
        .ok_or_else(|| FieldError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| FieldError::Io(e.to_string()))
}
