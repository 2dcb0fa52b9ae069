//! Error types for the plexus core.

use thiserror::Error;

/// Errors produced while building a field, a palette, or writing output.
///
/// Per-frame simulation never fails; these only surface at construction
/// time or at the output boundary.
#[derive(Debug, Error)]
pub enum FieldError {
    /// Width or height was zero, negative, or not finite.
    #[error("invalid dimensions: width and height must be positive and finite")]
    InvalidDimensions,

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A palette could not be constructed from the given entries.
    #[error("invalid palette: {0}")]
    InvalidPalette(String),

    /// No built-in palette has the requested name.
    #[error("unknown palette: {0}")]
    UnknownPalette(String),

    /// Writing a snapshot or seed file failed.
    #[error("i/o error: {0}")]
    Io(String),
}
