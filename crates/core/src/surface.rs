//! The 2D drawing surface an animation renders into.
//!
//! [`DrawingSurface`] is the subset of a canvas 2D context that the field
//! needs: clear, a save/restore transform stack limited to translation and
//! rotation, filled circles and polygons with an optional glow, stroked
//! polygons, and lines stroked with a two-stop linear gradient.
//!
//! [`Recorder`] is a surface that keeps the calls it receives, used to
//! assert what a frame drew without rasterizing it.

use glam::DVec2;

use crate::color::Rgba;
use crate::error::FieldError;

/// Pixel dimensions of a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Returns `FieldError::InvalidDimensions` unless both sides are finite
    /// and positive.
    pub fn new(width: f64, height: f64) -> Result<Self, FieldError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(width) || !valid(height) {
            return Err(FieldError::InvalidDimensions);
        }
        Ok(Self { width, height })
    }

    /// Whether `p` lies in `[0, width] × [0, height]`.
    pub fn contains(&self, p: DVec2) -> bool {
        (0.0..=self.width).contains(&p.x) && (0.0..=self.height).contains(&p.y)
    }
}

/// A blurred shadow painted under a filled shape, like a canvas `shadowBlur`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    pub blur: f64,
    pub color: Rgba,
}

/// Drawing operations used by an animation frame.
///
/// Coordinates passed to shape calls are in the current local frame, which
/// `translate` and `rotate` modify and `save`/`restore` bracket.
pub trait DrawingSurface {
    /// Current surface dimensions.
    fn size(&self) -> Size;

    /// Erases every pixel to transparent.
    fn clear(&mut self);

    /// Pushes the current transform.
    fn save(&mut self);

    /// Pops the transform pushed by the matching `save`. Unbalanced calls are
    /// ignored.
    fn restore(&mut self);

    fn translate(&mut self, offset: DVec2);

    /// Rotates the local frame by `angle` radians.
    fn rotate(&mut self, angle: f64);

    fn fill_circle(&mut self, center: DVec2, radius: f64, fill: Rgba, glow: Option<Glow>);

    /// Fills the closed polygon through `points`.
    fn fill_polygon(&mut self, points: &[DVec2], fill: Rgba, glow: Option<Glow>);

    /// Strokes the closed outline through `points`.
    fn stroke_polygon(&mut self, points: &[DVec2], stroke: Rgba, width: f64);

    /// Strokes a line whose color runs linearly from `start` at `from` to
    /// `end` at `to`.
    fn stroke_gradient_line(&mut self, from: DVec2, to: DVec2, start: Rgba, end: Rgba, width: f64);
}

/// One call received by a [`Recorder`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Save,
    Restore,
    Translate(DVec2),
    Rotate(f64),
    FillCircle {
        center: DVec2,
        radius: f64,
        fill: Rgba,
        glow: Option<Glow>,
    },
    FillPolygon {
        points: Vec<DVec2>,
        fill: Rgba,
        glow: Option<Glow>,
    },
    StrokePolygon {
        points: Vec<DVec2>,
        stroke: Rgba,
        width: f64,
    },
    GradientLine {
        from: DVec2,
        to: DVec2,
        start: Rgba,
        end: Rgba,
        width: f64,
    },
}

/// A surface that records draw calls instead of rasterizing them.
#[derive(Debug, Clone)]
pub struct Recorder {
    size: Size,
    commands: Vec<DrawCommand>,
}

impl Recorder {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            commands: Vec::new(),
        }
    }

    pub fn resize(&mut self, size: Size) {
        self.size = size;
    }

    /// All commands since construction or the last `take`.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drains the recorded commands.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of gradient lines recorded.
    pub fn line_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::GradientLine { .. }))
            .count()
    }
}

impl DrawingSurface for Recorder {
    fn size(&self) -> Size {
        self.size
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn save(&mut self) {
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.commands.push(DrawCommand::Restore);
    }

    fn translate(&mut self, offset: DVec2) {
        self.commands.push(DrawCommand::Translate(offset));
    }

    fn rotate(&mut self, angle: f64) {
        self.commands.push(DrawCommand::Rotate(angle));
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, fill: Rgba, glow: Option<Glow>) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            fill,
            glow,
        });
    }

    fn fill_polygon(&mut self, points: &[DVec2], fill: Rgba, glow: Option<Glow>) {
        self.commands.push(DrawCommand::FillPolygon {
            points: points.to_vec(),
            fill,
            glow,
        });
    }

    fn stroke_polygon(&mut self, points: &[DVec2], stroke: Rgba, width: f64) {
        self.commands.push(DrawCommand::StrokePolygon {
            points: points.to_vec(),
            stroke,
            width,
        });
    }

    fn stroke_gradient_line(&mut self, from: DVec2, to: DVec2, start: Rgba, end: Rgba, width: f64) {
        self.commands.push(DrawCommand::GradientLine {
            from,
            to,
            start,
            end,
            width,
        });
    }
}
