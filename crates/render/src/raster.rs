//! CPU rasterizer implementing [`DrawingSurface`].
//!
//! Pixels are premultiplied RGBA `f32`, composited source-over. Shapes are
//! anti-aliased by a one-pixel coverage ramp around their edge; glows are a
//! quadratic falloff over the blur radius rather than a true Gaussian.
//! Transforms are rigid (translate and rotate only), so circles stay circles.

use glam::{DAffine2, DVec2};
use plexus_core::{DrawingSurface, FieldError, Glow, Rgb, Rgba, Size};

/// Peak alpha multiplier of a glow halo right at the shape edge.
const GLOW_STRENGTH: f64 = 0.5;

#[derive(Debug, Clone)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<[f32; 4]>,
    transform: DAffine2,
    stack: Vec<DAffine2>,
}

/// Half-open pixel rectangle `[x0, x1) × [y0, y1)`.
struct PixelRect {
    x0: usize,
    x1: usize,
    y0: usize,
    y1: usize,
}

impl Raster {
    /// Creates a transparent raster. Rejects zero or overflowing dimensions.
    pub fn new(width: usize, height: usize) -> Result<Self, FieldError> {
        let len = checked_area(width, height)?;
        Ok(Self {
            width,
            height,
            pixels: vec![[0.0; 4]; len],
            transform: DAffine2::IDENTITY,
            stack: Vec::new(),
        })
    }

    /// Reallocates to the new size. Contents are cleared, like assigning a
    /// canvas element's width.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<(), FieldError> {
        let len = checked_area(width, height)?;
        self.width = width;
        self.height = height;
        self.pixels = vec![[0.0; 4]; len];
        self.transform = DAffine2::IDENTITY;
        self.stack.clear();
        Ok(())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Premultiplied RGBA at `(x, y)`. Panics when out of bounds.
    pub fn pixel(&self, x: usize, y: usize) -> [f32; 4] {
        self.pixels[y * self.width + x]
    }

    /// Converts to RGBA8. With a background the result is opaque; without,
    /// colors are unpremultiplied and alpha is kept.
    pub fn to_rgba8(&self, background: Option<Rgb>) -> Vec<u8> {
        let to_byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        match background {
            Some(bg) => {
                let bg = bg.to_unit().map(|c| c as f32);
                self.pixels
                    .iter()
                    .flat_map(|px| {
                        let rest = 1.0 - px[3];
                        [
                            to_byte(px[0] + bg[0] * rest),
                            to_byte(px[1] + bg[1] * rest),
                            to_byte(px[2] + bg[2] * rest),
                            255,
                        ]
                    })
                    .collect()
            }
            None => self
                .pixels
                .iter()
                .flat_map(|px| {
                    if px[3] <= 0.0 {
                        [0, 0, 0, 0]
                    } else {
                        [
                            to_byte(px[0] / px[3]),
                            to_byte(px[1] / px[3]),
                            to_byte(px[2] / px[3]),
                            to_byte(px[3]),
                        ]
                    }
                })
                .collect(),
        }
    }

    /// Source-over blend of `rgb` at straight `alpha` into one pixel.
    fn blend(&mut self, x: usize, y: usize, rgb: [f64; 3], alpha: f64) {
        if alpha.is_nan() || alpha <= 0.0 {
            return;
        }
        let a = alpha.min(1.0) as f32;
        let px = &mut self.pixels[y * self.width + x];
        for i in 0..3 {
            px[i] = rgb[i] as f32 * a + px[i] * (1.0 - a);
        }
        px[3] = a + px[3] * (1.0 - a);
    }

    /// Pixels whose centers may fall inside `[min, max]`, clipped to the raster.
    fn pixel_rect(&self, min: DVec2, max: DVec2) -> Option<PixelRect> {
        if !(min.is_finite() && max.is_finite()) {
            return None;
        }
        let x0 = min.x.floor().max(0.0) as usize;
        let y0 = min.y.floor().max(0.0) as usize;
        let x1 = (max.x.ceil().max(0.0) as usize).min(self.width);
        let y1 = (max.y.ceil().max(0.0) as usize).min(self.height);
        (x0 < x1 && y0 < y1).then_some(PixelRect { x0, x1, y0, y1 })
    }

    /// Visits every pixel center in `rect`, blending what `shade` returns.
    fn shade_rect<F>(&mut self, rect: PixelRect, mut shade: F)
    where
        F: FnMut(DVec2) -> Option<([f64; 3], f64)>,
    {
        for y in rect.y0..rect.y1 {
            for x in rect.x0..rect.x1 {
                let center = DVec2::new(x as f64 + 0.5, y as f64 + 0.5);
                if let Some((rgb, alpha)) = shade(center) {
                    self.blend(x, y, rgb, alpha);
                }
            }
        }
    }

    fn to_device(&self, points: &[DVec2]) -> Vec<DVec2> {
        points
            .iter()
            .map(|&p| self.transform.transform_point2(p))
            .collect()
    }
}

impl DrawingSurface for Raster {
    fn size(&self) -> Size {
        Size {
            width: self.width as f64,
            height: self.height as f64,
        }
    }

    fn clear(&mut self) {
        self.pixels.fill([0.0; 4]);
    }

    fn save(&mut self) {
        self.stack.push(self.transform);
    }

    fn restore(&mut self) {
        if let Some(t) = self.stack.pop() {
            self.transform = t;
        }
    }

    fn translate(&mut self, offset: DVec2) {
        self.transform = self.transform * DAffine2::from_translation(offset);
    }

    fn rotate(&mut self, angle: f64) {
        self.transform = self.transform * DAffine2::from_angle(angle);
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, fill: Rgba, glow: Option<Glow>) {
        if radius.is_nan() || radius <= 0.0 {
            return;
        }
        let c = self.transform.transform_point2(center);

        if let Some(glow) = glow.filter(|g| g.blur > 0.0) {
            let color = glow.color.clamped();
            let reach = DVec2::splat(radius + glow.blur);
            if let Some(rect) = self.pixel_rect(c - reach, c + reach) {
                let rgb = color.rgb.to_unit();
                self.shade_rect(rect, |p| {
                    let outside = (p.distance(c) - radius).max(0.0);
                    Some((rgb, color.alpha * glow_falloff(outside, glow.blur)))
                });
            }
        }

        let fill = fill.clamped();
        let rgb = fill.rgb.to_unit();
        let reach = DVec2::splat(radius + 1.0);
        if let Some(rect) = self.pixel_rect(c - reach, c + reach) {
            self.shade_rect(rect, |p| {
                let coverage = (radius + 0.5 - p.distance(c)).clamp(0.0, 1.0);
                Some((rgb, fill.alpha * coverage))
            });
        }
    }

    fn fill_polygon(&mut self, points: &[DVec2], fill: Rgba, glow: Option<Glow>) {
        if points.len() < 3 {
            return;
        }
        let pts = self.to_device(points);
        let (min, max) = bounds(&pts);

        if let Some(glow) = glow.filter(|g| g.blur > 0.0) {
            let color = glow.color.clamped();
            let reach = DVec2::splat(glow.blur);
            if let Some(rect) = self.pixel_rect(min - reach, max + reach) {
                let rgb = color.rgb.to_unit();
                self.shade_rect(rect, |p| {
                    let outside = if contains(&pts, p) {
                        0.0
                    } else {
                        outline_distance(&pts, p)
                    };
                    Some((rgb, color.alpha * glow_falloff(outside, glow.blur)))
                });
            }
        }

        let fill = fill.clamped();
        let rgb = fill.rgb.to_unit();
        if let Some(rect) = self.pixel_rect(min - DVec2::ONE, max + DVec2::ONE) {
            self.shade_rect(rect, |p| {
                let d = outline_distance(&pts, p);
                let coverage = if contains(&pts, p) {
                    (0.5 + d).min(1.0)
                } else {
                    (0.5 - d).max(0.0)
                };
                Some((rgb, fill.alpha * coverage))
            });
        }
    }

    fn stroke_polygon(&mut self, points: &[DVec2], stroke: Rgba, width: f64) {
        if points.len() < 2 || width.is_nan() || width <= 0.0 {
            return;
        }
        let pts = self.to_device(points);
        let (min, max) = bounds(&pts);
        let half = width / 2.0;
        let stroke = stroke.clamped();
        let rgb = stroke.rgb.to_unit();
        let reach = DVec2::splat(half + 1.0);
        if let Some(rect) = self.pixel_rect(min - reach, max + reach) {
            self.shade_rect(rect, |p| {
                let coverage = (half + 0.5 - outline_distance(&pts, p)).clamp(0.0, 1.0);
                Some((rgb, stroke.alpha * coverage))
            });
        }
    }

    fn stroke_gradient_line(&mut self, from: DVec2, to: DVec2, start: Rgba, end: Rgba, width: f64) {
        if width.is_nan() || width <= 0.0 {
            return;
        }
        let a = self.transform.transform_point2(from);
        let b = self.transform.transform_point2(to);
        let half = width / 2.0;
        let (start, end) = (start.clamped(), end.clamped());
        let (c0, c1) = (start.rgb.to_unit(), end.rgb.to_unit());
        let reach = DVec2::splat(half + 1.0);
        if let Some(rect) = self.pixel_rect(a.min(b) - reach, a.max(b) + reach) {
            self.shade_rect(rect, |p| {
                let (d, t) = segment_distance(p, a, b);
                let coverage = (half + 0.5 - d).clamp(0.0, 1.0);
                if coverage <= 0.0 {
                    return None;
                }
                let rgb = std::array::from_fn(|i| c0[i] + (c1[i] - c0[i]) * t);
                let alpha = start.alpha + (end.alpha - start.alpha) * t;
                Some((rgb, alpha * coverage))
            });
        }
    }
}

fn checked_area(width: usize, height: usize) -> Result<usize, FieldError> {
    if width == 0 || height == 0 {
        return Err(FieldError::InvalidDimensions);
    }
    width
        .checked_mul(height)
        .ok_or(FieldError::InvalidDimensions)
}

/// Halo strength `outside` pixels past a shape edge.
fn glow_falloff(outside: f64, blur: f64) -> f64 {
    let k = (1.0 - outside / blur).clamp(0.0, 1.0);
    GLOW_STRENGTH * k * k
}

fn bounds(points: &[DVec2]) -> (DVec2, DVec2) {
    points.iter().fold(
        (DVec2::splat(f64::INFINITY), DVec2::splat(f64::NEG_INFINITY)),
        |(lo, hi), &p| (lo.min(p), hi.max(p)),
    )
}

/// Distance from `p` to segment `ab` and the clamped projection parameter.
fn segment_distance(p: DVec2, a: DVec2, b: DVec2) -> (f64, f64) {
    let ab = b - a;
    let len2 = ab.length_squared();
    let t = if len2 > 0.0 {
        ((p - a).dot(ab) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    (p.distance(a + ab * t), t)
}

/// Distance from `p` to the closed outline through `points`.
fn outline_distance(points: &[DVec2], p: DVec2) -> f64 {
    let n = points.len();
    (0..n)
        .map(|i| segment_distance(p, points[i], points[(i + 1) % n]).0)
        .fold(f64::INFINITY, f64::min)
}

/// Even-odd point-in-polygon test.
fn contains(points: &[DVec2], p: DVec2) -> bool {
    let n = points.len();
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (pi, pj) = (points[i], points[j]);
        if (pi.y > p.y) != (pj.y > p.y) && p.x < (pj.x - pi.x) * (p.y - pi.y) / (pj.y - pi.y) + pi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}
