//! Tunable constants of the field, read from a JSON params object.

use plexus_core::params::{param_bool, param_f64, param_usize};
use serde_json::{json, Value};

const DEFAULT_PARTICLE_COUNT: usize = 50;
const DEFAULT_SHAPE_COUNT: usize = 3;
/// Upper bound on particles. Links are found by a pairwise pass every frame.
pub const MAX_PARTICLE_COUNT: usize = 1_000;
pub const MAX_SHAPE_COUNT: usize = 100;
/// Pixel distance below which two particles are linked.
const DEFAULT_LINK_DISTANCE: f64 = 120.0;
/// Alpha of a link between coincident particles.
const DEFAULT_LINK_OPACITY: f64 = 0.3;
const DEFAULT_LINK_WIDTH: f64 = 1.5;
const DEFAULT_SHAPE_STROKE_WIDTH: f64 = 2.0;
const DEFAULT_CIRCLE_GLOW: f64 = 20.0;
const DEFAULT_DIAMOND_GLOW: f64 = 15.0;
const DEFAULT_CLAMP_OPACITY: bool = true;

/// Field constants. [`Default`] gives the stock 50-particle, 3-hexagon scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldConfig {
    pub particle_count: usize,
    pub shape_count: usize,
    pub link_distance: f64,
    pub link_opacity: f64,
    pub link_width: f64,
    pub shape_stroke_width: f64,
    pub circle_glow: f64,
    pub diamond_glow: f64,
    /// Clamp alpha handed to the surface into [0, 1]. The pulse formula dips
    /// to -0.1, which canvas backends clamp inconsistently.
    pub clamp_opacity: bool,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            particle_count: DEFAULT_PARTICLE_COUNT,
            shape_count: DEFAULT_SHAPE_COUNT,
            link_distance: DEFAULT_LINK_DISTANCE,
            link_opacity: DEFAULT_LINK_OPACITY,
            link_width: DEFAULT_LINK_WIDTH,
            shape_stroke_width: DEFAULT_SHAPE_STROKE_WIDTH,
            circle_glow: DEFAULT_CIRCLE_GLOW,
            diamond_glow: DEFAULT_DIAMOND_GLOW,
            clamp_opacity: DEFAULT_CLAMP_OPACITY,
        }
    }
}

impl FieldConfig {
    /// Extracts overrides from a JSON object, falling back to defaults.
    /// Entity counts above their maximum are clamped to it.
    pub fn from_json(params: &Value) -> Self {
        Self {
            particle_count: count_param(
                params,
                "particle_count",
                DEFAULT_PARTICLE_COUNT,
                MAX_PARTICLE_COUNT,
            ),
            shape_count: count_param(params, "shape_count", DEFAULT_SHAPE_COUNT, MAX_SHAPE_COUNT),
            link_distance: param_f64(params, "link_distance", DEFAULT_LINK_DISTANCE),
            link_opacity: param_f64(params, "link_opacity", DEFAULT_LINK_OPACITY),
            link_width: param_f64(params, "link_width", DEFAULT_LINK_WIDTH),
            shape_stroke_width: param_f64(
                params,
                "shape_stroke_width",
                DEFAULT_SHAPE_STROKE_WIDTH,
            ),
            circle_glow: param_f64(params, "circle_glow", DEFAULT_CIRCLE_GLOW),
            diamond_glow: param_f64(params, "diamond_glow", DEFAULT_DIAMOND_GLOW),
            clamp_opacity: param_bool(params, "clamp_opacity", DEFAULT_CLAMP_OPACITY),
        }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "particle_count": self.particle_count,
            "shape_count": self.shape_count,
            "link_distance": self.link_distance,
            "link_opacity": self.link_opacity,
            "link_width": self.link_width,
            "shape_stroke_width": self.shape_stroke_width,
            "circle_glow": self.circle_glow,
            "diamond_glow": self.diamond_glow,
            "clamp_opacity": self.clamp_opacity,
        })
    }

    pub fn schema() -> Value {
        json!({
            "particle_count": {
                "type": "integer",
                "default": DEFAULT_PARTICLE_COUNT,
                "min": 0,
                "max": MAX_PARTICLE_COUNT,
                "description": "Number of drifting particles"
            },
            "shape_count": {
                "type": "integer",
                "default": DEFAULT_SHAPE_COUNT,
                "min": 0,
                "max": MAX_SHAPE_COUNT,
                "description": "Number of background hexagons"
            },
            "link_distance": {
                "type": "number",
                "default": DEFAULT_LINK_DISTANCE,
                "min": 0.0,
                "description": "Pixel distance below which particles are linked"
            },
            "link_opacity": {
                "type": "number",
                "default": DEFAULT_LINK_OPACITY,
                "min": 0.0,
                "max": 1.0,
                "description": "Link alpha at zero distance, fading linearly to 0 at link_distance"
            },
            "link_width": {
                "type": "number",
                "default": DEFAULT_LINK_WIDTH,
                "min": 0.0,
                "description": "Link line width in pixels"
            },
            "shape_stroke_width": {
                "type": "number",
                "default": DEFAULT_SHAPE_STROKE_WIDTH,
                "min": 0.0,
                "description": "Hexagon outline width in pixels"
            },
            "circle_glow": {
                "type": "number",
                "default": DEFAULT_CIRCLE_GLOW,
                "min": 0.0,
                "description": "Glow blur radius of circle particles"
            },
            "diamond_glow": {
                "type": "number",
                "default": DEFAULT_DIAMOND_GLOW,
                "min": 0.0,
                "description": "Glow blur radius of diamond particles"
            },
            "clamp_opacity": {
                "type": "boolean",
                "default": DEFAULT_CLAMP_OPACITY,
                "description": "Clamp particle alpha into [0, 1] before drawing"
            }
        })
    }

    /// Alpha actually handed to the surface for a computed opacity.
    pub fn alpha(&self, opacity: f64) -> f64 {
        if self.clamp_opacity {
            opacity.clamp(0.0, 1.0)
        } else {
            opacity
        }
    }
}

fn count_param(params: &Value, name: &str, default: usize, max: usize) -> usize {
    let requested = param_usize(params, name, default);
    if requested > max {
        log::warn!("{name} {requested} exceeds {max}; using {max}");
    }
    requested.min(max)
}
