//! Scene configuration
//!
//! Every constant that shapes the animation lives here. A YAML document may
//! override any subset of it; missing keys keep their defaults. Validation
//! runs once before any particle is generated, so the frame loop never has to
//! second-guess its inputs.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::formation::TreeShape;
use crate::math::Vec3;

/// Rejected configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{system} needs at least one particle")]
    EmptySystem { system: &'static str },

    #[error("{field} must be positive and finite, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    #[error("{field} must be a finite range with min <= max, got [{min}, {max}]")]
    InvalidSpan { field: &'static str, min: f32, max: f32 },

    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f32 },

    #[error("camera.top_down_position must not sit straight above or below camera.top_down_target")]
    VerticalTopDown,

    #[error("{field} must lie in [0, 1], got {value}")]
    OutOfUnitRange { field: &'static str, value: f32 },

    #[error("{faster} (half-life {faster_value}s) must not lag behind {slower} ({slower_value}s)")]
    SmoothingOrder {
        faster: &'static str,
        faster_value: f32,
        slower: &'static str,
        slower_value: f32,
    },

    #[error("ornament speed offsets below 0.5 never reach the formed tree, got {0}")]
    UnreachableFormation(f32),
}

/// Closed interval sampled uniformly
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        self.min + (self.max - self.min) * rng.gen::<f32>()
    }

    fn check(&self, field: &'static str) -> Result<(), ConfigError> {
        if self.min.is_finite() && self.max.is_finite() && self.min <= self.max {
            Ok(())
        } else {
            Err(ConfigError::InvalidSpan { field, min: self.min, max: self.max })
        }
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { field, value })
    }
}

fn finite_vec3(field: &'static str, value: Vec3) -> Result<(), ConfigError> {
    [value.x, value.y, value.z]
        .into_iter()
        .try_for_each(|component| finite(field, component))
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn unit(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfUnitRange { field, value })
    }
}

fn not_slower(
    faster: &'static str,
    faster_value: f32,
    slower: &'static str,
    slower_value: f32,
    strict: bool,
) -> Result<(), ConfigError> {
    let ok = if strict {
        faster_value < slower_value
    } else {
        faster_value <= slower_value
    };
    if ok {
        Ok(())
    } else {
        Err(ConfigError::SmoothingOrder { faster, faster_value, slower, slower_value })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoliageConfig {
    pub count: usize,
    pub chaos_radius: f32,
    pub half_life: f32,
    /// Full turns of the spiral that threads the points up the cone
    pub spiral_turns: f32,
    pub radius_jitter: Span,
    pub wind_amplitude: f32,
    /// Random scalar above which a point becomes a gold tip
    pub gold_threshold: f32,
}

impl Default for FoliageConfig {
    fn default() -> Self {
        Self {
            count: 15_000,
            chaos_radius: 25.0,
            half_life: 0.5,
            spiral_turns: 30.0,
            radius_jitter: Span::new(0.7, 1.3),
            wind_amplitude: 0.15,
            gold_threshold: 0.92,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrnamentConfig {
    pub count: usize,
    pub chaos_radius: f32,
    pub half_life: f32,
    pub radius_ratio: Span,
    pub speed_offset: Span,
    pub float_amplitude: f32,
    pub chaos_scale: f32,
    pub formed_scale: f32,
}

impl Default for OrnamentConfig {
    fn default() -> Self {
        Self {
            count: 400,
            chaos_radius: 25.0,
            half_life: 0.8,
            radius_ratio: Span::new(0.85, 0.95),
            speed_offset: Span::new(0.5, 1.0),
            float_amplitude: 0.5,
            chaos_scale: 0.6,
            formed_scale: 0.25,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoConfig {
    pub count: usize,
    pub chaos_radius: f32,
    pub half_life: f32,
    pub height_ratio: Span,
    pub radius_ratio: f32,
    /// Raw progress above which cards turn to face outward
    pub display_threshold: f32,
    pub chaos_scale: f32,
    pub formed_scale: f32,
    pub tilt: f32,
    pub sway: f32,
}

impl Default for PhotoConfig {
    fn default() -> Self {
        Self {
            count: 24,
            chaos_radius: 22.0,
            half_life: 1.2,
            height_ratio: Span::new(0.15, 0.75),
            radius_ratio: 1.25,
            display_threshold: 0.8,
            chaos_scale: 2.0,
            formed_scale: 1.4,
            tilt: -0.1,
            sway: 0.05,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarConfig {
    pub chaos_radius: f32,
    pub half_life: f32,
    /// Gap between the cone apex and the star centre
    pub apex_offset: f32,
    pub spin_speed: f32,
    pub chaos_scale: f32,
    pub formed_scale: f32,
    pub hover_scale: f32,
    /// Bounding radius of the star mesh at scale 1, used for picking
    pub pick_radius: f32,
}

impl Default for StarConfig {
    fn default() -> Self {
        Self {
            chaos_radius: 15.0,
            half_life: 0.3,
            apex_offset: 0.2,
            spin_speed: 1.5,
            chaos_scale: 0.1,
            formed_scale: 1.2,
            hover_scale: 1.4,
            pick_radius: 0.9,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub half_life: f32,
    pub fov_degrees: f32,
    pub base_distance: f32,
    /// Distance used on narrow or portrait viewports
    pub compact_distance: f32,
    /// Viewports narrower than this many pixels count as compact
    pub compact_width: f32,
    pub height: f32,
    pub look_at_height: f32,
    pub shake: f32,
    pub pull_back: f32,
    pub look_sway: f32,
    pub top_down_position: Vec3,
    pub top_down_target: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            half_life: 0.3,
            fov_degrees: 40.0,
            base_distance: 26.0,
            compact_distance: 35.0,
            compact_width: 768.0,
            height: 2.0,
            look_at_height: 1.0,
            shake: 0.3,
            pull_back: 8.0,
            look_sway: 2.0,
            top_down_position: Vec3::new(0.0, 16.0, 0.1),
            top_down_target: Vec3::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinConfig {
    /// Pointer positions within this distance of the centre do not steer
    pub dead_zone: f32,
    pub speed: f32,
    pub idle_speed: f32,
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self {
            dead_zone: 0.1,
            speed: 2.0,
            idle_speed: 0.05,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub initial_progress: f32,
    pub wheel_sensitivity: f32,
    pub touch_sensitivity: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            initial_progress: 1.0,
            wheel_sensitivity: 0.0015,
            touch_sensitivity: 0.005,
        }
    }
}

/// Complete scene description
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Fixed seed for reproducible layouts; `None` draws from OS entropy
    pub seed: Option<u64>,
    pub tree: TreeShape,
    pub foliage: FoliageConfig,
    pub ornaments: OrnamentConfig,
    pub photos: PhotoConfig,
    pub star: StarConfig,
    pub camera: CameraConfig,
    pub spin: SpinConfig,
    pub input: InputConfig,
}

impl SceneConfig {
    /// Parse from YAML and validate
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("tree.height", self.tree.height)?;
        positive("tree.radius", self.tree.radius)?;

        if self.foliage.count == 0 {
            return Err(ConfigError::EmptySystem { system: "foliage" });
        }
        if self.ornaments.count == 0 {
            return Err(ConfigError::EmptySystem { system: "ornaments" });
        }
        if self.photos.count == 0 {
            return Err(ConfigError::EmptySystem { system: "photos" });
        }

        let f = &self.foliage;
        positive("foliage.chaos_radius", f.chaos_radius)?;
        positive("foliage.half_life", f.half_life)?;
        non_negative("foliage.spiral_turns", f.spiral_turns)?;
        f.radius_jitter.check("foliage.radius_jitter")?;
        non_negative("foliage.wind_amplitude", f.wind_amplitude)?;
        unit("foliage.gold_threshold", f.gold_threshold)?;

        let o = &self.ornaments;
        positive("ornaments.chaos_radius", o.chaos_radius)?;
        positive("ornaments.half_life", o.half_life)?;
        o.radius_ratio.check("ornaments.radius_ratio")?;
        o.speed_offset.check("ornaments.speed_offset")?;
        if o.speed_offset.min < 0.5 {
            return Err(ConfigError::UnreachableFormation(o.speed_offset.min));
        }
        non_negative("ornaments.float_amplitude", o.float_amplitude)?;
        positive("ornaments.chaos_scale", o.chaos_scale)?;
        positive("ornaments.formed_scale", o.formed_scale)?;

        let p = &self.photos;
        positive("photos.chaos_radius", p.chaos_radius)?;
        positive("photos.half_life", p.half_life)?;
        p.height_ratio.check("photos.height_ratio")?;
        unit("photos.height_ratio.min", p.height_ratio.min)?;
        unit("photos.height_ratio.max", p.height_ratio.max)?;
        positive("photos.radius_ratio", p.radius_ratio)?;
        unit("photos.display_threshold", p.display_threshold)?;
        positive("photos.chaos_scale", p.chaos_scale)?;
        positive("photos.formed_scale", p.formed_scale)?;
        finite("photos.tilt", p.tilt)?;
        finite("photos.sway", p.sway)?;

        let s = &self.star;
        positive("star.chaos_radius", s.chaos_radius)?;
        positive("star.half_life", s.half_life)?;
        finite("star.apex_offset", s.apex_offset)?;
        finite("star.spin_speed", s.spin_speed)?;
        positive("star.chaos_scale", s.chaos_scale)?;
        positive("star.formed_scale", s.formed_scale)?;
        positive("star.hover_scale", s.hover_scale)?;
        positive("star.pick_radius", s.pick_radius)?;

        let c = &self.camera;
        positive("camera.half_life", c.half_life)?;
        positive("camera.fov_degrees", c.fov_degrees)?;
        positive("camera.base_distance", c.base_distance)?;
        positive("camera.compact_distance", c.compact_distance)?;
        non_negative("camera.compact_width", c.compact_width)?;
        finite("camera.height", c.height)?;
        finite("camera.look_at_height", c.look_at_height)?;
        finite("camera.shake", c.shake)?;
        finite("camera.pull_back", c.pull_back)?;
        finite("camera.look_sway", c.look_sway)?;
        finite_vec3("camera.top_down_position", c.top_down_position)?;
        finite_vec3("camera.top_down_target", c.top_down_target)?;
        // look_at needs a horizontal component to build its right vector
        let offset = c.top_down_position - c.top_down_target;
        let horizontal = (offset.x * offset.x + offset.z * offset.z).sqrt();
        if horizontal <= offset.length() * 1e-4 {
            return Err(ConfigError::VerticalTopDown);
        }

        non_negative("spin.speed", self.spin.speed)?;
        non_negative("spin.dead_zone", self.spin.dead_zone)?;
        finite("spin.idle_speed", self.spin.idle_speed)?;

        unit("input.initial_progress", self.input.initial_progress)?;
        positive("input.wheel_sensitivity", self.input.wheel_sensitivity)?;
        positive("input.touch_sensitivity", self.input.touch_sensitivity)?;

        // Camera and star lead, photos trail: the staggered arrival is the effect
        not_slower("camera.half_life", c.half_life, "foliage.half_life", f.half_life, false)?;
        not_slower("star.half_life", s.half_life, "foliage.half_life", f.half_life, false)?;
        not_slower("foliage.half_life", f.half_life, "ornaments.half_life", o.half_life, true)?;
        not_slower("ornaments.half_life", o.half_life, "photos.half_life", p.half_life, true)?;

        Ok(())
    }
}
