//! The star that crowns the tree
//!
//! It is the fastest system to react, spins forever about its vertical axis,
//! and doubles as the click target that switches the camera to the top view.

use std::f32::consts::TAU;
use rand::Rng;

use crate::animation::ProgressSmoother;
use crate::config::StarConfig;
use crate::formation::{TreeShape, sample_chaos_point};
use crate::math::{Euler, Vec3, lerp};
use super::{FrameTime, InstanceTransform};

/// Smoothed progress at which the tumble starts relaxing
const TUMBLE_CUTOFF: f32 = 0.9;
/// Decay rate (1/s) of the tumble once the star has settled
const TUMBLE_RELAX_RATE: f32 = 2.0;

/// Material parameters that follow the hover state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarLook {
    pub color: Vec3,
    pub emissive: Vec3,
    pub emissive_intensity: f32,
}

impl StarLook {
    pub fn for_hover(hovered: bool) -> Self {
        if hovered {
            Self {
                color: Vec3::from_hex(0xFFFFFF),
                emissive: Vec3::from_hex(0xFFFFEE),
                emissive_intensity: 1.5,
            }
        } else {
            Self {
                color: Vec3::from_hex(0xE0E0E0),
                emissive: Vec3::from_hex(0xFFFFFF),
                emissive_intensity: 0.8,
            }
        }
    }
}

pub struct StarSystem {
    chaos: Vec3,
    target: Vec3,
    smoother: ProgressSmoother,
    transform: InstanceTransform,
    hovered: bool,
    spin_speed: f32,
    chaos_scale: f32,
    formed_scale: f32,
    hover_scale: f32,
    pick_radius: f32,
}

impl StarSystem {
    pub fn generate<R: Rng + ?Sized>(config: &StarConfig, shape: &TreeShape, rng: &mut R) -> Self {
        let chaos = sample_chaos_point(rng, config.chaos_radius);
        let target = shape.apex() + Vec3::new(0.0, config.apex_offset, 0.0);

        Self {
            chaos,
            target,
            smoother: ProgressSmoother::new(config.half_life),
            transform: InstanceTransform {
                position: chaos,
                rotation: Euler::ZERO,
                scale: config.chaos_scale,
            },
            hovered: false,
            spin_speed: config.spin_speed,
            chaos_scale: config.chaos_scale,
            formed_scale: config.formed_scale,
            hover_scale: config.hover_scale,
            pick_radius: config.pick_radius,
        }
    }

    pub fn update(&mut self, target_progress: f32, frame: FrameTime) {
        let p = self.smoother.advance(target_progress, frame.dt);
        let t = frame.elapsed;
        let mut rotation = self.transform.rotation;

        // Spin is integrated, so it keeps its phase across progress changes
        rotation.y = (rotation.y + frame.dt * self.spin_speed).rem_euclid(TAU);

        if p < TUMBLE_CUTOFF {
            rotation.x = t.sin() * (1.0 - p);
            rotation.z = t.cos() * (1.0 - p);
        } else {
            let relax = (-frame.dt * TUMBLE_RELAX_RATE).exp();
            rotation.x *= relax;
            rotation.z *= relax;
        }

        let hover = if self.hovered { self.hover_scale } else { 1.0 };
        let position = self.chaos.lerp(&self.target, p);
        debug_assert!(position.is_finite(), "star position went non-finite");

        self.transform = InstanceTransform {
            position,
            rotation,
            scale: lerp(self.chaos_scale, self.formed_scale, p) * hover,
        };
    }

    pub fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn look(&self) -> StarLook {
        StarLook::for_hover(self.hovered)
    }

    pub fn progress(&self) -> f32 {
        self.smoother.value()
    }

    pub fn chaos_position(&self) -> Vec3 {
        self.chaos
    }

    pub fn target_position(&self) -> Vec3 {
        self.target
    }

    pub fn transform(&self) -> &InstanceTransform {
        &self.transform
    }

    /// Radius of the pick sphere at the current scale
    pub fn bounding_radius(&self) -> f32 {
        self.pick_radius * self.transform.scale
    }

    /// Instance matrix, 16 floats
    pub fn instance_matrix(&self) -> Vec<f32> {
        self.transform.matrix().as_slice().to_vec()
    }
}
