//! Instanced ornament baubles
//!
//! Each ornament runs ahead of or behind the shared progress by its own speed
//! offset, so the swarm settles onto the tree in a ripple rather than at once.

use std::f32::consts::{PI, TAU};
use rand::Rng;

use crate::animation::{Easing, ProgressSmoother, ease};
use crate::config::OrnamentConfig;
use crate::formation::{TreeShape, cone_point, sample_chaos_point};
use crate::math::{Euler, Vec3, lerp};
use super::palette::ornament_palette;
use super::{FrameTime, InstanceTransform, matrix_data};

/// Smoothed progress above which the chaos float switches off
const FLOAT_CUTOFF: f32 = 0.9;
/// Spin rate (rad/s) of an ornament that has not settled yet
const LOOSE_SPIN: f32 = 0.5;

/// A single ornament
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ornament {
    pub chaos: Vec3,
    pub target: Vec3,
    pub color: Vec3,
    pub speed_offset: f32,
    pub phase_offset: f32,
}

/// Per-ornament progress before easing: the shared smoothed progress
/// stretched by `0.5 + speed_offset`, clamped to [0, 1]
pub fn ornament_progress(global: f32, speed_offset: f32) -> f32 {
    (global * (0.5 + speed_offset)).clamp(0.0, 1.0)
}

/// System managing every ornament
pub struct OrnamentSystem {
    ornaments: Vec<Ornament>,
    transforms: Vec<InstanceTransform>,
    smoother: ProgressSmoother,
    float_amplitude: f32,
    chaos_scale: f32,
    formed_scale: f32,
}

impl OrnamentSystem {
    pub fn generate<R: Rng + ?Sized>(config: &OrnamentConfig, shape: &TreeShape, rng: &mut R) -> Self {
        let palette = ornament_palette();
        let mut ornaments = Vec::with_capacity(config.count);

        for _ in 0..config.count {
            let height_ratio = rng.gen::<f32>();
            let angle = rng.gen::<f32>() * TAU;
            // Kept inside the foliage shell so baubles nest among the needles
            let radius_ratio = config.radius_ratio.sample(rng);

            ornaments.push(Ornament {
                target: cone_point(shape, height_ratio, angle, radius_ratio),
                chaos: sample_chaos_point(rng, config.chaos_radius),
                color: palette[rng.gen_range(0..palette.len())],
                speed_offset: config.speed_offset.sample(rng),
                phase_offset: rng.gen::<f32>() * TAU,
            });
        }

        let transforms = ornaments
            .iter()
            .map(|o| InstanceTransform {
                position: o.chaos,
                rotation: Euler::ZERO,
                scale: config.chaos_scale,
            })
            .collect();

        Self {
            ornaments,
            transforms,
            smoother: ProgressSmoother::new(config.half_life),
            float_amplitude: config.float_amplitude,
            chaos_scale: config.chaos_scale,
            formed_scale: config.formed_scale,
        }
    }

    pub fn update(&mut self, target_progress: f32, frame: FrameTime) {
        let global = self.smoother.advance(target_progress, frame.dt);
        let t = frame.elapsed;

        for (o, out) in self.ornaments.iter().zip(self.transforms.iter_mut()) {
            let eased = ease(ornament_progress(global, o.speed_offset), Easing::EaseInOutCubic);
            let loose = 1.0 - eased;

            let mut position = o.chaos.lerp(&o.target, eased);
            if global < FLOAT_CUTOFF {
                position.y += (t + o.phase_offset).sin() * loose * self.float_amplitude;
            }
            debug_assert!(position.is_finite(), "ornament position went non-finite");

            *out = InstanceTransform {
                position,
                rotation: Euler::new(eased * TAU + t * LOOSE_SPIN * loose, eased * PI, 0.0),
                scale: lerp(self.chaos_scale, self.formed_scale, eased),
            };
        }
    }

    pub fn progress(&self) -> f32 {
        self.smoother.value()
    }

    pub fn ornaments(&self) -> &[Ornament] {
        &self.ornaments
    }

    pub fn transforms(&self) -> &[InstanceTransform] {
        &self.transforms
    }

    /// Instance matrices, 16 floats per ornament
    pub fn instance_matrices(&self) -> Vec<f32> {
        matrix_data(&self.transforms)
    }

    /// Instance colours, 3 floats per ornament; fixed for the session
    pub fn instance_colors(&self) -> Vec<f32> {
        self.ornaments.iter().flat_map(|o| o.color.to_array()).collect()
    }

    pub fn count(&self) -> usize {
        self.ornaments.len()
    }
}
