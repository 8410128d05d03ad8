//! Point generators for the two layouts.
//!
//! Both generators are pure: any randomness comes in through their arguments,
//! which keeps particle generation reproducible under a seeded RNG.

use std::f32::consts::TAU;
use rand::Rng;
use serde::{Deserialize, Serialize};
use crate::math::Vec3;

/// Dimensions of the formed tree: a cone centred on the origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeShape {
    pub height: f32,
    pub radius: f32,
}

impl Default for TreeShape {
    fn default() -> Self {
        Self {
            height: 14.0,
            radius: 5.5,
        }
    }
}

impl TreeShape {
    /// Tip of the cone
    pub fn apex(&self) -> Vec3 {
        Vec3::new(0.0, self.height / 2.0, 0.0)
    }

    /// Cone radius at a height ratio, before any per-particle jitter
    pub fn radius_at(&self, height_ratio: f32) -> f32 {
        (1.0 - height_ratio) * self.radius
    }
}

/// Point inside a solid sphere from three uniform variates in [0, 1).
///
/// `u` picks the azimuth, `v` the polar angle through its inverse CDF, and the
/// cube root of `w` the radius, so points fill the volume evenly instead of
/// bunching near the centre.
pub fn chaos_point(radius: f32, u: f32, v: f32, w: f32) -> Vec3 {
    let theta = TAU * u;
    let phi = (2.0 * v - 1.0).clamp(-1.0, 1.0).acos();
    let r = w.cbrt() * radius;
    let sin_phi = phi.sin();

    Vec3::new(
        r * sin_phi * theta.cos(),
        r * sin_phi * theta.sin(),
        r * phi.cos(),
    )
}

/// Draw a chaos position from `rng`
pub fn sample_chaos_point<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec3 {
    let u = rng.gen::<f32>();
    let v = rng.gen::<f32>();
    let w = rng.gen::<f32>();
    chaos_point(radius, u, v, w)
}

/// Point on the tree cone.
///
/// `height_ratio` 0 is the base ring (radius `R`), 1 the apex; the radius
/// tapers linearly in between and `radius_ratio` pushes the point in or out.
pub fn cone_point(shape: &TreeShape, height_ratio: f32, angle: f32, radius_ratio: f32) -> Vec3 {
    let y = height_ratio * shape.height - shape.height / 2.0;
    let r = shape.radius_at(height_ratio) * radius_ratio;

    Vec3::new(r * angle.cos(), y, r * angle.sin())
}
