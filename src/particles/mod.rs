//! The four particle systems that gather into the tree.
//!
//! Each system generates its particles once, owns its own progress smoother
//! and recomputes every rendered transform from scratch each frame. Chaos and
//! target positions are never touched after generation.

mod foliage;
mod ornaments;
mod photos;
mod star;
pub mod palette;

pub use foliage::{FoliagePoint, FoliageSystem, POINT_STRIDE, foliage_color};
pub use ornaments::{Ornament, OrnamentSystem, ornament_progress};
pub use photos::{PhotoCard, PhotoPose, PhotoSystem, outward_yaw};
pub use star::{StarLook, StarSystem};

use crate::math::{Euler, Mat4, Vec3};

/// Host clock for one frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTime {
    /// Seconds since the animation started
    pub elapsed: f32,
    /// Seconds since the previous frame
    pub dt: f32,
}

impl FrameTime {
    pub fn new(elapsed: f32, dt: f32) -> Self {
        Self { elapsed, dt }
    }
}

/// Rendered pose of one instanced mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstanceTransform {
    pub position: Vec3,
    pub rotation: Euler,
    pub scale: f32,
}

impl Default for InstanceTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Euler::ZERO,
            scale: 1.0,
        }
    }
}

impl InstanceTransform {
    pub fn matrix(&self) -> Mat4 {
        Mat4::compose(self.position, self.rotation, self.scale)
    }
}

/// Flatten transforms into consecutive column-major 4x4 matrices
pub(crate) fn matrix_data(transforms: &[InstanceTransform]) -> Vec<f32> {
    let mut data = Vec::with_capacity(transforms.len() * 16);
    for t in transforms {
        data.extend_from_slice(t.matrix().as_slice());
    }
    data
}
