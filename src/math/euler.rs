use super::Mat4;

/// Rotation as three angles in radians, applied intrinsically yaw first:
/// `R = Ry(y) * Rx(x) * Rz(z)`.
///
/// Yaw-first lets a card face a direction, then tilt about its own X axis,
/// then sway about its own Z axis without the three fighting each other.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Euler {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Euler {
    pub const ZERO: Euler = Euler { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn to_mat4(&self) -> Mat4 {
        Mat4::rotation_y(self.y)
            .mul(&Mat4::rotation_x(self.x))
            .mul(&Mat4::rotation_z(self.z))
    }
}
