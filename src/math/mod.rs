//! Small linear-algebra kit shared by the animators, the camera rig and the
//! picking code. Matrices are column-major so they can be uploaded to WebGL
//! without transposition.

pub mod vec3;
pub mod matrix;
pub mod euler;

pub use vec3::Vec3;
pub use matrix::Mat4;
pub use euler::Euler;

/// Linear interpolation between two scalars
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Hermite step between two edges, clamped to [0, 1]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp(0.6, 0.25, 0.0), 0.6);
        assert!((lerp(0.6, 0.25, 1.0) - 0.25).abs() < 1e-6);
        assert!((lerp(2.0, 1.4, 0.5) - 1.7).abs() < 1e-6);
    }

    #[test]
    fn test_smoothstep_clamps() {
        assert_eq!(smoothstep(-5.0, 10.0, -20.0), 0.0);
        assert_eq!(smoothstep(-5.0, 10.0, 20.0), 1.0);
        assert!((smoothstep(-5.0, 10.0, 2.5) - 0.5).abs() < 1e-6);
    }
}
