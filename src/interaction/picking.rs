use crate::camera::CameraView;
use crate::math::Vec3;

/// Information about a ray-sphere hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitInfo {
    pub distance: f32,
    pub hit_point: Vec3,
}

/// World-space ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction.scale(distance)
    }
}

/// Cast a ray through normalized device coordinates (x right, y up, both in
/// [-1, 1]) of the given camera.
pub fn pointer_ray(camera: &CameraView, ndc_x: f32, ndc_y: f32) -> Ray {
    let forward = (camera.target - camera.eye).normalize();
    let right = forward.cross(&Vec3::UP).normalize();
    let up = right.cross(&forward);

    let half_height = (camera.fov_y / 2.0).tan();
    let half_width = half_height * camera.aspect;

    let direction = (forward
        + right.scale(ndc_x * half_width)
        + up.scale(ndc_y * half_height))
    .normalize();

    Ray {
        origin: camera.eye,
        direction,
    }
}

/// Nearest positive intersection distance of a ray with a sphere
pub fn ray_sphere_intersect(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;

    let a = ray.direction.dot(&ray.direction);
    let b = 2.0 * oc.dot(&ray.direction);
    let c = oc.dot(&oc) - radius * radius;

    let discriminant = b * b - 4.0 * a * c;

    if discriminant < 0.0 {
        return None;
    }

    let t = (-b - discriminant.sqrt()) / (2.0 * a);

    if t > 0.0 {
        Some(t)
    } else {
        let t2 = (-b + discriminant.sqrt()) / (2.0 * a);
        if t2 > 0.0 {
            Some(t2)
        } else {
            None
        }
    }
}

/// Test the pointer against one bounding sphere
pub fn pick_sphere(
    camera: &CameraView,
    ndc_x: f32,
    ndc_y: f32,
    center: Vec3,
    radius: f32,
) -> Option<HitInfo> {
    let ray = pointer_ray(camera, ndc_x, ndc_y);
    ray_sphere_intersect(&ray, center, radius).map(|distance| HitInfo {
        distance,
        hit_point: ray.at(distance),
    })
}
