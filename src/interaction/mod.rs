pub mod picking;
pub mod router;

pub use picking::{HitInfo, Ray, pick_sphere, pointer_ray, ray_sphere_intersect};
pub use router::{ControlState, FormationStatus, InteractionRouter, RotationDrive, integrity};
