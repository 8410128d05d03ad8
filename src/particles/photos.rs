//! Polaroid-style photo cards
//!
//! Cards drift with the heaviest smoothing of all systems. Their orientation
//! is a two-state machine driven by the raw progress target, not the smoothed
//! one, so the cards turn to face the viewer as soon as the user commits to
//! the formed tree even while they are still drifting into place.

use std::f32::consts::TAU;
use rand::Rng;

use crate::animation::{Easing, ProgressSmoother, ease};
use crate::config::PhotoConfig;
use crate::formation::{TreeShape, cone_point, sample_chaos_point};
use crate::math::{Euler, Vec3, lerp};
use super::{FrameTime, InstanceTransform, matrix_data};

/// Orientation mode shared by every card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhotoPose {
    /// Free tumble while the swarm is scattered
    #[default]
    Tumbling,
    /// Facing outward from the trunk at the card's own height
    Displayed,
}

impl PhotoPose {
    /// Evaluated fresh every frame; no memory of the previous pose
    pub fn from_progress(raw_progress: f32, threshold: f32) -> Self {
        if raw_progress > threshold {
            PhotoPose::Displayed
        } else {
            PhotoPose::Tumbling
        }
    }
}

/// A single photo card
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhotoCard {
    pub chaos: Vec3,
    pub target: Vec3,
    /// Per-card tumble offsets, each component in [-0.5, 0.5)
    pub tumble_seed: Vec3,
}

/// Yaw that turns a card's +Z face away from the vertical axis through the
/// tree centre. Looking at the axis and turning half a revolution collapses
/// to pointing straight along the horizontal offset.
pub fn outward_yaw(position: Vec3) -> f32 {
    position.x.atan2(position.z)
}

/// System managing the photo cards
pub struct PhotoSystem {
    cards: Vec<PhotoCard>,
    transforms: Vec<InstanceTransform>,
    smoother: ProgressSmoother,
    pose: PhotoPose,
    display_threshold: f32,
    chaos_scale: f32,
    formed_scale: f32,
    tilt: f32,
    sway: f32,
}

impl PhotoSystem {
    pub fn generate<R: Rng + ?Sized>(config: &PhotoConfig, shape: &TreeShape, rng: &mut R) -> Self {
        let mut cards = Vec::with_capacity(config.count);

        for _ in 0..config.count {
            let height_ratio = config.height_ratio.sample(rng);
            let angle = rng.gen::<f32>() * TAU;

            cards.push(PhotoCard {
                target: cone_point(shape, height_ratio, angle, config.radius_ratio),
                chaos: sample_chaos_point(rng, config.chaos_radius),
                tumble_seed: Vec3::new(
                    rng.gen::<f32>() - 0.5,
                    rng.gen::<f32>() - 0.5,
                    rng.gen::<f32>() - 0.5,
                ),
            });
        }

        let transforms = cards
            .iter()
            .map(|c| InstanceTransform {
                position: c.chaos,
                rotation: Euler::ZERO,
                scale: config.chaos_scale,
            })
            .collect();

        Self {
            cards,
            transforms,
            smoother: ProgressSmoother::new(config.half_life),
            pose: PhotoPose::Tumbling,
            display_threshold: config.display_threshold,
            chaos_scale: config.chaos_scale,
            formed_scale: config.formed_scale,
            tilt: config.tilt,
            sway: config.sway,
        }
    }

    /// `raw_progress` is the unsmoothed control value
    pub fn update(&mut self, raw_progress: f32, frame: FrameTime) {
        let smoothed = self.smoother.advance(raw_progress, frame.dt);
        let eased = ease(smoothed, Easing::EaseInOutQuad);
        self.pose = PhotoPose::from_progress(raw_progress, self.display_threshold);

        let t = frame.elapsed;
        let scale = lerp(self.chaos_scale, self.formed_scale, eased);

        for (i, (card, out)) in self.cards.iter().zip(self.transforms.iter_mut()).enumerate() {
            let position = card.chaos.lerp(&card.target, eased);
            debug_assert!(position.is_finite(), "photo position went non-finite");

            let rotation = match self.pose {
                PhotoPose::Tumbling => Euler::new(
                    card.tumble_seed.x * 10.0 + t * 0.2,
                    card.tumble_seed.y * 10.0 + t * 0.1,
                    card.tumble_seed.z * 10.0,
                ),
                PhotoPose::Displayed => Euler::new(
                    self.tilt,
                    outward_yaw(position),
                    (t + i as f32).sin() * self.sway,
                ),
            };

            *out = InstanceTransform {
                position,
                rotation,
                scale,
            };
        }
    }

    pub fn pose(&self) -> PhotoPose {
        self.pose
    }

    pub fn progress(&self) -> f32 {
        self.smoother.value()
    }

    pub fn cards(&self) -> &[PhotoCard] {
        &self.cards
    }

    pub fn transforms(&self) -> &[InstanceTransform] {
        &self.transforms
    }

    /// Instance matrices, 16 floats per card
    pub fn instance_matrices(&self) -> Vec<f32> {
        matrix_data(&self.transforms)
    }

    pub fn count(&self) -> usize {
        self.cards.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn system() -> PhotoSystem {
        let config = PhotoConfig {
            count: 12,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(5);
        PhotoSystem::generate(&config, &TreeShape::default(), &mut rng)
    }

    #[test]
    fn test_pose_flips_exactly_at_threshold() {
        assert_eq!(PhotoPose::from_progress(0.79, 0.8), PhotoPose::Tumbling);
        assert_eq!(PhotoPose::from_progress(0.8, 0.8), PhotoPose::Tumbling);
        assert_eq!(PhotoPose::from_progress(0.81, 0.8), PhotoPose::Displayed);
    }

    #[test]
    fn test_pose_follows_raw_progress_both_ways() {
        let mut photos = system();
        let frame = FrameTime::new(1.0, 1.0 / 60.0);

        photos.update(0.79, frame);
        assert_eq!(photos.pose(), PhotoPose::Tumbling);
        photos.update(0.81, frame);
        assert_eq!(photos.pose(), PhotoPose::Displayed);
        // Smoothed progress is still near zero; the pose does not wait for it
        assert!(photos.progress() < 0.1);
        photos.update(0.79, frame);
        assert_eq!(photos.pose(), PhotoPose::Tumbling);
        photos.update(0.81, frame);
        assert_eq!(photos.pose(), PhotoPose::Displayed);
    }

    #[test]
    fn test_displayed_cards_face_outward() {
        let mut photos = system();
        for i in 0..2400 {
            photos.update(1.0, FrameTime::new(i as f32 / 60.0, 1.0 / 60.0));
        }
        for tr in photos.transforms() {
            let facing = tr.rotation.to_mat4().transform_direction(Vec3::new(0.0, 0.0, 1.0));
            let outward = Vec3::new(tr.position.x, 0.0, tr.position.z).normalize();
            let horizontal = Vec3::new(facing.x, 0.0, facing.z);
            // Tilt only nudges the face vertically
            assert!(horizontal.dot(&outward) > 0.99, "card faces {:?}", facing);
            assert!(facing.y.abs() < 0.11);
            assert!(tr.rotation.z.abs() <= 0.05 + 1e-6);
        }
    }

    #[test]
    fn test_tumble_never_settles() {
        let mut photos = system();
        photos.update(0.0, FrameTime::new(0.0, 0.016));
        let before = photos.transforms()[0].rotation;
        photos.update(0.0, FrameTime::new(10.0, 0.016));
        let after = photos.transforms()[0].rotation;
        assert!((after.x - before.x - 2.0).abs() < 1e-4);
        assert!((after.y - before.y - 1.0).abs() < 1e-4);
        assert_eq!(after.z, before.z);
    }

    #[test]
    fn test_scale_shrinks_as_cards_settle() {
        let mut photos = system();
        photos.update(0.0, FrameTime::new(0.0, 0.016));
        assert!((photos.transforms()[0].scale - 2.0).abs() < 1e-6);
        for i in 0..3000 {
            photos.update(1.0, FrameTime::new(i as f32 / 60.0, 1.0 / 60.0));
        }
        assert!((photos.transforms()[0].scale - 1.4).abs() < 1e-5);
    }

    #[test]
    fn test_targets_sit_outside_the_cone() {
        let photos = system();
        let shape = TreeShape::default();
        for card in photos.cards() {
            let height_ratio = (card.target.y + shape.height / 2.0) / shape.height;
            assert!(height_ratio >= 0.15 - 1e-4 && height_ratio <= 0.75 + 1e-4);
            let r = (card.target.x * card.target.x + card.target.z * card.target.z).sqrt();
            assert!(r > shape.radius_at(height_ratio));
        }
    }
}
