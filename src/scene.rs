//! Composition of the four particle systems, the camera rig and the group spin.
//!
//! `TreeScene::advance` is a pure function of the control snapshot and the
//! frame clock, so a recorded input sequence can be replayed frame by frame
//! without a browser.

use std::f32::consts::TAU;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::camera::{CameraRig, CameraView, Viewport};
use crate::config::{ConfigError, SceneConfig, SpinConfig};
use crate::interaction::{ControlState, RotationDrive, pick_sphere};
use crate::math::{Mat4, Vec3};
use crate::particles::{FoliageSystem, FrameTime, OrnamentSystem, PhotoSystem, StarSystem};

/// Something the scene wants the host to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneEvent {
    /// The star was clicked
    StarActivated,
}

/// Yaw of the whole particle group about the vertical axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupSpin {
    yaw: f32,
    speed: f32,
    idle_speed: f32,
}

impl GroupSpin {
    pub fn new(config: &SpinConfig) -> Self {
        Self {
            yaw: 0.0,
            speed: config.speed,
            idle_speed: config.idle_speed,
        }
    }

    pub fn update(&mut self, drive: RotationDrive, dt: f32) {
        let delta = match drive {
            RotationDrive::Idle => self.idle_speed * dt,
            RotationDrive::Hold => 0.0,
            RotationDrive::Steer(x) => self.speed * dt * x,
        };
        self.yaw = (self.yaw + delta).rem_euclid(TAU);
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }
}

pub struct TreeScene {
    foliage: FoliageSystem,
    ornaments: OrnamentSystem,
    photos: PhotoSystem,
    star: StarSystem,
    camera: CameraRig,
    spin: GroupSpin,
}

impl TreeScene {
    /// Validate the config and generate every particle
    pub fn new(config: SceneConfig, viewport: Viewport) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let foliage = FoliageSystem::generate(&config.foliage, &config.tree, &mut rng);
        let ornaments = OrnamentSystem::generate(&config.ornaments, &config.tree, &mut rng);
        let photos = PhotoSystem::generate(&config.photos, &config.tree, &mut rng);
        let star = StarSystem::generate(&config.star, &config.tree, &mut rng);

        log::info!(
            "scene built: {} foliage, {} ornaments, {} photos, seed {:?}",
            foliage.count(),
            ornaments.count(),
            photos.count(),
            config.seed
        );

        Ok(Self {
            foliage,
            ornaments,
            photos,
            star,
            camera: CameraRig::new(config.camera, viewport),
            spin: GroupSpin::new(&config.spin),
        })
    }

    /// One tick of the frame loop
    pub fn advance(&mut self, control: ControlState, frame: FrameTime) {
        let progress = control.progress;
        self.foliage.update(progress, frame);
        self.ornaments.update(progress, frame);
        self.photos.update(progress, frame);
        self.star.update(progress, frame);
        self.camera.update(progress, control.view_mode, frame);
        self.spin.update(control.rotation_drive, frame.dt);
    }

    pub fn resize(&mut self, viewport: Viewport) {
        log::debug!("viewport resized to {}x{}", viewport.width, viewport.height);
        self.camera.resize(viewport);
    }

    /// Star centre after the group spin
    pub fn star_world_position(&self) -> Vec3 {
        self.star.transform().position.rotate_y(self.spin.yaw())
    }

    fn star_under_pointer(&self, ndc_x: f32, ndc_y: f32) -> bool {
        pick_sphere(
            &self.camera.view(),
            ndc_x,
            ndc_y,
            self.star_world_position(),
            self.star.bounding_radius(),
        )
        .is_some()
    }

    /// Update the star hover state; returns whether the pointer is over it
    pub fn hover(&mut self, ndc_x: f32, ndc_y: f32) -> bool {
        let hovered = self.star_under_pointer(ndc_x, ndc_y);
        self.star.set_hovered(hovered);
        hovered
    }

    pub fn click(&self, ndc_x: f32, ndc_y: f32) -> Option<SceneEvent> {
        self.star_under_pointer(ndc_x, ndc_y)
            .then_some(SceneEvent::StarActivated)
    }

    pub fn group_yaw(&self) -> f32 {
        self.spin.yaw()
    }

    pub fn group_matrix(&self) -> Mat4 {
        Mat4::rotation_y(self.spin.yaw())
    }

    pub fn camera_view(&self) -> CameraView {
        self.camera.view()
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn foliage(&self) -> &FoliageSystem {
        &self.foliage
    }

    pub fn ornaments(&self) -> &OrnamentSystem {
        &self.ornaments
    }

    pub fn photos(&self) -> &PhotoSystem {
        &self.photos
    }

    pub fn star(&self) -> &StarSystem {
        &self.star
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::ViewMode;
    use crate::config::{FoliageConfig, OrnamentConfig, PhotoConfig};

    const DESKTOP: Viewport = Viewport { width: 1440.0, height: 900.0 };

    fn small_config() -> SceneConfig {
        SceneConfig {
            seed: Some(7),
            foliage: FoliageConfig { count: 200, ..Default::default() },
            ornaments: OrnamentConfig { count: 20, ..Default::default() },
            photos: PhotoConfig { count: 6, ..Default::default() },
            ..Default::default()
        }
    }

    fn formed() -> ControlState {
        ControlState {
            progress: 1.0,
            ..Default::default()
        }
    }

    fn run(scene: &mut TreeScene, control: ControlState, from: f32, seconds: f32) -> f32 {
        let frames = (seconds * 60.0) as usize;
        for i in 0..frames {
            scene.advance(control, FrameTime::new(from + i as f32 / 60.0, 1.0 / 60.0));
        }
        from + seconds
    }

    /// NDC of a world point as seen by the camera
    fn project(view: &CameraView, p: Vec3) -> (f32, f32) {
        let m = view.projection_matrix().mul(&view.view_matrix());
        let d = m.as_slice();
        let clip = m.transform_point(p);
        let w = d[3] * p.x + d[7] * p.y + d[11] * p.z + d[15];
        (clip.x / w, clip.y / w)
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = small_config();
        config.photos.count = 0;
        assert!(matches!(
            TreeScene::new(config, DESKTOP),
            Err(ConfigError::EmptySystem { system: "photos" })
        ));
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = TreeScene::new(small_config(), DESKTOP).unwrap();
        let b = TreeScene::new(small_config(), DESKTOP).unwrap();
        assert_eq!(a.foliage().points(), b.foliage().points());
        assert_eq!(a.photos().cards(), b.photos().cards());
    }

    #[test]
    fn test_systems_arrive_in_order() {
        let mut scene = TreeScene::new(small_config(), DESKTOP).unwrap();
        run(&mut scene, formed(), 0.0, 0.5);
        let star = scene.star().progress();
        let foliage = scene.foliage().progress();
        let ornaments = scene.ornaments().progress();
        let photos = scene.photos().progress();
        assert!(star > foliage && foliage > ornaments && ornaments > photos);
    }

    #[test]
    fn test_group_spin_drives() {
        let mut spin = GroupSpin::new(&SpinConfig::default());
        spin.update(RotationDrive::Idle, 2.0);
        assert!((spin.yaw() - 0.1).abs() < 1e-6);
        spin.update(RotationDrive::Hold, 2.0);
        assert!((spin.yaw() - 0.1).abs() < 1e-6);
        spin.update(RotationDrive::Steer(0.5), 0.1);
        assert!((spin.yaw() - 0.2).abs() < 1e-6);
        spin.update(RotationDrive::Steer(-1.0), 0.2);
        assert!((spin.yaw() - (TAU - 0.2)).abs() < 1e-5);
    }

    #[test]
    fn test_click_on_formed_star_activates() {
        let mut scene = TreeScene::new(small_config(), DESKTOP).unwrap();
        run(&mut scene, formed(), 0.0, 10.0);

        let (x, y) = project(&scene.camera_view(), scene.star_world_position());
        assert!(x.abs() < 1.0 && y.abs() < 1.0);
        assert_eq!(scene.click(x, y), Some(SceneEvent::StarActivated));
        assert!(scene.hover(x, y));
        assert!(scene.star().is_hovered());

        assert_eq!(scene.click(-0.9, -0.9), None);
        assert!(!scene.hover(-0.9, -0.9));
        assert!(!scene.star().is_hovered());
    }

    #[test]
    fn test_star_pick_follows_group_spin() {
        // Stop halfway so the star is still off the vertical axis
        let mut scene = TreeScene::new(small_config(), DESKTOP).unwrap();
        let control = ControlState {
            rotation_drive: RotationDrive::Steer(1.0),
            ..formed()
        };
        run(&mut scene, control, 0.0, 0.4);

        let local = scene.star().transform().position;
        let world = scene.star_world_position();
        assert!((world.length() - local.length()).abs() < 1e-4);
        let expected = Mat4::rotation_y(scene.group_yaw()).transform_point(local);
        assert!(world.distance(&expected) < 1e-4);
    }

    #[test]
    fn test_top_down_camera_settles() {
        let mut scene = TreeScene::new(small_config(), DESKTOP).unwrap();
        let control = ControlState {
            view_mode: ViewMode::TopDown,
            ..formed()
        };
        run(&mut scene, control, 0.0, 10.0);
        assert!(scene.camera().position().distance(&Vec3::new(0.0, 16.0, 0.1)) < 1e-3);
    }
}
