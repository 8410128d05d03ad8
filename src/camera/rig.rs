use crate::animation::SmoothedVec3;
use crate::config::CameraConfig;
use crate::math::{Mat4, Vec3};
use crate::particles::FrameTime;

const NEAR: f32 = 0.1;
const FAR: f32 = 200.0;

/// Camera framing selected by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Front view that breathes with the chaos
    #[default]
    Default,
    /// Close view straight down onto the star
    TopDown,
}

/// Canvas size in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Collapsed or garbage sizes become a 1px edge
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: pixel_extent(width),
            height: pixel_extent(height),
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width.max(1.0) / self.height.max(1.0)
    }

    /// Phones and portrait windows need the camera further back to fit the tree
    pub fn is_compact(&self, compact_width: f32) -> bool {
        self.width < compact_width || self.width < self.height
    }
}

fn pixel_extent(value: f32) -> f32 {
    if value.is_finite() {
        value.max(1.0)
    } else {
        1.0
    }
}

/// Resolved camera for one frame, enough to build matrices or cast rays
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    pub eye: Vec3,
    pub target: Vec3,
    pub fov_y: f32,
    pub aspect: f32,
}

impl CameraView {
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.eye, self.target, Vec3::UP)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective(self.fov_y, self.aspect, NEAR, FAR)
    }
}

/// Damped camera that follows progress and view mode
pub struct CameraRig {
    config: CameraConfig,
    viewport: Viewport,
    eye: SmoothedVec3,
    target: SmoothedVec3,
}

impl CameraRig {
    /// Starts at the chaos framing so the opening transition pulls in smoothly
    pub fn new(config: CameraConfig, viewport: Viewport) -> Self {
        let (eye, target) = framing(&config, viewport, 0.0, ViewMode::Default, 0.0);
        let half_life = config.half_life;
        Self {
            config,
            viewport,
            eye: SmoothedVec3::new(eye, half_life),
            target: SmoothedVec3::new(target, half_life),
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// `progress` is the raw control value
    pub fn update(&mut self, progress: f32, mode: ViewMode, frame: FrameTime) {
        let (eye, target) = framing(&self.config, self.viewport, progress, mode, frame.elapsed);
        self.eye.advance(eye, frame.dt);
        self.target.advance(target, frame.dt);
    }

    pub fn position(&self) -> Vec3 {
        self.eye.value()
    }

    pub fn look_at(&self) -> Vec3 {
        self.target.value()
    }

    pub fn view(&self) -> CameraView {
        CameraView {
            eye: self.eye.value(),
            target: self.target.value(),
            fov_y: self.config.fov_degrees.to_radians(),
            aspect: self.viewport.aspect(),
        }
    }
}

/// Undamped eye and look-at target for the given state
pub fn framing(
    config: &CameraConfig,
    viewport: Viewport,
    progress: f32,
    mode: ViewMode,
    elapsed: f32,
) -> (Vec3, Vec3) {
    match mode {
        ViewMode::TopDown => (config.top_down_position, config.top_down_target),
        ViewMode::Default => {
            let chaos = 1.0 - progress;
            let distance = if viewport.is_compact(config.compact_width) {
                config.compact_distance
            } else {
                config.base_distance
            };

            let eye = Vec3::new(
                (elapsed * 3.0).sin() * chaos * config.shake,
                config.height + (elapsed * 2.0).cos() * chaos * config.shake,
                distance + chaos * config.pull_back,
            );
            let target = Vec3::new(
                elapsed.sin() * chaos * config.look_sway,
                config.look_at_height,
                0.0,
            );
            (eye, target)
        }
    }
}
