//! Turns raw input events into the control state the scene samples each frame.
//!
//! Everything that reaches the scene through here is finite and in range:
//! progress is clamped to [0, 1], the pointer to [-1, 1], and non-finite
//! deltas from misbehaving devices are dropped.

use crate::camera::ViewMode;
use crate::config::{InputConfig, SpinConfig};
use crate::scene::SceneEvent;

/// Spin intent for the whole tree group
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RotationDrive {
    /// Pointer released: slow idle drift
    #[default]
    Idle,
    /// Pointer held near the centre of the screen: the tree stays put
    Hold,
    /// Pointer held off-centre: signed steering strength in [-1, 1]
    Steer(f32),
}

impl RotationDrive {
    pub fn from_pointer(held: bool, pointer_x: f32, dead_zone: f32) -> Self {
        if !held {
            RotationDrive::Idle
        } else if pointer_x.abs() > dead_zone {
            RotationDrive::Steer(pointer_x)
        } else {
            RotationDrive::Hold
        }
    }
}

/// Snapshot read by the scene once per frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControlState {
    /// Target progress in [0, 1]; 0 is chaos, 1 the formed tree
    pub progress: f32,
    pub view_mode: ViewMode,
    pub pointer_held: bool,
    /// Horizontal pointer position in [-1, 1]
    pub pointer_x: f32,
    pub rotation_drive: RotationDrive,
}

impl ControlState {
    pub fn status(&self) -> FormationStatus {
        FormationStatus::from_progress(self.progress)
    }
}

/// Coarse reading of progress for the status overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormationStatus {
    Chaos,
    Transforming,
    Complete,
}

impl FormationStatus {
    pub fn from_progress(progress: f32) -> Self {
        if progress < 0.1 {
            FormationStatus::Chaos
        } else if progress > 0.9 {
            FormationStatus::Complete
        } else {
            FormationStatus::Transforming
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormationStatus::Chaos => "CHAOS DETECTED",
            FormationStatus::Transforming => "TRANSFORMING...",
            FormationStatus::Complete => "COMPLETE FORM",
        }
    }
}

/// Whole-percent readout of progress
pub fn integrity(progress: f32) -> u32 {
    (progress.clamp(0.0, 1.0) * 100.0).floor() as u32
}

/// Owner of the control state
pub struct InteractionRouter {
    state: ControlState,
    wheel_sensitivity: f32,
    touch_sensitivity: f32,
    dead_zone: f32,
    touch_anchor: Option<(f32, f32)>,
    instructions_visible: bool,
}

impl InteractionRouter {
    pub fn new(input: &InputConfig, spin: &SpinConfig) -> Self {
        Self {
            state: ControlState {
                progress: input.initial_progress.clamp(0.0, 1.0),
                ..Default::default()
            },
            wheel_sensitivity: input.wheel_sensitivity,
            touch_sensitivity: input.touch_sensitivity,
            dead_zone: spin.dead_zone,
            touch_anchor: None,
            instructions_visible: true,
        }
    }

    /// Copy of the current control state
    pub fn snapshot(&self) -> ControlState {
        self.state
    }

    /// Mouse wheel; positive `delta_y` (scrolling down) forms the tree
    pub fn wheel(&mut self, delta_y: f32) {
        if !delta_y.is_finite() {
            log::warn!("dropping non-finite wheel delta {}", delta_y);
            return;
        }
        self.nudge_progress(delta_y * self.wheel_sensitivity);
    }

    pub fn touch_start(&mut self, x: f32, y: f32) {
        if x.is_finite() && y.is_finite() {
            self.touch_anchor = Some((x, y));
        }
    }

    /// Vertical drags transform; mostly horizontal drags are left alone.
    /// The anchor follows every event so the drag behaves like a wheel.
    pub fn touch_move(&mut self, x: f32, y: f32) {
        if !x.is_finite() || !y.is_finite() {
            log::warn!("dropping non-finite touch position ({}, {})", x, y);
            return;
        }
        let Some((start_x, start_y)) = self.touch_anchor else {
            self.touch_anchor = Some((x, y));
            return;
        };

        let delta_x = start_x - x;
        let delta_y = start_y - y;
        if delta_y.abs() > delta_x.abs() {
            self.nudge_progress(delta_y * self.touch_sensitivity);
        }
        self.touch_anchor = Some((x, y));
    }

    pub fn touch_end(&mut self) {
        self.touch_anchor = None;
    }

    pub fn pointer_down(&mut self) {
        self.state.pointer_held = true;
        self.refresh_drive();
    }

    pub fn pointer_up(&mut self) {
        self.state.pointer_held = false;
        self.refresh_drive();
    }

    /// Pointer position in normalized device coordinates
    pub fn pointer_move(&mut self, ndc_x: f32) {
        if !ndc_x.is_finite() {
            log::warn!("dropping non-finite pointer position {}", ndc_x);
            return;
        }
        self.state.pointer_x = ndc_x.clamp(-1.0, 1.0);
        self.refresh_drive();
    }

    /// React to an event raised by the scene
    pub fn apply(&mut self, event: SceneEvent) {
        match event {
            SceneEvent::StarActivated => self.set_view_mode(ViewMode::TopDown),
        }
    }

    /// Leave the top-down view
    pub fn reset_view(&mut self) {
        self.set_view_mode(ViewMode::Default);
    }

    pub fn instructions_visible(&self) -> bool {
        self.instructions_visible
    }

    fn set_view_mode(&mut self, mode: ViewMode) {
        if self.state.view_mode != mode {
            log::info!("view mode {:?} -> {:?}", self.state.view_mode, mode);
            self.state.view_mode = mode;
        }
    }

    fn nudge_progress(&mut self, delta: f32) {
        self.state.progress = (self.state.progress + delta).clamp(0.0, 1.0);
        self.instructions_visible = false;
    }

    fn refresh_drive(&mut self) {
        self.state.rotation_drive =
            RotationDrive::from_pointer(self.state.pointer_held, self.state.pointer_x, self.dead_zone);
    }
}
