//! Camera framing and view modes

mod rig;

pub use rig::{CameraRig, CameraView, ViewMode, Viewport};
