//! Frame-rate independent exponential smoothing

use crate::math::Vec3;

/// Move `current` toward `target` by exponential decay.
///
/// The remaining gap shrinks by a factor of `e` every `half_life` seconds, so
/// one 100 ms step and ten 10 ms steps land on the same value. The result
/// always stays between `current` and `target`.
pub fn damp(current: f32, target: f32, half_life: f32, dt: f32) -> f32 {
    debug_assert!(current.is_finite() && target.is_finite(), "non-finite damp input");
    debug_assert!(half_life > 0.0 && dt >= 0.0);

    // Written as target minus a shrinking gap so rounding can never push past the target
    let decay = (-dt / half_life).exp();
    target - (target - current) * decay
}

/// Lagged copy of the shared progress target, one per particle system
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSmoother {
    current: f32,
    half_life: f32,
}

impl ProgressSmoother {
    /// Starts fully in chaos (`current == 0`)
    pub fn new(half_life: f32) -> Self {
        Self {
            current: 0.0,
            half_life,
        }
    }

    pub fn advance(&mut self, target: f32, dt: f32) -> f32 {
        self.current = damp(self.current, target, self.half_life, dt);
        self.current
    }

    pub fn value(&self) -> f32 {
        self.current
    }
}

/// Per-axis damping of a point (camera eye and look-at target)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothedVec3 {
    current: Vec3,
    half_life: f32,
}

impl SmoothedVec3 {
    pub fn new(start: Vec3, half_life: f32) -> Self {
        Self {
            current: start,
            half_life,
        }
    }

    pub fn advance(&mut self, target: Vec3, dt: f32) -> Vec3 {
        self.current = Vec3::new(
            damp(self.current.x, target.x, self.half_life, dt),
            damp(self.current.y, target.y, self.half_life, dt),
            damp(self.current.z, target.z, self.half_life, dt),
        );
        self.current
    }

    pub fn value(&self) -> Vec3 {
        self.current
    }
}
