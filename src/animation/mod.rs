//! Progress-driven animation primitives
//!
//! Every particle system owns a [`ProgressSmoother`] that lags behind the
//! shared progress target, and reshapes the lagged value with an [`Easing`]
//! curve before blending chaos and formed layouts.

mod easing;
mod smoothing;

pub use easing::{Easing, ease};
pub use smoothing::{ProgressSmoother, SmoothedVec3};
