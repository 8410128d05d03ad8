//! Layouts that particles move between: the chaos sphere and the formed cone

pub mod points;

pub use points::{TreeShape, chaos_point, cone_point, sample_chaos_point};
