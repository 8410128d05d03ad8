//! Scene colours as linear RGB

use crate::math::Vec3;

pub const EMERALD: u32 = 0x004225;
pub const GOLD: u32 = 0xFFD700;
pub const RIBBON_RED: u32 = 0x8B0000;
pub const SHIMMER: u32 = 0xF5E6C8;

/// Ornament finishes; gold is pushed past 1.0 so it catches the bloom pass
pub fn ornament_palette() -> [Vec3; 4] {
    [
        Vec3::from_hex(GOLD).scale(1.5),
        Vec3::from_hex(RIBBON_RED),
        Vec3::from_hex(SHIMMER),
        Vec3::new(0.8, 0.8, 0.9),
    ]
}
