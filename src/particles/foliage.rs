//! Needle points of the tree
//!
//! Thousands of points blend uniformly between chaos and the cone with no
//! per-point easing; a wind sway keeps the cloud alive while it is scattered.

use std::f32::consts::TAU;
use rand::Rng;

use crate::animation::ProgressSmoother;
use crate::config::FoliageConfig;
use crate::formation::{TreeShape, cone_point, sample_chaos_point};
use crate::math::{Vec3, smoothstep};
use super::FrameTime;
use super::palette::{EMERALD, GOLD};

/// Heights over which the colour brightens from dark base to lit top
const GRADIENT_LOW: f32 = -5.0;
const GRADIENT_HIGH: f32 = 10.0;
/// Fraction of the wind that survives once the tree is formed is `1 - WIND_SETTLE`
const WIND_SETTLE: f32 = 0.9;
/// Floats per point in [`FoliageSystem::point_data`]
pub const POINT_STRIDE: usize = 7;

/// A single foliage point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoliagePoint {
    pub chaos: Vec3,
    pub target: Vec3,
    /// Drives both the gold-tip pick and the point size
    pub random: f32,
}

impl FoliagePoint {
    /// Point sprite size in pixels at unit depth scale
    pub fn size(&self) -> f32 {
        5.0 * self.random + 2.0
    }
}

/// Colour of a point given its random scalar and current height
pub fn foliage_color(random: f32, y: f32, gold_threshold: f32) -> Vec3 {
    let gold = random > gold_threshold;
    let base = if gold {
        Vec3::from_hex(GOLD)
    } else {
        Vec3::from_hex(EMERALD)
    };

    let mut color = base.scale(0.6 + 0.6 * smoothstep(GRADIENT_LOW, GRADIENT_HIGH, y));
    if gold {
        color = color.scale(2.0);
    }
    color
}

/// System animating every foliage point
pub struct FoliageSystem {
    points: Vec<FoliagePoint>,
    positions: Vec<Vec3>,
    smoother: ProgressSmoother,
    wind_amplitude: f32,
    gold_threshold: f32,
}

impl FoliageSystem {
    /// Lay the points along a spiral that climbs the cone
    pub fn generate<R: Rng + ?Sized>(config: &FoliageConfig, shape: &TreeShape, rng: &mut R) -> Self {
        let count = config.count;
        let mut points = Vec::with_capacity(count);

        for i in 0..count {
            let ratio = i as f32 / count as f32;
            let angle = ratio * config.spiral_turns * TAU;
            let jitter = config.radius_jitter.sample(rng);

            points.push(FoliagePoint {
                target: cone_point(shape, ratio, angle, jitter),
                chaos: sample_chaos_point(rng, config.chaos_radius),
                random: rng.gen::<f32>(),
            });
        }

        let positions = points.iter().map(|p| p.chaos).collect();

        Self {
            points,
            positions,
            smoother: ProgressSmoother::new(config.half_life),
            wind_amplitude: config.wind_amplitude,
            gold_threshold: config.gold_threshold,
        }
    }

    /// Advance the smoother and recompute every rendered position
    pub fn update(&mut self, target_progress: f32, frame: FrameTime) {
        let p = self.smoother.advance(target_progress, frame.dt);
        let wind = self.wind_amplitude * (1.0 - p * WIND_SETTLE);
        let t = frame.elapsed;

        for (point, out) in self.points.iter().zip(self.positions.iter_mut()) {
            let mut pos = point.chaos.lerp(&point.target, p);
            pos.x += (t * 1.5 + pos.y * 0.3).sin() * wind;
            pos.z += (t * 1.2 + pos.y * 0.3).cos() * wind;
            debug_assert!(pos.is_finite(), "foliage position went non-finite");
            *out = pos;
        }
    }

    pub fn progress(&self) -> f32 {
        self.smoother.value()
    }

    pub fn points(&self) -> &[FoliagePoint] {
        &self.points
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn color(&self, index: usize) -> Vec3 {
        foliage_color(self.points[index].random, self.positions[index].y, self.gold_threshold)
    }

    /// Point buffer for upload: position(3) + size(1) + color(3), 7 floats per point
    pub fn point_data(&self) -> Vec<f32> {
        let mut data = Vec::with_capacity(self.points.len() * POINT_STRIDE);

        for (i, (point, pos)) in self.points.iter().zip(&self.positions).enumerate() {
            let color = self.color(i);
            data.push(pos.x);
            data.push(pos.y);
            data.push(pos.z);
            data.push(point.size());
            data.push(color.x);
            data.push(color.y);
            data.push(color.z);
        }

        data
    }

    pub fn count(&self) -> usize {
        self.points.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn system(count: usize, wind: f32) -> FoliageSystem {
        let config = FoliageConfig {
            count,
            wind_amplitude: wind,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        FoliageSystem::generate(&config, &TreeShape::default(), &mut rng)
    }

    #[test]
    fn test_targets_climb_the_cone() {
        let foliage = system(1000, 0.15);
        let shape = TreeShape::default();
        let mut prev_y = f32::MIN;
        for (i, p) in foliage.points().iter().enumerate() {
            assert!(p.target.y >= prev_y, "point {} dropped below its predecessor", i);
            prev_y = p.target.y;

            let ratio = i as f32 / 1000.0;
            let r = (p.target.x * p.target.x + p.target.z * p.target.z).sqrt();
            let limit = shape.radius_at(ratio) * 1.3 + 1e-4;
            assert!(r <= limit);
            assert!(p.chaos.length() <= 25.0 * (1.0 + 1e-5));
        }
    }

    #[test]
    fn test_blend_is_uniform_across_points() {
        let mut foliage = system(200, 0.0);
        // Ten half-lives toward 0.5
        for _ in 0..300 {
            foliage.update(0.5, FrameTime::new(0.0, 1.0 / 60.0));
        }
        let p = foliage.progress();
        assert!((p - 0.5).abs() < 1e-3);
        for (point, pos) in foliage.points().iter().zip(foliage.positions()) {
            assert!(pos.distance(&point.chaos.lerp(&point.target, p)) < 1e-4);
        }
    }

    #[test]
    fn test_wind_fades_when_formed() {
        let mut chaos = system(200, 0.15);
        let mut formed = system(200, 0.15);
        let mut max_chaos = 0.0f32;
        let mut max_formed = 0.0f32;

        for i in 0..1200 {
            let frame = FrameTime::new(i as f32 / 60.0, 1.0 / 60.0);
            chaos.update(0.0, frame);
            formed.update(1.0, frame);
        }
        for step in 0..120 {
            let frame = FrameTime::new(20.0 + step as f32 * 0.05, 1.0 / 60.0);
            chaos.update(0.0, frame);
            formed.update(1.0, frame);
            for (pt, pos) in chaos.points().iter().zip(chaos.positions()) {
                max_chaos = max_chaos.max(pos.distance(&pt.chaos));
            }
            for (pt, pos) in formed.points().iter().zip(formed.positions()) {
                max_formed = max_formed.max(pos.distance(&pt.target));
            }
        }

        assert!(max_chaos > 0.1, "wind should be visible in chaos, got {}", max_chaos);
        assert!(max_chaos <= 0.15 * 2f32.sqrt() + 1e-3);
        assert!(max_formed <= 0.015 * 2f32.sqrt() + 1e-3, "formed wind {}", max_formed);
    }

    #[test]
    fn test_gold_tips_are_boosted() {
        let green = foliage_color(0.5, 10.0, 0.92);
        let gold = foliage_color(0.95, 10.0, 0.92);
        assert!(gold.x > 1.5, "gold tips should exceed 1.0 for bloom");
        assert!(green.y < 0.5 && green.x == 0.0);
    }

    #[test]
    fn test_gradient_brightens_with_height() {
        let low = foliage_color(0.1, -7.0, 0.92);
        let high = foliage_color(0.1, 7.0, 0.92);
        assert!(high.y > low.y);
        assert!((low.y - Vec3::from_hex(EMERALD).y * 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_point_data_format() {
        let foliage = system(64, 0.15);
        let data = foliage.point_data();
        assert_eq!(data.len(), 64 * POINT_STRIDE);
        for (i, chunk) in data.chunks(POINT_STRIDE).enumerate() {
            assert_eq!(&chunk[0..3], &foliage.positions()[i].to_array()[..]);
            assert!(chunk[3] >= 2.0 && chunk[3] <= 7.0);
            assert_eq!(&chunk[4..7], &foliage.color(i).to_array()[..]);
        }
    }
}
