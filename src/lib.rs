//! Heart Toss - tossed, grabbable heart tokens with real-time 2D physics
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bodies, pointer grab, collisions, walls)
//! - `renderer`: Output seam that turns body state into per-token transforms
//! - `platform`: Frame scheduling and browser glue
//! - `settings`: Data-driven physics tuning

pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{ShapeError, TuningError};
pub use settings::Tuning;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Physics constants (empirically tuned, keep literal)
pub mod consts {
    /// Downward acceleration (px/s²)
    pub const GRAVITY: f32 = 2400.0;
    /// Per-frame linear drag multiplier
    pub const AIR_DRAG: f32 = 0.997;
    /// Per-frame angular drag multiplier
    pub const ANGULAR_DRAG: f32 = 0.992;
    /// Linear speed clamp per axis (px/s)
    pub const MAX_SPEED: f32 = 2400.0;
    /// Largest step the integrator will take after a stall
    pub const MAX_DT: f32 = 0.034;
    /// Step used for the first frame after mount
    pub const FIRST_FRAME_DT: f32 = 1.0 / 60.0;

    /// Wall bounce restitution
    pub const WALL_RESTITUTION: f32 = 0.72;
    /// Floor contact horizontal damping
    pub const FLOOR_FRICTION: f32 = 0.92;
    /// Side/ceiling hits: spin kick = tangential speed / DIV * GAIN
    pub const SIDE_WALL_SPIN_DIV: f32 = 1400.0;
    pub const SIDE_WALL_SPIN_GAIN: f32 = 0.9;
    /// Floor hits: spin kick = horizontal speed / DIV * GAIN
    pub const FLOOR_SPIN_DIV: f32 = 1100.0;
    pub const FLOOR_SPIN_GAIN: f32 = 1.25;

    /// Token-token restitution
    pub const BODY_RESTITUTION: f32 = 0.35;
    /// Token-token tangential friction
    pub const BODY_FRICTION: f32 = 0.06;
    /// Overlap tolerated before positional correction (px)
    pub const COLLISION_SLOP: f32 = 0.5;
    pub const COLLISION_ITERATIONS: u32 = 2;
    /// Circle proxy radius as a fraction of token size
    pub const PROXY_RADIUS_FRAC: f32 = 0.36;

    /// Pointer spring stiffness (unit mass)
    pub const SPRING_K: f32 = 55.0;
    pub const GRAB_TORQUE_SCALE: f32 = 1.35;
    /// Grab radius as a fraction of token size
    pub const GRAB_RADIUS_FRAC: f32 = 0.55;

    /// Population cap
    pub const MAX_LIVE: usize = 10;

    /// Spawn envelope
    pub const SIZE_VIEWPORT_FRAC: f32 = 0.28;
    pub const BASE_SIZE_MIN: f32 = 180.0;
    pub const BASE_SIZE_MAX: f32 = 260.0;
    pub const SIZE_SCALE_MIN: f32 = 0.82;
    pub const SIZE_SCALE_MAX: f32 = 1.14;
    pub const SIZE_MIN: f32 = 150.0;
    pub const SIZE_MAX: f32 = 300.0;
    /// Gap between a fresh token and the floor (px)
    pub const SPAWN_FLOOR_GAP: f32 = 40.0;
    pub const LAUNCH_VX: f32 = 350.0;
    pub const LAUNCH_VY: f32 = -1100.0;
    /// Max initial tilt either way (radians, ~10°)
    pub const LAUNCH_TILT: f32 = 0.175;
    pub const LAUNCH_SPIN: f32 = 1.5;

    /// Width of the decorative peek image the spawn hint has to clear
    pub const PEEK_WIDTH: f32 = 256.0;
}

/// Screen area the tokens live in, in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn min_side(&self) -> f32 {
        self.width.min(self.height)
    }
}

/// Uniform draw in [lo, hi). Never panics, even when lo == hi.
#[inline]
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    lo + rng.random::<f32>() * (hi - lo)
}

/// 2D cross product (z component of the 3D cross)
#[inline]
pub fn cross(a: Vec2, b: Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Replace non-finite components with zero
#[inline]
pub fn finite_or_zero(v: Vec2) -> Vec2 {
    Vec2::new(
        if v.x.is_finite() { v.x } else { 0.0 },
        if v.y.is_finite() { v.y } else { 0.0 },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_uniform_stays_in_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..1000 {
            let v = uniform(&mut rng, -350.0, 350.0);
            assert!((-350.0..350.0).contains(&v));
        }
    }

    #[test]
    fn test_uniform_empty_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        assert_eq!(uniform(&mut rng, 3.0, 3.0), 3.0);
    }

    #[test]
    fn test_cross() {
        assert_eq!(cross(Vec2::X, Vec2::Y), 1.0);
        assert_eq!(cross(Vec2::Y, Vec2::X), -1.0);
    }

    #[test]
    fn test_finite_or_zero() {
        let v = finite_or_zero(Vec2::new(f32::NAN, f32::INFINITY));
        assert_eq!(v, Vec2::ZERO);
        assert_eq!(finite_or_zero(Vec2::new(1.0, -2.0)), Vec2::new(1.0, -2.0));
    }
}
