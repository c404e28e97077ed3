//! Token rigid body

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Stable token id, assigned monotonically and never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u32);

impl std::fmt::Display for BodyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One simulated token. Position is the top-left corner of its bounding square.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub id: BodyId,
    /// Top-left corner (px)
    pub pos: Vec2,
    /// Linear velocity (px/s)
    pub vel: Vec2,
    /// Edge length of the bounding square (px), fixed at spawn
    size: f32,
    /// Orientation (radians)
    pub angle: f32,
    /// Angular velocity (rad/s)
    pub angular_vel: f32,
}

impl Body {
    pub fn new(id: BodyId, pos: Vec2, size: f32) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            size,
            angle: 0.0,
            angular_vel: 0.0,
        }
    }

    #[inline]
    pub fn size(&self) -> f32 {
        self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size * 0.5)
    }

    /// Radius of the circle proxy used for token-token contact
    #[inline]
    pub fn proxy_radius(&self, frac: f32) -> f32 {
        self.size * frac
    }

    /// `max(1, size²)`, the inertia-like divisor for spin kicks
    #[inline]
    pub fn spin_inertia(&self) -> f32 {
        (self.size * self.size).max(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_is_middle_of_square() {
        let body = Body::new(BodyId(1), Vec2::new(100.0, 50.0), 200.0);
        assert_eq!(body.center(), Vec2::new(200.0, 150.0));
    }

    #[test]
    fn test_spin_inertia_floor() {
        let tiny = Body::new(BodyId(1), Vec2::ZERO, 0.5);
        assert_eq!(tiny.spin_inertia(), 1.0);
        let big = Body::new(BodyId(2), Vec2::ZERO, 10.0);
        assert_eq!(big.spin_inertia(), 100.0);
    }
}
