//! Screen-edge collision against the glyph's real bounding box
//!
//! Horizontal and vertical violations are handled independently in the same
//! frame. Each hit pushes the token back inside, reflects and damps the
//! violated velocity component, and adds a spin kick from the velocity
//! running along the wall. The floor also bleeds off horizontal speed.

use super::body::Body;
use super::shape::ShapeBounds;
use crate::Viewport;
use crate::settings::Tuning;

/// Which walls a body touched this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallHits {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub floor: bool,
}

impl WallHits {
    pub fn any(&self) -> bool {
        self.left || self.right || self.top || self.floor
    }
}

/// Keep one body's glyph inside the viewport
pub fn resolve_walls(
    body: &mut Body,
    bounds: &ShapeBounds,
    viewport: Viewport,
    tuning: &Tuning,
) -> WallHits {
    let mut hits = WallHits::default();
    let bx = bounds.box_for(body);
    let e = tuning.wall_restitution;
    let side_kick = |v: f32| v / tuning.side_wall_spin_div * tuning.side_wall_spin_gain;

    if bx.left < 0.0 {
        body.pos.x -= bx.left;
        body.vel.x = -body.vel.x * e;
        body.angular_vel += side_kick(body.vel.y);
        hits.left = true;
    } else if bx.right > viewport.width {
        body.pos.x -= bx.right - viewport.width;
        body.vel.x = -body.vel.x * e;
        body.angular_vel -= side_kick(body.vel.y);
        hits.right = true;
    }

    if bx.top < 0.0 {
        body.pos.y -= bx.top;
        body.vel.y = -body.vel.y * e;
        body.angular_vel -= side_kick(body.vel.x);
        hits.top = true;
    } else if bx.bottom > viewport.height {
        body.pos.y -= bx.bottom - viewport.height;
        body.vel.y = -body.vel.y * e;
        body.vel.x *= tuning.floor_friction;
        body.angular_vel += body.vel.x / tuning.floor_spin_div * tuning.floor_spin_gain;
        hits.floor = true;
    }

    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::BodyId;
    use glam::Vec2;

    fn body(x: f32, y: f32) -> Body {
        Body::new(BodyId(1), Vec2::new(x, y), 256.0)
    }

    const VIEW: Viewport = Viewport {
        width: 1000.0,
        height: 800.0,
    };

    #[test]
    fn test_inside_is_untouched() {
        let tuning = Tuning::default();
        let mut b = body(300.0, 300.0);
        b.vel = Vec2::new(100.0, 100.0);
        let before = b.clone();
        let hits = resolve_walls(&mut b, &ShapeBounds::heart(), VIEW, &tuning);
        assert!(!hits.any());
        assert_eq!(b, before);
    }

    #[test]
    fn test_glyph_margin_allows_square_past_edge() {
        // Heart starts 32px into a 256px square, so the square may overhang 32px
        let tuning = Tuning::default();
        let mut b = body(-30.0, 300.0);
        let hits = resolve_walls(&mut b, &ShapeBounds::heart(), VIEW, &tuning);
        assert!(!hits.left);
        assert_eq!(b.pos.x, -30.0);
    }

    #[test]
    fn test_floor_bounce() {
        let tuning = Tuning::default();
        // Bottom of the heart sits at y + 236
        let mut b = body(300.0, 800.0 - 236.0 + 10.0);
        b.vel = Vec2::new(100.0, 500.0);
        let hits = resolve_walls(&mut b, &ShapeBounds::heart(), VIEW, &tuning);
        assert!(hits.floor);
        assert!((b.pos.y - (800.0 - 236.0)).abs() < 1e-2);
        assert!((b.vel.y - -360.0).abs() < 1e-3);
        assert!((b.vel.x - 92.0).abs() < 1e-3);
        assert!((b.angular_vel - 92.0 / 1100.0 * 1.25).abs() < 1e-6);
    }

    #[test]
    fn test_side_walls_kick_spin_opposite() {
        let tuning = Tuning::default();
        let bounds = ShapeBounds::UNIT;

        let mut left = body(-20.0, 300.0);
        left.vel = Vec2::new(-200.0, 700.0);
        let hits = resolve_walls(&mut left, &bounds, VIEW, &tuning);
        assert!(hits.left);
        assert_eq!(left.pos.x, 0.0);
        assert!((left.vel.x - 144.0).abs() < 1e-3);
        assert!(left.angular_vel > 0.0);

        let mut right = body(1000.0 - 256.0 + 20.0, 300.0);
        right.vel = Vec2::new(200.0, 700.0);
        let hits = resolve_walls(&mut right, &bounds, VIEW, &tuning);
        assert!(hits.right);
        assert!((right.pos.x - (1000.0 - 256.0)).abs() < 1e-3);
        assert!((right.vel.x - -144.0).abs() < 1e-3);
        assert!((left.angular_vel + right.angular_vel).abs() < 1e-6);
    }

    #[test]
    fn test_corner_resolves_both_axes() {
        let tuning = Tuning::default();
        let mut b = body(-50.0, -50.0);
        b.vel = Vec2::new(-100.0, -100.0);
        let hits = resolve_walls(&mut b, &ShapeBounds::UNIT, VIEW, &tuning);
        assert!(hits.left && hits.top);
        assert_eq!(b.pos, Vec2::ZERO);
        assert!(b.vel.x > 0.0 && b.vel.y > 0.0);
    }
}
