//! Per-frame force integration
//!
//! Semi-implicit Euler with unit mass: forces are velocity rates. Drag is a
//! flat per-frame multiplier rather than time-correct decay, which is stable
//! as long as `dt` stays under the frame clamp.

use super::body::Body;
use super::pointer::PointerState;
use crate::settings::Tuning;
use crate::{cross, finite_or_zero};

/// Pointer spring acting on the grabbed body: velocity and spin change
pub fn apply_grab_spring(body: &mut Body, pointer: &PointerState, tuning: &Tuning, dt: f32) {
    let Some(target) = pointer.target_center() else {
        return;
    };
    let center = body.center();
    let force = (target - center) * tuning.spring_k;
    body.vel += force * dt;

    // Lever arm runs from the center to where the pointer actually is
    let lever = pointer.pos - center;
    let torque = cross(lever, force);
    body.angular_vel += torque / body.spin_inertia() * tuning.grab_torque_scale * dt;
}

/// Gravity, drag, speed clamp, then position and angle
pub fn integrate_body(body: &mut Body, tuning: &Tuning, dt: f32) {
    body.vel.y += tuning.gravity * dt;
    body.vel *= tuning.air_drag;
    body.vel = finite_or_zero(body.vel);
    body.vel.x = body.vel.x.max(-tuning.max_speed).min(tuning.max_speed);
    body.vel.y = body.vel.y.max(-tuning.max_speed).min(tuning.max_speed);

    body.pos = finite_or_zero(body.pos + body.vel * dt);

    body.angular_vel *= tuning.angular_drag;
    if !body.angular_vel.is_finite() {
        body.angular_vel = 0.0;
    }
    body.angle += body.angular_vel * dt;
    if !body.angle.is_finite() {
        body.angle = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::BodyId;
    use crate::sim::pointer::Grab;
    use glam::Vec2;

    const DT: f32 = 1.0 / 60.0;

    fn body() -> Body {
        let mut b = Body::new(BodyId(1), Vec2::new(100.0, 100.0), 200.0);
        b.vel = Vec2::new(0.0, -1100.0);
        b
    }

    #[test]
    fn test_gravity_then_drag() {
        let tuning = Tuning::default();
        let mut b = body();
        integrate_body(&mut b, &tuning, DT);
        let expected_vy = (-1100.0 + 2400.0 * DT) * 0.997;
        assert!((b.vel.y - expected_vy).abs() < 1e-3);
        assert!((b.pos.y - (100.0 + expected_vy * DT)).abs() < 1e-3);
    }

    #[test]
    fn test_free_flight_matches_closed_form() {
        let tuning = Tuning::default();
        let mut b = body();
        let mut expected = -1100.0f32;
        for _ in 0..20 {
            integrate_body(&mut b, &tuning, DT);
            expected = (expected + 2400.0 * DT) * 0.997;
        }
        assert!((b.vel.y - expected).abs() < 1e-2);
    }

    #[test]
    fn test_speed_clamp() {
        let tuning = Tuning::default();
        let mut b = body();
        b.vel = Vec2::new(10_000.0, -10_000.0);
        integrate_body(&mut b, &tuning, DT);
        assert_eq!(b.vel.x, 2400.0);
        assert_eq!(b.vel.y, -2400.0);
    }

    #[test]
    fn test_non_finite_state_is_reset() {
        let tuning = Tuning::default();
        let mut b = body();
        b.vel = Vec2::new(f32::NAN, f32::INFINITY);
        b.angular_vel = f32::NAN;
        integrate_body(&mut b, &tuning, DT);
        assert!(b.vel.is_finite());
        assert!(b.pos.is_finite());
        assert_eq!(b.angular_vel, 0.0);
        assert!(b.angle.is_finite());
    }

    #[test]
    fn test_angular_drag() {
        let tuning = Tuning::default();
        let mut b = body();
        b.angular_vel = 1.0;
        integrate_body(&mut b, &tuning, DT);
        assert!((b.angular_vel - 0.992).abs() < 1e-6);
        assert!((b.angle - 0.992 * DT).abs() < 1e-6);
    }

    #[test]
    fn test_spring_pulls_toward_target() {
        let tuning = Tuning::default();
        let mut b = body();
        b.vel = Vec2::ZERO;
        // Grabbed at the center, pointer dragged 100px right
        let pointer = PointerState {
            pos: Vec2::new(300.0, 200.0),
            is_down: true,
            grab: Some(Grab {
                body: b.id,
                pointer: 1,
                offset: Vec2::ZERO,
            }),
        };
        apply_grab_spring(&mut b, &pointer, &tuning, DT);
        assert!((b.vel.x - 100.0 * 55.0 * DT).abs() < 1e-3);
        assert_eq!(b.vel.y, 0.0);
        // Lever parallel to force: no torque
        assert_eq!(b.angular_vel, 0.0);
    }

    #[test]
    fn test_off_center_grab_spins() {
        let tuning = Tuning::default();
        let mut b = body();
        b.vel = Vec2::ZERO;
        // Held 50px right of center, pointer moved straight down
        let pointer = PointerState {
            pos: Vec2::new(250.0, 300.0),
            is_down: true,
            grab: Some(Grab {
                body: b.id,
                pointer: 1,
                offset: Vec2::new(50.0, 0.0),
            }),
        };
        apply_grab_spring(&mut b, &pointer, &tuning, DT);
        // force = (0, 100*55), lever = (50, 100): torque = 50 * 5500
        let expected = 50.0 * 5500.0 / (200.0 * 200.0) * 1.35 * DT;
        assert!((b.angular_vel - expected).abs() < 1e-4);
    }

    #[test]
    fn test_no_grab_no_spring() {
        let tuning = Tuning::default();
        let mut b = body();
        apply_grab_spring(&mut b, &PointerState::default(), &tuning, DT);
        assert_eq!(b.vel, Vec2::new(0.0, -1100.0));
    }
}
