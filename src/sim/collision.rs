//! Token-token collision
//!
//! Each token is approximated by a circle of radius `0.36 * size` around its
//! center. Overlapping pairs are pushed apart and exchange a restitution
//! impulse along the contact normal plus a small friction impulse along the
//! tangent, which also kicks their spin. A grabbed token is driven only by
//! its pointer spring: it never moves or changes velocity here, and its
//! partner absorbs the full response.

use glam::Vec2;
use rand::Rng;

use super::body::{Body, BodyId};
use super::store::BodyStore;
use crate::settings::Tuning;

/// Overlap between two circle proxies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit normal pointing from A toward B
    pub normal: Vec2,
    /// Depth of overlap along the normal (px, > 0)
    pub penetration: f32,
}

/// Test two circles for overlap. `nudge` supplies the separation direction
/// when the centers coincide exactly.
pub fn circle_contact(
    center_a: Vec2,
    radius_a: f32,
    center_b: Vec2,
    radius_b: f32,
    nudge: impl FnOnce() -> Vec2,
) -> Option<Contact> {
    let mut delta = center_b - center_a;
    let mut dist = delta.length();
    if dist == 0.0 {
        delta = nudge();
        dist = delta.length();
        if dist == 0.0 || !dist.is_finite() {
            return None;
        }
    }

    let penetration = radius_a + radius_b - dist;
    if penetration <= 0.0 {
        return None;
    }
    Some(Contact {
        normal: delta / dist,
        penetration,
    })
}

/// Tiny random offset used to split exactly coincident centers
pub fn coincident_nudge<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5) * 0.01
}

/// Resolve one overlapping pair in place
pub fn resolve_pair<R: Rng + ?Sized>(
    a: &mut Body,
    b: &mut Body,
    grabbed: Option<BodyId>,
    tuning: &Tuning,
    rng: &mut R,
) -> bool {
    let ra = a.proxy_radius(tuning.proxy_radius_frac);
    let rb = b.proxy_radius(tuning.proxy_radius_frac);
    let Some(contact) = circle_contact(a.center(), ra, b.center(), rb, || coincident_nudge(rng))
    else {
        return false;
    };
    let n = contact.normal;

    let a_held = grabbed == Some(a.id);
    let b_held = grabbed == Some(b.id);
    // Share of the correction each side takes
    let (move_a, move_b) = match (a_held, b_held) {
        (true, _) => (0.0, 1.0),
        (false, true) => (1.0, 0.0),
        (false, false) => (0.5, 0.5),
    };
    let split = if a_held || b_held { 1.0 } else { 2.0 };

    let sep = (contact.penetration - tuning.collision_slop).max(0.0);
    a.pos -= n * sep * move_a;
    b.pos += n * sep * move_b;

    let rel = b.vel - a.vel;
    let vn = rel.dot(n);
    if vn > 0.0 {
        // Already separating
        return true;
    }

    let j = -(1.0 + tuning.body_restitution) * vn / split;
    let impulse = n * j;
    if !a_held {
        a.vel -= impulse;
    }
    if !b_held {
        b.vel += impulse;
    }

    let t = n.perp();
    let vt = rel.dot(t);
    let jt = -vt * tuning.body_friction / split;
    let friction = t * jt;
    if !a_held {
        a.vel -= friction;
        a.angular_vel += jt * ra.max(1.0) / a.spin_inertia();
    }
    if !b_held {
        b.vel += friction;
        b.angular_vel -= jt * rb.max(1.0) / b.spin_inertia();
    }
    true
}

/// All unordered pairs in spawn order, repeated `collision_iterations` times.
/// Returns the number of contacts resolved.
pub fn resolve_collisions<R: Rng + ?Sized>(
    bodies: &mut BodyStore,
    grabbed: Option<BodyId>,
    tuning: &Tuning,
    rng: &mut R,
) -> usize {
    let n = bodies.len();
    let mut contacts = 0;
    for _ in 0..tuning.collision_iterations {
        for i in 0..n {
            for j in (i + 1)..n {
                let (a, b) = bodies.pair_mut(i, j);
                if resolve_pair(a, b, grabbed, tuning, rng) {
                    contacts += 1;
                }
            }
        }
    }
    contacts
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn body(id: u32, x: f32, y: f32) -> Body {
        Body::new(BodyId(id), Vec2::new(x, y), 200.0)
    }

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(9)
    }

    #[test]
    fn test_circle_contact() {
        let c = circle_contact(Vec2::ZERO, 72.0, Vec2::new(100.0, 0.0), 72.0, || Vec2::ZERO)
            .unwrap();
        assert_eq!(c.normal, Vec2::X);
        assert!((c.penetration - 44.0).abs() < 1e-4);

        assert!(
            circle_contact(Vec2::ZERO, 72.0, Vec2::new(200.0, 0.0), 72.0, || Vec2::ZERO).is_none()
        );
    }

    #[test]
    fn test_coincident_centers_use_nudge() {
        let c = circle_contact(Vec2::ZERO, 10.0, Vec2::ZERO, 10.0, || Vec2::new(0.0, 0.004))
            .unwrap();
        assert_eq!(c.normal, Vec2::Y);
        assert!((c.penetration - 19.996).abs() < 1e-3);
    }

    #[test]
    fn test_coincident_bodies_separate() {
        let tuning = Tuning::default();
        let mut a = body(1, 100.0, 100.0);
        let mut b = body(2, 100.0, 100.0);
        assert!(resolve_pair(&mut a, &mut b, None, &tuning, &mut rng()));
        assert!(a.center().distance(b.center()) > 100.0);
        assert!(a.pos.is_finite() && b.pos.is_finite());
    }

    #[test]
    fn test_free_pair_splits_correction() {
        let tuning = Tuning::default();
        // Radii 72 each, centers 100 apart: overlap 44, minus slop 0.5
        let mut a = body(1, 0.0, 0.0);
        let mut b = body(2, 100.0, 0.0);
        resolve_pair(&mut a, &mut b, None, &tuning, &mut rng());
        assert!((a.pos.x - -21.75).abs() < 1e-3);
        assert!((b.pos.x - 121.75).abs() < 1e-3);
    }

    #[test]
    fn test_head_on_impulse() {
        let tuning = Tuning::default();
        let mut a = body(1, 0.0, 0.0);
        let mut b = body(2, 100.0, 0.0);
        a.vel = Vec2::new(100.0, 0.0);
        b.vel = Vec2::new(-100.0, 0.0);
        resolve_pair(&mut a, &mut b, None, &tuning, &mut rng());
        // vn = -200, j = 1.35 * 200 / 2 = 135
        assert!((a.vel.x - -35.0).abs() < 1e-3);
        assert!((b.vel.x - 35.0).abs() < 1e-3);
        // No tangential motion: no spin
        assert_eq!(a.angular_vel, 0.0);
        assert_eq!(b.angular_vel, 0.0);
    }

    #[test]
    fn test_separating_pair_only_corrected() {
        let tuning = Tuning::default();
        let mut a = body(1, 0.0, 0.0);
        let mut b = body(2, 100.0, 0.0);
        a.vel = Vec2::new(-50.0, 0.0);
        b.vel = Vec2::new(50.0, 0.0);
        resolve_pair(&mut a, &mut b, None, &tuning, &mut rng());
        assert_eq!(a.vel, Vec2::new(-50.0, 0.0));
        assert_eq!(b.vel, Vec2::new(50.0, 0.0));
    }

    #[test]
    fn test_grabbed_body_is_immovable() {
        let tuning = Tuning::default();
        let mut a = body(1, 0.0, 0.0);
        let mut b = body(2, 100.0, 0.0);
        a.vel = Vec2::new(100.0, 30.0);
        b.vel = Vec2::new(-100.0, 0.0);
        let before = a.clone();
        resolve_pair(&mut a, &mut b, Some(BodyId(1)), &tuning, &mut rng());
        assert_eq!(a, before);
        // Partner takes the full correction and the full impulse
        assert!((b.pos.x - 143.5).abs() < 1e-3);
        // vn = -200, j = 1.35 * 200 = 270
        assert!((b.vel.x - 170.0).abs() < 1e-3);
        assert!(b.angular_vel != 0.0);
    }

    #[test]
    fn test_friction_spins_opposite_ways() {
        let tuning = Tuning::default();
        let mut a = body(1, 0.0, 0.0);
        let mut b = body(2, 100.0, 0.0);
        a.vel = Vec2::new(10.0, 0.0);
        b.vel = Vec2::new(-10.0, 100.0);
        resolve_pair(&mut a, &mut b, None, &tuning, &mut rng());
        assert!(a.angular_vel * b.angular_vel < 0.0);
        assert!((a.angular_vel + b.angular_vel).abs() < 1e-6);
    }

    #[test]
    fn test_resolve_collisions_counts_pairs() {
        let tuning = Tuning::default();
        let mut bodies = BodyStore::new();
        bodies.insert(body(1, 0.0, 0.0));
        bodies.insert(body(2, 100.0, 0.0));
        bodies.insert(body(3, 2000.0, 0.0));
        let contacts = resolve_collisions(&mut bodies, None, &tuning, &mut rng());
        // Second iteration still sees the slop-sized overlap
        assert_eq!(contacts, 2);
        let far = bodies.get(BodyId(3)).unwrap();
        assert_eq!(far.pos, Vec2::new(2000.0, 0.0));
    }
}
