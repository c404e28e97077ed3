//! Token spawning and the population cap

use glam::Vec2;
use rand::Rng;

use super::body::{Body, BodyId};
use super::store::BodyStore;
use crate::consts::PEEK_WIDTH;
use crate::settings::Tuning;
use crate::{Viewport, uniform};

/// What a spawn did to the live set
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnOutcome {
    pub id: BodyId,
    /// Oldest ids removed to respect the cap, oldest first
    pub evicted: Vec<BodyId>,
}

#[derive(Debug, Clone)]
pub struct Spawner {
    next_id: u32,
}

impl Default for Spawner {
    fn default() -> Self {
        Self::new()
    }
}

impl Spawner {
    pub fn new() -> Self {
        Self { next_id: 1 }
    }

    /// Allocate a new token id
    fn next_body_id(&mut self) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Size before the random scale: 28% of the short side, kept in [180, 260]
    pub fn base_size(viewport: Viewport, tuning: &Tuning) -> f32 {
        (viewport.min_side() * tuning.size_viewport_frac)
            .floor()
            .max(tuning.base_size_min)
            .min(tuning.base_size_max)
    }

    /// Largest size a spawn could draw in this viewport
    pub fn max_size(viewport: Viewport, tuning: &Tuning) -> f32 {
        (Self::base_size(viewport, tuning) * tuning.size_scale_max)
            .max(tuning.size_min)
            .min(tuning.size_max)
            .floor()
    }

    /// Create one token launched upward from near the floor, then enforce the cap
    pub fn spawn<R: Rng + ?Sized>(
        &mut self,
        bodies: &mut BodyStore,
        viewport: Viewport,
        center_hint: Option<f32>,
        tuning: &Tuning,
        rng: &mut R,
    ) -> SpawnOutcome {
        let scale = uniform(rng, tuning.size_scale_min, tuning.size_scale_max);
        let size = (Self::base_size(viewport, tuning) * scale)
            .max(tuning.size_min)
            .min(tuning.size_max)
            .floor();

        let x = match center_hint {
            Some(center) if center.is_finite() => (center - size / 2.0).floor(),
            _ => uniform(rng, 0.0, (viewport.width - size).max(1.0)).floor(),
        };
        let y = viewport.height - size - tuning.spawn_floor_gap;

        let id = self.next_body_id();
        let mut body = Body::new(id, Vec2::new(x, y), size);
        body.vel = Vec2::new(uniform(rng, -tuning.launch_vx, tuning.launch_vx), tuning.launch_vy);
        body.angle = uniform(rng, -tuning.launch_tilt, tuning.launch_tilt);
        body.angular_vel = uniform(rng, -tuning.launch_spin, tuning.launch_spin);
        bodies.insert(body);

        // The newest token is last in spawn order, so it always survives
        let evicted = bodies.evict_oldest(tuning.max_live.max(1));
        log::debug!(
            "Spawned {} (size {}) at ({}, {}), evicted {:?}",
            id,
            size,
            x,
            y,
            evicted
        );

        SpawnOutcome { id, evicted }
    }
}

/// Pick a horizontal spawn center the way the trigger button does: far enough
/// from both edges that the peek image and the largest token fit on screen.
pub fn random_spawn_center<R: Rng + ?Sized>(
    viewport: Viewport,
    tuning: &Tuning,
    rng: &mut R,
) -> f32 {
    let half = PEEK_WIDTH.max(Spawner::max_size(viewport, tuning)) / 2.0;
    let max_center = half.max(viewport.width - half);
    if max_center == half {
        half.floor()
    } else {
        uniform(rng, half, max_center).floor()
    }
}
