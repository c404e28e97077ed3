//! Simulation context
//!
//! Everything the frame step mutates lives in one explicit struct owned by
//! the caller. Event handlers and the frame callback take `&mut Simulation`
//! in turn; they never overlap.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::body::{Body, BodyId};
use super::pointer::{PointerController, PointerEvent, PointerId};
use super::shape::ShapeBounds;
use super::spawn::{SpawnOutcome, Spawner, random_spawn_center};
use super::store::BodyStore;
use crate::Viewport;
use crate::settings::Tuning;

pub struct Simulation {
    /// Seed the RNG was created from
    pub seed: u64,
    pub tuning: Tuning,
    pub bounds: ShapeBounds,
    pub(crate) bodies: BodyStore,
    pub(crate) pointer: PointerController,
    pub(crate) spawner: Spawner,
    pub(crate) rng: Pcg32,
}

impl Simulation {
    /// Invalid tuning is replaced by the defaults (with a warning)
    pub fn new(seed: u64, tuning: Tuning, bounds: ShapeBounds) -> Self {
        let tuning = match tuning.validate() {
            Ok(()) => tuning,
            Err(e) => {
                log::warn!("Rejected tuning ({}), using defaults", e);
                Tuning::default()
            }
        };
        Self {
            seed,
            tuning,
            bounds,
            bodies: BodyStore::new(),
            pointer: PointerController::new(),
            spawner: Spawner::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Default tuning and the heart silhouette
    pub fn with_seed(seed: u64) -> Self {
        Self::new(seed, Tuning::default(), ShapeBounds::heart())
    }

    pub fn bodies(&self) -> &BodyStore {
        &self.bodies
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(id)
    }

    pub fn pointer(&self) -> &PointerController {
        &self.pointer
    }

    /// Live ids in spawn order
    pub fn live_ids(&self) -> Vec<BodyId> {
        self.bodies.ids()
    }

    /// Spawn trigger
    pub fn spawn(&mut self, viewport: Viewport, center_hint: Option<f32>) -> SpawnOutcome {
        let outcome = self.spawner.spawn(
            &mut self.bodies,
            viewport,
            center_hint,
            &self.tuning,
            &mut self.rng,
        );
        for &id in &outcome.evicted {
            self.pointer.forget(id);
        }
        outcome
    }

    /// Horizontal hint chosen the way the trigger control does it
    pub fn random_spawn_center(&mut self, viewport: Viewport) -> f32 {
        random_spawn_center(viewport, &self.tuning, &mut self.rng)
    }

    /// Clear trigger: drop every token and release the pointer.
    /// Returns how many tokens were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.bodies.len();
        self.bodies.clear();
        self.pointer.reset();
        if removed > 0 {
            log::info!("Cleared {} tokens", removed);
        }
        removed
    }

    /// Feed one raw pointer event; true when it started a grab
    pub fn pointer_event(&mut self, event: PointerEvent) -> bool {
        self.pointer
            .handle(event, &self.bodies, self.tuning.grab_radius_frac)
    }

    pub fn pointer_down(&mut self, pos: Vec2, pointer: PointerId) -> bool {
        self.pointer_event(PointerEvent::Down { pos, pointer })
    }

    pub fn pointer_move(&mut self, pos: Vec2, pointer: PointerId) {
        self.pointer_event(PointerEvent::Move { pos, pointer });
    }

    pub fn pointer_up(&mut self, pos: Vec2, pointer: PointerId) {
        self.pointer_event(PointerEvent::Up { pos, pointer });
    }

    pub fn pointer_cancel(&mut self, pos: Vec2, pointer: PointerId) {
        self.pointer_event(PointerEvent::Cancel { pos, pointer });
    }
}
