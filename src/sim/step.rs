//! One frame of simulation
//!
//! Stage order is fixed: drain pointer inbox, integrate every body, resolve
//! token-token contacts, then resolve walls. Nothing is published until all
//! stages have run.

use super::collision::resolve_collisions;
use super::integrate::{apply_grab_spring, integrate_body};
use super::state::Simulation;
use super::walls::resolve_walls;
use crate::Viewport;
use crate::consts::FIRST_FRAME_DT;

/// What happened during one step (for logging and tests)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepReport {
    pub dt: f32,
    pub contacts: usize,
    pub wall_hits: usize,
    pub floor_hits: usize,
}

/// Advance the simulation by `dt` seconds (clamped to the tuning's max step)
pub fn step(sim: &mut Simulation, viewport: Viewport, dt: f32) -> StepReport {
    // min/max rather than clamp: a bad max_dt never panics
    let dt = if dt.is_finite() {
        dt.min(sim.tuning.max_dt).max(0.0)
    } else {
        0.0
    };
    let mut report = StepReport {
        dt,
        ..Default::default()
    };

    sim.pointer.drain();
    let grabbed = sim.pointer.grabbed();
    let pointer = sim.pointer.state().clone();

    // 1) Forces and motion
    for body in sim.bodies.iter_mut() {
        if grabbed == Some(body.id) {
            apply_grab_spring(body, &pointer, &sim.tuning, dt);
        }
        integrate_body(body, &sim.tuning, dt);
    }

    // 2) Token-token contacts
    report.contacts = resolve_collisions(&mut sim.bodies, grabbed, &sim.tuning, &mut sim.rng);

    // 3) Walls
    for body in sim.bodies.iter_mut() {
        let hits = resolve_walls(body, &sim.bounds, viewport, &sim.tuning);
        if hits.any() {
            report.wall_hits += 1;
        }
        if hits.floor {
            report.floor_hits += 1;
        }
    }

    log::trace!("{:?}", report);
    report
}

/// Turns host timestamps (ms) into clamped step lengths
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Step length for a frame at `now_ms`. The first frame after a reset
    /// uses a nominal 60 Hz step.
    pub fn tick(&mut self, now_ms: f64, max_dt: f32) -> f32 {
        let dt = match self.last_ms.replace(now_ms) {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => FIRST_FRAME_DT,
        };
        if dt.is_finite() {
            dt.min(max_dt).max(0.0)
        } else {
            0.0
        }
    }

    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}
