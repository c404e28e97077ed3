//! Deterministic simulation module
//!
//! All physics lives here. This module must stay pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (spawn order, which is id order)
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod integrate;
pub mod pointer;
pub mod shape;
pub mod spawn;
pub mod state;
pub mod step;
pub mod store;
pub mod walls;

pub use body::{Body, BodyId};
pub use collision::{Contact, circle_contact, resolve_collisions, resolve_pair};
pub use integrate::{apply_grab_spring, integrate_body};
pub use pointer::{Grab, PointerController, PointerEvent, PointerId, PointerState};
pub use shape::{HEART_PATH, HEART_VIEWBOX, ShapeBounds, ShapeBox};
pub use spawn::{SpawnOutcome, Spawner, random_spawn_center};
pub use state::Simulation;
pub use step::{FrameClock, StepReport, step};
pub use store::BodyStore;
pub use walls::{WallHits, resolve_walls};
