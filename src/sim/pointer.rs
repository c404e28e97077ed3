//! Single-pointer grab state
//!
//! Exactly one physical pointer can hold exactly one token. While a grab is
//! active, events from any other pointer are ignored. Moves are coalesced in a
//! one-slot inbox and applied when the next step drains it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::BodyId;
use super::store::BodyStore;

/// Platform pointer identity (PointerEvent.pointerId on the web)
pub type PointerId = i32;

/// Raw pointer input, in screen px
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { pos: Vec2, pointer: PointerId },
    Move { pos: Vec2, pointer: PointerId },
    Up { pos: Vec2, pointer: PointerId },
    Cancel { pos: Vec2, pointer: PointerId },
}

/// An active grab
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Grab {
    pub body: BodyId,
    pub pointer: PointerId,
    /// Pointer minus body center at grab time, fixed for the whole grab
    pub offset: Vec2,
}

/// Latest known pointer state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointerState {
    /// Last pointer position seen by the grabbing pointer
    pub pos: Vec2,
    pub is_down: bool,
    pub grab: Option<Grab>,
}

impl PointerState {
    /// Spring target for the grabbed body's center
    #[inline]
    pub fn target_center(&self) -> Option<Vec2> {
        self.grab.map(|g| self.pos - g.offset)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PointerController {
    state: PointerState,
    /// Newest unapplied move from the grabbing pointer
    inbox: Option<Vec2>,
}

impl PointerController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PointerState {
        &self.state
    }

    pub fn grabbed(&self) -> Option<BodyId> {
        self.state.grab.map(|g| g.body)
    }

    #[inline]
    pub fn is_grabbed(&self, id: BodyId) -> bool {
        self.grabbed() == Some(id)
    }

    /// Dispatch a raw event. Returns true when a pointer-down started a grab,
    /// meaning the host should stop it reaching the UI underneath.
    pub fn handle(&mut self, event: PointerEvent, bodies: &BodyStore, grab_radius_frac: f32) -> bool {
        match event {
            PointerEvent::Down { pos, pointer } => self.down(pos, pointer, bodies, grab_radius_frac),
            PointerEvent::Move { pos, pointer } => {
                self.moved(pos, pointer);
                false
            }
            PointerEvent::Up { pointer, .. } | PointerEvent::Cancel { pointer, .. } => {
                self.release(pointer);
                false
            }
        }
    }

    /// Try to grab the nearest token whose grab radius contains `pos`
    pub fn down(
        &mut self,
        pos: Vec2,
        pointer: PointerId,
        bodies: &BodyStore,
        grab_radius_frac: f32,
    ) -> bool {
        if let Some(grab) = self.state.grab {
            log::trace!(
                "Pointer {} down ignored, {} already held by pointer {}",
                pointer,
                grab.body,
                grab.pointer
            );
            return false;
        }

        let mut chosen: Option<(BodyId, Vec2, f32)> = None;
        for body in bodies.iter() {
            let center = body.center();
            let dist = pos.distance(center);
            let reach = body.size() * grab_radius_frac;
            if dist <= reach && chosen.is_none_or(|(_, _, best)| dist < best) {
                chosen = Some((body.id, center, dist));
            }
        }

        let Some((body, center, _)) = chosen else {
            return false;
        };

        self.state = PointerState {
            pos,
            is_down: true,
            grab: Some(Grab {
                body,
                pointer,
                offset: pos - center,
            }),
        };
        self.inbox = None;
        log::debug!("Pointer {} grabbed {}", pointer, body);
        true
    }

    /// Queue a move from the grabbing pointer; others are ignored
    pub fn moved(&mut self, pos: Vec2, pointer: PointerId) {
        match self.state.grab {
            Some(grab) if grab.pointer == pointer => self.inbox = Some(pos),
            _ => {}
        }
    }

    /// Apply the newest queued move. Called once at the start of a step.
    pub fn drain(&mut self) {
        if let Some(pos) = self.inbox.take() {
            if self.state.grab.is_some() {
                self.state.pos = pos;
            }
        }
    }

    /// Up or cancel from the grabbing pointer ends the grab
    pub fn release(&mut self, pointer: PointerId) {
        match self.state.grab {
            Some(grab) if grab.pointer == pointer => {
                log::debug!("Pointer {} released {}", pointer, grab.body);
                self.reset();
            }
            _ => {}
        }
    }

    /// Drop a grab whose body no longer exists
    pub fn forget(&mut self, id: BodyId) {
        if self.is_grabbed(id) {
            log::debug!("Grabbed {} was removed, releasing", id);
            self.reset();
        }
    }

    /// Back to neutral
    pub fn reset(&mut self) {
        self.state = PointerState::default();
        self.inbox = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::Body;

    const GRAB: f32 = crate::consts::GRAB_RADIUS_FRAC;

    fn store() -> BodyStore {
        let mut store = BodyStore::new();
        // Centers at (100,100) and (400,100), grab radius 110
        store.insert(Body::new(BodyId(1), Vec2::new(0.0, 0.0), 200.0));
        store.insert(Body::new(BodyId(2), Vec2::new(300.0, 0.0), 200.0));
        store
    }

    #[test]
    fn test_grab_nearest_within_radius() {
        let bodies = store();
        let mut p = PointerController::new();
        assert!(p.down(Vec2::new(380.0, 90.0), 1, &bodies, GRAB));
        assert_eq!(p.grabbed(), Some(BodyId(2)));
        let grab = p.state().grab.unwrap();
        assert_eq!(grab.offset, Vec2::new(-20.0, -10.0));
        assert!(p.state().is_down);
    }

    #[test]
    fn test_overlapping_reach_picks_closer() {
        let mut bodies = BodyStore::new();
        bodies.insert(Body::new(BodyId(1), Vec2::new(0.0, 0.0), 200.0));
        bodies.insert(Body::new(BodyId(2), Vec2::new(150.0, 0.0), 200.0));
        let mut p = PointerController::new();
        // 80 from body 1's center, 70 from body 2's
        assert!(p.down(Vec2::new(180.0, 100.0), 1, &bodies, GRAB));
        assert_eq!(p.grabbed(), Some(BodyId(2)));
    }

    #[test]
    fn test_miss_is_not_consumed() {
        let bodies = store();
        let mut p = PointerController::new();
        assert!(!p.down(Vec2::new(250.0, 500.0), 1, &bodies, GRAB));
        assert_eq!(p.state(), &PointerState::default());
    }

    #[test]
    fn test_second_pointer_cannot_steal_grab() {
        let bodies = store();
        let mut p = PointerController::new();
        assert!(p.down(Vec2::new(100.0, 100.0), 1, &bodies, GRAB));
        assert!(!p.down(Vec2::new(400.0, 100.0), 2, &bodies, GRAB));
        assert_eq!(p.grabbed(), Some(BodyId(1)));

        // Foreign move and release are ignored too
        p.moved(Vec2::new(900.0, 900.0), 2);
        p.drain();
        assert_eq!(p.state().pos, Vec2::new(100.0, 100.0));
        p.release(2);
        assert_eq!(p.grabbed(), Some(BodyId(1)));
    }

    #[test]
    fn test_moves_coalesce_until_drain() {
        let bodies = store();
        let mut p = PointerController::new();
        p.down(Vec2::new(100.0, 100.0), 7, &bodies, GRAB);
        p.moved(Vec2::new(110.0, 100.0), 7);
        p.moved(Vec2::new(120.0, 130.0), 7);
        assert_eq!(p.state().pos, Vec2::new(100.0, 100.0));
        p.drain();
        assert_eq!(p.state().pos, Vec2::new(120.0, 130.0));
        assert_eq!(p.state().target_center(), Some(Vec2::new(120.0, 130.0)));
    }

    #[test]
    fn test_release_and_cancel() {
        let bodies = store();
        let mut p = PointerController::new();

        p.down(Vec2::new(100.0, 100.0), 3, &bodies, GRAB);
        let consumed = p.handle(
            PointerEvent::Up {
                pos: Vec2::ZERO,
                pointer: 3,
            },
            &bodies,
            GRAB,
        );
        assert!(!consumed);
        assert_eq!(p.state(), &PointerState::default());

        p.down(Vec2::new(100.0, 100.0), 4, &bodies, GRAB);
        p.moved(Vec2::new(5.0, 5.0), 4);
        p.handle(
            PointerEvent::Cancel {
                pos: Vec2::ZERO,
                pointer: 4,
            },
            &bodies,
            GRAB,
        );
        p.drain();
        assert_eq!(p.state(), &PointerState::default());
    }

    #[test]
    fn test_forget_removed_body() {
        let bodies = store();
        let mut p = PointerController::new();
        p.down(Vec2::new(100.0, 100.0), 1, &bodies, GRAB);
        p.forget(BodyId(2));
        assert_eq!(p.grabbed(), Some(BodyId(1)));
        p.forget(BodyId(1));
        assert_eq!(p.grabbed(), None);
    }
}
