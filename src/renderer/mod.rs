//! Render output seam
//!
//! The simulation never draws. After each step it hands a [`RenderSink`] the
//! ordered live-id sequence (on spawn and clear) and one [`Transform`] per
//! live token (every frame). Web builds drive SVG elements through
//! [`dom::DomSink`]; tests and the native runner collect into a
//! [`TransformBuffer`].

#[cfg(target_arch = "wasm32")]
pub mod dom;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::sim::{Body, BodyId, Simulation};

/// Visual placement of one token
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translate_x: f32,
    pub translate_y: f32,
    /// Radians
    pub rotate: f32,
    pub width: f32,
    pub height: f32,
    pub visible: bool,
}

impl Transform {
    pub fn from_body(body: &Body) -> Self {
        Self {
            translate_x: body.pos.x,
            translate_y: body.pos.y,
            rotate: body.angle,
            width: body.size(),
            height: body.size(),
            visible: true,
        }
    }

    /// CSS transform for an absolutely positioned element
    pub fn css(&self) -> String {
        format!(
            "translate3d({}px, {}px, 0) rotate({}rad)",
            self.translate_x, self.translate_y, self.rotate
        )
    }
}

/// Receiver of simulation output
pub trait RenderSink {
    /// Live ids changed (spawn, eviction, clear). Ids are in spawn order.
    fn sync_ids(&mut self, ids: &[BodyId]);

    /// Per-frame placement. Ids the sink does not know are skipped.
    fn apply(&mut self, id: BodyId, transform: &Transform);
}

/// Push every live body's transform to the sink
pub fn publish<S: RenderSink + ?Sized>(sim: &Simulation, sink: &mut S) {
    for body in sim.bodies().iter() {
        sink.apply(body.id, &Transform::from_body(body));
    }
}

/// In-memory sink
#[derive(Debug, Clone, Default)]
pub struct TransformBuffer {
    ids: Vec<BodyId>,
    transforms: BTreeMap<BodyId, Transform>,
    /// Transforms received for ids that were not live
    pub skipped: usize,
    /// Number of `apply` calls that landed
    pub applied: usize,
}

impl TransformBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[BodyId] {
        &self.ids
    }

    pub fn get(&self, id: BodyId) -> Option<&Transform> {
        self.transforms.get(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl RenderSink for TransformBuffer {
    fn sync_ids(&mut self, ids: &[BodyId]) {
        self.ids = ids.to_vec();
        self.transforms.retain(|id, _| ids.contains(id));
    }

    fn apply(&mut self, id: BodyId, transform: &Transform) {
        if !self.ids.contains(&id) {
            self.skipped += 1;
            return;
        }
        self.transforms.insert(id, *transform);
        self.applied += 1;
    }
}
