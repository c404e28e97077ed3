//! Body storage
//!
//! Bodies live in a dense vector kept in spawn order. Ids are handed out
//! monotonically, so spawn order is also id order and lookups are a binary
//! search. Eviction always takes from the front.

use super::body::{Body, BodyId};

#[derive(Debug, Clone, Default)]
pub struct BodyStore {
    bodies: Vec<Body>,
}

impl BodyStore {
    pub fn new() -> Self {
        Self { bodies: Vec::new() }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Append a freshly spawned body. Its id must be newer than every live id.
    pub fn insert(&mut self, body: Body) {
        debug_assert!(
            self.bodies.last().is_none_or(|last| last.id < body.id),
            "bodies must be inserted in id order"
        );
        self.bodies.push(body);
    }

    fn index_of(&self, id: BodyId) -> Option<usize> {
        self.bodies.binary_search_by_key(&id, |b| b.id).ok()
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.index_of(id).map(|i| &self.bodies[i])
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.index_of(id).map(move |i| &mut self.bodies[i])
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn remove(&mut self, id: BodyId) -> Option<Body> {
        self.index_of(id).map(|i| self.bodies.remove(i))
    }

    /// Drop the oldest bodies until at most `keep` remain; returns evicted ids
    pub fn evict_oldest(&mut self, keep: usize) -> Vec<BodyId> {
        let surplus = self.bodies.len().saturating_sub(keep);
        self.bodies.drain(..surplus).map(|b| b.id).collect()
    }

    pub fn clear(&mut self) {
        self.bodies.clear();
    }

    /// Live ids in spawn order
    pub fn ids(&self) -> Vec<BodyId> {
        self.bodies.iter().map(|b| b.id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Body> {
        self.bodies.iter_mut()
    }

    /// Mutable access to two distinct bodies by index (`a < b`)
    pub fn pair_mut(&mut self, a: usize, b: usize) -> (&mut Body, &mut Body) {
        debug_assert!(a < b);
        let (head, tail) = self.bodies.split_at_mut(b);
        (&mut head[a], &mut tail[0])
    }
}
