use std::collections::{HashMap, HashSet};

use crate::types::{BodyHandle, ElementId, ElementTag};

/// Per-element side-table: which body an element is bound to and whether it
/// is declared circular.
#[derive(Clone, Debug, Default)]
pub struct TagTable {
    tags: HashMap<ElementId, ElementTag>,
}

impl TagTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag for `id`, or the empty tag (no body, rectangular).
    pub fn get(&self, id: ElementId) -> ElementTag {
        self.tags.get(&id).copied().unwrap_or_default()
    }

    pub fn body(&self, id: ElementId) -> Option<BodyHandle> {
        self.tags.get(&id).and_then(|t| t.body)
    }

    pub fn is_circle(&self, id: ElementId) -> bool {
        self.tags.get(&id).is_some_and(|t| t.is_circle)
    }

    pub fn set_circle(&mut self, id: ElementId, is_circle: bool) {
        self.tags.entry(id).or_default().is_circle = is_circle;
    }

    /// Bind `id` to `body`, returning the body it was bound to before.
    pub fn set_body(&mut self, id: ElementId, body: BodyHandle) -> Option<BodyHandle> {
        self.tags.entry(id).or_default().body.replace(body)
    }

    /// Forget every body binding; shape flags survive.
    pub fn clear_bodies(&mut self) {
        for tag in self.tags.values_mut() {
            tag.body = None;
        }
    }

    /// Drop the body bindings of elements not in `live`, returning those
    /// bodies. Shape flags are kept in case the element comes back.
    pub fn release_missing(&mut self, live: &[ElementId]) -> Vec<BodyHandle> {
        let live: HashSet<ElementId> = live.iter().copied().collect();
        let mut released = Vec::new();
        for (id, tag) in self.tags.iter_mut() {
            if !live.contains(id) {
                if let Some(body) = tag.body.take() {
                    released.push(body);
                }
            }
        }
        self.tags.retain(|_, tag| tag.body.is_some() || tag.is_circle);
        released
    }

    /// Number of elements currently bound to a body.
    pub fn bound_count(&self) -> usize {
        self.tags.values().filter(|t| t.body.is_some()).count()
    }
}
