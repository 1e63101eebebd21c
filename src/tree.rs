use crate::api::ViewHost;
use crate::types::{ElementFrame, ElementId};

/// One element of a [`HeadlessTree`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Element {
    pub id: ElementId,
    pub frame: ElementFrame,
    /// Degrees.
    pub rotation: f32,
}

/// In-memory [`ViewHost`] for headless runs and tests: a flat list of
/// elements plus a count of redraw requests.
#[derive(Clone, Debug, Default)]
pub struct HeadlessTree {
    elements: Vec<Element>,
    invalidations: u64,
}

impl HeadlessTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element, replacing any existing one with the same id.
    pub fn insert(&mut self, id: ElementId, frame: ElementFrame) {
        self.remove(id);
        self.elements.push(Element {
            id,
            frame,
            rotation: 0.0,
        });
    }

    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        let idx = self.elements.iter().position(|e| e.id == id)?;
        Some(self.elements.remove(idx))
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Redraw requests received so far.
    pub fn invalidations(&self) -> u64 {
        self.invalidations
    }
}

impl ViewHost for HeadlessTree {
    fn children(&self) -> Vec<ElementId> {
        self.elements.iter().map(|e| e.id).collect()
    }

    fn frame(&self, id: ElementId) -> Option<ElementFrame> {
        self.get(id).map(|e| e.frame)
    }

    fn set_pose(&mut self, id: ElementId, x: f32, y: f32, rotation: f32) {
        if let Some(e) = self.elements.iter_mut().find(|e| e.id == id) {
            e.frame.x = x;
            e.frame.y = y;
            e.rotation = rotation;
        }
    }

    fn invalidate(&mut self) {
        self.invalidations += 1;
    }
}
