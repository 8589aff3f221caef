//! A renderer that records what it was asked to do.
//!
//! Useful for tests and for driving the pipeline without a GPU.

use facemorph_core::{MeshId, Renderer};

/// A request received by the [`HeadlessRenderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderEvent {
    Dirty(MeshId),
    RecomputeNormals(MeshId),
}

/// Records renderer requests in order.
#[derive(Debug, Clone, Default)]
pub struct HeadlessRenderer {
    events: Vec<RenderEvent>,
}

impl HeadlessRenderer {
    /// Creates a renderer with no recorded events.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded events.
    pub fn events(&self) -> &[RenderEvent] {
        &self.events
    }

    /// Returns and clears the recorded events.
    pub fn take_events(&mut self) -> Vec<RenderEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Renderer for HeadlessRenderer {
    fn mark_dirty(&mut self, mesh: MeshId) {
        self.events.push(RenderEvent::Dirty(mesh));
    }

    fn recompute_normals(&mut self, mesh: MeshId) {
        self.events.push(RenderEvent::RecomputeNormals(mesh));
    }
}
