//! Renderer seam.
//!
//! The core never touches GPU state. After influences change it tells the
//! renderer which mesh is dirty; the renderer re-evaluates positions from the
//! blend shapes and recomputes normals from the composited positions.

use crate::registry::MeshId;

/// The consumer of influence changes.
pub trait Renderer {
    /// The mesh's vertex positions must be re-evaluated.
    fn mark_dirty(&mut self, mesh: MeshId);

    /// The mesh's normals must be recomputed from its composited positions.
    fn recompute_normals(&mut self, mesh: MeshId);
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn mark_dirty(&mut self, mesh: MeshId) {
        (**self).mark_dirty(mesh);
    }

    fn recompute_normals(&mut self, mesh: MeshId) {
        (**self).recompute_normals(mesh);
    }
}
