//! Influence compositing for one region.
//!
//! Applying weights always starts from zero for the whole region, so a short
//! weight vector never leaves stale influences behind on trailing shapes.
//! Weights are stored verbatim; clamping is the caller's concern.

use crate::error::{MorphError, Result};
use crate::region::Region;
use crate::registry::{BlendShapeRegistry, MeshId, ReferenceMeshId};
use crate::renderer::Renderer;

/// Applies `weights` positionally to the region's shapes in registration order.
///
/// Excess weights are ignored; shapes beyond the end of `weights` stay at 0.
/// Fails with [`MorphError::RegionNotReady`] before touching anything if the
/// region has no shapes.
pub fn apply_weights<R: Renderer + ?Sized>(
    registry: &mut BlendShapeRegistry,
    mesh: MeshId,
    region: Region,
    weights: &[f32],
    renderer: &mut R,
) -> Result<()> {
    let slots: Vec<_> = registry
        .shapes_for_region(region)
        .iter()
        .map(|shape| shape.slot)
        .collect();
    if slots.is_empty() {
        return Err(MorphError::RegionNotReady(region));
    }

    registry.reset_region(region);
    for (&slot, &weight) in slots.iter().zip(weights) {
        registry.set_influence(slot, weight);
    }
    log::debug!("{mesh} {region} weights {weights:?} -> slots {slots:?}");

    signal(renderer, mesh);
    Ok(())
}

/// Applies `weights` positionally to `order`, resolving each reference to its
/// slot by `(region, reference)`.
///
/// This is the form used when the assignment order and the registration order
/// may differ, e.g. when reference fetches complete out of order. References
/// with no registered shape are skipped and left at 0. Returns how many
/// weights were applied.
pub fn apply_weights_ordered<R: Renderer + ?Sized>(
    registry: &mut BlendShapeRegistry,
    mesh: MeshId,
    region: Region,
    order: &[ReferenceMeshId],
    weights: &[f32],
    renderer: &mut R,
) -> Result<usize> {
    if registry.shapes_for_region(region).is_empty() {
        return Err(MorphError::RegionNotReady(region));
    }

    registry.reset_region(region);
    let mut applied = 0;
    for (reference, &weight) in order.iter().zip(weights) {
        if let Some(slot) = registry.slot_for(region, reference) {
            registry.set_influence(slot, weight);
            applied += 1;
        } else {
            log::warn!("no {region} shape registered for '{reference}' yet");
        }
    }
    log::debug!("{mesh} {region} weights {weights:?} applied to {applied} shapes");

    signal(renderer, mesh);
    Ok(applied)
}

fn signal<R: Renderer + ?Sized>(renderer: &mut R, mesh: MeshId) {
    renderer.mark_dirty(mesh);
    renderer.recompute_normals(mesh);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingRenderer {
        dirty: usize,
        normals: usize,
    }

    impl Renderer for CountingRenderer {
        fn mark_dirty(&mut self, _mesh: MeshId) {
            self.dirty += 1;
        }

        fn recompute_normals(&mut self, _mesh: MeshId) {
            self.normals += 1;
        }
    }

    fn registry_with(region: Region, references: &[&str]) -> BlendShapeRegistry {
        let mut registry = BlendShapeRegistry::new(1, 3);
        for &reference in references {
            registry
                .register_shape(region, reference.into(), vec![0.0; 3])
                .unwrap();
        }
        registry
    }

    #[test]
    fn test_apply_zeroes_previous_weights() {
        let mut registry = registry_with(Region::Nose, &["a", "b", "c"]);
        let mut renderer = CountingRenderer::default();
        let mesh = MeshId(1);

        apply_weights(&mut registry, mesh, Region::Nose, &[0.5, 0.3, 0.2], &mut renderer).unwrap();
        assert_eq!(registry.influences(), &[0.5, 0.3, 0.2]);

        apply_weights(&mut registry, mesh, Region::Nose, &[1.0], &mut renderer).unwrap();
        assert_eq!(registry.influences(), &[1.0, 0.0, 0.0]);
        assert_eq!((renderer.dirty, renderer.normals), (2, 2));
    }

    #[test]
    fn test_excess_weights_ignored_and_not_clamped() {
        let mut registry = registry_with(Region::Jaw, &["a"]);
        let mut renderer = CountingRenderer::default();
        apply_weights(&mut registry, MeshId(0), Region::Jaw, &[1.5, 0.7, 0.1], &mut renderer)
            .unwrap();
        assert_eq!(registry.influences(), &[1.5]);
    }

    #[test]
    fn test_other_regions_untouched() {
        let mut registry = registry_with(Region::Nose, &["a"]);
        registry
            .register_shape(Region::Chin, "a".into(), vec![0.0; 3])
            .unwrap();
        registry.set_influence(1, 0.9);
        let mut renderer = CountingRenderer::default();
        apply_weights(&mut registry, MeshId(0), Region::Nose, &[0.1], &mut renderer).unwrap();
        assert_eq!(registry.influences(), &[0.1, 0.9]);
    }

    #[test]
    fn test_region_not_ready_skips_renderer() {
        let mut registry = registry_with(Region::Nose, &["a"]);
        let mut renderer = CountingRenderer::default();
        let result = apply_weights(&mut registry, MeshId(0), Region::Ears, &[1.0], &mut renderer);
        assert!(matches!(result, Err(MorphError::RegionNotReady(Region::Ears))));
        assert_eq!((renderer.dirty, renderer.normals), (0, 0));

        let result = apply_weights_ordered(
            &mut registry,
            MeshId(0),
            Region::Ears,
            &["a".into()],
            &[1.0],
            &mut renderer,
        );
        assert!(matches!(result, Err(MorphError::RegionNotReady(Region::Ears))));
        assert_eq!(renderer.dirty, 0);
    }

    #[test]
    fn test_ordered_follows_assignment_not_registration() {
        // Registered b before a, but assigned a before b.
        let mut registry = registry_with(Region::Eyes, &["b", "a"]);
        let mut renderer = CountingRenderer::default();
        let order: Vec<ReferenceMeshId> = vec!["a".into(), "b".into(), "c".into()];
        let applied = apply_weights_ordered(
            &mut registry,
            MeshId(0),
            Region::Eyes,
            &order,
            &[0.6, 0.3, 0.1],
            &mut renderer,
        )
        .unwrap();
        assert_eq!(applied, 2);
        // Slot 0 holds b, slot 1 holds a.
        assert_eq!(registry.influences(), &[0.3, 0.6]);
    }
}
