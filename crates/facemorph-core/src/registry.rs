//! Blend-shape registry for a single visible mesh.
//!
//! Every blend shape is derived from one reference mesh for one region and is
//! given a slot that never changes and is never reused. Slots index both the
//! delta list and the influence vector.

use std::fmt;

use crate::buffer::{MeshBuffer, POSITION_COMPONENTS};
use crate::error::{MorphError, Result};
use crate::region::Region;

/// Identity of a visible mesh. A new one is issued every time the avatar is
/// (re)loaded, so stale work can be detected by comparing ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(pub u64);

impl fmt::Display for MeshId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mesh#{}", self.0)
    }
}

/// Identity of a reference (donor) mesh, usually the avatar id it was
/// fetched under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReferenceMeshId(pub String);

impl ReferenceMeshId {
    /// Creates a reference id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReferenceMeshId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ReferenceMeshId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Stable index of a blend shape on its mesh.
pub type Slot = usize;

/// Lifecycle of a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryState {
    /// No blend shape registered yet.
    Uninitialized,
    /// At least one blend shape registered.
    Initialized,
    /// The owning mesh was replaced; the registry accepts nothing more.
    Discarded,
}

/// A stored per-vertex offset buffer.
#[derive(Debug, Clone)]
pub struct BlendShape {
    slot: Slot,
    region: Region,
    reference: ReferenceMeshId,
    delta: Vec<f32>,
}

impl BlendShape {
    /// Returns the slot of this shape.
    pub fn slot(&self) -> Slot {
        self.slot
    }

    /// Returns the region this shape deforms.
    pub fn region(&self) -> Region {
        self.region
    }

    /// Returns the reference mesh this shape was derived from.
    pub fn reference(&self) -> &ReferenceMeshId {
        &self.reference
    }

    /// Returns the delta buffer.
    pub fn delta(&self) -> &[f32] {
        &self.delta
    }

    /// Name in the `<Region><n>` form used for morph dictionaries.
    pub fn name(&self, ordinal: usize) -> String {
        format!("{}{ordinal}", self.region)
    }
}

/// A slot and the reference mesh it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeRef<'a> {
    pub slot: Slot,
    pub reference: &'a ReferenceMeshId,
}

/// The blend shapes of one visible mesh.
#[derive(Debug, Clone)]
pub struct BlendShapeRegistry {
    vertex_count: usize,
    stride: usize,
    state: RegistryState,
    shapes: Vec<BlendShape>,
    influences: Vec<f32>,
    next_slot: Slot,
}

impl BlendShapeRegistry {
    /// Creates an empty registry for a mesh with the given base buffer layout.
    pub fn new(vertex_count: usize, stride: usize) -> Self {
        Self {
            vertex_count,
            stride,
            state: RegistryState::Uninitialized,
            shapes: Vec::new(),
            influences: Vec::new(),
            next_slot: 0,
        }
    }

    /// Creates an empty registry shaped like `base`.
    pub fn for_buffer(base: &MeshBuffer) -> Self {
        Self::new(base.vertex_count(), base.stride())
    }

    /// Returns the lifecycle state.
    pub fn state(&self) -> RegistryState {
        self.state
    }

    /// Registers a new blend shape and returns its slot.
    ///
    /// The influence of the new slot starts at 0. Fails without changing the
    /// registry if the `(region, reference)` pair is already present.
    pub fn register_shape(
        &mut self,
        region: Region,
        reference: ReferenceMeshId,
        delta: Vec<f32>,
    ) -> Result<Slot> {
        if self.state == RegistryState::Discarded {
            return Err(MorphError::RegistryDiscarded);
        }
        if self.slot_for(region, &reference).is_some() {
            return Err(MorphError::DuplicateDerivation {
                region,
                reference: reference.0,
            });
        }
        let expected = self.vertex_count * self.stride;
        if delta.len() != expected {
            return Err(MorphError::BufferStrideMismatch {
                len: delta.len(),
                expected,
                stride: self.stride,
            });
        }

        let slot = self.next_slot;
        self.next_slot += 1;
        log::debug!("registered {region} shape from '{reference}' at slot {slot}");
        self.shapes.push(BlendShape {
            slot,
            region,
            reference,
            delta,
        });
        self.influences.push(0.0);
        self.state = RegistryState::Initialized;
        Ok(slot)
    }

    /// Returns the shapes of a region in registration order.
    pub fn shapes_for_region(&self, region: Region) -> Vec<ShapeRef<'_>> {
        self.shapes
            .iter()
            .filter(|shape| shape.region == region)
            .map(|shape| ShapeRef {
                slot: shape.slot,
                reference: &shape.reference,
            })
            .collect()
    }

    /// Finds the slot derived from `reference` for `region`.
    pub fn slot_for(&self, region: Region, reference: &ReferenceMeshId) -> Option<Slot> {
        self.shapes
            .iter()
            .find(|shape| shape.region == region && shape.reference == *reference)
            .map(|shape| shape.slot)
    }

    /// Returns a shape by slot.
    pub fn shape(&self, slot: Slot) -> Option<&BlendShape> {
        self.shapes.get(slot)
    }

    /// Returns all shapes in slot order.
    pub fn shapes(&self) -> &[BlendShape] {
        &self.shapes
    }

    /// Returns the number of registered shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Returns true if no shape is registered.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Returns the influence vector, indexed by slot.
    pub fn influences(&self) -> &[f32] {
        &self.influences
    }

    /// Returns the influence of a slot.
    pub fn influence(&self, slot: Slot) -> Option<f32> {
        self.influences.get(slot).copied()
    }

    /// Sets the influence of a slot. Values are stored verbatim.
    pub fn set_influence(&mut self, slot: Slot, weight: f32) {
        if let Some(influence) = self.influences.get_mut(slot) {
            *influence = weight;
        }
    }

    /// Zeroes the influence of every shape of a region.
    pub fn reset_region(&mut self, region: Region) {
        for shape in &self.shapes {
            if shape.region == region {
                self.influences[shape.slot] = 0.0;
            }
        }
    }

    /// Drops every shape; the registry refuses further registrations.
    pub fn discard(&mut self) {
        self.shapes.clear();
        self.influences.clear();
        self.state = RegistryState::Discarded;
    }

    /// Applies every weighted shape to `base`.
    ///
    /// Only positional channels are deformed; auxiliary channels are copied
    /// from the base. Normals are not part of the deltas and must be
    /// recomputed by the consumer from the returned positions.
    pub fn composite_positions(&self, base: &MeshBuffer) -> Result<MeshBuffer> {
        if base.vertex_count() != self.vertex_count || base.stride() != self.stride {
            return Err(MorphError::BufferStrideMismatch {
                len: base.as_slice().len(),
                expected: self.vertex_count * self.stride,
                stride: self.stride,
            });
        }

        let mut data = base.as_slice().to_vec();
        for shape in &self.shapes {
            let weight = self.influences[shape.slot];
            if weight == 0.0 {
                continue;
            }
            for (record, delta) in data
                .chunks_exact_mut(self.stride)
                .zip(shape.delta.chunks_exact(self.stride))
            {
                for c in 0..POSITION_COMPONENTS {
                    record[c] += weight * delta[c];
                }
            }
        }
        MeshBuffer::new(data, self.stride)
    }
}
