//! Core morph-target engine for facemorph.
//!
//! This crate derives facial blend shapes from reference meshes and blends them
//! onto a visible head mesh:
//! - [`VertexRegionTable`] maps each anatomical [`Region`] to its vertex indices
//! - [`centroid`] and [`build_delta`] compute centroid-relative displacement fields
//! - [`BlendShapeRegistry`] stores derived shapes under stable slots
//! - [`apply_weights`] composites per-region influence weights
//! - [`InterpolationMap`] turns a 2-D picker position into weights

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Vertex indices are u32 on the wire and usize in memory
#![allow(clippy::cast_possible_truncation)]

pub mod assignment;
pub mod buffer;
pub mod centroid;
pub mod compositor;
pub mod displacement;
pub mod error;
pub mod interpolation;
pub mod options;
pub mod region;
pub mod registry;
pub mod renderer;

pub use assignment::{RegionAssignments, RegionStatus};
pub use buffer::{MeshBuffer, POSITION_COMPONENTS};
pub use centroid::centroid;
pub use compositor::{apply_weights, apply_weights_ordered};
pub use displacement::{build_delta, build_region_delta};
pub use error::{MorphError, Result};
pub use interpolation::{slider_weights, InterpolationMap, ANCHOR_COUNT};
pub use options::MorphOptions;
pub use region::{Region, RegionFile, RegionTableSource, VertexRegionTable};
pub use registry::{
    BlendShape, BlendShapeRegistry, MeshId, ReferenceMeshId, RegistryState, ShapeRef, Slot,
};
pub use renderer::Renderer;

// Re-export glam types for convenience
pub use glam::{Vec2, Vec3};
