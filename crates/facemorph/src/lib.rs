//! facemorph: avatar face morphing from reference meshes.
//!
//! Pick reference avatars per facial region, derive blend shapes from them,
//! and blend them onto the visible avatar with sliders or a 2-D picker.
//!
//! # Quick Start
//!
//! ```no_run
//! use facemorph::*;
//!
//! fn main() -> Result<()> {
//!     init_logging();
//!
//!     let source = ObjMeshSource::new("assets/heads");
//!     let mut morpher = Morpher::new(MorphOptions::default(), source, HeadlessRenderer::new())?;
//!     morpher.load_region_table(&RegionFile("assets/regions.json".into()))?;
//!
//!     morpher.load_avatar("base")?;
//!     morpher.select_reference_mesh(Region::Nose, "donor")?;
//!     morpher.set_region_slider(Region::Nose, 0.8)?;
//!
//!     let positions = morpher.composited_positions()?;
//!     println!("{} vertices", positions.vertex_count());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`facemorph_core`] holds the numeric engine: region table, displacement
//!   fields, blend-shape registry, and influence compositing
//! - [`Morpher`] owns the visible avatar and wires the engine to a
//!   [`MeshSource`] and a [`Renderer`]
//! - [`AvatarProvisioner`] creates avatars from templates under an explicit
//!   [`Session`]

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod headless;
pub mod morpher;
pub mod normals;
pub mod obj_source;
pub mod provisioning;
pub mod recolor;

// Re-export core types
pub use facemorph_core::{
    apply_weights, apply_weights_ordered, build_delta, build_region_delta, centroid,
    slider_weights, BlendShape, BlendShapeRegistry, InterpolationMap, MeshBuffer, MeshId,
    MorphError, MorphOptions, ReferenceMeshId, Region, RegionAssignments, RegionFile,
    RegionStatus, RegionTableSource, RegistryState, Renderer, Result, Slot, Vec2, Vec3,
    VertexRegionTable,
};

pub use headless::{HeadlessRenderer, RenderEvent};
pub use morpher::{Morpher, ReferenceOutcome, ReferenceTicket};
pub use normals::vertex_normals;
pub use obj_source::ObjMeshSource;
pub use provisioning::{
    AvatarHandle, AvatarId, AvatarProvisioner, MemoryMeshSource, MeshSource, Session,
    StaticProvisioner,
};
pub use recolor::{gray_hair, plan_recolor, wrinkles, MaterialEdit, RecolorPart, Rgb};

/// Initializes `env_logger` once; later calls are no-ops.
pub fn init_logging() {
    let _ = env_logger::try_init();
}
