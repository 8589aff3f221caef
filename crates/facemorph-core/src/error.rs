//! Error types for facemorph.

use thiserror::Error;

use crate::region::Region;

/// The main error type for facemorph operations.
#[derive(Error, Debug)]
pub enum MorphError {
    /// A region name outside the fixed set (Nose, Eyes, Ears, Jaw, Chin).
    #[error("unknown region '{0}'")]
    UnknownRegion(String),

    /// A buffer with no vertex records was handed to a centroid computation.
    #[error("buffer has no vertices")]
    EmptyBuffer,

    /// Buffer lengths disagree with each other or with the stride.
    #[error("buffer/stride mismatch: {len} scalars vs {expected} (stride {stride})")]
    BufferStrideMismatch {
        len: usize,
        expected: usize,
        stride: usize,
    },

    /// A region index does not address a vertex of the mesh.
    #[error("vertex index {index} out of range for {count} vertices")]
    IndexOutOfRange { index: u32, count: usize },

    /// A blend shape for this (region, reference) pair already exists on the mesh.
    #[error("{region} shape derived from '{reference}' already registered")]
    DuplicateDerivation { region: Region, reference: String },

    /// No blend shape has been registered for the region yet.
    #[error("no blend shapes registered for {0}")]
    RegionNotReady(Region),

    /// The mesh source could not deliver a mesh.
    #[error("failed to fetch mesh '{id}': {reason}")]
    MeshFetchFailed { id: String, reason: String },

    /// The reference is already in the region's assignment list.
    #[error("'{reference}' is already assigned to {region}")]
    AlreadyAssigned { region: Region, reference: String },

    /// The region's assignment list is full.
    #[error("only {cap} reference meshes are allowed for {region}")]
    ReferenceCapExceeded { region: Region, cap: usize },

    /// The interpolation control needs a full assignment list.
    #[error("select {} more reference meshes for {region} ({assigned}/{required})", .required - .assigned)]
    NotEnoughReferences {
        region: Region,
        assigned: usize,
        required: usize,
    },

    /// The region table is unavailable; the pipeline runs without morphing.
    #[error("morphing unavailable: no region table loaded")]
    MorphingUnavailable,

    /// No avatar mesh is currently visible.
    #[error("no visible mesh loaded")]
    NoVisibleMesh,

    /// The registry belonged to a mesh that has since been replaced.
    #[error("blend shape registry was discarded")]
    RegistryDiscarded,

    /// The provisioning session was invalidated.
    #[error("provisioning session expired")]
    SessionExpired,

    /// Options failed validation.
    #[error("invalid options: {0}")]
    InvalidOptions(String),

    /// A color string that is not `#rrggbb`.
    #[error("invalid color '{0}'")]
    InvalidColor(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for facemorph operations.
pub type Result<T> = std::result::Result<T, MorphError>;
