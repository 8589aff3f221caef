//! Region-restricted displacement fields between two meshes.
//!
//! A displacement field is a delta buffer shaped like the source buffer that
//! is zero everywhere except at a region's vertices. Positions are compared
//! relative to each mesh's own centroid, so an overall rigid offset between
//! the source and target meshes does not leak into the delta. Auxiliary
//! channels are differenced directly.

use crate::buffer::{check_stride, MeshBuffer, POSITION_COMPONENTS};
use crate::centroid::centroid;
use crate::error::{MorphError, Result};
use crate::region::{Region, VertexRegionTable};

/// Builds the delta buffer for the vertices in `region_indices`.
///
/// Both buffers must have the same length and hold whole `stride`-sized
/// records. This function is pure, so deltas for different regions can be
/// built concurrently over shared source and target buffers.
pub fn build_delta(
    source: &[f32],
    target: &[f32],
    region_indices: &[u32],
    stride: usize,
) -> Result<Vec<f32>> {
    check_stride(source.len(), stride)?;
    if target.len() != source.len() {
        return Err(MorphError::BufferStrideMismatch {
            len: target.len(),
            expected: source.len(),
            stride,
        });
    }

    let count = source.len() / stride;
    if let Some(&index) = region_indices.iter().find(|&&i| i as usize >= count) {
        return Err(MorphError::IndexOutOfRange { index, count });
    }

    let source_center = centroid(source, stride)?.to_array();
    let target_center = centroid(target, stride)?.to_array();

    let mut delta = vec![0.0; source.len()];
    for &index in region_indices {
        let start = index as usize * stride;
        let src = &source[start..start + stride];
        let tgt = &target[start..start + stride];
        let out = &mut delta[start..start + stride];

        for c in 0..POSITION_COMPONENTS {
            out[c] = (tgt[c] - target_center[c]) - (src[c] - source_center[c]);
        }
        for c in POSITION_COMPONENTS..stride {
            out[c] = tgt[c] - src[c];
        }
    }
    Ok(delta)
}

/// Builds the delta buffer for one region of the table.
pub fn build_region_delta(
    source: &MeshBuffer,
    target: &MeshBuffer,
    table: &VertexRegionTable,
    region: Region,
) -> Result<Vec<f32>> {
    if source.stride() != target.stride() {
        return Err(MorphError::BufferStrideMismatch {
            len: target.as_slice().len(),
            expected: source.as_slice().len(),
            stride: source.stride(),
        });
    }
    let indices = table.checked_indices(region, source.vertex_count())?;
    build_delta(
        source.as_slice(),
        target.as_slice(),
        indices,
        source.stride(),
    )
}
