//! Interleaved vertex buffers.

use glam::Vec3;

use crate::error::{MorphError, Result};

/// Number of positional components at the start of every vertex record.
pub const POSITION_COMPONENTS: usize = 3;

/// An ordered sequence of vertex records, `stride` scalars each.
///
/// The first three scalars of each record are the position; any remaining
/// scalars are auxiliary channels carried alongside it.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshBuffer {
    data: Vec<f32>,
    stride: usize,
}

impl MeshBuffer {
    /// Wraps raw scalars, checking them against the stride.
    pub fn new(data: Vec<f32>, stride: usize) -> Result<Self> {
        check_stride(data.len(), stride)?;
        Ok(Self { data, stride })
    }

    /// Builds a tightly packed (stride 3) buffer from positions.
    pub fn from_positions(positions: &[Vec3]) -> Self {
        let data = positions.iter().flat_map(|p| p.to_array()).collect();
        Self {
            data,
            stride: POSITION_COMPONENTS,
        }
    }

    /// Decodes little-endian `f32` scalars, as found in GLB accessor payloads.
    pub fn from_le_bytes(bytes: &[u8], stride: usize) -> Result<Self> {
        let scalar = std::mem::size_of::<f32>();
        if bytes.len() % scalar != 0 {
            return Err(MorphError::BufferStrideMismatch {
                len: bytes.len(),
                expected: bytes.len() - bytes.len() % scalar,
                stride,
            });
        }
        let data = bytes
            .chunks_exact(scalar)
            .map(|chunk| {
                let bits: u32 = bytemuck::pod_read_unaligned(chunk);
                f32::from_bits(u32::from_le(bits))
            })
            .collect();
        Self::new(data, stride)
    }

    /// Returns the raw scalars.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Consumes the buffer, returning the raw scalars.
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    /// Returns the number of scalars per vertex record.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the number of vertex records.
    pub fn vertex_count(&self) -> usize {
        self.data.len() / self.stride
    }

    /// Returns true if the buffer holds no vertices.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the position of a vertex.
    pub fn position(&self, vertex: usize) -> Option<Vec3> {
        let start = vertex.checked_mul(self.stride)?;
        let record = self.data.get(start..start + POSITION_COMPONENTS)?;
        Some(Vec3::from_slice(record))
    }

    /// Returns all positions, dropping auxiliary channels.
    pub fn positions(&self) -> Vec<Vec3> {
        self.data
            .chunks_exact(self.stride)
            .map(|record| Vec3::from_slice(&record[..POSITION_COMPONENTS]))
            .collect()
    }
}

/// Checks that `len` scalars form whole records of `stride` scalars.
pub(crate) fn check_stride(len: usize, stride: usize) -> Result<()> {
    if stride < POSITION_COMPONENTS || len % stride != 0 {
        return Err(MorphError::BufferStrideMismatch {
            len,
            expected: if stride == 0 { 0 } else { len - len % stride },
            stride,
        });
    }
    Ok(())
}
