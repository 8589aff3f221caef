//! Centroid of a vertex cloud.

use glam::{DVec3, Vec3};

use crate::buffer::check_stride;
use crate::error::{MorphError, Result};

/// Computes the arithmetic mean of the positions in an interleaved buffer.
///
/// Only the first three scalars of each `stride`-sized record contribute.
/// An empty buffer is an error rather than a NaN centroid.
pub fn centroid(buffer: &[f32], stride: usize) -> Result<Vec3> {
    check_stride(buffer.len(), stride)?;
    let count = buffer.len() / stride;
    if count == 0 {
        return Err(MorphError::EmptyBuffer);
    }

    // Accumulate in f64 so large heads don't lose the low bits.
    let sum = buffer
        .chunks_exact(stride)
        .fold(DVec3::ZERO, |acc, record| {
            acc + DVec3::new(
                f64::from(record[0]),
                f64::from(record[1]),
                f64::from(record[2]),
            )
        });

    #[allow(clippy::cast_precision_loss)]
    let mean = sum / count as f64;
    Ok(mean.as_vec3())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centroid_packed() {
        let buffer = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 2.0, 0.0, 0.0, 3.0, 0.0, 0.0];
        assert_eq!(centroid(&buffer, 3).unwrap(), Vec3::new(1.5, 0.0, 0.0));
    }

    #[test]
    fn test_centroid_ignores_auxiliary_channels() {
        let buffer = [0.0, 2.0, 4.0, 100.0, 2.0, 4.0, 6.0, -100.0];
        assert_eq!(centroid(&buffer, 4).unwrap(), Vec3::new(1.0, 3.0, 5.0));
    }

    #[test]
    fn test_centroid_empty() {
        assert!(matches!(centroid(&[], 3), Err(MorphError::EmptyBuffer)));
    }

    #[test]
    fn test_centroid_bad_stride() {
        assert!(matches!(
            centroid(&[0.0; 5], 3),
            Err(MorphError::BufferStrideMismatch { .. })
        ));
    }
}
