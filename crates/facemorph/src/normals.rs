//! Vertex normals from composited positions.

use glam::Vec3;

/// Computes vertex normals as the area-weighted average of incident face
/// normals. Triangles referencing missing vertices are skipped.
pub fn vertex_normals(positions: &[Vec3], triangles: &[[u32; 3]]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];

    for tri in triangles {
        let [Some(&v0), Some(&v1), Some(&v2)] = tri.map(|i| positions.get(i as usize)) else {
            continue;
        };
        // The cross product's length is twice the area, so it is already
        // area-weighted.
        let weighted = (v1 - v0).cross(v2 - v0);
        for &i in tri {
            normals[i as usize] += weighted;
        }
    }

    for normal in &mut normals {
        *normal = normal.normalize_or_zero();
    }
    normals
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_quad() {
        let positions = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        let normals = vertex_normals(&positions, &[[0, 1, 2], [0, 2, 3]]);
        for n in normals {
            assert!((n - Vec3::Z).length() < 1e-6);
        }
    }

    #[test]
    fn test_unreferenced_and_invalid() {
        let positions = [Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::ONE];
        let normals = vertex_normals(&positions, &[[0, 1, 2], [0, 1, 9]]);
        assert_eq!(normals[3], Vec3::ZERO);
        assert!((normals[0] - Vec3::Z).length() < 1e-6);
    }
}
