//! Weights for the 2-D interpolation picker.
//!
//! The picker shows the source mesh at the origin and one anchor per assigned
//! reference mesh. The plane is split into three sector triangles, each
//! spanned by the origin and two neighbouring anchors. A point's weights are
//! its barycentric coordinates in its sector; the origin's share is the part
//! left on the source and is not returned.

use glam::Vec2;

/// Number of anchors on the picker.
pub const ANCHOR_COUNT: usize = 3;

/// The three-anchor interpolation picker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterpolationMap {
    anchors: [Vec2; ANCHOR_COUNT],
}

impl Default for InterpolationMap {
    fn default() -> Self {
        Self::new([Vec2::new(0.0, -1.0), Vec2::new(-1.0, 1.0), Vec2::new(1.0, 1.0)])
    }
}

impl InterpolationMap {
    /// Creates a picker with anchors in assignment order around the origin.
    pub fn new(anchors: [Vec2; ANCHOR_COUNT]) -> Self {
        Self { anchors }
    }

    /// Returns the anchor positions.
    pub fn anchors(&self) -> &[Vec2; ANCHOR_COUNT] {
        &self.anchors
    }

    /// Returns the weight of each anchor at `point`.
    ///
    /// Weights are non-negative and sum to at most 1. Points outside the
    /// anchors' hull are projected onto the nearest sector.
    pub fn weights_at(&self, point: Vec2) -> [f32; ANCHOR_COUNT] {
        let mut best: Option<(f32, usize, [f32; 3])> = None;
        for i in 0..ANCHOR_COUNT {
            let j = (i + 1) % ANCHOR_COUNT;
            let Some(coords) = sector_coords(self.anchors[i], self.anchors[j], point) else {
                continue;
            };
            let worst = coords.iter().copied().fold(f32::INFINITY, f32::min);
            if best.map_or(true, |(b, _, _)| worst > b) {
                best = Some((worst, i, coords));
            }
        }

        let mut weights = [0.0; ANCHOR_COUNT];
        let Some((_, i, coords)) = best else {
            return weights;
        };
        let clamped = coords.map(|c| c.max(0.0));
        let total: f32 = clamped.iter().sum();
        if total <= 0.0 {
            return weights;
        }
        weights[i] = clamped[0] / total;
        weights[(i + 1) % ANCHOR_COUNT] = clamped[1] / total;
        weights
    }
}

/// Barycentric coordinates `[a, b, origin]` of `p` in the triangle spanned by
/// the origin, `a` and `b`. `None` for a degenerate triangle.
fn sector_coords(a: Vec2, b: Vec2, p: Vec2) -> Option<[f32; 3]> {
    let det = a.perp_dot(b);
    if det.abs() <= f32::EPSILON {
        return None;
    }
    let u = p.perp_dot(b) / det;
    let v = a.perp_dot(p) / det;
    Some([u, v, 1.0 - u - v])
}

/// Weights for the single-slider control: the slider drives the first
/// reference only.
pub fn slider_weights(value: f32) -> [f32; ANCHOR_COUNT] {
    [value, 0.0, 0.0]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_weights(actual: [f32; 3], expected: [f32; 3]) {
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-5, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    fn test_origin_is_pure_source() {
        let map = InterpolationMap::default();
        assert_weights(map.weights_at(Vec2::ZERO), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_anchors_are_pure_references() {
        let map = InterpolationMap::default();
        for (i, &anchor) in map.anchors().iter().enumerate() {
            let mut expected = [0.0; 3];
            expected[i] = 1.0;
            assert_weights(map.weights_at(anchor), expected);
        }
    }

    #[test]
    fn test_edge_midpoint() {
        let map = InterpolationMap::default();
        assert_weights(map.weights_at(Vec2::new(0.0, 1.0)), [0.0, 0.5, 0.5]);
        assert_weights(map.weights_at(Vec2::new(0.0, -0.5)), [0.5, 0.0, 0.0]);
    }

    #[test]
    fn test_outside_hull_projects_to_edge() {
        let map = InterpolationMap::default();
        assert_weights(map.weights_at(Vec2::new(0.0, 5.0)), [0.0, 0.5, 0.5]);
    }

    #[test]
    fn test_weights_bounded() {
        let map = InterpolationMap::default();
        for x in -10..=10 {
            for y in -10..=10 {
                #[allow(clippy::cast_precision_loss)]
                let p = Vec2::new(x as f32 * 0.2, y as f32 * 0.2);
                let w = map.weights_at(p);
                assert!(w.iter().all(|&v| v >= 0.0));
                assert!(w.iter().sum::<f32>() <= 1.0 + 1e-5);
            }
        }
    }

    #[test]
    fn test_slider() {
        assert_eq!(slider_weights(0.4), [0.4, 0.0, 0.0]);
    }
}
