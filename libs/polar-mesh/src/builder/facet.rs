//! Flat-shaded triangle emission for edged builds.

use super::profile::to_f32;
use crate::fragment::MeshFragment;
use crate::geometry::face_normal;
use glam::DVec3;

/// Grid corner of an edged surface.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Corner {
    pub position: DVec3,
    pub uv: [f32; 2],
}

/// Emit three unshared vertices carrying the left-handed face normal of the
/// triangle in the order given.
pub(crate) fn push_facet(fragment: &mut MeshFragment, corners: [Corner; 3], epsilon: f64) {
    let [a, b, c] = corners;
    let normal = to_f32(face_normal(a.position, b.position, c.position, epsilon));
    for corner in corners {
        fragment.push_vertex(to_f32(corner.position), normal, corner.uv);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facet_shares_one_normal() {
        let mut fragment = MeshFragment::new();
        let corner = |x, y| Corner {
            position: DVec3::new(x, y, 0.0),
            uv: [0.0, 0.0],
        };
        push_facet(&mut fragment, [corner(0.0, 0.0), corner(1.0, 0.0), corner(0.0, 1.0)], 1e-4);
        assert_eq!(fragment.vertex_count(), 3);
        for i in 0..3 {
            assert_eq!(fragment.normal(i), [0.0, 0.0, -1.0]);
        }
    }
}
