//! # Geometry Utilities
//!
//! Vector and matrix helpers shared by the builders.
//!
//! Sampling math runs in `f64` ([`DVec3`]); transforms act on the `f32`
//! output buffers through [`Mat4`]. Matrices are column-major, so a 16-value
//! array lists column 0 first and the translation sits in elements 12..15.
//!
//! ## Example
//!
//! ```rust
//! use polar_mesh::geometry::{matrix_from_cols, transform_point};
//!
//! let m = matrix_from_cols([
//!     1.0, 0.0, 0.0, 0.0,
//!     0.0, 1.0, 0.0, 0.0,
//!     0.0, 0.0, 1.0, 0.0,
//!     5.0, 6.0, 7.0, 1.0,
//! ]);
//! assert_eq!(transform_point(&m, [1.0, 1.0, 1.0]), [6.0, 7.0, 8.0]);
//! ```

use glam::{DVec3, Mat3, Mat4, Vec3};

// =============================================================================
// VECTORS
// =============================================================================

/// Right-handed cross product.
#[inline]
pub fn cross(a: DVec3, b: DVec3) -> DVec3 {
    a.cross(b)
}

/// Left-handed cross product of the triangle `(p1, p2, p3)`:
/// `(p3 - p1) × (p2 - p1)`.
///
/// For a triangle wound counter-clockwise when seen from +z this points
/// down the z axis.
#[inline]
pub fn cross3_left(p1: DVec3, p2: DVec3, p3: DVec3) -> DVec3 {
    (p3 - p1).cross(p2 - p1)
}

/// Unit left-handed face normal.
///
/// Degenerate triangles (normal shorter than `epsilon`) return the raw,
/// unnormalized vector.
pub fn face_normal(p1: DVec3, p2: DVec3, p3: DVec3, epsilon: f64) -> DVec3 {
    normalize_or_keep(cross3_left(p1, p2, p3), epsilon)
}

/// Normalize when longer than `epsilon`, otherwise return unchanged.
#[inline]
pub fn normalize_or_keep(v: DVec3, epsilon: f64) -> DVec3 {
    let len = v.length();
    if len > epsilon {
        v / len
    } else {
        v
    }
}

// =============================================================================
// MATRICES
// =============================================================================

/// Build a matrix from 16 column-major values.
pub fn matrix_from_cols(values: [f32; 16]) -> Mat4 {
    Mat4::from_cols_array(&values)
}

pub fn translation_matrix(x: f32, y: f32, z: f32) -> Mat4 {
    Mat4::from_translation(Vec3::new(x, y, z))
}

pub fn scale_matrix(x: f32, y: f32, z: f32) -> Mat4 {
    Mat4::from_scale(Vec3::new(x, y, z))
}

/// Rotation about +x by `angle` radians.
pub fn rotation_x_matrix(angle: f32) -> Mat4 {
    Mat4::from_rotation_x(angle)
}

/// Rotation about +y by `angle` radians.
pub fn rotation_y_matrix(angle: f32) -> Mat4 {
    Mat4::from_rotation_y(angle)
}

/// Rotation about +z by `angle` radians.
pub fn rotation_z_matrix(angle: f32) -> Mat4 {
    Mat4::from_rotation_z(angle)
}

/// Inverse-transpose of the upper 3×3, or the 3×3 itself when singular.
///
/// Any non-zero finite determinant counts as invertible, so small scales
/// such as `scale_matrix(0.01, 0.01, 0.001)` still get the inverse-transpose.
pub fn normal_matrix(m: &Mat4) -> Mat3 {
    let linear = Mat3::from_mat4(*m);
    let det = linear.determinant();
    if det != 0.0 && det.is_finite() {
        let inverse = linear.inverse();
        if inverse.is_finite() {
            return inverse.transpose();
        }
    }
    linear
}

/// Apply `m` to a point (translation included).
pub fn transform_point(m: &Mat4, p: [f32; 3]) -> [f32; 3] {
    m.transform_point3(Vec3::from_array(p)).to_array()
}

/// Apply `m` to a normal and renormalize. Zero normals stay zero.
pub fn transform_normal(m: &Mat4, n: [f32; 3]) -> [f32; 3] {
    apply_normal_matrix(&normal_matrix(m), n)
}

pub(crate) fn apply_normal_matrix(normal_matrix: &Mat3, n: [f32; 3]) -> [f32; 3] {
    let v = *normal_matrix * Vec3::from_array(n);
    let len = v.length();
    if len > 0.0 {
        (v / len).to_array()
    } else {
        v.to_array()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_cross3_left_points_down_for_ccw_triangle() {
        let n = cross3_left(DVec3::ZERO, DVec3::X, DVec3::Y);
        assert_eq!(n, DVec3::new(0.0, 0.0, -1.0));
        assert_eq!(cross(DVec3::X, DVec3::Y), DVec3::Z);
    }

    #[test]
    fn test_face_normal_keeps_degenerate() {
        let n = face_normal(DVec3::ZERO, DVec3::X, DVec3::X * 2.0, 1e-4);
        assert_eq!(n, DVec3::ZERO);
        let m = face_normal(DVec3::ZERO, DVec3::X * 3.0, DVec3::Y * 3.0, 1e-4);
        assert_abs_diff_eq!(m.length(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rotation_z_layout() {
        let m = rotation_z_matrix(FRAC_PI_2);
        let cols = m.to_cols_array();
        // column 0 = (c, s, 0, 0), column 1 = (-s, c, 0, 0)
        assert_abs_diff_eq!(cols[1], 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(cols[4], -1.0, epsilon = 1e-6);
        let p = transform_point(&m, [1.0, 0.0, 0.0]);
        assert_abs_diff_eq!(p[0], 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(p[1], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_translation_ignores_normals() {
        let m = translation_matrix(1.0, 2.0, 3.0);
        assert_eq!(transform_point(&m, [0.0, 0.0, 0.0]), [1.0, 2.0, 3.0]);
        assert_eq!(transform_normal(&m, [0.0, 0.0, 1.0]), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_nonuniform_scale_normal_uses_inverse_transpose() {
        let m = scale_matrix(2.0, 1.0, 1.0);
        let n = transform_normal(&m, [std::f32::consts::FRAC_1_SQRT_2, std::f32::consts::FRAC_1_SQRT_2, 0.0]);
        // inverse-transpose shrinks x, so the normal tilts toward +y
        assert!(n[1] > n[0]);
        assert_abs_diff_eq!(n[0] * n[0] + n[1] * n[1], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_small_nonuniform_scale_uses_inverse_transpose() {
        let m = scale_matrix(0.01, 0.01, 0.001);
        let half = std::f32::consts::FRAC_1_SQRT_2;
        let n = transform_normal(&m, [half, 0.0, half]);
        assert_abs_diff_eq!(n[0], 0.0995, epsilon = 1e-3);
        assert_abs_diff_eq!(n[1], 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(n[2], 0.995, epsilon = 1e-3);
    }

    #[test]
    fn test_zero_normal_stays_zero() {
        let m = rotation_x_matrix(0.3) * scale_matrix(3.0, 3.0, 3.0);
        assert_eq!(transform_normal(&m, [0.0, 0.0, 0.0]), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_singular_matrix_falls_back() {
        let m = scale_matrix(1.0, 1.0, 0.0);
        let n = transform_normal(&m, [1.0, 0.0, 0.0]);
        assert_eq!(n, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_rotation_y_maps_z_to_x() {
        let p = transform_point(&rotation_y_matrix(FRAC_PI_2), [0.0, 0.0, 1.0]);
        assert_abs_diff_eq!(p[0], 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(p[2], 0.0, epsilon = 1e-6);
    }
}
