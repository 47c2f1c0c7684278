//! # Mesh Fragment
//!
//! GPU-ready vertex buffers produced by one build call.
//!
//! Buffers are flat `f32` arrays: three floats per position and normal, two
//! per texture coordinate, and four per color when colors are present. An
//! indexed fragment lists triangles in `indices`; a flat fragment stores
//! every triangle corner as its own vertex.

use crate::error::{MeshError, MeshResult};
use crate::geometry::{apply_normal_matrix, normal_matrix};
use config::constants::DEFAULT_COLOR;
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Vertex and index buffers for a triangle mesh.
///
/// # Example
///
/// ```rust
/// use polar_mesh::MeshFragment;
///
/// let mut fragment = MeshFragment::indexed();
/// let a = fragment.push_vertex([0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0]);
/// let b = fragment.push_vertex([1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0]);
/// let c = fragment.push_vertex([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0]);
/// fragment.push_triangle(a, b, c);
/// assert_eq!(fragment.triangle_count(), 1);
/// assert_eq!(fragment.expand().vertex_count(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshFragment {
    /// Vertex positions, xyz per vertex.
    pub positions: Vec<f32>,
    /// Vertex normals, xyz per vertex.
    pub normals: Vec<f32>,
    /// Texture coordinates, uv per vertex.
    pub tex_coords: Vec<f32>,
    /// Vertex colors, rgba per vertex, or empty.
    pub colors: Vec<f32>,
    /// Triangle indices for indexed fragments.
    pub indices: Option<Vec<u32>>,
}

impl MeshFragment {
    /// Creates an empty flat fragment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty indexed fragment.
    pub fn indexed() -> Self {
        Self {
            indices: Some(Vec::new()),
            ..Self::default()
        }
    }

    /// Creates an empty fragment with room for `vertex_count` vertices.
    pub fn with_capacity(vertex_count: usize, indexed: bool) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_count * 3),
            normals: Vec::with_capacity(vertex_count * 3),
            tex_coords: Vec::with_capacity(vertex_count * 2),
            colors: Vec::new(),
            indices: indexed.then(Vec::new),
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len() / 3,
            None => self.vertex_count() / 3,
        }
    }

    #[inline]
    pub fn is_indexed(&self) -> bool {
        self.indices.is_some()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn has_colors(&self) -> bool {
        !self.colors.is_empty()
    }

    /// Adds a vertex and returns its index.
    pub fn push_vertex(&mut self, position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> u32 {
        let index = self.vertex_count() as u32;
        self.positions.extend_from_slice(&position);
        self.normals.extend_from_slice(&normal);
        self.tex_coords.extend_from_slice(&uv);
        index
    }

    /// Adds a triangle by vertex indices, making the fragment indexed.
    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.get_or_insert_with(Vec::new).extend([a, b, c]);
    }

    pub fn position(&self, index: usize) -> [f32; 3] {
        triple(&self.positions, index)
    }

    pub fn normal(&self, index: usize) -> [f32; 3] {
        triple(&self.normals, index)
    }

    pub fn tex_coord(&self, index: usize) -> [f32; 2] {
        [self.tex_coords[index * 2], self.tex_coords[index * 2 + 1]]
    }

    /// Color of a vertex, if the fragment is colored.
    pub fn color(&self, index: usize) -> Option<[f32; 4]> {
        self.colors
            .get(index * 4..index * 4 + 4)
            .map(|c| [c[0], c[1], c[2], c[3]])
    }

    /// Triangles as vertex index triples; flat fragments count corners in order.
    pub fn triangles(&self) -> Vec<[u32; 3]> {
        match &self.indices {
            Some(indices) => indices
                .chunks_exact(3)
                .map(|t| [t[0], t[1], t[2]])
                .collect(),
            None => (0..self.triangle_count() as u32)
                .map(|t| [t * 3, t * 3 + 1, t * 3 + 2])
                .collect(),
        }
    }

    /// Sets one color on every vertex.
    pub fn paint(&mut self, color: [f32; 4]) {
        self.colors = color.repeat(self.vertex_count());
    }

    /// Removes vertex colors.
    pub fn clear_colors(&mut self) {
        self.colors.clear();
    }

    /// Appends another fragment, offsetting its indices.
    ///
    /// An empty receiver adopts the indexing of `other`. When only one side
    /// carries colors the other side is padded with [`DEFAULT_COLOR`].
    ///
    /// # Errors
    ///
    /// [`MeshError::IndexingMismatch`] when one fragment is indexed and the
    /// other is flat.
    pub fn append(&mut self, other: &MeshFragment) -> MeshResult<()> {
        if self.is_empty() && self.indices.as_ref().map_or(true, Vec::is_empty) {
            self.indices = other.indices.as_ref().map(|_| Vec::new());
        }
        if self.is_indexed() != other.is_indexed() {
            return Err(MeshError::IndexingMismatch);
        }

        let offset = self.vertex_count() as u32;
        let self_vertices = self.vertex_count();

        if self.has_colors() || other.has_colors() {
            if !self.has_colors() {
                self.colors = DEFAULT_COLOR.repeat(self_vertices);
            }
            if other.has_colors() {
                self.colors.extend_from_slice(&other.colors);
            } else {
                self.colors
                    .extend_from_slice(&DEFAULT_COLOR.repeat(other.vertex_count()));
            }
        }

        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.tex_coords.extend_from_slice(&other.tex_coords);

        if let (Some(indices), Some(extra)) = (&mut self.indices, &other.indices) {
            indices.extend(extra.iter().map(|i| i + offset));
        }
        Ok(())
    }

    /// Flat copy with one vertex per triangle corner.
    ///
    /// Flat fragments are returned unchanged.
    pub fn expand(&self) -> MeshFragment {
        let Some(indices) = &self.indices else {
            return self.clone();
        };

        let mut flat = MeshFragment::with_capacity(indices.len(), false);
        for &i in indices {
            let i = i as usize;
            flat.push_vertex(self.position(i), self.normal(i), self.tex_coord(i));
            if let Some(color) = self.color(i) {
                flat.colors.extend_from_slice(&color);
            }
        }
        flat
    }

    /// Transforms positions by `matrix` and normals by its inverse-transpose.
    pub fn transform(&mut self, matrix: &Mat4) {
        for p in self.positions.chunks_exact_mut(3) {
            let t = matrix.transform_point3(Vec3::new(p[0], p[1], p[2]));
            p.copy_from_slice(&t.to_array());
        }

        let normal_matrix = normal_matrix(matrix);
        for n in self.normals.chunks_exact_mut(3) {
            let t = apply_normal_matrix(&normal_matrix, [n[0], n[1], n[2]]);
            n.copy_from_slice(&t);
        }
    }

    /// Checks buffer lengths and index bounds.
    pub fn validate(&self) -> MeshResult<()> {
        if self.positions.len() % 3 != 0 {
            return Err(MeshError::invalid_buffer(format!(
                "position buffer length {} is not a multiple of 3",
                self.positions.len()
            )));
        }

        let vertices = self.vertex_count();
        if self.normals.len() != vertices * 3 {
            return Err(MeshError::invalid_buffer(format!(
                "expected {} normal floats, found {}",
                vertices * 3,
                self.normals.len()
            )));
        }
        if self.tex_coords.len() != vertices * 2 {
            return Err(MeshError::invalid_buffer(format!(
                "expected {} texture coordinate floats, found {}",
                vertices * 2,
                self.tex_coords.len()
            )));
        }
        if self.has_colors() && self.colors.len() != vertices * 4 {
            return Err(MeshError::invalid_buffer(format!(
                "expected {} color floats, found {}",
                vertices * 4,
                self.colors.len()
            )));
        }

        match &self.indices {
            Some(indices) => {
                if indices.len() % 3 != 0 {
                    return Err(MeshError::invalid_buffer(format!(
                        "index buffer length {} is not a multiple of 3",
                        indices.len()
                    )));
                }
                if let Some(bad) = indices.iter().find(|&&i| i as usize >= vertices) {
                    return Err(MeshError::invalid_buffer(format!(
                        "index {bad} out of range for {vertices} vertices"
                    )));
                }
            }
            None if vertices % 3 != 0 => {
                return Err(MeshError::invalid_buffer(format!(
                    "flat fragment has {vertices} vertices, not whole triangles"
                )));
            }
            None => {}
        }
        Ok(())
    }
}

fn triple(buffer: &[f32], index: usize) -> [f32; 3] {
    [buffer[index * 3], buffer[index * 3 + 1], buffer[index * 3 + 2]]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{scale_matrix, translation_matrix};

    fn triangle(indexed: bool) -> MeshFragment {
        let mut fragment = if indexed {
            MeshFragment::indexed()
        } else {
            MeshFragment::new()
        };
        let a = fragment.push_vertex([0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0]);
        let b = fragment.push_vertex([1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0]);
        let c = fragment.push_vertex([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0]);
        if indexed {
            fragment.push_triangle(a, b, c);
        }
        fragment
    }

    #[test]
    fn test_counts() {
        let indexed = triangle(true);
        assert_eq!(indexed.vertex_count(), 3);
        assert_eq!(indexed.triangle_count(), 1);
        assert!(indexed.is_indexed());
        let flat = triangle(false);
        assert_eq!(flat.triangle_count(), 1);
        assert_eq!(flat.triangles(), vec![[0, 1, 2]]);
    }

    #[test]
    fn test_append_offsets_indices() {
        let mut fragment = triangle(true);
        fragment.append(&triangle(true)).expect("same indexing");
        assert_eq!(fragment.indices, Some(vec![0, 1, 2, 3, 4, 5]));
        assert!(fragment.validate().is_ok());
    }

    #[test]
    fn test_append_rejects_mixed_indexing() {
        let mut fragment = triangle(true);
        assert_eq!(
            fragment.append(&triangle(false)),
            Err(MeshError::IndexingMismatch)
        );
    }

    #[test]
    fn test_empty_fragment_adopts_indexing() {
        let mut fragment = MeshFragment::new();
        fragment.append(&triangle(true)).expect("empty receiver");
        assert!(fragment.is_indexed());
    }

    #[test]
    fn test_append_pads_missing_colors() {
        let mut fragment = triangle(true);
        let mut red = triangle(true);
        red.paint([1.0, 0.0, 0.0, 1.0]);
        fragment.append(&red).expect("same indexing");
        assert_eq!(fragment.color(0), Some(DEFAULT_COLOR));
        assert_eq!(fragment.color(5), Some([1.0, 0.0, 0.0, 1.0]));
        assert!(fragment.validate().is_ok());
    }

    #[test]
    fn test_expand_copies_corners() {
        let mut fragment = MeshFragment::indexed();
        for p in [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]] {
            fragment.push_vertex(p, [0.0, 0.0, 1.0], [p[0], p[1]]);
        }
        fragment.push_triangle(0, 1, 2);
        fragment.push_triangle(0, 2, 3);
        fragment.paint([0.0, 1.0, 0.0, 1.0]);

        let flat = fragment.expand();
        assert!(!flat.is_indexed());
        assert_eq!(flat.vertex_count(), 6);
        assert_eq!(flat.position(3), [0.0, 0.0, 0.0]);
        assert_eq!(flat.tex_coord(5), [0.0, 1.0]);
        assert_eq!(flat.colors.len(), 24);
        assert!(flat.validate().is_ok());
    }

    #[test]
    fn test_transform_moves_points_and_rotates_normals() {
        let mut fragment = triangle(true);
        fragment.transform(&(translation_matrix(0.0, 0.0, 2.0) * scale_matrix(2.0, 2.0, 2.0)));
        assert_eq!(fragment.position(1), [2.0, 0.0, 2.0]);
        assert_eq!(fragment.normal(1), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_validate_catches_bad_index() {
        let mut fragment = triangle(true);
        fragment.push_triangle(0, 1, 7);
        assert!(matches!(
            fragment.validate(),
            Err(MeshError::InvalidBuffer { .. })
        ));
    }

    #[test]
    fn test_validate_catches_partial_color() {
        let mut fragment = triangle(false);
        fragment.colors = vec![1.0; 4];
        assert!(fragment.validate().is_err());
        fragment.clear_colors();
        assert!(fragment.validate().is_ok());
    }
}
