//! CPU-side triangle meshes.
//!
//! A [`Mesh`] owns three buffers:
//!
//! - the **original vertices**, captured once at load time and never mutated
//! - the **faces**, triangles indexing into the vertex buffer
//! - the **edges**, the unique undirected edges of those triangles
//!
//! Per-frame geometry is never written back. [`Mesh::transformed`] reads the
//! original buffer and returns a new one, which is what gets drawn:
//!
//! ```
//! use transform_lab::{Mesh, Vec3};
//! use transform_lab::transforms::isotropic_scaling;
//!
//! let cube = Mesh::cube();
//! let doubled = cube.transformed(&[isotropic_scaling(2.0)]).unwrap();
//! assert_eq!(doubled.len(), cube.vertex_count());
//! assert_eq!(cube.vertices()[0], Vec3::splat(-0.5)); // still the original
//! ```
//!
//! # Edge order
//!
//! Edges are listed in the order they are first met while walking the faces,
//! each face contributing `(a, b)`, `(b, c)`, `(c, a)`. An edge shared by two
//! faces appears once, with its indices as first seen.

use std::collections::HashSet;

use glam::{Mat3, Mat4, Vec3};

use crate::geometry::GeometryError;
use crate::pipeline::{apply_homogeneous, apply_linear};
use crate::transforms::TransformError;

#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vec3>,
    faces: Vec<[u32; 3]>,
    edges: Vec<[u32; 2]>,
}

impl Mesh {
    /// Builds a mesh from vertices and triangles, deriving the edge list.
    ///
    /// Fails if a face references a vertex that does not exist.
    pub fn new(vertices: Vec<Vec3>, faces: Vec<[u32; 3]>) -> Result<Self, GeometryError> {
        let count = vertices.len();
        if let Some(&index) = faces.iter().flatten().find(|&&i| i as usize >= count) {
            return Err(GeometryError::IndexOutOfRange { index, count });
        }

        let edges = unique_edges(&faces);
        Ok(Self {
            vertices,
            faces,
            edges,
        })
    }

    /// Unit cube centered at the origin: 8 shared corners, 12 triangles.
    pub fn cube() -> Self {
        #[rustfmt::skip]
        let vertices = vec![
            Vec3::new(-0.5, -0.5, -0.5),
            Vec3::new( 0.5, -0.5, -0.5),
            Vec3::new( 0.5,  0.5, -0.5),
            Vec3::new(-0.5,  0.5, -0.5),
            Vec3::new(-0.5, -0.5,  0.5),
            Vec3::new( 0.5, -0.5,  0.5),
            Vec3::new( 0.5,  0.5,  0.5),
            Vec3::new(-0.5,  0.5,  0.5),
        ];

        #[rustfmt::skip]
        let faces = vec![
            [0, 2, 1], [0, 3, 2], // back
            [4, 5, 6], [4, 6, 7], // front
            [0, 1, 5], [0, 5, 4], // bottom
            [3, 7, 6], [3, 6, 2], // top
            [0, 4, 7], [0, 7, 3], // left
            [1, 2, 6], [1, 6, 5], // right
        ];

        let edges = unique_edges(&faces);
        Self {
            vertices,
            faces,
            edges,
        }
    }

    /// The original, untransformed vertices.
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }

    pub fn edges(&self) -> &[[u32; 2]] {
        &self.edges
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Applies homogeneous transforms (first in the slice applied first) to
    /// the original vertices.
    pub fn transformed(&self, matrices: &[Mat4]) -> Result<Vec<Vec3>, TransformError> {
        apply_homogeneous(&self.vertices, matrices)
    }

    /// Applies linear transforms to the original vertices.
    pub fn transformed_linear(&self, matrices: &[Mat3]) -> Vec<Vec3> {
        apply_linear(&self.vertices, matrices)
    }

    /// Axis-aligned bounding box as `(min, max)`.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        self.vertices.iter().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(min, max), p| (min.min(*p), max.max(*p)),
        )
    }

    pub fn center(&self) -> Vec3 {
        let (min, max) = self.bounds();
        (min + max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        let (min, max) = self.bounds();
        max - min
    }

    // Load-time only: rewrites the original buffer before any frame reads it.
    pub(crate) fn map_vertices(&mut self, f: impl Fn(Vec3) -> Vec3) {
        for v in &mut self.vertices {
            *v = f(*v);
        }
    }
}

fn unique_edges(faces: &[[u32; 3]]) -> Vec<[u32; 2]> {
    let mut seen = HashSet::new();
    let mut edges = Vec::new();
    for &[a, b, c] in faces {
        for (from, to) in [(a, b), (b, c), (c, a)] {
            if seen.insert((from.min(to), from.max(to))) {
                edges.push([from, to]);
            }
        }
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transforms::translation;

    #[test]
    fn cube_topology() {
        let cube = Mesh::cube();
        assert_eq!(cube.vertex_count(), 8);
        assert_eq!(cube.faces().len(), 12);
        // 12 box edges plus one diagonal per side.
        assert_eq!(cube.edges().len(), 18);
    }

    #[test]
    fn shared_edges_appear_once_in_first_seen_order() {
        let vertices = vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::ONE];
        let mesh = Mesh::new(vertices, vec![[0, 1, 2], [2, 1, 3]]).unwrap();
        assert_eq!(
            mesh.edges(),
            &[[0, 1], [1, 2], [2, 0], [1, 3], [3, 2]]
        );
    }

    #[test]
    fn out_of_range_face_is_rejected() {
        let err = Mesh::new(vec![Vec3::ZERO, Vec3::X], vec![[0, 1, 2]]).unwrap_err();
        assert!(matches!(
            err,
            GeometryError::IndexOutOfRange { index: 2, count: 2 }
        ));
    }

    #[test]
    fn transformed_never_touches_the_original() {
        let cube = Mesh::cube();
        let moved = cube.transformed(&[translation(0.0, 3.0, 0.0)]).unwrap();
        assert_eq!(moved[0], Vec3::new(-0.5, 2.5, -0.5));
        assert_eq!(cube, Mesh::cube());

        // Re-applying yields the same result every time.
        let again = cube.transformed(&[translation(0.0, 3.0, 0.0)]).unwrap();
        assert_eq!(moved, again);
    }

    #[test]
    fn bounds_of_cube() {
        let cube = Mesh::cube();
        assert_eq!(cube.bounds(), (Vec3::splat(-0.5), Vec3::splat(0.5)));
        assert_eq!(cube.center(), Vec3::ZERO);
        assert_eq!(cube.size(), Vec3::ONE);
    }
}
