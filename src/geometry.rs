//! Fluent mesh loading from PLY and STL files.
//!
//! # Quick Start
//!
//! ```no_run
//! use transform_lab::GeometryLoader;
//!
//! let dolphin = GeometryLoader::from_file("assets/dolphin.ply")
//!     .centered()     // Move the bounding box center to the origin
//!     .normalized()   // Fit in a unit cube
//!     .build()?;
//! # Ok::<(), transform_lab::GeometryError>(())
//! ```
//!
//! # Supported Formats
//!
//! | Format | Extensions | Notes |
//! |--------|------------|-------|
//! | PLY    | `.ply`     | ASCII and binary; polygons are fan-triangulated |
//! | STL    | `.stl`     | Binary and ASCII |
//!
//! Whatever the format, the result is a [`Mesh`] whose original vertex buffer
//! is fixed from then on.

use std::io::{BufRead, Read};
use std::path::Path;

use glam::Vec3;
use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};

use crate::mesh::Mesh;

/// Errors that can occur when loading geometry.
#[derive(Debug, thiserror::Error)]
pub enum GeometryError {
    /// File could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// File format could not be determined from extension.
    #[error("unknown geometry format: '{0}'")]
    UnknownFormat(String),
    /// The geometry data was invalid or corrupt.
    #[error("parse error: {0}")]
    Parse(String),
    /// A face references a vertex that does not exist.
    #[error("face index {index} out of range for {count} vertices")]
    IndexOutOfRange { index: u32, count: usize },
    /// The file holds no vertices.
    #[error("geometry has no vertices")]
    Empty,
}

/// A fluent builder for loading and preparing a mesh.
///
/// Load-time adjustments run once, in this order, before the mesh is handed
/// out: center, normalize, scale.
#[derive(Debug)]
pub struct GeometryLoader {
    result: Result<Mesh, GeometryError>,
    center: bool,
    normalize: bool,
    scale_factor: Option<f32>,
}

impl GeometryLoader {
    /// Load geometry from a file, picking the format from its extension.
    pub fn from_file(path: impl AsRef<Path>) -> Self {
        Self::with_result(load_file(path.as_ref()))
    }

    /// Parse PLY data held in memory.
    pub fn from_ply_bytes(bytes: &[u8]) -> Self {
        Self::with_result(parse_ply(&mut std::io::Cursor::new(bytes)))
    }

    /// Parse STL data held in memory.
    pub fn from_stl_bytes(bytes: &[u8]) -> Self {
        Self::with_result(parse_stl(&mut std::io::Cursor::new(bytes)))
    }

    /// Wrap an existing mesh to reuse the load-time adjustments.
    pub fn from_mesh(mesh: Mesh) -> Self {
        Self::with_result(Ok(mesh))
    }

    fn with_result(result: Result<Mesh, GeometryError>) -> Self {
        Self {
            result,
            center: false,
            normalize: false,
            scale_factor: None,
        }
    }

    /// Centers the geometry at the origin.
    pub fn centered(mut self) -> Self {
        self.center = true;
        self
    }

    /// Scales the geometry to fit within a unit cube, keeping proportions.
    pub fn normalized(mut self) -> Self {
        self.normalize = true;
        self
    }

    /// Applies a uniform scale factor after centering and normalization.
    pub fn scaled(mut self, factor: f32) -> Self {
        self.scale_factor = Some(factor);
        self
    }

    /// Finalize the mesh.
    pub fn build(self) -> Result<Mesh, GeometryError> {
        let mut mesh = self.result?;

        if self.center {
            let center = mesh.center();
            mesh.map_vertices(|v| v - center);
        }

        if self.normalize {
            let size = mesh.size();
            let max_dim = size.x.max(size.y).max(size.z);
            if max_dim > 0.0 {
                mesh.map_vertices(|v| v / max_dim);
            }
        }

        if let Some(factor) = self.scale_factor {
            mesh.map_vertices(|v| v * factor);
        }

        log::info!(
            "loaded mesh: {} vertices, {} faces, {} edges",
            mesh.vertex_count(),
            mesh.faces().len(),
            mesh.edges().len()
        );
        Ok(mesh)
    }
}

fn load_file(path: &Path) -> Result<Mesh, GeometryError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    log::debug!("loading {} as '{}'", path.display(), ext);
    match ext.as_str() {
        "ply" => parse_ply(&mut std::io::BufReader::new(std::fs::File::open(path)?)),
        "stl" => parse_stl(&mut std::io::BufReader::new(std::fs::File::open(path)?)),
        _ => Err(GeometryError::UnknownFormat(ext)),
    }
}

fn parse_ply<R: BufRead>(reader: &mut R) -> Result<Mesh, GeometryError> {
    let parser = Parser::<DefaultElement>::new();
    let ply = parser
        .read_ply(reader)
        .map_err(|e| GeometryError::Parse(format!("PLY parse error: {}", e)))?;

    let vertex_elements = ply
        .payload
        .get("vertex")
        .ok_or_else(|| GeometryError::Parse("PLY file has no 'vertex' element".to_string()))?;

    let mut vertices = Vec::with_capacity(vertex_elements.len());
    for element in vertex_elements {
        let coord = |key: &str| {
            element
                .get(key)
                .and_then(scalar)
                .ok_or_else(|| GeometryError::Parse(format!("vertex without scalar '{}'", key)))
        };
        vertices.push(Vec3::new(coord("x")?, coord("y")?, coord("z")?));
    }

    if vertices.is_empty() {
        return Err(GeometryError::Empty);
    }

    let mut faces = Vec::new();
    for element in ply.payload.get("face").into_iter().flatten() {
        let indices = element
            .get("vertex_indices")
            .or_else(|| element.get("vertex_index"))
            .and_then(index_list)
            .ok_or_else(|| GeometryError::Parse("face without an index list".to_string()))?;

        // Fan triangulation; degenerate polygons are dropped.
        for i in 1..indices.len().saturating_sub(1) {
            faces.push([indices[0], indices[i], indices[i + 1]]);
        }
    }

    Mesh::new(vertices, faces)
}

fn scalar(property: &Property) -> Option<f32> {
    match *property {
        Property::Float(v) => Some(v),
        Property::Double(v) => Some(v as f32),
        Property::Char(v) => Some(v as f32),
        Property::UChar(v) => Some(v as f32),
        Property::Short(v) => Some(v as f32),
        Property::UShort(v) => Some(v as f32),
        Property::Int(v) => Some(v as f32),
        Property::UInt(v) => Some(v as f32),
        _ => None,
    }
}

fn index_list(property: &Property) -> Option<Vec<u32>> {
    fn unsigned<T: TryInto<u32> + Copy>(values: &[T]) -> Option<Vec<u32>> {
        values.iter().map(|&v| v.try_into().ok()).collect()
    }

    match property {
        Property::ListInt(v) => unsigned(v),
        Property::ListUInt(v) => Some(v.clone()),
        Property::ListShort(v) => unsigned(v),
        Property::ListUShort(v) => unsigned(v),
        Property::ListChar(v) => unsigned(v),
        Property::ListUChar(v) => unsigned(v),
        _ => None,
    }
}

fn parse_stl<R: Read + std::io::Seek>(reader: &mut R) -> Result<Mesh, GeometryError> {
    let stl = stl_io::read_stl(reader)
        .map_err(|e| GeometryError::Parse(format!("STL parse error: {}", e)))?;

    if stl.vertices.is_empty() {
        return Err(GeometryError::Empty);
    }

    // stl_io already deduplicates corners into an indexed mesh.
    let vertices = stl
        .vertices
        .iter()
        .map(|v| Vec3::new(v[0], v[1], v[2]))
        .collect();
    let faces = stl
        .faces
        .iter()
        .map(|f| f.vertices.map(|i| i as u32))
        .collect();

    Mesh::new(vertices, faces)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUBE_PLY: &str = "ply
format ascii 1.0
comment unit cube, quad faces
element vertex 8
property float x
property float y
property float z
element face 6
property list uchar int vertex_indices
end_header
0 0 0
1 0 0
1 1 0
0 1 0
0 0 1
1 0 1
1 1 1
0 1 1
4 0 3 2 1
4 4 5 6 7
4 0 1 5 4
4 3 7 6 2
4 0 4 7 3
4 1 2 6 5
";

    #[test]
    fn ascii_ply_cube() {
        let mesh = GeometryLoader::from_ply_bytes(CUBE_PLY.as_bytes())
            .build()
            .unwrap();
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.faces().len(), 12);
        assert_eq!(mesh.edges().len(), 18);
        assert_eq!(mesh.vertices()[6], Vec3::ONE);
        assert_eq!(mesh.faces()[0], [0, 3, 2]);
        assert_eq!(mesh.faces()[1], [0, 2, 1]);
    }

    #[test]
    fn centered_and_normalized() {
        let mesh = GeometryLoader::from_ply_bytes(CUBE_PLY.as_bytes())
            .centered()
            .scaled(4.0)
            .build()
            .unwrap();
        assert_eq!(mesh.center(), Vec3::ZERO);
        assert_eq!(mesh.size(), Vec3::splat(4.0));

        let big = Mesh::new(vec![Vec3::ZERO, Vec3::new(10.0, 5.0, 2.0)], vec![]).unwrap();
        let fitted = GeometryLoader::from_mesh(big).normalized().build().unwrap();
        assert_eq!(fitted.size(), Vec3::new(1.0, 0.5, 0.2));
    }

    #[test]
    fn ply_without_vertices_is_empty() {
        let data = "ply\nformat ascii 1.0\nelement vertex 0\nproperty float x\nproperty float y\nproperty float z\nend_header\n";
        let err = GeometryLoader::from_ply_bytes(data.as_bytes()).build().unwrap_err();
        assert!(matches!(err, GeometryError::Empty));
    }

    #[test]
    fn ply_with_bad_index_is_rejected() {
        let data = "ply\nformat ascii 1.0\nelement vertex 3\nproperty float x\nproperty float y\nproperty float z\nelement face 1\nproperty list uchar int vertex_indices\nend_header\n0 0 0\n1 0 0\n0 1 0\n3 0 1 7\n";
        let err = GeometryLoader::from_ply_bytes(data.as_bytes()).build().unwrap_err();
        assert!(matches!(err, GeometryError::IndexOutOfRange { index: 7, count: 3 }));
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let err = GeometryLoader::from_ply_bytes(b"not a ply file").build().unwrap_err();
        assert!(matches!(err, GeometryError::Parse(_)));
    }

    #[test]
    fn unknown_extension() {
        let err = GeometryLoader::from_file("model.obj").build().unwrap_err();
        assert!(matches!(err, GeometryError::UnknownFormat(ext) if ext == "obj"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = GeometryLoader::from_file("definitely/not/here.ply")
            .build()
            .unwrap_err();
        assert!(matches!(err, GeometryError::Io(_)));
    }

    #[test]
    fn ascii_stl_triangle() {
        let data = "solid t
facet normal 0 0 1
outer loop
vertex 0 0 0
vertex 1 0 0
vertex 0 1 0
endloop
endfacet
endsolid t
";
        let mesh = GeometryLoader::from_stl_bytes(data.as_bytes()).build().unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.faces().len(), 1);
        assert_eq!(mesh.edges().len(), 3);
    }
}
