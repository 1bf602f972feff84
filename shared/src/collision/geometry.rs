//! Static world triangle soup, ingested once from the scene loader.

use super::types::{Point3, Vec3};

/// Errors raised while ingesting mesh data into [`StaticWorldGeometry`].
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum GeometryError {
    #[error("Index count {0} is not a multiple of 3")]
    IncompleteTriangle(usize),

    #[error("Vertex index {index} out of range for a mesh with {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("Vertex {0} has a non-finite coordinate")]
    NonFiniteVertex(usize),
}

/// Immutable-after-load triangle soup the spatial index is built from.
///
/// Positions are expected in world space. Meshes are appended one at a time so the
/// loader can flatten a scene graph node by node.
#[derive(Clone, Debug, Default)]
pub struct StaticWorldGeometry {
    vertices: Vec<Point3>,
    triangles: Vec<[u32; 3]>,
}

impl StaticWorldGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from explicit world-space triangles.
    pub fn from_triangles(triangles: impl IntoIterator<Item = [Point3; 3]>) -> Self {
        let mut geometry = Self::new();
        for [a, b, c] in triangles {
            let base = geometry.vertices.len() as u32;
            geometry.vertices.extend([a, b, c]);
            geometry.triangles.push([base, base + 1, base + 2]);
        }
        geometry
    }

    /// Append one mesh.
    ///
    /// - `positions`: world-space vertex positions.
    /// - `indices`: triangle list indices into `positions`; `None` means consecutive triples.
    ///
    /// The mesh is validated as a whole; on error nothing is appended.
    pub fn push_mesh(
        &mut self,
        positions: &[Point3],
        indices: Option<&[u32]>,
    ) -> Result<(), GeometryError> {
        if let Some(i) = positions
            .iter()
            .position(|p| !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()))
        {
            return Err(GeometryError::NonFiniteVertex(i));
        }

        let sequential: Vec<u32>;
        let indices = match indices {
            Some(indices) => indices,
            None => {
                sequential = (0..positions.len() as u32).collect();
                &sequential
            }
        };

        if indices.len() % 3 != 0 {
            return Err(GeometryError::IncompleteTriangle(indices.len()));
        }
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= positions.len()) {
            return Err(GeometryError::IndexOutOfRange {
                index,
                vertex_count: positions.len(),
            });
        }

        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(positions);
        self.triangles.extend(
            indices
                .chunks_exact(3)
                .map(|t| [base + t[0], base + t[1], base + t[2]]),
        );
        Ok(())
    }

    /// Shift every vertex by `offset`.
    pub fn translate(&mut self, offset: &Vec3) {
        for v in &mut self.vertices {
            *v += offset;
        }
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Iterate triangles as world-space corner triples.
    pub fn triangles(&self) -> impl Iterator<Item = [Point3; 3]> + '_ {
        self.triangles.iter().map(|&[a, b, c]| {
            [
                self.vertices[a as usize],
                self.vertices[b as usize],
                self.vertices[c as usize],
            ]
        })
    }
}
