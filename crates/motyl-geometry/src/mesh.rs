//! Mesh and Geometry
//!
//! Indexed triangle meshes built once at load time.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::{GeometryError, GeometryResult};

/// Vertex with position and normal, laid out for direct upload
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Object-space position
    pub position: Vec3,
    /// Object-space unit normal
    pub normal: Vec3,
}

impl Vertex {
    /// Create a new vertex
    pub const fn new(position: Vec3, normal: Vec3) -> Self {
        Self { position, normal }
    }
}

/// Immutable indexed triangle mesh
#[derive(Debug, Clone)]
pub struct Mesh {
    name: String,
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl Mesh {
    /// Create a mesh, checking that indices form whole triangles and stay
    /// within the vertex list
    pub fn new(
        name: impl Into<String>,
        vertices: Vec<Vertex>,
        indices: Vec<u32>,
    ) -> GeometryResult<Self> {
        let name = name.into();
        if indices.len() % 3 != 0 {
            return Err(GeometryError::IncompleteTriangle {
                mesh: name,
                count: indices.len(),
            });
        }
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(GeometryError::IndexOutOfRange {
                mesh: name,
                index,
                vertex_count: vertices.len(),
            });
        }

        log::debug!(
            "Built mesh '{}': {} vertices, {} triangles",
            name,
            vertices.len(),
            indices.len() / 3
        );

        Ok(Self {
            name,
            vertices,
            indices,
        })
    }

    /// Create a mesh from fixed tables whose connectivity is known to be valid
    pub(crate) fn from_trusted(name: &str, vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        debug_assert!(indices.len() % 3 == 0);
        debug_assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
        Self {
            name: name.to_owned(),
            vertices,
            indices,
        }
    }

    /// Mesh name (for debugging)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Vertex data
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Index data, three per triangle
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of indices
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate over triangles as index triples
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Geometric (unnormalized) normal of a triangle from its winding
    pub fn face_normal(&self, triangle: [u32; 3]) -> Vec3 {
        let [a, b, c] = triangle.map(|i| self.vertices[i as usize].position);
        (b - a).cross(c - a)
    }

    /// Whether every stored normal is unit length within `epsilon`
    pub fn normals_are_unit(&self, epsilon: f32) -> bool {
        self.vertices
            .iter()
            .all(|v| (v.normal.length() - 1.0).abs() <= epsilon)
    }

    /// Whether every vertex is used by at least one triangle
    pub fn all_vertices_referenced(&self) -> bool {
        let mut used = vec![false; self.vertices.len()];
        for &i in &self.indices {
            used[i as usize] = true;
        }
        used.into_iter().all(|u| u)
    }

    /// Vertex bytes for buffer upload
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}
