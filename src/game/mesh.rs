//! Static mesh data
//!
//! Meshes are immutable tables that live for the whole program (flash on the
//! device, `static` on the host). Entities reference them by `&'static Mesh`,
//! so any number of entities can share one table.

use crate::rasterizer::Vec3;

/// Triangle as three vertex indices; counter-clockwise winding faces outward
pub type Face = [u16; 3];

/// Wireframe edge as two vertex indices
pub type Edge = [u16; 2];

/// Untextured triangle mesh in local space
#[derive(Debug, PartialEq, Eq)]
pub struct Mesh {
    pub name: &'static str,
    pub vertices: &'static [Vec3],
    pub faces: &'static [Face],
    pub edges: &'static [Edge],
}

/// Problems found by [`Mesh::validate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    NoVertices { mesh: &'static str },
    FaceIndex { mesh: &'static str, face: usize, index: u16, vertex_count: usize },
    EdgeIndex { mesh: &'static str, edge: usize, index: u16, vertex_count: usize },
}

impl std::fmt::Display for MeshError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeshError::NoVertices { mesh } => write!(f, "mesh '{}' has no vertices", mesh),
            MeshError::FaceIndex { mesh, face, index, vertex_count } => write!(
                f,
                "mesh '{}': face {} references vertex {} (only {} vertices)",
                mesh, face, index, vertex_count
            ),
            MeshError::EdgeIndex { mesh, edge, index, vertex_count } => write!(
                f,
                "mesh '{}': edge {} references vertex {} (only {} vertices)",
                mesh, edge, index, vertex_count
            ),
        }
    }
}

impl std::error::Error for MeshError {}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Check that every face and edge index names an existing vertex
    pub fn validate(&self) -> Result<(), MeshError> {
        let vertex_count = self.vertices.len();
        if vertex_count == 0 {
            return Err(MeshError::NoVertices { mesh: self.name });
        }

        for (face, indices) in self.faces.iter().enumerate() {
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(MeshError::FaceIndex { mesh: self.name, face, index, vertex_count });
            }
        }

        for (edge, indices) in self.edges.iter().enumerate() {
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(MeshError::EdgeIndex { mesh: self.name, edge, index, vertex_count });
            }
        }

        Ok(())
    }
}
