//! Renderable entities
//!
//! An entity places a shared static mesh in the world with its own position,
//! rotation and base color. Inactive entities stay in the world but are left
//! out of the render set.

use super::mesh::Mesh;
use super::transform::Rotation;
use crate::rasterizer::{Color565, Vec3};

/// Handle returned by [`World::spawn`](super::World::spawn)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(pub(crate) usize);

impl EntityId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A mesh instance in the world
#[derive(Debug, Clone, Copy)]
pub struct Entity {
    pub position: Vec3,
    pub rotation: Rotation,
    pub mesh: &'static Mesh,
    /// Base color before flat shading
    pub color: Color565,
    pub active: bool,
}

impl Entity {
    /// Active entity at `position` with no rotation
    pub fn new(mesh: &'static Mesh, position: Vec3, color: Color565) -> Self {
        Self {
            position,
            rotation: Rotation::IDENTITY,
            mesh,
            color,
            active: true,
        }
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }
}
