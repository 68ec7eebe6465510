//! Game World
//!
//! Owns the entities and the camera. Entity storage is a flat list in spawn
//! order; that order is what breaks depth ties in the render set.

use super::entity::{Entity, EntityId};
use super::mesh::{Mesh, MeshError};
use crate::rasterizer::Camera;

/// The scene contents handed to the frame pipeline
#[derive(Debug, Default)]
pub struct World {
    entities: Vec<Entity>,
    pub camera: Camera,
}

impl World {
    pub fn new(camera: Camera) -> Self {
        Self { entities: Vec::new(), camera }
    }

    /// Add an entity after checking its mesh indices
    pub fn spawn(&mut self, entity: Entity) -> Result<EntityId, MeshError> {
        entity.mesh.validate()?;
        let id = EntityId(self.entities.len());
        self.entities.push(entity);
        Ok(id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.0)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id.0)
    }

    /// Include or exclude an entity from future frames
    pub fn set_active(&mut self, id: EntityId, active: bool) {
        if let Some(entity) = self.entities.get_mut(id.0) {
            entity.active = active;
        }
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.entities.iter().filter(|e| e.active).count()
    }

    /// Every mesh referenced by an entity (duplicates included)
    pub fn meshes(&self) -> impl Iterator<Item = &'static Mesh> + '_ {
        self.entities.iter().map(|e| e.mesh)
    }

    /// Remove all entities, keeping the camera
    pub fn clear(&mut self) {
        self.entities.clear();
    }
}
