//! Scene contents and the engine loop
//!
//! - `mesh` / `primitives`: static geometry shared by reference
//! - `entity`: a mesh placed in the world with rotation and color
//! - `transform`: wrapped per-axis rotation and time-based spin
//! - `world`: entity list plus camera
//! - `runtime`: the engine that ties world, pipeline, display and input together

pub mod entity;
pub mod mesh;
pub mod primitives;
pub mod runtime;
pub mod transform;
pub mod world;

pub use entity::{Entity, EntityId};
pub use mesh::{Edge, Face, Mesh, MeshError};
pub use runtime::{Engine, EngineError};
pub use transform::{Rotation, Spin};
pub use world::World;
