//! Built-in meshes

use super::mesh::Mesh;
use crate::rasterizer::Vec3;

static CUBE_VERTICES: [Vec3; 8] = [
    Vec3::from_ints(-1, -1, 1),
    Vec3::from_ints(1, -1, 1),
    Vec3::from_ints(1, 1, 1),
    Vec3::from_ints(-1, 1, 1),
    Vec3::from_ints(-1, -1, -1),
    Vec3::from_ints(1, -1, -1),
    Vec3::from_ints(1, 1, -1),
    Vec3::from_ints(-1, 1, -1),
];

static CUBE_FACES: [[u16; 3]; 12] = [
    [0, 1, 2], [0, 2, 3], // +Z
    [5, 4, 7], [5, 7, 6], // -Z
    [4, 0, 3], [4, 3, 7], // -X
    [1, 5, 6], [1, 6, 2], // +X
    [3, 2, 6], [3, 6, 7], // +Y
    [4, 5, 1], [4, 1, 0], // -Y
];

static CUBE_EDGES: [[u16; 2]; 12] = [
    [0, 1], [1, 2], [2, 3], [3, 0],
    [4, 5], [5, 6], [6, 7], [7, 4],
    [0, 4], [1, 5], [2, 6], [3, 7],
];

/// Axis-aligned cube spanning -1..1
pub static CUBE: Mesh = Mesh {
    name: "cube",
    vertices: &CUBE_VERTICES,
    faces: &CUBE_FACES,
    edges: &CUBE_EDGES,
};

static PYRAMID_VERTICES: [Vec3; 5] = [
    Vec3::from_ints(0, 1, 0), // apex
    Vec3::from_ints(-1, -1, 1),
    Vec3::from_ints(1, -1, 1),
    Vec3::from_ints(1, -1, -1),
    Vec3::from_ints(-1, -1, -1),
];

static PYRAMID_FACES: [[u16; 3]; 6] = [
    [0, 1, 2], [0, 2, 3], [0, 3, 4], [0, 4, 1],
    [1, 4, 3], [1, 3, 2],
];

static PYRAMID_EDGES: [[u16; 2]; 8] = [
    [0, 1], [0, 2], [0, 3], [0, 4],
    [1, 2], [2, 3], [3, 4], [4, 1],
];

/// Square-based pyramid, apex at +Y
pub static PYRAMID: Mesh = Mesh {
    name: "pyramid",
    vertices: &PYRAMID_VERTICES,
    faces: &PYRAMID_FACES,
    edges: &PYRAMID_EDGES,
};

/// Look up a built-in mesh by name
pub fn by_name(name: &str) -> Option<&'static Mesh> {
    [&CUBE, &PYRAMID].into_iter().find(|m| m.name.eq_ignore_ascii_case(name))
}
