//! Frame pipeline
//!
//! Turns the world's entities into pixels:
//! 1. Build the render set (active entities, farthest first)
//! 2. Per entity: rotate, translate, move into camera space, clamp to near
//! 3. Project with `screen = cam * (focal / z) + center`
//! 4. Cull faces whose camera-space normal points away from the eye
//! 5. Flat shade and fill, then overlay edges
//!
//! No z-buffer: each entity is drawn whole, back to front.

use super::camera::Camera;
use super::constants::{AMBIENT, NEAR_CLAMP};
use super::fixed::Fix16;
use super::math::{Vec2, Vec3};
use super::render::{apply_lighting, Framebuffer};
use super::types::{Color565, RenderMode};
use crate::game::{Entity, Mesh, World};

/// Tunables that stay fixed for the life of a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    /// Camera-space z floor; vertices closer than this are clamped onto it
    pub near: Fix16,
    pub ambient: Fix16,
    pub background: Color565,
    /// Edge color in `Wire` mode
    pub wire_color: Color565,
    /// Edge color drawn over faces in `Both` mode
    pub overlay_color: Color565,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            near: NEAR_CLAMP,
            ambient: AMBIENT,
            background: Color565::BLACK,
            wire_color: Color565::GREEN,
            overlay_color: Color565::BLACK,
        }
    }
}

/// Counters for one draw call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub entities_drawn: u32,
    pub faces_drawn: u32,
    pub faces_culled: u32,
    pub edges_drawn: u32,
    /// Vertices pulled forward onto the near clamp
    pub clamped_vertices: u32,
}

/// Per-frame transform, visibility and rasterization driver
///
/// Owns the scratch buffers so a frame does not allocate once they have been
/// sized for the largest mesh.
pub struct Pipeline {
    pub settings: PipelineSettings,
    /// Camera-space vertices of the entity being drawn
    camera_space: Vec<Vec3>,
    /// Projected vertices of the entity being drawn
    screen: Vec<Vec2>,
    /// Entity indices in draw order
    render_set: Vec<usize>,
}

impl Pipeline {
    pub fn new(settings: PipelineSettings) -> Self {
        Self {
            settings,
            camera_space: Vec::new(),
            screen: Vec::new(),
            render_set: Vec::new(),
        }
    }

    /// Grow the scratch buffers to fit the largest of `meshes`
    pub fn reserve_for<'a>(&mut self, meshes: impl IntoIterator<Item = &'a Mesh>) {
        let mut entity_count: usize = 0;
        let mut largest: usize = 0;
        for mesh in meshes {
            entity_count += 1;
            largest = largest.max(mesh.vertex_count());
        }
        self.camera_space.reserve(largest.saturating_sub(self.camera_space.len()));
        self.screen.reserve(largest.saturating_sub(self.screen.len()));
        self.render_set.reserve(entity_count.saturating_sub(self.render_set.len()));
    }

    /// Vertex capacity of the scratch buffers
    pub fn scratch_capacity(&self) -> usize {
        self.camera_space.capacity().min(self.screen.capacity())
    }

    /// Camera-space vertices of the most recently transformed entity
    pub fn camera_space(&self) -> &[Vec3] {
        &self.camera_space
    }

    /// Screen-space vertices of the most recently transformed entity
    pub fn projected(&self) -> &[Vec2] {
        &self.screen
    }

    /// Collect active entities and sort them farthest first.
    ///
    /// Depth is `position.z + camera.offset.z`. The insertion sort is stable,
    /// so entities at equal depth keep their spawn order.
    pub fn build_render_set(&mut self, entities: &[Entity], camera: &Camera) -> &[usize] {
        self.render_set.clear();
        self.render_set.extend(
            entities.iter().enumerate().filter(|(_, e)| e.active).map(|(i, _)| i),
        );

        let depth = |i: usize| camera.depth_of(entities[i].position);
        for i in 1..self.render_set.len() {
            let mut j = i;
            while j > 0 && depth(self.render_set[j - 1]) < depth(self.render_set[j]) {
                self.render_set.swap(j - 1, j);
                j -= 1;
            }
        }

        &self.render_set
    }

    /// Transform and project one entity into the scratch buffers.
    ///
    /// Returns how many vertices were clamped to the near plane.
    pub fn transform_entity(&mut self, entity: &Entity, camera: &Camera, center: Vec2) -> u32 {
        let model = entity.rotation.to_matrix();
        let near = self.settings.near;
        let mut clamped = 0;

        self.camera_space.clear();
        self.screen.clear();

        for &v in entity.mesh.vertices {
            let mut p = model.transform_point(v) + entity.position + camera.offset;
            if p.z < near {
                p.z = near;
                clamped += 1;
            }

            let scale = camera.focal / p.z;
            self.screen.push(Vec2::new(p.x * scale + center.x, p.y * scale + center.y));
            self.camera_space.push(p);
        }

        clamped
    }

    /// Rasterize the entity currently in the scratch buffers
    fn draw_transformed(
        &self,
        fb: &mut Framebuffer,
        entity: &Entity,
        mode: RenderMode,
        stats: &mut FrameStats,
    ) {
        let mesh = entity.mesh;

        if mode.draws_faces() {
            for face in mesh.faces {
                let Some([a, b, c]) = self.face_vertices(face) else {
                    continue;
                };

                let normal = Vec3::face_normal(a, b, c);
                if normal.z >= Fix16::ZERO {
                    stats.faces_culled += 1;
                    continue;
                }

                let shaded = apply_lighting(entity.color, normal.z, self.settings.ambient);
                let [(x1, y1), (x2, y2), (x3, y3)] =
                    face.map(|i| self.screen[i as usize].to_pixel());
                fb.fill_triangle(x1, y1, x2, y2, x3, y3, shaded);
                stats.faces_drawn += 1;
            }
        }

        if mode.draws_edges() {
            let color = if mode == RenderMode::Both {
                self.settings.overlay_color
            } else {
                self.settings.wire_color
            };

            for &[i0, i1] in mesh.edges {
                let (Some(p0), Some(p1)) = (self.screen.get(i0 as usize), self.screen.get(i1 as usize))
                else {
                    continue;
                };
                let (x0, y0) = p0.to_pixel();
                let (x1, y1) = p1.to_pixel();
                fb.draw_line(x0, y0, x1, y1, color);
                stats.edges_drawn += 1;
            }
        }
    }

    /// Camera-space corners of a face, or None if an index is out of range
    fn face_vertices(&self, face: &[u16; 3]) -> Option<[Vec3; 3]> {
        let get = |i: u16| self.camera_space.get(i as usize).copied();
        Some([get(face[0])?, get(face[1])?, get(face[2])?])
    }

    /// Draw every active entity in `entities` into `fb`.
    ///
    /// Clears the framebuffer to the background first. `mode` applies to the
    /// whole frame.
    pub fn render_entities(
        &mut self,
        fb: &mut Framebuffer,
        entities: &[Entity],
        camera: &Camera,
        mode: RenderMode,
    ) -> FrameStats {
        let mut stats = FrameStats::default();
        fb.clear(self.settings.background);

        let center = Vec2::new(
            Fix16::from_int((fb.width / 2) as i32),
            Fix16::from_int((fb.height / 2) as i32),
        );

        self.build_render_set(entities, camera);

        // Index loop: the render set is borrowed from self while the scratch
        // buffers are rewritten per entity
        for n in 0..self.render_set.len() {
            let entity = &entities[self.render_set[n]];
            stats.clamped_vertices += self.transform_entity(entity, camera, center);
            self.draw_transformed(fb, entity, mode, &mut stats);
            stats.entities_drawn += 1;
        }

        stats
    }

    /// Draw the world's entities from its camera
    pub fn render(&mut self, fb: &mut Framebuffer, world: &World, mode: RenderMode) -> FrameStats {
        self.render_entities(fb, world.entities(), &world.camera, mode)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(PipelineSettings::default())
    }
}
