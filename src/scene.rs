//! Scenes
//!
//! A scene populates the world at load, reacts to input each update and
//! draws through the frame pipeline. The engine owns the world, pipeline and
//! framebuffer; scenes only see them through the contexts below.

use serde::{Deserialize, Serialize};

use crate::game::{Entity, EntityId, Mesh, MeshError, Rotation, Spin, World};
use crate::game::primitives::{CUBE, PYRAMID};
use crate::input::{Buttons, EdgeDetector};
use crate::rasterizer::{Angle, Color565, Fix16, FrameStats, Framebuffer, Pipeline, RenderMode, Vec3};

/// Which built-in scene to start with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SceneKind {
    /// One mesh steered with the buttons
    #[default]
    SpinningMesh,
    /// Several meshes spinning at different depths
    Showcase,
}

impl SceneKind {
    pub const ALL: [SceneKind; 2] = [SceneKind::SpinningMesh, SceneKind::Showcase];

    pub fn label(self) -> &'static str {
        match self {
            SceneKind::SpinningMesh => "spinning-mesh",
            SceneKind::Showcase => "showcase",
        }
    }
}

impl std::str::FromStr for SceneKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SceneKind::ALL
            .into_iter()
            .find(|k| k.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown scene '{}' (expected spinning-mesh or showcase)", s))
    }
}

/// Build the scene for `kind`
pub fn create_scene(kind: SceneKind) -> Box<dyn Scene> {
    match kind {
        SceneKind::SpinningMesh => Box::new(SpinningMesh::new()),
        SceneKind::Showcase => Box::new(Showcase::new()),
    }
}

/// What a scene may touch during update
pub struct UpdateContext<'a> {
    pub world: &'a mut World,
    /// Button snapshot for this update
    pub input: Buttons,
    /// Seconds since the last update, already capped
    pub dt: Fix16,
    /// Mode the next draw will use
    pub mode: &'a mut RenderMode,
}

/// What a scene may touch during draw
pub struct DrawContext<'a> {
    pub world: &'a World,
    pub pipeline: &'a mut Pipeline,
    pub framebuffer: &'a mut Framebuffer,
    /// Read once by the engine before the draw starts
    pub mode: RenderMode,
}

pub trait Scene {
    fn name(&self) -> &'static str;

    /// Spawn entities and set up the camera
    fn load(&mut self, world: &mut World) -> Result<(), MeshError>;

    fn update(&mut self, ctx: &mut UpdateContext<'_>);

    /// Default: render the world's entities. The engine clears the
    /// framebuffer to the background before calling this.
    fn draw(&mut self, ctx: &mut DrawContext<'_>) -> FrameStats {
        ctx.pipeline.render(ctx.framebuffer, ctx.world, ctx.mode)
    }
}

// =============================================================================
// Spinning mesh
// =============================================================================

/// Rotation speed while an arrow is held: 2 steps per frame at 60 fps
const STEER_STEPS_PER_SEC: i32 = 120;

/// Camera speed while A/B is held: 0.1 units per frame at 60 fps
const DOLLY_UNITS_PER_SEC: i32 = 6;

/// A single mesh under direct control.
///
/// - UP/DOWN rotate about X, LEFT/RIGHT about Y
/// - A moves the camera closer, B moves it away
/// - Pressing LEFT and RIGHT together cycles the render mode
pub struct SpinningMesh {
    mesh: &'static Mesh,
    color: Color565,
    entity: Option<EntityId>,
    steer: Spin,
    edges: EdgeDetector,
}

impl SpinningMesh {
    pub fn new() -> Self {
        Self::with_mesh(&CUBE, Color565::WHITE)
    }

    pub fn with_mesh(mesh: &'static Mesh, color: Color565) -> Self {
        Self {
            mesh,
            color,
            entity: None,
            steer: Spin::default(),
            edges: EdgeDetector::default(),
        }
    }

    pub fn entity(&self) -> Option<EntityId> {
        self.entity
    }
}

impl Default for SpinningMesh {
    fn default() -> Self {
        Self::new()
    }
}

/// -1, 0 or 1 from a pair of opposing buttons
fn axis(input: Buttons, negative: Buttons, positive: Buttons) -> i32 {
    input.contains(positive) as i32 - input.contains(negative) as i32
}

impl Scene for SpinningMesh {
    fn name(&self) -> &'static str {
        "spinning-mesh"
    }

    fn load(&mut self, world: &mut World) -> Result<(), MeshError> {
        let id = world.spawn(Entity::new(self.mesh, Vec3::ZERO, self.color))?;
        self.entity = Some(id);
        Ok(())
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        let input = ctx.input;

        let toggle = Buttons::LEFT | Buttons::RIGHT;
        if self.edges.combo_pressed(input, toggle) {
            *ctx.mode = ctx.mode.next();
        }
        self.edges.update(input);

        let rate = Fix16::from_int(STEER_STEPS_PER_SEC);
        self.steer.rate = [
            rate * Fix16::from_int(axis(input, Buttons::UP, Buttons::DOWN)),
            rate * Fix16::from_int(axis(input, Buttons::LEFT, Buttons::RIGHT)),
            Fix16::ZERO,
        ];

        if let Some(entity) = self.entity.and_then(|id| ctx.world.get_mut(id)) {
            self.steer.apply(&mut entity.rotation, ctx.dt);
        }

        let dolly = axis(input, Buttons::A, Buttons::B);
        if dolly != 0 {
            let speed = Fix16::from_int(DOLLY_UNITS_PER_SEC * dolly);
            ctx.world.camera.dolly(speed * ctx.dt);
        }
    }
}

// =============================================================================
// Showcase
// =============================================================================

/// Several meshes at different depths spinning on their own.
///
/// - UP/DOWN move the camera
/// - A hides or shows the far pyramid
/// - B cycles the render mode
pub struct Showcase {
    spins: Vec<(EntityId, Spin)>,
    far_pyramid: Option<EntityId>,
    edges: EdgeDetector,
}

impl Showcase {
    pub fn new() -> Self {
        Self {
            spins: Vec::new(),
            far_pyramid: None,
            edges: EdgeDetector::default(),
        }
    }
}

impl Default for Showcase {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for Showcase {
    fn name(&self) -> &'static str {
        "showcase"
    }

    fn load(&mut self, world: &mut World) -> Result<(), MeshError> {
        let layout = [
            (&CUBE, Vec3::from_ints(0, 0, 0), Color565::WHITE, [40, 64, 0]),
            (&PYRAMID, Vec3::from_f32(-1.5, 0.5, 3.0), Color565::CYAN, [0, -90, 20]),
            (&PYRAMID, Vec3::from_f32(1.5, -0.5, -1.0), Color565::YELLOW, [30, 45, 0]),
            (&CUBE, Vec3::from_f32(0.0, 1.75, 5.0), Color565::MAGENTA, [-25, 0, 50]),
        ];

        self.spins.clear();
        for (i, (mesh, position, color, [x, y, z])) in layout.into_iter().enumerate() {
            let entity = Entity::new(mesh, position, color)
                .with_rotation(Rotation::new(Angle((i * 40) as u8), Angle((i * 24) as u8), Angle::ZERO));
            let id = world.spawn(entity)?;
            let spin = Spin::new(Fix16::from_int(x), Fix16::from_int(y), Fix16::from_int(z));
            self.spins.push((id, spin));
            if i == 1 {
                self.far_pyramid = Some(id);
            }
        }

        world.camera.offset.z = Fix16::from_int(7);
        Ok(())
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        let pressed = self.edges.update(ctx.input);

        if pressed.contains(Buttons::B) {
            *ctx.mode = ctx.mode.next();
        }
        if pressed.contains(Buttons::A) {
            if let Some(entity) = self.far_pyramid.and_then(|id| ctx.world.get_mut(id)) {
                entity.active = !entity.active;
            }
        }

        let dolly = axis(ctx.input, Buttons::UP, Buttons::DOWN);
        if dolly != 0 {
            ctx.world.camera.dolly(Fix16::from_int(DOLLY_UNITS_PER_SEC * dolly) * ctx.dt);
        }

        for (id, spin) in &mut self.spins {
            if let Some(entity) = ctx.world.get_mut(*id) {
                spin.apply(&mut entity.rotation, ctx.dt);
            }
        }
    }
}
