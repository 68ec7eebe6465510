//! Engine Runtime
//!
//! Owns the framebuffer, pipeline, world and active scene, and drives one
//! frame as `update(dt)` -> `draw()` -> `present()`. The caller supplies the
//! timing (a macroquad loop in the simulator, a fixed step in headless runs).

use tracing::{debug, info, warn};

use super::mesh::MeshError;
use super::world::World;
use crate::config::{ConfigError, EngineConfig};
use crate::display::Display;
use crate::input::InputSource;
use crate::rasterizer::{Fix16, FrameStats, Framebuffer, FramebufferError, Pipeline, RenderMode};
use crate::scene::{DrawContext, Scene, UpdateContext};

/// Anything that can stop the engine from starting
#[derive(Debug)]
pub enum EngineError {
    Config(ConfigError),
    Framebuffer(FramebufferError),
    Scene(MeshError),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::Config(e) => write!(f, "config: {}", e),
            EngineError::Framebuffer(e) => write!(f, "framebuffer: {}", e),
            EngineError::Scene(e) => write!(f, "scene load: {}", e),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Config(e) => Some(e),
            EngineError::Framebuffer(e) => Some(e),
            EngineError::Scene(e) => Some(e),
        }
    }
}

impl From<ConfigError> for EngineError {
    fn from(e: ConfigError) -> Self {
        EngineError::Config(e)
    }
}

impl From<FramebufferError> for EngineError {
    fn from(e: FramebufferError) -> Self {
        EngineError::Framebuffer(e)
    }
}

impl From<MeshError> for EngineError {
    fn from(e: MeshError) -> Self {
        EngineError::Scene(e)
    }
}

/// The running engine
pub struct Engine<D: Display, I: InputSource> {
    config: EngineConfig,
    framebuffer: Framebuffer,
    pipeline: Pipeline,
    world: World,
    scene: Box<dyn Scene>,
    mode: RenderMode,
    display: D,
    input: I,
    max_dt: Fix16,
    frames_drawn: u64,
    dropped_frames: u64,
    last_stats: FrameStats,
}

impl<D: Display, I: InputSource> Engine<D, I> {
    /// Validate the config, allocate the framebuffer and load the scene
    pub fn init(
        config: EngineConfig,
        mut scene: Box<dyn Scene>,
        display: D,
        input: I,
    ) -> Result<Self, EngineError> {
        config.validate()?;

        let framebuffer = Framebuffer::new(config.width, config.height)?;
        let mut world = World::new(config.camera());
        scene.load(&mut world)?;

        let mut pipeline = Pipeline::new(config.pipeline_settings());
        pipeline.reserve_for(world.meshes());

        info!(
            scene = scene.name(),
            entities = world.len(),
            width = config.width,
            height = config.height,
            mode = config.start_mode.label(),
            "engine initialized"
        );

        Ok(Self {
            mode: config.start_mode,
            max_dt: config.max_dt(),
            config,
            framebuffer,
            pipeline,
            world,
            scene,
            display,
            input,
            frames_drawn: 0,
            dropped_frames: 0,
            last_stats: FrameStats::default(),
        })
    }

    /// Read input and advance the scene by `dt` seconds (capped at `max_dt`)
    pub fn update(&mut self, dt: Fix16) {
        let dt = dt.clamp(Fix16::ZERO, self.max_dt);
        let input = self.input.read_input();
        let mut ctx = UpdateContext {
            world: &mut self.world,
            input,
            dt,
            mode: &mut self.mode,
        };
        self.scene.update(&mut ctx);
    }

    /// Clear to the background, then let the scene render into the framebuffer
    pub fn draw(&mut self) -> FrameStats {
        self.framebuffer.clear(self.pipeline.settings.background);
        let mut ctx = DrawContext {
            world: &self.world,
            pipeline: &mut self.pipeline,
            framebuffer: &mut self.framebuffer,
            mode: self.mode,
        };
        let stats = self.scene.draw(&mut ctx);

        self.frames_drawn += 1;
        self.last_stats = stats;
        debug!(
            frame = self.frames_drawn,
            entities = stats.entities_drawn,
            faces = stats.faces_drawn,
            culled = stats.faces_culled,
            edges = stats.edges_drawn,
            clamped = stats.clamped_vertices,
            "frame drawn"
        );
        stats
    }

    /// Hand the framebuffer to the display.
    ///
    /// A failed present drops the frame and returns false; the next frame
    /// proceeds normally.
    pub fn present(&mut self) -> bool {
        match self.display.present(&self.framebuffer) {
            Ok(()) => true,
            Err(e) => {
                self.dropped_frames += 1;
                warn!(frame = self.frames_drawn, dropped = self.dropped_frames, "present failed: {}", e);
                false
            }
        }
    }

    /// One full frame: update, draw, present
    pub fn step(&mut self, dt: Fix16) -> FrameStats {
        self.update(dt);
        let stats = self.draw();
        self.present();
        stats
    }

    /// Run `frames` steps of the configured fixed dt
    pub fn run_fixed(&mut self, frames: u32) -> FrameStats {
        let dt = self.config.fixed_dt();
        for _ in 0..frames {
            self.step(dt);
        }
        self.last_stats
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Takes effect at the next draw
    pub fn set_mode(&mut self, mode: RenderMode) {
        if mode != self.mode {
            info!(from = self.mode.label(), to = mode.label(), "render mode changed");
        }
        self.mode = mode;
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn scene_name(&self) -> &'static str {
        self.scene.name()
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    pub fn dropped_frames(&self) -> u64 {
        self.dropped_frames
    }

    pub fn last_stats(&self) -> FrameStats {
        self.last_stats
    }
}
