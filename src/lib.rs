//! VOID ENGINE: fixed-point 3D for small SPI displays
//!
//! Renders untextured low-poly meshes into a 128x160 RGB565 framebuffer using
//! only integer and 16.16 fixed-point math on the per-frame path:
//! - Flat shading with backface culling
//! - Painter's algorithm over whole meshes (no z-buffer)
//! - Wireframe, solid and solid-plus-edges render modes
//!
//! The display and button input are traits, so the same engine runs against
//! the SPI panel, the desktop simulator (`main.rs`) or headless tooling.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod display;
pub mod game;
pub mod input;
pub mod rasterizer;
pub mod scene;

pub use config::{ConfigError, EngineConfig};
pub use display::{Display, DisplayError, FrameCapture, PngSnapshot};
pub use game::{Engine, EngineError};
pub use input::{Buttons, InputSource, SharedInput};
pub use scene::{create_scene, Scene, SceneKind};
