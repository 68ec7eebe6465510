//! Fixed-point software rasterizer
//!
//! Everything on the per-frame path is integer or 16.16 fixed point, so it
//! runs the same on a microcontroller without an FPU as on the host.
//!
//! Features:
//! - Flat shading from the camera-space face normal plus an ambient term
//! - Backface culling
//! - Painter's algorithm over whole entities (no z-buffer)
//! - Near-plane clamp (no other clipping)
//!
//! # Module Organization
//!
//! - `fixed` - Fix16 (16.16), Angle (256 steps per turn), sine table
//! - `math` - Vec3, Vec2, Mat4
//! - `types` - Color565, ByteOrder, RenderMode
//! - `camera` - Camera offset and focal length
//! - `render` - Framebuffer, lines, triangles, shading
//! - `pipeline` - per-frame transform, visibility and draw
//! - `constants` - panel resolution and projection defaults

pub mod camera;
pub mod constants;
pub mod fixed;
pub mod math;
pub mod pipeline;
pub mod render;
pub mod types;

// =============================================================================
// Convenience re-exports for commonly used items
// =============================================================================

pub use camera::Camera;
pub use constants::{WIDTH, HEIGHT, BUFFER_SIZE, FOCAL_LENGTH, NEAR_CLAMP, AMBIENT, CAMERA_Z};
pub use fixed::{Angle, Fix16, fixed_cos, fixed_sin};
pub use math::{Mat4, Vec2, Vec3};
pub use pipeline::{FrameStats, Pipeline, PipelineSettings};
pub use render::{apply_lighting, Framebuffer, FramebufferError};
pub use types::{ByteOrder, Color565, RenderMode};
