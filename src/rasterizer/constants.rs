//! Rasterizer constants
//!
//! Panel resolution and default projection/shading terms.

use super::fixed::Fix16;

/// Panel width (ST7735 in portrait)
pub const WIDTH: usize = 128;

/// Panel height (ST7735 in portrait)
pub const HEIGHT: usize = 160;

/// Pixels in one full frame
pub const BUFFER_SIZE: usize = WIDTH * HEIGHT;

/// Focal length in pixels: `screen = cam * (FOCAL_LENGTH / z) + center`
pub const FOCAL_LENGTH: Fix16 = Fix16::from_int(150);

/// Minimum camera-space depth; closer vertices are clamped to it
pub const NEAR_CLAMP: Fix16 = Fix16::HALF;

/// Ambient term added to every face's intensity
pub const AMBIENT: Fix16 = Fix16::QUARTER;

/// Default distance the scene is pushed in front of the eye
pub const CAMERA_Z: Fix16 = Fix16::from_int(4);
