//! Camera for 3D rendering
//!
//! The eye sits at the camera-space origin looking down +Z. Camera space is
//! world space plus `offset`, so `offset.z` is how far the scene is pushed in
//! front of the eye.

use super::constants::{CAMERA_Z, FOCAL_LENGTH};
use super::fixed::Fix16;
use super::math::Vec3;

/// Camera state for 3D rendering
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Camera {
    /// Added to every world-space vertex to get camera space
    pub offset: Vec3,
    /// Focal length in pixels
    pub focal: Fix16,
}

impl Camera {
    pub fn new(offset: Vec3, focal: Fix16) -> Self {
        Self { offset, focal }
    }

    /// Camera looking at the origin from `distance` units away
    pub fn at_distance(distance: Fix16) -> Self {
        Self::new(Vec3::new(Fix16::ZERO, Fix16::ZERO, distance), FOCAL_LENGTH)
    }

    /// Move toward (negative) or away from (positive) the scene
    pub fn dolly(&mut self, dz: Fix16) {
        self.offset.z += dz;
    }

    /// Camera-relative depth of a world-space position (larger is farther)
    #[inline]
    pub fn depth_of(&self, position: Vec3) -> Fix16 {
        position.z + self.offset.z
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::at_distance(CAMERA_Z)
    }
}
