//! Rotation state
//!
//! Rotations are kept as three wrapped 8-bit angles (256 steps per turn), one
//! per axis. The model matrix is `Rx * Ry * Rz`, so Z is applied first.

use crate::rasterizer::{Angle, Fix16, Mat4};

/// Per-axis rotation accumulators
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rotation {
    pub x: Angle,
    pub y: Angle,
    pub z: Angle,
}

impl Rotation {
    pub const IDENTITY: Rotation = Rotation { x: Angle::ZERO, y: Angle::ZERO, z: Angle::ZERO };

    pub const fn new(x: Angle, y: Angle, z: Angle) -> Self {
        Self { x, y, z }
    }

    /// Add whole steps to each axis (wraps past a full turn)
    pub fn rotate(&mut self, dx: i8, dy: i8, dz: i8) {
        self.x += Angle(dx as u8);
        self.y += Angle(dy as u8);
        self.z += Angle(dz as u8);
    }

    /// Model rotation `Rx(x) * Ry(y) * Rz(z)`
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::rotation_x(self.x) * Mat4::rotation_y(self.y) * Mat4::rotation_z(self.z)
    }
}

/// Time-based rotation rate with sub-step carry
///
/// Angles only hold whole steps, so the fractional part of `rate * dt` is
/// carried to the next frame. Without it slow spins at high frame rates would
/// never move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Spin {
    /// Steps per second around each axis
    pub rate: [Fix16; 3],
    carry: [Fix16; 3],
}

impl Spin {
    pub fn new(x: Fix16, y: Fix16, z: Fix16) -> Self {
        Self { rate: [x, y, z], carry: [Fix16::ZERO; 3] }
    }

    /// Advance `rotation` by `rate * dt`
    pub fn apply(&mut self, rotation: &mut Rotation, dt: Fix16) {
        let axes = [&mut rotation.x, &mut rotation.y, &mut rotation.z];
        for ((angle, rate), carry) in axes.into_iter().zip(self.rate).zip(self.carry.iter_mut()) {
            *carry += rate * dt;
            let whole = carry.to_int();
            *carry -= Fix16::from_int(whole);
            // Truncating cast wraps negative steps the same way Angle does
            *angle += Angle(whole as u8);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::Vec3;

    #[test]
    fn test_rotate_wraps() {
        let mut rot = Rotation::default();
        rot.rotate(-2, 2, 0);
        assert_eq!(rot.x, Angle(254));
        assert_eq!(rot.y, Angle(2));
        rot.rotate(2, 0, 0);
        assert_eq!(rot.x, Angle::ZERO);
    }

    #[test]
    fn test_identity_matrix() {
        assert_eq!(Rotation::IDENTITY.to_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn test_z_applied_before_x() {
        // Quarter turn about Z maps +X to +Y; then a quarter turn about X maps +Y to +Z
        let rot = Rotation::new(Angle::QUARTER_TURN, Angle::ZERO, Angle::QUARTER_TURN);
        let p = rot.to_matrix().transform_point(Vec3::from_ints(1, 0, 0));
        assert_eq!(p, Vec3::from_ints(0, 0, 1));
    }

    #[test]
    fn test_spin_carries_fraction() {
        // 30 steps/s at 1/60 s per frame is half a step per frame
        let mut spin = Spin::new(Fix16::ZERO, Fix16::from_int(30), Fix16::from_int(-30));
        let mut rot = Rotation::default();
        let dt = Fix16::ONE / Fix16::from_int(60);
        for _ in 0..60 {
            spin.apply(&mut rot, dt);
        }
        // dt is truncated slightly below 1/60, so the total lands just under 30 steps
        assert!((28..=30).contains(&rot.y.0), "y = {}", rot.y.0);
        assert!((226..=228).contains(&rot.z.0), "z = {}", rot.z.0);
        assert_eq!(rot.x, Angle::ZERO);
    }
}
