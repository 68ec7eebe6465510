//! Vector and matrix math in 16.16 fixed point
//!
//! All products go through `Fix16::mul_fixed`. The only float crossing is the
//! square root inside `Vec3::length` / `Vec3::normalize`.

use std::ops::{Add, Mul, Neg, Sub};
use super::fixed::{Angle, Fix16};

/// 3D vector (point or direction, caller tracks the space)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Vec3 {
    pub x: Fix16,
    pub y: Fix16,
    pub z: Fix16,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: Fix16::ZERO, y: Fix16::ZERO, z: Fix16::ZERO };

    #[inline]
    pub const fn new(x: Fix16, y: Fix16, z: Fix16) -> Self {
        Self { x, y, z }
    }

    /// Build from whole numbers (used by the static mesh tables)
    #[inline]
    pub const fn from_ints(x: i32, y: i32, z: i32) -> Self {
        Self {
            x: Fix16::from_int(x),
            y: Fix16::from_int(y),
            z: Fix16::from_int(z),
        }
    }

    pub fn from_f32(x: f32, y: f32, z: f32) -> Self {
        Self {
            x: Fix16::from_f32(x),
            y: Fix16::from_f32(y),
            z: Fix16::from_f32(z),
        }
    }

    pub fn to_f32(self) -> [f32; 3] {
        [self.x.to_f32(), self.y.to_f32(), self.z.to_f32()]
    }

    pub fn dot(self, other: Vec3) -> Fix16 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn scale(self, s: Fix16) -> Vec3 {
        Vec3 {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }

    /// Divide every component by `s`. A zero scalar leaves the vector unchanged.
    pub fn div_scalar(self, s: Fix16) -> Vec3 {
        if s == Fix16::ZERO {
            return self;
        }
        Vec3 {
            x: self.x / s,
            y: self.y / s,
            z: self.z / s,
        }
    }

    /// Euclidean length. The square root runs in f32.
    pub fn len(self) -> Fix16 {
        let [x, y, z] = self.to_f32();
        Fix16::from_f32((x * x + y * y + z * z).sqrt())
    }

    /// Unit vector in the same direction; zero-length vectors pass through
    pub fn normalize(self) -> Vec3 {
        let l = self.len();
        if l == Fix16::ZERO {
            return self;
        }
        self.div_scalar(l)
    }

    /// Outward unit normal of triangle (a, b, c) for counter-clockwise winding
    pub fn face_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
        (b - a).cross(c - a).normalize()
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    fn neg(self) -> Vec3 {
        Vec3 { x: -self.x, y: -self.y, z: -self.z }
    }
}

impl Mul<Fix16> for Vec3 {
    type Output = Vec3;
    fn mul(self, s: Fix16) -> Vec3 {
        self.scale(s)
    }
}

/// 2D screen-space point, still in fixed point
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Vec2 {
    pub x: Fix16,
    pub y: Fix16,
}

impl Vec2 {
    pub const fn new(x: Fix16, y: Fix16) -> Self {
        Self { x, y }
    }

    /// Truncate to integer pixel coordinates (floor)
    #[inline]
    pub fn to_pixel(self) -> (i32, i32) {
        (self.x.to_int(), self.y.to_int())
    }
}

// =============================================================================
// 4x4 Matrix operations (for transforms)
// =============================================================================

/// Row-major 4x4 homogeneous transform: `p' = M * [x, y, z, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mat4 {
    pub m: [[Fix16; 4]; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Mat4::IDENTITY
    }
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        m: [
            [Fix16::ONE, Fix16::ZERO, Fix16::ZERO, Fix16::ZERO],
            [Fix16::ZERO, Fix16::ONE, Fix16::ZERO, Fix16::ZERO],
            [Fix16::ZERO, Fix16::ZERO, Fix16::ONE, Fix16::ZERO],
            [Fix16::ZERO, Fix16::ZERO, Fix16::ZERO, Fix16::ONE],
        ],
    };

    pub const fn identity() -> Mat4 {
        Mat4::IDENTITY
    }

    pub fn translation(tx: Fix16, ty: Fix16, tz: Fix16) -> Mat4 {
        let mut r = Mat4::IDENTITY;
        r.m[0][3] = tx;
        r.m[1][3] = ty;
        r.m[2][3] = tz;
        r
    }

    pub fn rotation_x(angle: Angle) -> Mat4 {
        let (s, c) = (angle.sin(), angle.cos());
        let mut r = Mat4::IDENTITY;
        r.m[1][1] = c;
        r.m[1][2] = -s;
        r.m[2][1] = s;
        r.m[2][2] = c;
        r
    }

    pub fn rotation_y(angle: Angle) -> Mat4 {
        let (s, c) = (angle.sin(), angle.cos());
        let mut r = Mat4::IDENTITY;
        r.m[0][0] = c;
        r.m[0][2] = s;
        r.m[2][0] = -s;
        r.m[2][2] = c;
        r
    }

    pub fn rotation_z(angle: Angle) -> Mat4 {
        let (s, c) = (angle.sin(), angle.cos());
        let mut r = Mat4::IDENTITY;
        r.m[0][0] = c;
        r.m[0][1] = -s;
        r.m[1][0] = s;
        r.m[1][1] = c;
        r
    }

    /// Perspective projection with focal scale `1 / sin(fov / 2)`.
    ///
    /// This approximates `1 / tan(fov / 2)` and is `1 / cos(fov / 2)` times
    /// larger than it (about 3.5% at 30°, 15% at 60°). Use
    /// [`Mat4::perspective_exact`] when the true cotangent is wanted.
    pub fn perspective(fov: Angle, aspect: Fix16, near: Fix16, far: Fix16) -> Mat4 {
        let focal = Fix16::ONE / fov.half().sin();
        Self::perspective_with_focal(focal, aspect, near, far)
    }

    /// Perspective projection with focal scale `cos(fov / 2) / sin(fov / 2)`
    pub fn perspective_exact(fov: Angle, aspect: Fix16, near: Fix16, far: Fix16) -> Mat4 {
        let half = fov.half();
        let focal = half.cos() / half.sin();
        Self::perspective_with_focal(focal, aspect, near, far)
    }

    fn perspective_with_focal(focal: Fix16, aspect: Fix16, near: Fix16, far: Fix16) -> Mat4 {
        let depth_range = far - near;
        let mut r = Mat4 { m: [[Fix16::ZERO; 4]; 4] };
        r.m[0][0] = focal / aspect;
        r.m[1][1] = focal;
        r.m[2][2] = far / depth_range;
        r.m[2][3] = (-far * near) / depth_range;
        r.m[3][2] = Fix16::ONE;
        r
    }

    /// Row-by-column product `self * other`
    pub fn mul_mat(&self, other: &Mat4) -> Mat4 {
        let mut result = Mat4 { m: [[Fix16::ZERO; 4]; 4] };
        for i in 0..4 {
            for j in 0..4 {
                for k in 0..4 {
                    result.m[i][j] += self.m[i][k] * other.m[k][j];
                }
            }
        }
        result
    }

    /// Transform a point, then divide by w.
    ///
    /// The divide runs whenever w != 0. For w == 1 it is skipped because the
    /// 16.16 quotient `(x << 16) / 65536` is exactly `x`. A w of 0 leaves the
    /// point undivided.
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let row = |r: usize| {
            self.m[r][0] * p.x + self.m[r][1] * p.y + self.m[r][2] * p.z + self.m[r][3]
        };
        let out = Vec3::new(row(0), row(1), row(2));
        let w = row(3);
        if w == Fix16::ZERO || w == Fix16::ONE {
            return out;
        }
        Vec3::new(out.x / w, out.y / w, out.z / w)
    }

    /// Transform a direction (ignores translation, no divide)
    pub fn transform_direction(&self, d: Vec3) -> Vec3 {
        let row = |r: usize| self.m[r][0] * d.x + self.m[r][1] * d.y + self.m[r][2] * d.z;
        Vec3::new(row(0), row(1), row(2))
    }
}

impl Mul for Mat4 {
    type Output = Mat4;
    fn mul(self, other: Mat4) -> Mat4 {
        self.mul_mat(&other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f(v: f32) -> Fix16 {
        Fix16::from_f32(v)
    }

    fn assert_close(a: Vec3, b: Vec3, tolerance: f32) {
        let (a, b) = (a.to_f32(), b.to_f32());
        for i in 0..3 {
            assert!((a[i] - b[i]).abs() <= tolerance, "{:?} vs {:?}", a, b);
        }
    }

    #[test]
    fn test_vec3_dot() {
        let a = Vec3::from_ints(1, 2, 3);
        let b = Vec3::from_ints(4, 5, 6);
        assert_eq!(a.dot(b), Fix16::from_int(32));
    }

    #[test]
    fn test_vec3_cross() {
        let c = Vec3::from_ints(1, 0, 0).cross(Vec3::from_ints(0, 1, 0));
        assert_eq!(c, Vec3::from_ints(0, 0, 1));
    }

    #[test]
    fn test_normalize() {
        let n = Vec3::from_ints(3, 0, 4).normalize();
        assert_close(n, Vec3::from_f32(0.6, 0.0, 0.8), 0.0001);
        assert_eq!(Vec3::from_ints(0, 0, 2).len(), Fix16::from_int(2));
    }

    #[test]
    fn test_normalize_zero_is_passthrough() {
        assert_eq!(Vec3::ZERO.normalize(), Vec3::ZERO);
        let v = Vec3::from_ints(1, 2, 3);
        assert_eq!(v.div_scalar(Fix16::ZERO), v);
    }

    #[test]
    fn test_face_normal_ccw() {
        let n = Vec3::face_normal(
            Vec3::from_ints(0, 0, 0),
            Vec3::from_ints(1, 0, 0),
            Vec3::from_ints(0, 1, 0),
        );
        assert_eq!(n, Vec3::from_ints(0, 0, 1));
        // Colinear points degrade to the zero vector instead of faulting
        let d = Vec3::face_normal(
            Vec3::from_ints(0, 0, 0),
            Vec3::from_ints(1, 1, 1),
            Vec3::from_ints(2, 2, 2),
        );
        assert_eq!(d, Vec3::ZERO);
    }

    #[test]
    fn test_translation() {
        let t = Mat4::translation(f(1.0), f(2.0), f(3.0));
        let p = t.transform_point(Vec3::from_ints(1, 1, 1));
        assert_eq!(p, Vec3::from_ints(2, 3, 4));
    }

    #[test]
    fn test_rotation_quarter_turns() {
        let x = Vec3::from_ints(1, 0, 0);
        let y = Vec3::from_ints(0, 1, 0);
        assert_eq!(Mat4::rotation_z(Angle(64)).transform_point(x), y);
        assert_eq!(Mat4::rotation_x(Angle(64)).transform_point(y), Vec3::from_ints(0, 0, 1));
        assert_eq!(Mat4::rotation_y(Angle(64)).transform_point(Vec3::from_ints(0, 0, 1)), x);
    }

    #[test]
    fn test_rotation_round_trip() {
        let v = Vec3::from_f32(1.25, -0.5, 2.0);
        for step in [1u8, 13, 45, 100, 200] {
            let a = Angle(step);
            for (fwd, back) in [
                (Mat4::rotation_x(a), Mat4::rotation_x(-a)),
                (Mat4::rotation_y(a), Mat4::rotation_y(-a)),
                (Mat4::rotation_z(a), Mat4::rotation_z(-a)),
            ] {
                let there = fwd.transform_point(v);
                let back_again = back.transform_point(there);
                assert_close(back_again, v, 0.001);
            }
        }
    }

    #[test]
    fn test_mat4_mul_identity() {
        let r = Mat4::rotation_x(Angle(20)) * Mat4::rotation_y(Angle(77));
        assert_eq!(r * Mat4::IDENTITY, r);
        assert_eq!(Mat4::IDENTITY * r, r);
    }

    #[test]
    fn test_mat4_mul_composes_in_order() {
        // (T * R) * p == T * (R * p)
        let t = Mat4::translation(f(5.0), Fix16::ZERO, Fix16::ZERO);
        let r = Mat4::rotation_z(Angle(64));
        let p = Vec3::from_ints(1, 0, 0);
        assert_eq!((t * r).transform_point(p), t.transform_point(r.transform_point(p)));
        assert_eq!((t * r).transform_point(p), Vec3::from_ints(5, 1, 0));
    }

    #[test]
    fn test_perspective_divides_by_w() {
        let proj = Mat4::perspective(Angle(64), Fix16::ONE, f(1.0), f(10.0));
        // w = z, so x/z shrinks with distance
        let near = proj.transform_point(Vec3::from_ints(1, 0, 2));
        let far = proj.transform_point(Vec3::from_ints(1, 0, 4));
        assert!(near.x > far.x);
        assert!(far.x > Fix16::ZERO);
    }

    #[test]
    fn test_w_of_one_matches_explicit_divide() {
        // A matrix producing w == 1 gives the same result as dividing by 1
        let mut m = Mat4::IDENTITY;
        m.m[0][0] = f(3.0);
        let v = Vec3::from_f32(0.3, -1.7, 2.2);
        let out = m.transform_point(v);
        assert_eq!(out.x / Fix16::ONE, out.x);
        assert_eq!(out.x, v.x * f(3.0));
    }

    #[test]
    fn test_w_of_zero_is_not_divided() {
        let proj = Mat4::perspective(Angle(64), Fix16::ONE, f(1.0), f(10.0));
        // z == 0 makes w == 0: point comes back undivided instead of faulting
        let out = proj.transform_point(Vec3::from_ints(2, 0, 0));
        assert_eq!(out.x, proj.m[0][0] * Fix16::from_int(2));
    }

    #[test]
    fn test_transform_direction_ignores_translation() {
        let d = Vec3::from_f32(0.5, -1.0, 2.0);
        let moved = Mat4::translation(f(5.0), f(-3.0), f(7.0));
        assert_eq!(moved.transform_direction(d), d);
        assert_ne!(moved.transform_point(d), d);

        let spin = Mat4::rotation_y(Angle(32));
        let spin_then_move = Mat4::translation(f(5.0), f(-3.0), f(7.0)) * spin;
        assert_eq!(spin_then_move.transform_direction(d), spin.transform_direction(d));
        assert_eq!(spin.transform_direction(d), spin.transform_point(d));
    }

    #[test]
    fn test_perspective_focal_approximation_bound() {
        // 1/sin(h) = (1/tan(h)) / cos(h): the approximation overshoots by exactly 1/cos(h)
        for fov in [Angle(22), Angle(43), Angle(64)] {
            let approx = Mat4::perspective(fov, Fix16::ONE, f(1.0), f(10.0)).m[1][1].to_f32();
            let exact = Mat4::perspective_exact(fov, Fix16::ONE, f(1.0), f(10.0)).m[1][1].to_f32();
            let half_radians = fov.half().to_degrees().to_radians();
            assert!((approx * half_radians.cos() - exact).abs() < 0.01);
            assert!(approx >= exact);
        }
        // At 90° the overshoot is √2
        let approx = Mat4::perspective(Angle(64), Fix16::ONE, f(1.0), f(10.0)).m[1][1].to_f32();
        assert!((approx - std::f32::consts::SQRT_2).abs() < 0.001);
    }
}
