//! Fixed-point math for FPU-less targets
//!
//! Everything on the per-frame hot path runs in signed 16.16 fixed point:
//! - 16 integer bits (range -32768 to +32767.99998)
//! - 16 fractional bits (precision: 1/65536 ≈ 0.0000153)
//! - Products go through a 64-bit intermediate so they never overflow mid-way
//!
//! Angles use an 8-bit "turns" unit (256 steps per full rotation) so that
//! rotation accumulators wrap for free and sin/cos are a single table lookup.

use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

// =============================================================================
// 16.16 Fixed-Point
// =============================================================================

/// Number of fractional bits
pub const FRAC_BITS: u32 = 16;

/// Raw value of 1.0
const ONE_RAW: i32 = 1 << FRAC_BITS; // 65536

/// Signed 16.16 fixed-point number
///
/// `add`/`sub` wrap like native integers. `mul` and `div` widen to i64.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fix16(pub i32);

impl Fix16 {
    pub const ZERO: Fix16 = Fix16(0);
    pub const ONE: Fix16 = Fix16(ONE_RAW);
    pub const HALF: Fix16 = Fix16(ONE_RAW >> 1);
    pub const QUARTER: Fix16 = Fix16(ONE_RAW >> 2);
    pub const MAX: Fix16 = Fix16(i32::MAX);
    pub const MIN: Fix16 = Fix16(i32::MIN);

    /// Create from integer. Only exact for |n| <= 32767.
    #[inline]
    pub const fn from_int(n: i32) -> Self {
        Fix16(n << FRAC_BITS)
    }

    /// Create from f32 (truncates toward zero, saturates at the i32 range)
    #[inline]
    pub fn from_f32(f: f32) -> Self {
        Fix16((f * ONE_RAW as f32) as i32)
    }

    /// Convert to f32
    #[inline]
    pub fn to_f32(self) -> f32 {
        self.0 as f32 / ONE_RAW as f32
    }

    /// Floor to integer (arithmetic shift, rounds toward negative infinity)
    #[inline]
    pub const fn to_int(self) -> i32 {
        self.0 >> FRAC_BITS
    }

    /// Round to nearest integer, halves away from negative infinity
    #[inline]
    pub const fn round_to_int(self) -> i32 {
        ((self.0 as i64 + (ONE_RAW as i64 >> 1)) >> FRAC_BITS) as i32
    }

    /// Fractional part (always non-negative)
    #[inline]
    pub const fn frac(self) -> Fix16 {
        Fix16(self.0 & (ONE_RAW - 1))
    }

    #[inline]
    pub const fn abs(self) -> Fix16 {
        Fix16(self.0.wrapping_abs())
    }

    #[inline]
    pub fn min(self, other: Self) -> Self {
        Fix16(self.0.min(other.0))
    }

    #[inline]
    pub fn max(self, other: Self) -> Self {
        Fix16(self.0.max(other.0))
    }

    #[inline]
    pub fn clamp(self, lo: Self, hi: Self) -> Self {
        Fix16(self.0.clamp(lo.0, hi.0))
    }

    #[inline]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Fixed-point multiplication: `(a * b) >> 16` through an i64.
    /// The shift is arithmetic, so negative products truncate toward -inf.
    #[inline]
    pub const fn mul_fixed(self, other: Self) -> Self {
        Fix16(((self.0 as i64 * other.0 as i64) >> FRAC_BITS) as i32)
    }

    /// Fixed-point division: `(a << 16) / b` through an i64.
    ///
    /// A zero divisor returns `self` unchanged. Quotients outside the i32
    /// range saturate instead of wrapping.
    #[inline]
    pub fn div_fixed(self, divisor: Self) -> Self {
        self.checked_div(divisor).unwrap_or(self)
    }

    /// Division that reports a zero divisor as `None`
    #[inline]
    pub fn checked_div(self, divisor: Self) -> Option<Self> {
        if divisor.0 == 0 {
            return None;
        }
        let quotient = ((self.0 as i64) << FRAC_BITS) / divisor.0 as i64;
        Some(Fix16(quotient.clamp(i32::MIN as i64, i32::MAX as i64) as i32))
    }
}

impl From<i32> for Fix16 {
    fn from(n: i32) -> Self {
        Fix16::from_int(n)
    }
}

impl Add for Fix16 {
    type Output = Self;
    #[inline]
    fn add(self, other: Self) -> Self {
        Fix16(self.0.wrapping_add(other.0))
    }
}

impl AddAssign for Fix16 {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Fix16 {
    type Output = Self;
    #[inline]
    fn sub(self, other: Self) -> Self {
        Fix16(self.0.wrapping_sub(other.0))
    }
}

impl SubAssign for Fix16 {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Mul for Fix16 {
    type Output = Self;
    #[inline]
    fn mul(self, other: Self) -> Self {
        self.mul_fixed(other)
    }
}

impl Div for Fix16 {
    type Output = Self;
    #[inline]
    fn div(self, other: Self) -> Self {
        self.div_fixed(other)
    }
}

impl Neg for Fix16 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Fix16(self.0.wrapping_neg())
    }
}

// =============================================================================
// Angles in 8-bit turns
// =============================================================================

/// Angle where 256 steps make a full turn (64 = 90°, 128 = 180°)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Angle(pub u8);

impl Angle {
    pub const ZERO: Angle = Angle(0);
    pub const QUARTER_TURN: Angle = Angle(64);
    pub const HALF_TURN: Angle = Angle(128);

    /// Convert degrees to the nearest step (wraps outside 0..360)
    pub fn from_degrees(degrees: f32) -> Self {
        let normalized = degrees.rem_euclid(360.0);
        Angle(((normalized / 360.0) * TRIG_TABLE_SIZE as f32).round() as u32 as u8)
    }

    pub fn to_degrees(self) -> f32 {
        self.0 as f32 * 360.0 / TRIG_TABLE_SIZE as f32
    }

    /// Half of this angle (rounded down), used for half-FOV terms
    #[inline]
    pub const fn half(self) -> Self {
        Angle(self.0 >> 1)
    }

    #[inline]
    pub fn sin(self) -> Fix16 {
        fixed_sin(self)
    }

    #[inline]
    pub fn cos(self) -> Fix16 {
        fixed_cos(self)
    }
}

impl Add for Angle {
    type Output = Self;
    #[inline]
    fn add(self, other: Self) -> Self {
        Angle(self.0.wrapping_add(other.0))
    }
}

impl AddAssign for Angle {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Angle {
    type Output = Self;
    #[inline]
    fn sub(self, other: Self) -> Self {
        Angle(self.0.wrapping_sub(other.0))
    }
}

impl SubAssign for Angle {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Neg for Angle {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Angle(self.0.wrapping_neg())
    }
}

// =============================================================================
// Sin/Cos Lookup Table
// =============================================================================

/// Number of entries in the sin table (one per angle step)
pub const TRIG_TABLE_SIZE: usize = 256;

/// Steps per quarter turn
const QUARTER: usize = TRIG_TABLE_SIZE / 4;

/// Accepted error of the table against true sine (1 part in 1000).
/// Entries are rounded to nearest, so the measured error is within 2 raw units.
pub const TRIG_MAX_ERROR: Fix16 = Fix16(66);

/// Pre-computed sin table in 16.16 (index 64 = 90° = 1.0)
pub static SIN_TABLE: [i32; TRIG_TABLE_SIZE] = generate_sin_table();

/// Build the table at compile time.
/// Each quadrant is evaluated as sin or cos of an angle in [0, π/2), where the
/// Taylor series below is accurate to well under one 16.16 unit.
const fn generate_sin_table() -> [i32; TRIG_TABLE_SIZE] {
    const PI: f64 = 3.14159265358979323846;
    let mut table = [0i32; TRIG_TABLE_SIZE];
    let mut i = 0;
    while i < TRIG_TABLE_SIZE {
        let quadrant = i / QUARTER;
        let x = (i % QUARTER) as f64 * 2.0 * PI / TRIG_TABLE_SIZE as f64;
        let value = match quadrant {
            0 => taylor_sin(x),
            1 => taylor_cos(x),
            2 => -taylor_sin(x),
            _ => -taylor_cos(x),
        };
        table[i] = round_to_raw(value);
        i += 1;
    }
    table
}

const fn round_to_raw(v: f64) -> i32 {
    let scaled = v * ONE_RAW as f64;
    if scaled >= 0.0 {
        (scaled + 0.5) as i32
    } else {
        (scaled - 0.5) as i32
    }
}

const fn taylor_sin(x: f64) -> f64 {
    let x2 = x * x;
    let x3 = x2 * x;
    let x5 = x3 * x2;
    let x7 = x5 * x2;
    let x9 = x7 * x2;
    let x11 = x9 * x2;
    x - x3 / 6.0 + x5 / 120.0 - x7 / 5040.0 + x9 / 362880.0 - x11 / 39916800.0
}

const fn taylor_cos(x: f64) -> f64 {
    let x2 = x * x;
    let x4 = x2 * x2;
    let x6 = x4 * x2;
    let x8 = x6 * x2;
    let x10 = x8 * x2;
    1.0 - x2 / 2.0 + x4 / 24.0 - x6 / 720.0 + x8 / 40320.0 - x10 / 3628800.0
}

/// Fixed-point sine of an angle in turns
#[inline]
pub fn fixed_sin(angle: Angle) -> Fix16 {
    Fix16(SIN_TABLE[angle.0 as usize])
}

/// Fixed-point cosine (sine shifted by a quarter turn)
#[inline]
pub fn fixed_cos(angle: Angle) -> Fix16 {
    fixed_sin(angle + Angle::QUARTER_TURN)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_round_trip() {
        for n in -32768..=32767 {
            assert_eq!(Fix16::from_int(n).to_int(), n);
        }
    }

    #[test]
    fn test_to_int_floors_negative_values() {
        assert_eq!(Fix16::from_f32(-0.5).to_int(), -1);
        assert_eq!(Fix16::from_f32(2.75).to_int(), 2);
        assert_eq!(Fix16::from_f32(2.5).round_to_int(), 3);
        assert_eq!(Fix16::from_f32(-2.25).round_to_int(), -2);
    }

    #[test]
    fn test_mul_identity() {
        let samples = [0, 1, -1, 12345, -98765, ONE_RAW, i32::MAX, i32::MIN + 1, 0x7FFF_0000];
        for raw in samples {
            let x = Fix16(raw);
            assert_eq!(Fix16::ONE * x, x);
            assert_eq!(x * Fix16::ONE, x);
        }
    }

    #[test]
    fn test_mul_uses_wide_intermediate() {
        // 200 * 300 = 60000 overflows i32 as raw product but not as a result
        let a = Fix16::from_int(200);
        let b = Fix16::from_int(300);
        assert_eq!((a * Fix16::from_f32(0.5)).to_int(), 100);
        let c = Fix16::from_int(100) * Fix16::from_int(300);
        assert_eq!(c.to_int(), 30000);
        assert_eq!((a * b.min(Fix16::from_int(100))).to_int(), 20000);
    }

    #[test]
    fn test_mul_truncates_toward_negative_infinity() {
        // -1/65536 * 0.5 = -0.5 raw units -> floors to -1
        let tiny = Fix16(-1);
        assert_eq!(tiny * Fix16::HALF, Fix16(-1));
        assert_eq!(Fix16(1) * Fix16::HALF, Fix16(0));
    }

    #[test]
    fn test_frac_and_sign() {
        assert_eq!(Fix16::from_f32(2.75).frac(), Fix16::from_f32(0.75));
        // -0.25 sits 0.75 above -1
        assert_eq!(Fix16::from_f32(-0.25).frac(), Fix16::from_f32(0.75));
        assert_eq!(Fix16::from_int(-3).frac(), Fix16::ZERO);
        assert!(Fix16::from_f32(-0.25).is_negative());
        assert!(!Fix16::ZERO.is_negative());
        assert!(!Fix16::HALF.is_negative());
    }

    #[test]
    fn test_div_basic() {
        let a = Fix16::from_int(10);
        let b = Fix16::from_int(4);
        assert_eq!(a / b, Fix16::from_f32(2.5));
        assert_eq!(Fix16::from_int(-9) / Fix16::from_int(3), Fix16::from_int(-3));
    }

    #[test]
    fn test_div_by_zero_returns_dividend() {
        let a = Fix16::from_int(7);
        assert_eq!(a / Fix16::ZERO, a);
        assert_eq!(a.checked_div(Fix16::ZERO), None);
    }

    #[test]
    fn test_div_near_max_does_not_wrap() {
        // Quotient of 32767 / (1/65536) is far outside i32: must saturate, not wrap
        let big = Fix16::from_int(32767);
        let tiny = Fix16(1);
        assert_eq!(big / tiny, Fix16::MAX);
        assert_eq!(-big / tiny, Fix16::MIN);

        // Within the documented domain (|a| <= 32767, |b| >= 1.0) the result is exact-ish
        for a in [-32767, -1000, 1, 500, 32767] {
            for b in [-300, -1, 1, 7, 32767] {
                let q = Fix16::from_int(a) / Fix16::from_int(b);
                let expected = a as f64 / b as f64;
                let got = q.0 as f64 / ONE_RAW as f64;
                assert!((got - expected).abs() < 0.001, "{} / {}", a, b);
            }
        }
    }

    #[test]
    fn test_fixed_sin_cos_key_angles() {
        assert_eq!(fixed_sin(Angle(0)), Fix16::ZERO);
        assert_eq!(fixed_sin(Angle(64)), Fix16::ONE);
        assert_eq!(fixed_sin(Angle(128)), Fix16::ZERO);
        assert_eq!(fixed_sin(Angle(192)), -Fix16::ONE);

        assert_eq!(fixed_cos(Angle(0)), Fix16::ONE);
        assert_eq!(fixed_cos(Angle(64)), Fix16::ZERO);
        assert_eq!(fixed_cos(Angle(128)), -Fix16::ONE);
        assert_eq!(fixed_cos(Angle(192)), Fix16::ZERO);
    }

    #[test]
    fn test_sin_table_error_bound() {
        for i in 0..TRIG_TABLE_SIZE {
            let radians = i as f64 * std::f64::consts::TAU / TRIG_TABLE_SIZE as f64;
            let expected = (radians.sin() * ONE_RAW as f64).round() as i32;
            let got = fixed_sin(Angle(i as u8)).0;
            assert!((got - expected).abs() <= 2, "index {}: {} vs {}", i, got, expected);
            assert!((got - expected).abs() <= TRIG_MAX_ERROR.0);
        }
    }

    #[test]
    fn test_angle_wraps() {
        let mut a = Angle(250);
        a += Angle(10);
        assert_eq!(a, Angle(4));
        a -= Angle(8);
        assert_eq!(a, Angle(252));
        assert_eq!(-Angle(1), Angle(255));
    }

    #[test]
    fn test_angle_from_degrees() {
        assert_eq!(Angle::from_degrees(0.0), Angle(0));
        assert_eq!(Angle::from_degrees(90.0), Angle(64));
        assert_eq!(Angle::from_degrees(180.0), Angle(128));
        assert_eq!(Angle::from_degrees(360.0), Angle(0));
        assert_eq!(Angle::from_degrees(450.0), Angle(64));
        assert_eq!(Angle::from_degrees(-90.0), Angle(192));
    }
}
