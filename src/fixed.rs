//! Q16.16 fixed-point arithmetic
//!
//! An alternative numeric strategy for inner loops on targets without a
//! fast FPU. Arithmetic wraps on overflow; division by zero yields zero.

use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

const FRAC_BITS: u32 = 16;
const ONE_RAW: i32 = 1 << FRAC_BITS;

/// Signed Q16.16 number
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fixed(i32);

impl Fixed {
    pub const ZERO: Fixed = Fixed(0);
    pub const ONE: Fixed = Fixed(ONE_RAW);
    pub const HALF: Fixed = Fixed(ONE_RAW / 2);

    #[inline]
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    #[inline]
    pub const fn from_int(v: i32) -> Self {
        Self(v.wrapping_shl(FRAC_BITS))
    }

    /// Integer part, rounded toward negative infinity
    #[inline]
    pub const fn to_int(self) -> i32 {
        self.0 >> FRAC_BITS
    }

    #[inline]
    pub fn from_f32(v: f32) -> Self {
        Self((v * ONE_RAW as f32) as i32)
    }

    #[inline]
    pub fn to_f32(self) -> f32 {
        self.0 as f32 / ONE_RAW as f32
    }

    #[inline]
    pub fn abs(self) -> Self {
        Self(self.0.wrapping_abs())
    }

    /// Square root by Newton iteration; non-positive input gives zero
    pub fn sqrt(self) -> Self {
        if self.0 <= 0 {
            return Self::ZERO;
        }
        let mut x = Self((self.0 >> 1).max(1));
        for _ in 0..10 {
            let next = Self((x + self / x).0 >> 1);
            if (next.0 - x.0).abs() < 2 {
                return next;
            }
            x = next;
        }
        x
    }

    /// Sine of an angle in radians
    #[inline]
    pub fn sin(self) -> Self {
        Self::from_f32(self.to_f32().sin())
    }

    /// Cosine of an angle in radians
    #[inline]
    pub fn cos(self) -> Self {
        Self::from_f32(self.to_f32().cos())
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_f32())
    }
}

impl From<i32> for Fixed {
    fn from(v: i32) -> Self {
        Self::from_int(v)
    }
}

impl Add for Fixed {
    type Output = Self;
    #[inline]
    fn add(self, o: Self) -> Self {
        Self(self.0.wrapping_add(o.0))
    }
}

impl AddAssign for Fixed {
    #[inline]
    fn add_assign(&mut self, o: Self) {
        *self = *self + o;
    }
}

impl Sub for Fixed {
    type Output = Self;
    #[inline]
    fn sub(self, o: Self) -> Self {
        Self(self.0.wrapping_sub(o.0))
    }
}

impl SubAssign for Fixed {
    #[inline]
    fn sub_assign(&mut self, o: Self) {
        *self = *self - o;
    }
}

impl Neg for Fixed {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self(self.0.wrapping_neg())
    }
}

impl Mul for Fixed {
    type Output = Self;
    #[inline]
    fn mul(self, o: Self) -> Self {
        Self(((self.0 as i64 * o.0 as i64) >> FRAC_BITS) as i32)
    }
}

impl Div for Fixed {
    type Output = Self;
    #[inline]
    fn div(self, o: Self) -> Self {
        if o.0 == 0 {
            return Self::ZERO;
        }
        Self((((self.0 as i64) << FRAC_BITS) / o.0 as i64) as i32)
    }
}

/// 2D vector of fixed-point components
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedVec2 {
    pub x: Fixed,
    pub y: Fixed,
}

impl FixedVec2 {
    #[inline]
    pub const fn new(x: Fixed, y: Fixed) -> Self {
        Self { x, y }
    }

    pub fn from_f32(x: f32, y: f32) -> Self {
        Self::new(Fixed::from_f32(x), Fixed::from_f32(y))
    }

    #[inline]
    pub fn dot(&self, o: &Self) -> Fixed {
        self.x * o.x + self.y * o.y
    }

    #[inline]
    pub fn length(&self) -> Fixed {
        self.dot(self).sqrt()
    }

    /// Unit vector; the zero vector stays zero
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len == Fixed::ZERO {
            return Self::default();
        }
        Self::new(self.x / len, self.y / len)
    }
}

impl Add for FixedVec2 {
    type Output = Self;
    #[inline]
    fn add(self, o: Self) -> Self {
        Self::new(self.x + o.x, self.y + o.y)
    }
}

impl Sub for FixedVec2 {
    type Output = Self;
    #[inline]
    fn sub(self, o: Self) -> Self {
        Self::new(self.x - o.x, self.y - o.y)
    }
}

impl Mul<Fixed> for FixedVec2 {
    type Output = Self;
    #[inline]
    fn mul(self, s: Fixed) -> Self {
        Self::new(self.x * s, self.y * s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Fixed, b: f32, eps: f32) -> bool {
        (a.to_f32() - b).abs() < eps
    }

    #[test]
    fn test_conversions() {
        assert_eq!(Fixed::from_int(3).raw(), 3 << 16);
        assert_eq!(Fixed::from_int(-2).to_int(), -2);
        assert_eq!(Fixed::from_f32(1.5).raw(), 0x18000);
        assert_eq!(Fixed::from_f32(-0.5).to_int(), -1);
        assert_eq!(Fixed::ONE.to_f32(), 1.0);
        assert_eq!(Fixed::from(7), Fixed::from_int(7));
    }

    #[test]
    fn test_arithmetic() {
        let a = Fixed::from_f32(2.5);
        let b = Fixed::from_f32(-1.25);
        assert_eq!((a + b).to_f32(), 1.25);
        assert_eq!((a - b).to_f32(), 3.75);
        assert_eq!((a * b).to_f32(), -3.125);
        assert_eq!((a / b).to_f32(), -2.0);
        assert_eq!(-a, Fixed::from_f32(-2.5));

        let mut acc = Fixed::ZERO;
        acc += Fixed::ONE;
        acc += Fixed::HALF;
        acc -= Fixed::ONE;
        assert_eq!(acc, Fixed::HALF);
    }

    #[test]
    fn test_div_by_zero_is_zero() {
        assert_eq!(Fixed::from_int(5) / Fixed::ZERO, Fixed::ZERO);
    }

    #[test]
    fn test_sqrt() {
        assert!(close(Fixed::from_int(4).sqrt(), 2.0, 1e-3));
        assert!(close(Fixed::from_int(2).sqrt(), std::f32::consts::SQRT_2, 1e-3));
        assert!(close(Fixed::from_f32(0.25).sqrt(), 0.5, 1e-3));
        assert_eq!(Fixed::ZERO.sqrt(), Fixed::ZERO);
        assert_eq!(Fixed::from_int(-4).sqrt(), Fixed::ZERO);
    }

    #[test]
    fn test_trig() {
        let half_pi = Fixed::from_f32(std::f32::consts::FRAC_PI_2);
        assert!(close(half_pi.sin(), 1.0, 1e-4));
        assert!(close(half_pi.cos(), 0.0, 1e-4));
        assert!(close(Fixed::ZERO.cos(), 1.0, 1e-4));
    }

    #[test]
    fn test_vec2() {
        let v = FixedVec2::from_f32(3.0, 4.0);
        assert!(close(v.length(), 5.0, 1e-3));
        let n = v.normalize();
        assert!(close(n.x, 0.6, 1e-3));
        assert!(close(n.y, 0.8, 1e-3));
        assert_eq!(FixedVec2::default().normalize(), FixedVec2::default());

        let w = FixedVec2::from_f32(1.0, -1.0);
        assert_eq!(v + w, FixedVec2::from_f32(4.0, 3.0));
        assert_eq!(v - w, FixedVec2::from_f32(2.0, 5.0));
        assert_eq!(v * Fixed::from_int(2), FixedVec2::from_f32(6.0, 8.0));
        assert_eq!(v.dot(&w), Fixed::from_int(-1));
    }
}
