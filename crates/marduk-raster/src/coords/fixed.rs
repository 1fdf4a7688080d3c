use core::ops::{Add, AddAssign, Sub};

/// Signed 32.32 fixed-point number backed by an `i64`.
///
/// Resampling steps through source space in this type so that ratios between
/// very large and very small rectangles stay exact; `f32` loses the low bits
/// long before the extreme cases are reached.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fixed(pub i64);

impl Fixed {
    pub const FRACTION_BITS: u32 = 32;
    pub const ONE: Fixed = Fixed(1 << Self::FRACTION_BITS);
    const FRACTION_MASK: i64 = (1 << Self::FRACTION_BITS) - 1;

    #[inline]
    pub const fn from_int(v: i32) -> Self {
        Fixed((v as i64) << Self::FRACTION_BITS)
    }

    #[inline]
    pub fn from_f64(v: f64) -> Self {
        Fixed((v * Self::ONE.0 as f64) as i64)
    }

    /// Integer part, rounded toward negative infinity.
    #[inline]
    pub const fn floor(self) -> i64 {
        self.0 >> Self::FRACTION_BITS
    }

    /// Fractional part as a float in `[0, 1)`.
    #[inline]
    pub fn fract(self) -> f32 {
        (self.0 & Self::FRACTION_MASK) as f32 / Self::ONE.0 as f32
    }

    #[inline]
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / Self::ONE.0 as f64
    }

    #[inline]
    pub const fn mul_int(self, v: i64) -> Self {
        Fixed(self.0 * v)
    }

    /// Truncating division by an integer, so that `d` steps never overshoot
    /// `self`. Returns zero for a zero divisor.
    #[inline]
    pub const fn div_int(self, d: i64) -> Self {
        if d == 0 {
            return Fixed(0);
        }
        Fixed(self.0 / d)
    }
}

impl Add for Fixed {
    type Output = Fixed;
    #[inline]
    fn add(self, rhs: Fixed) -> Fixed {
        Fixed(self.0 + rhs.0)
    }
}

impl AddAssign for Fixed {
    #[inline]
    fn add_assign(&mut self, rhs: Fixed) {
        self.0 += rhs.0;
    }
}

impl Sub for Fixed {
    type Output = Fixed;
    #[inline]
    fn sub(self, rhs: Fixed) -> Fixed {
        Fixed(self.0 - rhs.0)
    }
}
