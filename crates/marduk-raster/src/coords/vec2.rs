use core::ops::{Add, Mul, Sub};

use super::IntPoint;

/// A logical-space point with fractional coordinates: pen positions,
/// curve control points, transformed pixel centers.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[inline]
    pub fn midpoint(self, other: Vec2) -> Vec2 {
        (self + other) * 0.5
    }

    /// Nearest pixel; halves round away from zero.
    #[inline]
    pub fn round_to_int(self) -> IntPoint {
        IntPoint::new(self.x.round() as i32, self.y.round() as i32)
    }
}

impl From<IntPoint> for Vec2 {
    #[inline]
    fn from(p: IntPoint) -> Self {
        Vec2::new(p.x as f32, p.y as f32)
    }
}

macro_rules! componentwise {
    ($Trait:ident, $method:ident, $op:tt) => {
        impl $Trait for Vec2 {
            type Output = Vec2;
            #[inline]
            fn $method(self, rhs: Vec2) -> Vec2 {
                Vec2::new(self.x $op rhs.x, self.y $op rhs.y)
            }
        }
    };
}

componentwise!(Add, add, +);
componentwise!(Sub, sub, -);

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, k: f32) -> Vec2 {
        Vec2::new(self.x * k, self.y * k)
    }
}
