use super::{Rect, Vec2};

/// 2D affine transform in row-vector form:
///
/// ```text
/// x' = a·x + c·y + e
/// y' = b·x + d·y + f
/// ```
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AffineTransform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl AffineTransform {
    pub const IDENTITY: AffineTransform =
        AffineTransform { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 };

    #[inline]
    pub const fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    #[inline]
    pub const fn translation(tx: f32, ty: f32) -> Self {
        Self { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: tx, f: ty }
    }

    #[inline]
    pub const fn scaling(sx: f32, sy: f32) -> Self {
        Self { a: sx, b: 0.0, c: 0.0, d: sy, e: 0.0, f: 0.0 }
    }

    /// Rotation by `radians`, clockwise on screen (+Y down).
    #[inline]
    pub fn rotation(radians: f32) -> Self {
        let (s, c) = radians.sin_cos();
        Self { a: c, b: s, c: -s, d: c, e: 0.0, f: 0.0 }
    }

    /// Applies `self` first, then `next`.
    pub fn then(self, next: AffineTransform) -> AffineTransform {
        AffineTransform {
            a: self.a * next.a + self.b * next.c,
            b: self.a * next.b + self.b * next.d,
            c: self.c * next.a + self.d * next.c,
            d: self.c * next.b + self.d * next.d,
            e: self.e * next.a + self.f * next.c + next.e,
            f: self.e * next.b + self.f * next.d + next.f,
        }
    }

    #[inline]
    pub fn determinant(self) -> f32 {
        self.a * self.d - self.b * self.c
    }

    /// Inverse transform, or `None` when the matrix is singular.
    pub fn inverse(self) -> Option<AffineTransform> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let inv = 1.0 / det;
        Some(AffineTransform {
            a: self.d * inv,
            b: -self.b * inv,
            c: -self.c * inv,
            d: self.a * inv,
            e: (self.c * self.f - self.d * self.e) * inv,
            f: (self.b * self.e - self.a * self.f) * inv,
        })
    }

    #[inline]
    pub fn map(self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    /// The four corners of `r` mapped through the transform, clockwise from
    /// the top-left.
    pub fn map_quad(self, r: Rect) -> [Vec2; 4] {
        let min = r.top_left();
        let max = r.bottom_right();
        [
            self.map(min),
            self.map(Vec2::new(max.x, min.y)),
            self.map(max),
            self.map(Vec2::new(min.x, max.y)),
        ]
    }

    /// Axis-aligned bounding box of the mapped rectangle.
    pub fn map_rect(self, r: Rect) -> Rect {
        let q = self.map_quad(r);
        let (mut x0, mut y0) = (q[0].x, q[0].y);
        let (mut x1, mut y1) = (q[0].x, q[0].y);
        for p in &q[1..] {
            x0 = x0.min(p.x);
            y0 = y0.min(p.y);
            x1 = x1.max(p.x);
            y1 = y1.max(p.y);
        }
        Rect::new(x0, y0, x1 - x0, y1 - y0)
    }

    /// True when the transform is only a translation and/or positive scale,
    /// so mapped rectangles stay axis-aligned and unflipped.
    #[inline]
    pub fn is_axis_aligned_scale_translate(self) -> bool {
        self.b == 0.0 && self.c == 0.0 && self.a > 0.0 && self.d > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4
    }

    #[test]
    fn then_applies_left_first() {
        let t = AffineTransform::scaling(2.0, 2.0).then(AffineTransform::translation(10.0, 0.0));
        assert!(approx(t.map(Vec2::new(1.0, 1.0)), Vec2::new(12.0, 2.0)));
    }

    #[test]
    fn inverse_round_trips_points() {
        let t = AffineTransform::rotation(0.7)
            .then(AffineTransform::scaling(3.0, 0.5))
            .then(AffineTransform::translation(-4.0, 9.0));
        let inv = t.inverse().unwrap();
        let p = Vec2::new(5.5, -2.25);
        assert!(approx(inv.map(t.map(p)), p));
    }

    #[test]
    fn singular_has_no_inverse() {
        assert!(AffineTransform::scaling(0.0, 1.0).inverse().is_none());
    }

    #[test]
    fn quarter_turn_bounds() {
        let t = AffineTransform::rotation(core::f32::consts::FRAC_PI_2);
        let b = t.map_rect(Rect::new(0.0, 0.0, 4.0, 2.0));
        assert!((b.width - 2.0).abs() < 1e-4);
        assert!((b.height - 4.0).abs() < 1e-4);
        assert!(!t.is_axis_aligned_scale_translate());
    }
}
