use super::{IntRect, Vec2};

/// Rectangle with fractional edges, top-left origin.
///
/// Source rectangles of scaled blits are `Rect`s so that a sub-pixel part of
/// a bitmap can be stretched; box sampling also measures pixel footprints
/// with it.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub const fn location(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn right(self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn top_left(self) -> Vec2 {
        self.location()
    }

    #[inline]
    pub fn bottom_right(self) -> Vec2 {
        Vec2::new(self.right(), self.bottom())
    }

    #[inline]
    pub fn area(self) -> f32 {
        self.width * self.height
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
    }

    #[inline]
    pub fn translated(self, dx: f32, dy: f32) -> Self {
        Self { x: self.x + dx, y: self.y + dy, ..self }
    }

    #[inline]
    pub fn scaled(self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor, self.width * factor, self.height * factor)
    }

    /// Half-open: the right and bottom edges are outside.
    #[inline]
    pub fn contains(self, p: Vec2) -> bool {
        p.x >= self.x && p.y >= self.y && p.x < self.right() && p.y < self.bottom()
    }

    /// Overlap of two rectangles; `None` when they only touch or are apart.
    pub fn intersection(self, other: Rect) -> Option<Rect> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        (x1 > x0 && y1 > y0).then(|| Rect::new(x0, y0, x1 - x0, y1 - y0))
    }

    /// Smallest integer rectangle covering every fractional edge.
    pub fn enclosing_int_rect(self) -> IntRect {
        let (x0, y0) = (self.x.floor() as i32, self.y.floor() as i32);
        let (x1, y1) = (self.right().ceil() as i32, self.bottom().ceil() as i32);
        IntRect::new(x0, y0, x1 - x0, y1 - y0)
    }

    pub fn rounded_int_rect(self) -> IntRect {
        let (x0, y0) = (self.x.round() as i32, self.y.round() as i32);
        let (x1, y1) = (self.right().round() as i32, self.bottom().round() as i32);
        IntRect::new(x0, y0, x1 - x0, y1 - y0)
    }

    /// Whether all four edges fall on whole pixels.
    #[inline]
    pub fn is_integral(self) -> bool {
        [self.x, self.y, self.width, self.height].iter().all(|v| v.fract() == 0.0)
    }
}

impl From<IntRect> for Rect {
    #[inline]
    fn from(r: IntRect) -> Self {
        Rect::new(r.x as f32, r.y as f32, r.width as f32, r.height as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_and_touching() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let overlap = a.intersection(Rect::new(5.0, 5.0, 10.0, 10.0));
        assert_eq!(overlap, Some(Rect::new(5.0, 5.0, 5.0, 5.0)));
        assert_eq!(a.intersection(Rect::new(10.0, 0.0, 10.0, 10.0)), None);
        let pixel = Rect::new(1.0, 0.0, 1.0, 1.0);
        let px = Rect::new(0.5, 0.25, 1.0, 1.0).intersection(pixel).unwrap();
        assert_eq!(px.area(), 0.5 * 0.75);
    }

    #[test]
    fn integer_snapping() {
        let r = Rect::new(0.5, 1.25, 2.0, 2.5);
        assert_eq!(r.enclosing_int_rect(), IntRect::new(0, 1, 3, 3));
        assert_eq!(r.rounded_int_rect(), IntRect::new(1, 1, 2, 3));
        assert!(!r.is_integral());
        assert!(Rect::from(IntRect::new(1, 2, 3, 4)).is_integral());
    }

    #[test]
    fn empty_and_non_finite() {
        assert!(Rect::new(0.0, 0.0, 0.0, 4.0).is_empty());
        assert!(Rect::new(0.0, 0.0, f32::NAN, 4.0).is_empty());
        assert!(!Rect::new(0.0, f32::INFINITY, 1.0, 1.0).is_finite());
    }
}
