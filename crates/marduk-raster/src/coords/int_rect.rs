use core::ops::{Add, Sub};

/// Integer pixel position.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct IntPoint {
    pub x: i32,
    pub y: i32,
}

impl IntPoint {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0, y: 0 }
    }

    #[inline]
    pub const fn scaled(self, factor: i32) -> Self {
        Self { x: self.x * factor, y: self.y * factor }
    }

    #[inline]
    pub const fn translated(self, dx: i32, dy: i32) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }
}

impl Add for IntPoint {
    type Output = IntPoint;
    #[inline]
    fn add(self, rhs: IntPoint) -> IntPoint {
        IntPoint::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for IntPoint {
    type Output = IntPoint;
    #[inline]
    fn sub(self, rhs: IntPoint) -> IntPoint {
        IntPoint::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Integer pixel extent.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct IntSize {
    pub width: i32,
    pub height: i32,
}

impl IntSize {
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    #[inline]
    pub const fn scaled(self, factor: i32) -> Self {
        Self { width: self.width * factor, height: self.height * factor }
    }
}

/// Half-open integer rectangle: `[x, x + width) × [y, y + height)`.
///
/// A rectangle with non-positive width or height is empty; empty rectangles
/// intersect nothing and contain no points.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct IntRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl IntRect {
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub const fn from_location_size(location: IntPoint, size: IntSize) -> Self {
        Self { x: location.x, y: location.y, width: size.width, height: size.height }
    }

    #[inline]
    pub const fn from_size(size: IntSize) -> Self {
        Self { x: 0, y: 0, width: size.width, height: size.height }
    }

    /// Bounding rectangle of two points, inclusive of both.
    #[inline]
    pub fn from_two_points(a: IntPoint, b: IntPoint) -> Self {
        let x0 = a.x.min(b.x);
        let y0 = a.y.min(b.y);
        let x1 = a.x.max(b.x);
        let y1 = a.y.max(b.y);
        Self::new(x0, y0, x1 - x0 + 1, y1 - y0 + 1)
    }

    #[inline]
    pub const fn location(self) -> IntPoint {
        IntPoint::new(self.x, self.y)
    }

    #[inline]
    pub const fn size(self) -> IntSize {
        IntSize::new(self.width, self.height)
    }

    /// Exclusive right edge.
    #[inline]
    pub const fn right(self) -> i32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    #[inline]
    pub const fn bottom(self) -> i32 {
        self.y + self.height
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    #[inline]
    pub const fn area(self) -> i64 {
        if self.is_empty() { 0 } else { self.width as i64 * self.height as i64 }
    }

    #[inline]
    pub const fn translated(self, dx: i32, dy: i32) -> Self {
        Self { x: self.x + dx, y: self.y + dy, width: self.width, height: self.height }
    }

    #[inline]
    pub const fn translated_by(self, offset: IntPoint) -> Self {
        self.translated(offset.x, offset.y)
    }

    /// Multiplies every coordinate by `factor` (logical → physical).
    #[inline]
    pub const fn scaled(self, factor: i32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
            width: self.width * factor,
            height: self.height * factor,
        }
    }

    /// Grows (or shrinks, for negative values) every edge by `amount`.
    #[inline]
    pub const fn inflated(self, amount: i32) -> Self {
        Self {
            x: self.x - amount,
            y: self.y - amount,
            width: self.width + 2 * amount,
            height: self.height + 2 * amount,
        }
    }

    #[inline]
    pub const fn contains(self, p: IntPoint) -> bool {
        p.x >= self.x && p.y >= self.y && p.x < self.right() && p.y < self.bottom()
    }

    /// True when `other` lies completely inside `self`.
    #[inline]
    pub const fn contains_rect(self, other: IntRect) -> bool {
        other.is_empty()
            || (other.x >= self.x
                && other.y >= self.y
                && other.right() <= self.right()
                && other.bottom() <= self.bottom())
    }

    #[inline]
    pub fn intersects(self, other: IntRect) -> bool {
        !self.intersected(other).is_empty()
    }

    /// Intersection of both rectangles. Disjoint inputs produce an empty
    /// rectangle anchored at the overlap origin.
    #[inline]
    pub fn intersected(self, other: IntRect) -> IntRect {
        if self.is_empty() || other.is_empty() {
            return IntRect::new(self.x, self.y, 0, 0);
        }
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        IntRect::new(x0, y0, (x1 - x0).max(0), (y1 - y0).max(0))
    }
}
