/// Per-corner radii for a rounded rectangle (logical pixels).
///
/// Corners follow CSS convention: top-left, top-right, bottom-right, bottom-left.
/// Negative values are treated as zero by the painter.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct CornerRadii {
    pub top_left: i32,
    pub top_right: i32,
    pub bottom_right: i32,
    pub bottom_left: i32,
}

impl CornerRadii {
    #[inline]
    pub const fn new(top_left: i32, top_right: i32, bottom_right: i32, bottom_left: i32) -> Self {
        Self { top_left, top_right, bottom_right, bottom_left }
    }

    /// Uniform radius on all four corners.
    #[inline]
    pub const fn all(r: i32) -> Self {
        Self { top_left: r, top_right: r, bottom_right: r, bottom_left: r }
    }

    /// No rounding.
    #[inline]
    pub const fn zero() -> Self {
        Self::all(0)
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.top_left <= 0 && self.top_right <= 0 && self.bottom_right <= 0 && self.bottom_left <= 0
    }

    /// Clamps every radius into `[0, min(width, height) / 2]` so opposite
    /// corners never overlap.
    #[inline]
    pub fn clamped_to(self, width: i32, height: i32) -> Self {
        let limit = (width.min(height) / 2).max(0);
        let c = |r: i32| r.clamp(0, limit);
        Self {
            top_left: c(self.top_left),
            top_right: c(self.top_right),
            bottom_right: c(self.bottom_right),
            bottom_left: c(self.bottom_left),
        }
    }

    /// Multiplies every radius by `factor` (logical → physical).
    #[inline]
    pub const fn scaled(self, factor: i32) -> Self {
        Self {
            top_left: self.top_left * factor,
            top_right: self.top_right * factor,
            bottom_right: self.bottom_right * factor,
            bottom_left: self.bottom_left * factor,
        }
    }
}
