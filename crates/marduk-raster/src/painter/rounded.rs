use crate::coords::{CornerRadii, IntPoint, IntRect};
use crate::paint::Color;
use crate::surface::Surface;

use super::op::{fill_physical, with_pixel_op, PixelOp};
use super::Painter;

/// Which corner of a rectangle a quarter disk belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CornerOrientation {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl CornerOrientation {
    /// Circle center in the corner box's local pixel indices.
    #[inline]
    fn center(self, radius: i32) -> IntPoint {
        match self {
            CornerOrientation::TopLeft => IntPoint::new(radius, radius),
            CornerOrientation::TopRight => IntPoint::new(-1, radius),
            CornerOrientation::BottomRight => IntPoint::new(-1, -1),
            CornerOrientation::BottomLeft => IntPoint::new(radius, -1),
        }
    }
}

/// Whether local pixel `(dx, dy)` away from the circle center lies inside a
/// corner of `radius`: `d² ≤ r² + r + 0.25`, kept in integers as
/// `4d² ≤ (2r + 1)²`.
#[inline]
fn inside_corner(dx: i32, dy: i32, radius: i32) -> bool {
    let d2 = dx as i64 * dx as i64 + dy as i64 * dy as i64;
    let r2 = (2 * radius as i64 + 1) * (2 * radius as i64 + 1);
    4 * d2 <= r2
}

/// Fills the part of the `radius × radius` physical box `corner` covered by
/// its quarter disk, restricted to `clip`.
fn fill_corner<O: PixelOp>(
    target: &mut dyn Surface,
    corner: IntRect,
    radius: i32,
    orientation: CornerOrientation,
    clip: IntRect,
    op: &O,
) {
    let visible = corner.intersected(clip);
    if visible.is_empty() {
        return;
    }
    let center = orientation.center(radius);
    for y in visible.y..visible.bottom() {
        let dy = (y - corner.y) - center.y;
        let row = target.scanline_mut(y);
        for x in visible.x..visible.right() {
            let dx = (x - corner.x) - center.x;
            if inside_corner(dx, dy, radius) {
                row[x as usize] = op.apply(row[x as usize]);
            }
        }
    }
}

impl Painter<'_> {
    /// Fills `rect` with each corner rounded by its radius in `radii`.
    ///
    /// Radii are clamped to half the rectangle's smaller side. Every pixel is
    /// written at most once, so translucent colors blend evenly.
    pub fn fill_rect_with_rounded_corners(
        &mut self,
        rect: IntRect,
        color: Color,
        radii: CornerRadii,
    ) {
        if color.is_transparent() || rect.is_empty() {
            return;
        }
        if radii.is_zero() {
            self.fill_rect(rect, color);
            return;
        }

        let full = self.to_physical(rect);
        let clip = self.physical_clip();
        if full.intersected(clip).is_empty() {
            return;
        }
        let r = radii.scaled(self.scale()).clamped_to(full.width, full.height);
        let (top, bottom) = (full.y, full.bottom());

        // Horizontal bands between every y where a corner starts or ends.
        let mut breaks = [
            top,
            top + r.top_left,
            top + r.top_right,
            bottom - r.bottom_left,
            bottom - r.bottom_right,
            bottom,
        ];
        breaks.sort_unstable();

        let format = self.target.format();
        with_pixel_op!(self.draw_op(), O => {
            let op = O::new(color, format);

            for band in breaks.windows(2) {
                let (y0, y1) = (band[0], band[1]);
                if y0 >= y1 {
                    continue;
                }
                let left = if y0 < top + r.top_left {
                    r.top_left
                } else if y0 >= bottom - r.bottom_left {
                    r.bottom_left
                } else {
                    0
                };
                let right = if y0 < top + r.top_right {
                    r.top_right
                } else if y0 >= bottom - r.bottom_right {
                    r.bottom_right
                } else {
                    0
                };
                let body = IntRect::new(full.x + left, y0, full.width - left - right, y1 - y0);
                fill_physical(self.target, body.intersected(clip), &op);
            }

            let corners = [
                (CornerOrientation::TopLeft, r.top_left, full.x, top),
                (CornerOrientation::TopRight, r.top_right, full.right() - r.top_right, top),
                (
                    CornerOrientation::BottomRight,
                    r.bottom_right,
                    full.right() - r.bottom_right,
                    bottom - r.bottom_right,
                ),
                (CornerOrientation::BottomLeft, r.bottom_left, full.x, bottom - r.bottom_left),
            ];
            for (orientation, radius, x, y) in corners {
                if radius > 0 {
                    let corner = IntRect::new(x, y, radius, radius);
                    fill_corner(self.target, corner, radius, orientation, clip, &op);
                }
            }
        });
    }

    /// Fills a single quarter disk. `rect` is the corner's bounding box and
    /// is expected to be `radius × radius`.
    pub fn fill_rounded_corner(
        &mut self,
        rect: IntRect,
        radius: i32,
        color: Color,
        orientation: CornerOrientation,
    ) {
        if color.is_transparent() || radius <= 0 {
            return;
        }
        let corner = self.to_physical(rect);
        let clip = self.physical_clip();
        if corner.intersected(clip).is_empty() {
            return;
        }
        let radius = radius * self.scale();
        let format = self.target.format();
        with_pixel_op!(self.draw_op(), O => {
            fill_corner(self.target, corner, radius, orientation, clip, &O::new(color, format))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::painter::test_support::*;

    #[test]
    fn corner_test_is_half_pixel_correct() {
        // radius 2: the outermost corner pixel is outside, its neighbours are in.
        assert!(!inside_corner(2, 2, 2));
        assert!(inside_corner(1, 2, 2));
        assert!(inside_corner(1, 1, 2));
    }

    #[test]
    fn rounded_rect_cuts_corners_only() {
        let mut b = canvas(10, 10);
        {
            let mut p = Painter::new(&mut b);
            let rect = IntRect::new(0, 0, 10, 10);
            p.fill_rect_with_rounded_corners(rect, Color::RED, CornerRadii::all(3));
        }
        assert_eq!(b.get_pixel(0, 0), Color::WHITE);
        assert_eq!(b.get_pixel(9, 0), Color::WHITE);
        assert_eq!(b.get_pixel(9, 9), Color::WHITE);
        assert_eq!(b.get_pixel(0, 9), Color::WHITE);
        assert_eq!(b.get_pixel(5, 0), Color::RED);
        assert_eq!(b.get_pixel(0, 5), Color::RED);
        assert_eq!(b.get_pixel(5, 5), Color::RED);
        for y in 0..10 {
            for x in 0..10 {
                assert_eq!(b.get_pixel(x, y), b.get_pixel(9 - x, y), "x-mirror at {x},{y}");
                assert_eq!(b.get_pixel(x, y), b.get_pixel(x, 9 - y), "y-mirror at {x},{y}");
            }
        }
    }

    #[test]
    fn translucent_rounded_rect_blends_each_pixel_once() {
        let mut b = canvas(8, 8);
        let fill = Color::BLACK.with_alpha(128);
        {
            let mut p = Painter::new(&mut b);
            let radii = CornerRadii::new(2, 0, 3, 1);
            p.fill_rect_with_rounded_corners(IntRect::new(0, 0, 8, 8), fill, radii);
        }
        let once = Color::WHITE.blend(fill);
        for y in 0..8 {
            for x in 0..8 {
                let c = b.get_pixel(x, y);
                assert!(c == once || c == Color::WHITE, "double blend at {x},{y}: {c:?}");
            }
        }
        assert_eq!(b.get_pixel(4, 4), once);
    }

    #[test]
    fn oversized_radii_are_clamped() {
        let mut b = canvas(6, 4);
        {
            let mut p = Painter::new(&mut b);
            let rect = IntRect::new(0, 0, 6, 4);
            p.fill_rect_with_rounded_corners(rect, Color::RED, CornerRadii::all(50));
        }
        // Clamped to 2: a pill shape; the middle column is solid.
        assert_eq!(b.get_pixel(3, 0), Color::RED);
        assert_eq!(b.get_pixel(3, 3), Color::RED);
        assert_eq!(b.get_pixel(0, 0), Color::WHITE);
    }

    #[test]
    fn single_corner_orientation() {
        let mut b = canvas(4, 4);
        {
            let mut p = Painter::new(&mut b);
            let corner = CornerOrientation::BottomRight;
            p.fill_rounded_corner(IntRect::new(0, 0, 4, 4), 4, Color::RED, corner);
        }
        // The disk center sits just outside the top-left of the box.
        assert_eq!(b.get_pixel(0, 0), Color::RED);
        assert_eq!(b.get_pixel(3, 3), Color::WHITE);
    }
}
