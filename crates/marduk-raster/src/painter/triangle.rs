use crate::coords::{IntPoint, IntRect};
use crate::paint::Color;

use super::op::{fill_physical, with_pixel_op, PixelOp};
use super::Painter;

/// A triangle edge, evaluated as the x it crosses on a given scanline.
#[derive(Debug, Copy, Clone)]
struct Edge {
    from: IntPoint,
    to: IntPoint,
}

impl Edge {
    #[inline]
    fn x_at(self, y: i32) -> f32 {
        let dy = self.to.y - self.from.y;
        if dy == 0 {
            return self.from.x as f32;
        }
        let t = (y - self.from.y) as f32 / dy as f32;
        self.from.x as f32 + (self.to.x - self.from.x) as f32 * t
    }
}

impl Painter<'_> {
    /// Fills the triangle `a`, `b`, `c`.
    ///
    /// Scanlines run over `[top.y, bottom.y)` and spans are half-open in x,
    /// so triangles sharing an edge do not overlap.
    pub fn fill_triangle(&mut self, a: IntPoint, b: IntPoint, c: IntPoint, color: Color) {
        if color.is_transparent() {
            return;
        }
        let mut v = [a, b, c].map(|p| self.to_physical_point(p));
        v.sort_by_key(|p| p.y);
        let [p0, p1, p2] = v;

        let clip = self.physical_clip();
        if p0.y >= clip.bottom() || p2.y <= clip.y || p0.y == p2.y {
            return;
        }

        let long = Edge { from: p0, to: p2 };
        let upper = Edge { from: p0, to: p1 };
        let lower = Edge { from: p1, to: p2 };

        let format = self.target.format();
        with_pixel_op!(self.draw_op(), O => {
            let op = O::new(color, format);
            for y in p0.y.max(clip.y)..p2.y.min(clip.bottom()) {
                let xa = long.x_at(y);
                let xb = if y < p1.y { upper.x_at(y) } else { lower.x_at(y) };
                let (x0, x1) = (xa.min(xb).round() as i32, xa.max(xb).round() as i32);
                let span = IntRect::new(x0, y, x1 - x0, 1).intersected(clip);
                fill_physical(self.target, span, &op);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::painter::test_support::*;
    use crate::surface::Surface;

    fn pt(x: i32, y: i32) -> IntPoint {
        IntPoint::new(x, y)
    }

    #[test]
    fn right_triangle_area() {
        let mut b = canvas(10, 10);
        {
            let mut p = Painter::new(&mut b);
            p.fill_triangle(pt(0, 0), pt(8, 0), pt(0, 8), Color::RED);
        }
        assert_eq!(count(&b, Color::RED), 36);
        assert_eq!(b.get_pixel(7, 0), Color::RED);
        assert_eq!(b.get_pixel(0, 7), Color::RED);
        assert_eq!(b.get_pixel(0, 8), Color::WHITE);
    }

    #[test]
    fn vertex_order_does_not_matter() {
        let mut first = canvas(12, 12);
        let mut second = canvas(12, 12);
        Painter::new(&mut first).fill_triangle(pt(1, 1), pt(10, 4), pt(3, 11), Color::BLUE);
        Painter::new(&mut second).fill_triangle(pt(3, 11), pt(1, 1), pt(10, 4), Color::BLUE);
        assert_eq!(first, second);
    }

    #[test]
    fn shared_edge_does_not_double_blend() {
        let mut b = canvas(10, 10);
        let fill = Color::BLACK.with_alpha(100);
        {
            let mut p = Painter::new(&mut b);
            p.fill_triangle(pt(0, 0), pt(8, 0), pt(0, 8), fill);
            p.fill_triangle(pt(8, 0), pt(8, 8), pt(0, 8), fill);
        }
        let once = Color::WHITE.blend(fill);
        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(b.get_pixel(x, y), once, "at {x},{y}");
            }
        }
    }

    #[test]
    fn degenerate_and_clipped_are_noops() {
        let mut b = canvas(8, 8);
        let before = b.clone();
        {
            let mut p = Painter::new(&mut b);
            p.fill_triangle(pt(0, 3), pt(5, 3), pt(7, 3), Color::RED);
            p.add_clip_rect(IntRect::new(0, 0, 2, 2));
            p.fill_triangle(pt(4, 4), pt(7, 4), pt(7, 7), Color::RED);
        }
        assert_eq!(b, before);
    }
}
