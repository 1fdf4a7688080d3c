use crate::coords::{IntPoint, IntRect};
use crate::paint::Color;
use crate::surface::Surface;

use super::op::{fill_physical, with_pixel_op, PixelOp};
use super::Painter;

/// Dash pattern of a stroked line.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum LineStyle {
    #[default]
    Solid,
    /// One block every `2 × thickness` steps.
    Dotted,
    /// `3 × thickness` on, `3 × thickness` off.
    Dashed,
}

/// How a line is stroked.
///
/// `thickness` is in logical pixels. `alternate_color`, when set, is drawn
/// in the gaps of dotted and dashed lines.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub thickness: i32,
    pub style: LineStyle,
    pub alternate_color: Option<Color>,
}

impl Default for Stroke {
    fn default() -> Self {
        Self { color: Color::BLACK, thickness: 1, style: LineStyle::Solid, alternate_color: None }
    }
}

impl Stroke {
    #[inline]
    pub fn new(color: Color, thickness: i32) -> Self {
        Self { color, thickness, ..Self::default() }
    }

    #[inline]
    pub fn with_style(mut self, style: LineStyle) -> Self {
        self.style = style;
        self
    }

    #[inline]
    pub fn with_alternate_color(mut self, color: Color) -> Self {
        self.alternate_color = Some(color);
        self
    }

    /// True when nothing would be drawn.
    #[inline]
    fn is_invisible(&self) -> bool {
        self.thickness <= 0
            || (self.color.is_transparent()
                && self.alternate_color.map_or(true, |c| c.is_transparent()))
    }
}

/// Which color, if any, the pattern emits at step `i` for block size `t`.
#[inline]
fn pattern_at(style: LineStyle, i: i32, t: i32) -> Option<bool> {
    match style {
        LineStyle::Solid => Some(true),
        LineStyle::Dotted => {
            let phase = i % (2 * t);
            if phase == 0 {
                Some(true)
            } else if phase == t {
                Some(false)
            } else {
                None
            }
        }
        LineStyle::Dashed => Some(i % (6 * t) < 3 * t),
    }
}

impl Painter<'_> {
    /// Draws a line from `p1` to `p2`, both inclusive.
    ///
    /// Each stepped position emits a `thickness × thickness` block anchored
    /// at its top-left, so `draw_line(p, p, ..)` paints exactly one block.
    pub fn draw_line(&mut self, p1: IntPoint, p2: IntPoint, stroke: &Stroke) {
        if stroke.is_invisible() {
            return;
        }

        let t = stroke.thickness * self.scale();
        let a = self.to_physical_point(p1);
        let b = self.to_physical_point(p2);
        let clip = self.physical_clip();

        let (min_x, max_x) = (a.x.min(b.x), a.x.max(b.x));
        let (min_y, max_y) = (a.y.min(b.y), a.y.max(b.y));
        let bounds = IntRect::new(min_x, min_y, max_x - min_x + t, max_y - min_y + t);
        if !bounds.intersects(clip) {
            return;
        }

        let format = self.target.format();
        let primary = stroke.color;
        let alternate = stroke.alternate_color.unwrap_or(Color::TRANSPARENT);

        with_pixel_op!(self.draw_op(), O => {
            let on = O::new(primary, format);
            let off = O::new(alternate, format);

            if stroke.style == LineStyle::Solid && (a.x == b.x || a.y == b.y) {
                if !primary.is_transparent() {
                    fill_physical(self.target, bounds.intersected(clip), &on);
                }
            } else {
                bresenham(a, b, |i, x, y| {
                    let (op, color) = match pattern_at(stroke.style, i, t) {
                        Some(true) => (&on, primary),
                        Some(false) => (&off, alternate),
                        None => return,
                    };
                    if !color.is_transparent() {
                        draw_block(self.target, IntRect::new(x, y, t, t), clip, op);
                    }
                });
            }
        });
    }
}

#[inline]
fn draw_block<O: PixelOp>(target: &mut dyn Surface, block: IntRect, clip: IntRect, op: &O) {
    fill_physical(target, block.intersected(clip), op);
}

/// Integer Bresenham walk from `a` to `b` inclusive; `emit(step, x, y)`.
fn bresenham(a: IntPoint, b: IntPoint, mut emit: impl FnMut(i32, i32, i32)) {
    let dx = (b.x - a.x).abs();
    let dy = -(b.y - a.y).abs();
    let sx = if a.x < b.x { 1 } else { -1 };
    let sy = if a.y < b.y { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (a.x, a.y);
    let mut i = 0;

    loop {
        emit(i, x, y);
        if x == b.x && y == b.y {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
        i += 1;
    }
}
