use crate::coords::{IntPoint, IntRect, IntSize};
use crate::paint::{Color, Gradient, Orientation};

use super::op::{fill_physical, with_pixel_op, PixelOp, SourceOver};
use super::Painter;

impl Painter<'_> {
    /// Overwrites `rect` with `color`. No blending; the draw op is ignored.
    pub fn clear_rect(&mut self, rect: IntRect, color: Color) {
        let r = self.clipped_physical(rect);
        if r.is_empty() {
            return;
        }
        let px = color.to_pixel(self.target.format());
        let (x0, x1) = (r.x as usize, r.right() as usize);
        for y in r.y..r.bottom() {
            self.target.scanline_mut(y)[x0..x1].fill(px);
        }
    }

    /// Fills `rect` through the active draw op.
    pub fn fill_rect(&mut self, rect: IntRect, color: Color) {
        if color.is_transparent() {
            return;
        }
        let r = self.clipped_physical(rect);
        if r.is_empty() {
            return;
        }
        let format = self.target.format();
        with_pixel_op!(self.draw_op(), O => {
            fill_physical(self.target, r, &O::new(color, format))
        });
    }

    /// Sets one logical pixel (a `scale × scale` block) through the draw op.
    pub fn set_pixel(&mut self, point: IntPoint, color: Color) {
        self.fill_rect(IntRect::new(point.x, point.y, 1, 1), color);
    }

    /// Checkerboard of `cell_size` cells; the cell at the rect's origin is
    /// `dark`. Pixels are stored directly.
    pub fn fill_rect_with_checkerboard(
        &mut self,
        rect: IntRect,
        cell_size: IntSize,
        dark: Color,
        light: Color,
    ) {
        if cell_size.is_empty() {
            return;
        }
        let full = self.to_physical(rect);
        let r = full.intersected(self.physical_clip());
        if r.is_empty() {
            return;
        }

        let scale = self.scale();
        let (cw, ch) = (cell_size.width * scale, cell_size.height * scale);
        let format = self.target.format();
        let (dark_px, light_px) = (dark.to_pixel(format), light.to_pixel(format));

        for y in r.y..r.bottom() {
            let cell_row = (y - full.y) / ch;
            let row = self.target.scanline_mut(y);
            for x in r.x..r.right() {
                let cell_col = (x - full.x) / cw;
                row[x as usize] = if (cell_row ^ cell_col) & 1 == 1 { light_px } else { dark_px };
            }
        }
    }

    /// Alternates `a` and `b` on absolute physical pixel parity. Fully
    /// transparent colors leave their pixels untouched.
    pub fn fill_rect_with_dither_pattern(&mut self, rect: IntRect, a: Color, b: Color) {
        let r = self.clipped_physical(rect);
        if r.is_empty() {
            return;
        }
        let format = self.target.format();
        let (a_px, b_px) = (a.to_pixel(format), b.to_pixel(format));

        for y in r.y..r.bottom() {
            let row = self.target.scanline_mut(y);
            for x in r.x..r.right() {
                let use_a = (x ^ y) & 1 == 1;
                if use_a && !a.is_transparent() {
                    row[x as usize] = a_px;
                } else if !use_a && !b.is_transparent() {
                    row[x as usize] = b_px;
                }
            }
        }
    }

    /// Fills `rect` with a linear gradient spanning its full (unclipped)
    /// extent, blended source-over.
    pub fn fill_rect_with_gradient(&mut self, rect: IntRect, gradient: &Gradient) {
        if !gradient.is_valid() {
            return;
        }
        let full = self.to_physical(rect);
        let r = full.intersected(self.physical_clip());
        if r.is_empty() {
            return;
        }
        let format = self.target.format();

        let t_at = |pos: i32, origin: i32, len: i32| -> f32 {
            if len <= 1 { 0.0 } else { (pos - origin) as f32 / (len - 1) as f32 }
        };

        match gradient.orientation {
            Orientation::Horizontal => {
                let ops: Vec<SourceOver> = (r.x..r.right())
                    .map(|x| {
                        let t = t_at(x, full.x, full.width);
                        SourceOver::new(gradient.color_at(t), format)
                    })
                    .collect();
                for y in r.y..r.bottom() {
                    let row = &mut self.target.scanline_mut(y)[r.x as usize..r.right() as usize];
                    for (px, op) in row.iter_mut().zip(&ops) {
                        *px = op.apply(*px);
                    }
                }
            }
            Orientation::Vertical => {
                for y in r.y..r.bottom() {
                    let t = t_at(y, full.y, full.height);
                    let op = SourceOver::new(gradient.color_at(t), format);
                    let row = self.target.scanline_mut(y);
                    op.apply_span(&mut row[r.x as usize..r.right() as usize]);
                }
            }
        }
    }

    /// One-logical-pixel outline of `rect`. `rough` leaves the four corner
    /// pixels out.
    pub fn draw_rect(&mut self, rect: IntRect, color: Color, rough: bool) {
        if color.is_transparent() || rect.is_empty() {
            return;
        }
        let inset = if rough { 1 } else { 0 };
        let edges = [
            IntRect::new(rect.x + inset, rect.y, rect.width - 2 * inset, 1),
            IntRect::new(rect.x + inset, rect.bottom() - 1, rect.width - 2 * inset, 1),
            IntRect::new(rect.x, rect.y + 1, 1, rect.height - 2),
            IntRect::new(rect.right() - 1, rect.y + 1, 1, rect.height - 2),
        ];
        // Degenerate rects would otherwise paint a row or column twice.
        let edges: Vec<IntRect> = edges
            .iter()
            .enumerate()
            .filter(|&(i, _)| !(rect.height == 1 && i == 1) && !(rect.width == 1 && i == 3))
            .map(|(_, e)| self.clipped_physical(*e))
            .filter(|e| !e.is_empty())
            .collect();
        if edges.is_empty() {
            return;
        }

        let format = self.target.format();
        with_pixel_op!(self.draw_op(), O => {
            let op = O::new(color, format);
            for e in edges {
                fill_physical(self.target, e, &op);
            }
        });
    }

    /// Fills the ellipse inscribed in `rect`, one span per physical row.
    pub fn fill_ellipse(&mut self, rect: IntRect, color: Color) {
        if color.is_transparent() {
            return;
        }
        let full = self.to_physical(rect);
        let clip = self.physical_clip();
        if full.intersected(clip).is_empty() {
            return;
        }

        let rx = full.width as f32 / 2.0;
        let ry = full.height as f32 / 2.0;
        let cx = full.x as f32 + rx;
        let cy = full.y as f32 + ry;

        let format = self.target.format();
        with_pixel_op!(self.draw_op(), O => {
            let op = O::new(color, format);
            for y in full.y.max(clip.y)..full.bottom().min(clip.bottom()) {
                let dy = (y as f32 + 0.5 - cy) / ry;
                let k = 1.0 - dy * dy;
                if k < 0.0 {
                    continue;
                }
                let x0 = (cx - rx * k.sqrt()).round() as i32;
                // Mirror around the center so every row is symmetric.
                let x1 = full.x + full.right() - x0;
                let span = IntRect::new(x0, y, x1 - x0, 1).intersected(clip);
                fill_physical(self.target, span, &op);
            }
        });
    }
}
