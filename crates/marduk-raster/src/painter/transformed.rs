use crate::coords::{AffineTransform, IntRect, Rect, Vec2};
use crate::paint::Color;
use crate::surface::{Bitmap, Surface};

use super::{Painter, ScalingMode};

/// Bilinear sample at continuous source position `p` (pixel centers sit at
/// `n + 0.5`), reading only inside `bounds`.
fn sample_bilinear(source: &Bitmap, p: Vec2, bounds: IntRect) -> Color {
    let fx = p.x - 0.5;
    let fy = p.y - 0.5;
    let (x, y) = (fx.floor(), fy.floor());
    let (rx, ry) = (fx - x, fy - y);
    let cx = |v: i32| v.clamp(bounds.x, bounds.right() - 1);
    let cy = |v: i32| v.clamp(bounds.y, bounds.bottom() - 1);
    let (x0, x1) = (cx(x as i32), cx(x as i32 + 1));
    let (y0, y1) = (cy(y as i32), cy(y as i32 + 1));

    let top = source.get_pixel(x0, y0).mixed_with(source.get_pixel(x1, y0), rx);
    let bottom = source.get_pixel(x0, y1).mixed_with(source.get_pixel(x1, y1), rx);
    top.mixed_with(bottom, ry)
}

impl Painter<'_> {
    /// Draws `src_rect` of `source` stretched over `dst_rect`, with
    /// `transform` applied to the destination in logical space before the
    /// painter's own translation.
    ///
    /// Scale/translate transforms reduce to [`Painter::draw_scaled_bitmap`].
    /// Anything else is inverse-mapped per destination pixel center;
    /// [`ScalingMode::NearestNeighbor`] and [`ScalingMode::None`] take the
    /// nearest pixel, the other modes interpolate bilinearly.
    pub fn draw_scaled_bitmap_with_transform(
        &mut self,
        dst_rect: IntRect,
        source: &Bitmap,
        src_rect: Rect,
        transform: AffineTransform,
        opacity: f32,
        mode: ScalingMode,
    ) {
        if dst_rect.is_empty() || src_rect.is_empty() || !src_rect.is_finite() || opacity <= 0.0 {
            return;
        }
        if transform.is_axis_aligned_scale_translate() {
            let mapped = transform.map_rect(Rect::from(dst_rect)).rounded_int_rect();
            return self.draw_scaled_bitmap(mapped, source, src_rect, opacity, mode);
        }
        let Some(inverse) = transform.inverse() else {
            log::debug!("draw_scaled_bitmap_with_transform: singular transform {transform:?}");
            return;
        };

        let scale = self.scale() as f32;
        let t = self.translation();
        let bounds = transform
            .map_rect(Rect::from(dst_rect))
            .translated(t.x as f32, t.y as f32)
            .scaled(scale)
            .enclosing_int_rect();
        let clipped = bounds.intersected(self.physical_clip());
        if clipped.is_empty() {
            return;
        }

        // Destination physical pixel → source physical position.
        let ss = source.scale() as f32;
        let to_source = AffineTransform::scaling(1.0 / scale, 1.0 / scale)
            .then(AffineTransform::translation(-(t.x as f32), -(t.y as f32)))
            .then(inverse)
            .then(AffineTransform::translation(-(dst_rect.x as f32), -(dst_rect.y as f32)))
            .then(AffineTransform::scaling(
                src_rect.width / dst_rect.width as f32 * ss,
                src_rect.height / dst_rect.height as f32 * ss,
            ))
            .then(AffineTransform::translation(src_rect.x * ss, src_rect.y * ss));

        let physical = Rect::from(source.physical_rect());
        let Some(readable) = src_rect.scaled(ss).intersection(physical) else { return };
        let pixels = readable.enclosing_int_rect();
        let nearest = matches!(mode, ScalingMode::NearestNeighbor | ScalingMode::None);
        let format = self.target.format();

        for y in clipped.y..clipped.bottom() {
            let row = self.target.scanline_mut(y);
            for x in clipped.x..clipped.right() {
                let p = to_source.map(Vec2::new(x as f32 + 0.5, y as f32 + 0.5));
                if !readable.contains(p) {
                    continue;
                }
                let c = if nearest {
                    source.get_pixel(p.x.floor() as i32, p.y.floor() as i32)
                } else {
                    sample_bilinear(source, p, pixels)
                };
                let c = if opacity < 1.0 { c.with_opacity(opacity) } else { c };
                if c.is_transparent() {
                    continue;
                }
                let dst = &mut row[x as usize];
                *dst = Color::from_pixel(*dst, format).blend(c).to_pixel(format);
            }
        }
    }
}
