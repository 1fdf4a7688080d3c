//! Unscaled and integer-upsampled bitmap copies.

use crate::coords::{IntPoint, IntRect, Rect};
use crate::paint::Color;
use crate::surface::{swap_red_blue, Bitmap, PixelFormat, Surface};

use super::scaled::SourceAlpha;
use super::{Painter, ScalingMode};

/// Converts a packed pixel between formats without going through [`Color`].
#[inline]
fn convert_pixel(px: u32, from: PixelFormat, to: PixelFormat) -> u32 {
    let px = if from.needs_swap(to) { swap_red_blue(px) } else { px };
    if !from.has_alpha() && to.has_alpha() { px | 0xff00_0000 } else { px }
}

/// Copies one row, converting formats. With `force_opaque` the stored alpha
/// is 255 whatever the source says.
#[inline]
fn copy_row(dst: &mut [u32], src: &[u32], from: PixelFormat, to: PixelFormat, force_opaque: bool) {
    let force_opaque = force_opaque && to.has_alpha();
    if !force_opaque && !from.needs_swap(to) && (from.has_alpha() || !to.has_alpha()) {
        dst.copy_from_slice(src);
        return;
    }
    let alpha = if force_opaque { 0xff00_0000 } else { 0 };
    for (d, &s) in dst.iter_mut().zip(src) {
        *d = convert_pixel(s, from, to) | alpha;
    }
}

/// Where a blit lands in physical space and which source pixel feeds each
/// destination pixel.
#[derive(Debug, Copy, Clone)]
struct BlitPlan {
    /// Destination pixels to write, already clipped.
    clipped: IntRect,
    /// Unclipped physical origin of the destination.
    origin: IntPoint,
    /// Source physical pixel drawn at `origin`.
    src_origin: IntPoint,
    /// Destination pixels per source pixel along each axis.
    ratio: i32,
}

impl BlitPlan {
    #[inline]
    fn src_x(&self, x: i32) -> i32 {
        self.src_origin.x + (x - self.origin.x) / self.ratio
    }

    #[inline]
    fn src_y(&self, y: i32) -> i32 {
        self.src_origin.y + (y - self.origin.y) / self.ratio
    }
}

impl Painter<'_> {
    /// Places `src_rect` (clamped to the source) at `position`. Parts of
    /// `src_rect` outside the source are skipped without shifting the rest.
    fn plan_blit(
        &self,
        position: IntPoint,
        source: &Bitmap,
        src_rect: IntRect,
    ) -> Option<BlitPlan> {
        let safe = src_rect.intersected(source.rect());
        if safe.is_empty() {
            return None;
        }
        let position = position + (safe.location() - src_rect.location());
        let dst = self.to_physical(IntRect::from_location_size(position, safe.size()));
        let clipped = dst.intersected(self.physical_clip());
        if clipped.is_empty() {
            return None;
        }
        Some(BlitPlan {
            clipped,
            origin: dst.location(),
            src_origin: safe.location().scaled(source.scale()),
            ratio: self.scale() / source.scale(),
        })
    }

    /// Copies `src_rect` of `source` to `position`.
    ///
    /// Opaque copies at matching scale are row copies. Partial opacity, or a
    /// source alpha channel with `apply_alpha`, blends instead. A source at a
    /// lower scale than the painter is upsampled. Without `apply_alpha` the
    /// source reads as opaque on every path.
    ///
    /// # Panics
    ///
    /// If the source scale exceeds the painter's; downsampling goes through
    /// [`Painter::draw_scaled_bitmap`].
    pub fn blit(
        &mut self,
        position: IntPoint,
        source: &Bitmap,
        src_rect: IntRect,
        opacity: f32,
        apply_alpha: bool,
    ) {
        assert!(
            self.scale() >= source.scale(),
            "blit: cannot downsample a {}x source onto a {}x painter",
            source.scale(),
            self.scale()
        );
        if opacity <= 0.0 {
            return;
        }
        if opacity < 1.0 || (source.has_alpha_channel() && apply_alpha) {
            return self.blit_with_opacity(position, source, src_rect, opacity, apply_alpha);
        }
        if self.scale() != source.scale() {
            return self.blit_upsampled(position, source, src_rect, opacity, apply_alpha);
        }

        let Some(plan) = self.plan_blit(position, source, src_rect) else { return };
        let (from, to) = (source.format(), self.target.format());
        let c = plan.clipped;
        let sx = plan.src_x(c.x) as usize;
        for y in c.y..c.bottom() {
            let src = &source.scanline(plan.src_y(y))[sx..sx + c.width as usize];
            let dst = &mut self.target.scanline_mut(y)[c.x as usize..c.right() as usize];
            copy_row(dst, src, from, to, !apply_alpha);
        }
    }

    fn blit_upsampled(
        &mut self,
        position: IntPoint,
        source: &Bitmap,
        src_rect: IntRect,
        opacity: f32,
        apply_alpha: bool,
    ) {
        let safe = src_rect.intersected(source.rect());
        if safe.is_empty() {
            return;
        }
        let position = position + (safe.location() - src_rect.location());
        let dst = IntRect::from_location_size(position, safe.size());
        let alpha = SourceAlpha { opacity, apply_alpha };
        let nearest = ScalingMode::NearestNeighbor;
        self.draw_resampled_bitmap(dst, source, Rect::from(safe), alpha, nearest);
    }

    fn blit_with_opacity(
        &mut self,
        position: IntPoint,
        source: &Bitmap,
        src_rect: IntRect,
        opacity: f32,
        apply_alpha: bool,
    ) {
        if self.scale() != source.scale() {
            return self.blit_upsampled(position, source, src_rect, opacity, apply_alpha);
        }
        let Some(plan) = self.plan_blit(position, source, src_rect) else { return };
        let (from, to) = (source.format(), self.target.format());
        let opacity = opacity.min(1.0);

        for y in plan.clipped.y..plan.clipped.bottom() {
            let src = source.scanline(plan.src_y(y));
            let row = self.target.scanline_mut(y);
            for x in plan.clipped.x..plan.clipped.right() {
                let c = Color::from_pixel(src[plan.src_x(x) as usize], from);
                let alpha = if apply_alpha { c.a } else { 255 };
                let alpha = (alpha as f32 * opacity).round() as u8;
                if alpha == 0 {
                    continue;
                }
                let dst = &mut row[x as usize];
                *dst = Color::from_pixel(*dst, to).blend(c.with_alpha(alpha)).to_pixel(to);
            }
        }
    }

    /// Copies `src_rect` of `source` to `position`, passing every pixel
    /// through `filter` first.
    ///
    /// Fully transparent source pixels are skipped. Opaque filter results
    /// are stored, the rest blended. Without `apply_alpha` the source is
    /// read as opaque.
    ///
    /// # Panics
    ///
    /// Unless the painter's scale is a whole multiple of the source's.
    pub fn blit_filtered(
        &mut self,
        position: IntPoint,
        source: &Bitmap,
        src_rect: IntRect,
        filter: impl Fn(Color) -> Color,
        apply_alpha: bool,
    ) {
        assert!(
            self.scale() >= source.scale() && self.scale() % source.scale() == 0,
            "blit_filtered: only integer upsampling is supported ({}x source on a {}x painter)",
            source.scale(),
            self.scale()
        );
        let Some(plan) = self.plan_blit(position, source, src_rect) else { return };
        let (from, to) = (source.format(), self.target.format());

        for y in plan.clipped.y..plan.clipped.bottom() {
            let src = source.scanline(plan.src_y(y));
            let row = self.target.scanline_mut(y);
            for x in plan.clipped.x..plan.clipped.right() {
                let mut c = Color::from_pixel(src[plan.src_x(x) as usize], from);
                if !apply_alpha {
                    c.a = 255;
                }
                if c.a == 0 {
                    continue;
                }
                let out = filter(c);
                let dst = &mut row[x as usize];
                *dst = if out.is_opaque() {
                    out.to_pixel(to)
                } else {
                    Color::from_pixel(*dst, to).blend(out).to_pixel(to)
                };
            }
        }
    }

    /// [`Painter::blit_filtered`] with every pixel lightened.
    pub fn blit_brightened(&mut self, position: IntPoint, source: &Bitmap, src_rect: IntRect) {
        self.blit_filtered(position, source, src_rect, |c| c.lightened(1.2), true);
    }

    /// [`Painter::blit_filtered`] with every pixel grayed out, for disabled
    /// icons.
    pub fn blit_dimmed(&mut self, position: IntPoint, source: &Bitmap, src_rect: IntRect) {
        self.blit_filtered(position, source, src_rect, |c| c.to_grayscale().lightened(1.2), true);
    }

    /// Uses the source only as a coverage mask: every pixel becomes `tint`
    /// with its alpha scaled by the source alpha.
    pub fn blit_tinted(
        &mut self,
        position: IntPoint,
        source: &Bitmap,
        src_rect: IntRect,
        tint: Color,
    ) {
        if tint.is_transparent() {
            return;
        }
        self.blit_filtered(
            position,
            source,
            src_rect,
            |c| tint.with_alpha(((c.a as u16 * tint.a as u16 + 127) / 255) as u8),
            true,
        );
    }

    /// Fills `dst_rect` by repeating `src_rect` of `source`, starting at the
    /// rectangle's top-left. Pixels are copied, not blended.
    ///
    /// # Panics
    ///
    /// Unless the painter's scale is a whole multiple of the source's.
    pub fn blit_tiled(&mut self, dst_rect: IntRect, source: &Bitmap, src_rect: IntRect) {
        assert!(
            self.scale() >= source.scale() && self.scale() % source.scale() == 0,
            "blit_tiled: only integer upsampling is supported ({}x source on a {}x painter)",
            source.scale(),
            self.scale()
        );
        let tile = src_rect.intersected(source.rect());
        if tile.is_empty() {
            return;
        }
        let dst = self.to_physical(dst_rect);
        let clipped = dst.intersected(self.physical_clip());
        if clipped.is_empty() {
            return;
        }

        let ratio = self.scale() / source.scale();
        let tile = tile.scaled(source.scale());
        let (from, to) = (source.format(), self.target.format());
        for y in clipped.y..clipped.bottom() {
            let src = source.scanline(tile.y + ((y - dst.y) / ratio) % tile.height);
            let row = self.target.scanline_mut(y);
            for x in clipped.x..clipped.right() {
                let sx = tile.x + ((x - dst.x) / ratio) % tile.width;
                row[x as usize] = convert_pixel(src[sx as usize], from, to);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::IntSize;
    use crate::painter::test_support::*;

    fn pt(x: i32, y: i32) -> IntPoint {
        IntPoint::new(x, y)
    }

    fn filled(format: PixelFormat, w: i32, h: i32, color: Color) -> Bitmap {
        Bitmap::new_filled(format, IntSize::new(w, h), 1, color).unwrap()
    }

    fn gradient_source(w: i32, h: i32, format: PixelFormat, scale: i32) -> Bitmap {
        let mut b = Bitmap::new(format, IntSize::new(w, h), scale).unwrap();
        let (pw, ph) = (w * scale, h * scale);
        for y in 0..ph {
            for x in 0..pw {
                b.set_pixel(x, y, Color::from_rgb((x * 17) as u8, (y * 29) as u8, 90));
            }
        }
        b
    }

    // ── plain copies ──────────────────────────────────────────────────────

    #[test]
    fn full_blit_round_trips_pixels() {
        let src = gradient_source(7, 5, PixelFormat::Bgrx8888, 1);
        let mut dst = Bitmap::new(PixelFormat::Bgrx8888, IntSize::new(7, 5), 1).unwrap();
        Painter::new(&mut dst).blit(pt(0, 0), &src, src.rect(), 1.0, true);
        assert_eq!(dst, src);
    }

    #[test]
    fn blit_converts_between_formats() {
        let src = gradient_source(4, 4, PixelFormat::Bgrx8888, 1);
        let mut dst = Bitmap::new(PixelFormat::Rgba8888, IntSize::new(4, 4), 1).unwrap();
        Painter::new(&mut dst).blit(pt(0, 0), &src, src.rect(), 1.0, true);
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(dst.get_pixel(x, y), src.get_pixel(x, y));
                assert!(dst.get_pixel(x, y).is_opaque());
            }
        }
    }

    #[test]
    fn blit_touches_only_destination_rect() {
        let src = gradient_source(3, 2, PixelFormat::Bgrx8888, 1);
        let mut b = canvas(10, 10);
        Painter::new(&mut b).blit(pt(4, 6), &src, src.rect(), 1.0, true);
        for y in 0..10 {
            for x in 0..10 {
                let inside = (4..7).contains(&x) && (6..8).contains(&y);
                if inside {
                    assert_eq!(b.get_pixel(x, y), src.get_pixel(x - 4, y - 6));
                } else {
                    assert_eq!(b.get_pixel(x, y), Color::WHITE, "stray write at {x},{y}");
                }
            }
        }
    }

    #[test]
    fn source_rect_outside_bitmap_keeps_alignment() {
        let src = gradient_source(4, 4, PixelFormat::Bgrx8888, 1);
        let mut b = canvas(8, 8);
        Painter::new(&mut b).blit(pt(0, 0), &src, IntRect::new(-2, -1, 4, 4), 1.0, true);
        // Source (0, 0) lands where it would have without clamping.
        assert_eq!(b.get_pixel(2, 1), src.get_pixel(0, 0));
        assert_eq!(b.get_pixel(1, 1), Color::WHITE);
        assert_eq!(b.get_pixel(2, 0), Color::WHITE);
    }

    #[test]
    fn blit_respects_translation_and_clip() {
        let src = gradient_source(4, 4, PixelFormat::Bgrx8888, 1);
        let mut b = canvas(10, 10);
        {
            let mut p = Painter::new(&mut b);
            p.translate(3, 3);
            p.add_clip_rect(IntRect::new(0, 0, 2, 2));
            p.blit(pt(0, 0), &src, src.rect(), 1.0, true);
        }
        assert_eq!(b.get_pixel(3, 3), src.get_pixel(0, 0));
        assert_eq!(b.get_pixel(4, 4), src.get_pixel(1, 1));
        assert_eq!(b.get_pixel(5, 5), Color::WHITE);
    }

    // ── alpha & opacity ───────────────────────────────────────────────────

    #[test]
    fn half_opacity_blends() {
        let src = filled(PixelFormat::Bgrx8888, 2, 2, Color::BLACK);
        let mut b = canvas(2, 2);
        Painter::new(&mut b).blit(pt(0, 0), &src, src.rect(), 0.5, true);
        assert_eq!(b.get_pixel(0, 0), Color::WHITE.blend(Color::BLACK.with_alpha(128)));
    }

    #[test]
    fn apply_alpha_controls_source_alpha() {
        let src = filled(PixelFormat::Bgra8888, 1, 1, Color::RED.with_alpha(0));
        let mut b = canvas(2, 1);
        {
            let mut p = Painter::new(&mut b);
            p.blit(pt(0, 0), &src, src.rect(), 1.0, true);
            p.blit(pt(1, 0), &src, src.rect(), 1.0, false);
        }
        assert_eq!(b.get_pixel(0, 0), Color::WHITE);
        assert_eq!(b.get_pixel(1, 0), Color::RED);
    }

    #[test]
    fn ignored_source_alpha_is_opaque_on_every_path() {
        let src = filled(PixelFormat::Bgra8888, 1, 1, Color::RED.with_alpha(0));

        // Straight copy.
        let mut b = canvas(1, 1);
        Painter::new(&mut b).blit(pt(0, 0), &src, src.rect(), 1.0, false);
        assert_eq!(b.get_pixel(0, 0), Color::RED);

        // Per-pixel opacity.
        let mut b = canvas(1, 1);
        Painter::new(&mut b).blit(pt(0, 0), &src, src.rect(), 0.999, false);
        assert_eq!(b.get_pixel(0, 0), Color::RED);

        // Upsampled onto a 2x painter.
        let mut b = canvas_scaled(1, 1, 2);
        Painter::new(&mut b).blit(pt(0, 0), &src, src.rect(), 1.0, false);
        assert_eq!(count(&b, Color::RED), 4);
    }

    // ── scale ─────────────────────────────────────────────────────────────

    #[test]
    fn lower_scale_source_is_upsampled() {
        let src = gradient_source(2, 2, PixelFormat::Bgrx8888, 1);
        let mut b = canvas_scaled(4, 4, 2);
        Painter::new(&mut b).blit(pt(1, 1), &src, src.rect(), 1.0, true);
        for (x, y) in [(2, 2), (3, 3), (4, 5), (5, 4)] {
            assert_eq!(b.get_pixel(x, y), src.get_pixel((x - 2) / 2, (y - 2) / 2));
        }
    }

    #[test]
    fn matching_scale_copies_physical_pixels() {
        let src = gradient_source(2, 2, PixelFormat::Bgrx8888, 2);
        let mut b = canvas_scaled(2, 2, 2);
        Painter::new(&mut b).blit(pt(0, 0), &src, src.rect(), 1.0, true);
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(b.get_pixel(x, y), src.get_pixel(x, y));
            }
        }
    }

    #[test]
    #[should_panic(expected = "cannot downsample")]
    fn higher_scale_source_panics() {
        let src = gradient_source(2, 2, PixelFormat::Bgrx8888, 2);
        let mut b = canvas(4, 4);
        Painter::new(&mut b).blit(pt(0, 0), &src, src.rect(), 1.0, true);
    }

    // ── filtered ──────────────────────────────────────────────────────────

    #[test]
    fn filtered_skips_transparent_and_applies_filter() {
        let mut src = Bitmap::new(PixelFormat::Bgra8888, IntSize::new(2, 1), 1).unwrap();
        src.set_pixel(0, 0, Color::from_rgb(100, 100, 100));
        let mut b = canvas(2, 1);
        Painter::new(&mut b).blit_brightened(pt(0, 0), &src, src.rect());
        assert_eq!(b.get_pixel(0, 0), Color::from_rgb(120, 120, 120));
        assert_eq!(b.get_pixel(1, 0), Color::WHITE);
    }

    #[test]
    fn dimmed_is_gray() {
        let src = filled(PixelFormat::Bgrx8888, 1, 1, Color::from_rgb(30, 60, 90));
        let mut b = canvas(1, 1);
        Painter::new(&mut b).blit_dimmed(pt(0, 0), &src, src.rect());
        assert_eq!(b.get_pixel(0, 0), Color::from_rgb(72, 72, 72));
    }

    #[test]
    fn tinted_uses_source_as_coverage() {
        let mut src = Bitmap::new(PixelFormat::Bgra8888, IntSize::new(2, 1), 1).unwrap();
        src.set_pixel(0, 0, Color::WHITE);
        src.set_pixel(1, 0, Color::BLACK.with_alpha(128));
        let mut b = Bitmap::new(PixelFormat::Bgra8888, IntSize::new(2, 1), 1).unwrap();
        Painter::new(&mut b).blit_tinted(pt(0, 0), &src, src.rect(), Color::BLUE);
        assert_eq!(b.get_pixel(0, 0), Color::BLUE);
        assert_eq!(b.get_pixel(1, 0), Color::BLUE.with_alpha(128));
    }

    #[test]
    fn filtered_upsamples_by_whole_factor() {
        let src = gradient_source(2, 1, PixelFormat::Bgrx8888, 1);
        let mut b = canvas_scaled(2, 1, 3);
        Painter::new(&mut b).blit_filtered(pt(0, 0), &src, src.rect(), |c| c, true);
        for x in 0..6 {
            for y in 0..3 {
                assert_eq!(b.get_pixel(x, y), src.get_pixel(x / 3, 0));
            }
        }
    }

    // ── tiled ─────────────────────────────────────────────────────────────

    #[test]
    fn tiled_repeats_from_rect_origin() {
        let src = gradient_source(2, 3, PixelFormat::Bgrx8888, 1);
        let mut b = canvas(9, 9);
        Painter::new(&mut b).blit_tiled(IntRect::new(1, 1, 7, 7), &src, src.rect());
        for y in 1..8 {
            for x in 1..8 {
                assert_eq!(b.get_pixel(x, y), src.get_pixel((x - 1) % 2, (y - 1) % 3));
            }
        }
        assert_eq!(b.get_pixel(0, 0), Color::WHITE);
        assert_eq!(b.get_pixel(8, 8), Color::WHITE);
    }

    #[test]
    fn tiled_sub_rect_and_clip() {
        let src = gradient_source(4, 4, PixelFormat::Bgrx8888, 1);
        let mut b = canvas(8, 8);
        {
            let mut p = Painter::new(&mut b);
            p.add_clip_rect(IntRect::new(0, 0, 4, 8));
            p.blit_tiled(IntRect::new(0, 0, 8, 8), &src, IntRect::new(2, 2, 2, 2));
        }
        assert_eq!(b.get_pixel(0, 0), src.get_pixel(2, 2));
        assert_eq!(b.get_pixel(3, 5), src.get_pixel(3, 3));
        assert_eq!(b.get_pixel(4, 0), Color::WHITE);
    }
}
