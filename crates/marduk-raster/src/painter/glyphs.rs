use crate::coords::{IntPoint, IntRect, Rect, Vec2};
use crate::paint::Color;
use crate::surface::{Bitmap, Surface};
use crate::text::bidi::{directional_runs, TextDirection};
use crate::text::{
    emoji_size, line_width, resolve, run_width, walk_run, CodePointCursor, Font, Glyph, GlyphBitmap,
    GlyphImage, Resolved,
};

use super::op::{fill_physical, with_pixel_op, PixelOp};
use super::{Painter, ScalingMode};

/// Where a block of text sits inside its rectangle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum TextAlignment {
    #[default]
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

/// Position along one axis: 0 start, 1 center, 2 end.
impl TextAlignment {
    #[inline]
    fn horizontal(self) -> u8 {
        match self {
            Self::TopLeft | Self::CenterLeft | Self::BottomLeft => 0,
            Self::TopCenter | Self::Center | Self::BottomCenter => 1,
            Self::TopRight | Self::CenterRight | Self::BottomRight => 2,
        }
    }

    #[inline]
    fn vertical(self) -> u8 {
        match self {
            Self::TopLeft | Self::TopCenter | Self::TopRight => 0,
            Self::CenterLeft | Self::Center | Self::CenterRight => 1,
            Self::BottomLeft | Self::BottomCenter | Self::BottomRight => 2,
        }
    }
}

#[inline]
fn align(start: f32, available: f32, used: f32, position: u8) -> f32 {
    match position {
        0 => start,
        1 => start + ((available - used) / 2.0).floor(),
        _ => start + available - used,
    }
}

impl Painter<'_> {
    /// Stencils the set bits of `bitmap` with `color` through the draw op,
    /// one logical pixel per bit.
    fn paint_mono(&mut self, top_left: IntPoint, bitmap: &GlyphBitmap, color: Color) {
        if bitmap.is_empty() || color.is_transparent() {
            return;
        }
        let s = self.scale();
        let origin = self.to_physical_point(top_left);
        let clip = self.physical_clip();
        let extent = IntRect::new(origin.x, origin.y, bitmap.width() * s, bitmap.height() * s);
        if !extent.intersects(clip) {
            return;
        }

        let format = self.target.format();
        with_pixel_op!(self.draw_op(), O => {
            let op = O::new(color, format);
            for y in 0..bitmap.height() {
                for x in 0..bitmap.width() {
                    if bitmap.bit_at(x, y) {
                        let block = IntRect::new(origin.x + x * s, origin.y + y * s, s, s);
                        fill_physical(self.target, block.intersected(clip), &op);
                    }
                }
            }
        });
    }

    /// Paints `glyph` with its pen at `pen` on the baseline.
    ///
    /// Mono glyphs go through the draw op, coverage masks are tinted with
    /// `color`, color glyphs are scaled to their advance and ignore `color`.
    pub fn draw_glyph_image(&mut self, pen: Vec2, glyph: &Glyph, color: Color) {
        let top_left = IntPoint::new(
            (pen.x + glyph.left_bearing).round() as i32,
            (pen.y - glyph.ascent).round() as i32,
        );
        match &glyph.image {
            GlyphImage::Mono(bits) => self.paint_mono(top_left, bits, color),
            GlyphImage::Alpha(mask) => self.blit_tinted(top_left, mask, mask.rect(), color),
            GlyphImage::Color(image) => {
                if image.width() <= 0 || glyph.advance <= 0.0 {
                    return;
                }
                let w = glyph.advance.round() as i32;
                let h = image.height() as f32 * glyph.advance / image.width() as f32;
                let h = h.round() as i32;
                let dst = IntRect::new(top_left.x, top_left.y, w, h);
                let src = Rect::from(image.rect());
                self.draw_scaled_bitmap(dst, image, src, 1.0, ScalingMode::BilinearBlend);
            }
        }
    }

    /// Draws `ch` from the current font with its pen at `pen` on the
    /// baseline.
    pub fn draw_glyph(&mut self, pen: Vec2, ch: char, color: Color) {
        let Some(font) = self.font() else {
            log::warn!("draw_glyph: no font set, skipping {ch:?}");
            return;
        };
        let Some(glyph) = font.glyph(ch, pen.x - pen.x.floor()) else {
            log::debug!("draw_glyph: font has no glyph for {ch:?}");
            return;
        };
        self.draw_glyph_image(pen, &glyph, color);
    }

    /// Draws an emoji image scaled to `font`'s pixel size, top-left at
    /// `top_left`.
    pub fn draw_emoji(&mut self, top_left: IntPoint, emoji: &Bitmap, font: &dyn Font) {
        let size = emoji_size(font, emoji);
        if size.is_empty() {
            return;
        }
        let dst = IntRect::from_location_size(top_left, size);
        let src = Rect::from(emoji.rect());
        self.draw_scaled_bitmap(dst, emoji, src, 1.0, ScalingMode::BilinearBlend);
    }

    fn draw_resolved(&mut self, pen: Vec2, resolved: &Resolved, font: &dyn Font, color: Color) {
        match resolved {
            Resolved::Glyph(ch) => {
                if let Some(glyph) = font.glyph(*ch, pen.x - pen.x.floor()) {
                    self.draw_glyph_image(pen, &glyph, color);
                }
            }
            Resolved::Emoji(image) => {
                let top = (pen.y - font.ascent()).round() as i32;
                self.draw_emoji(IntPoint::new(pen.x.round() as i32, top), image, font);
            }
            Resolved::Blank => {}
        }
    }

    /// Draws the glyph or emoji sequence under `cursor` with its pen at
    /// `pen` and returns the advance, excluding glyph spacing.
    ///
    /// The cursor is left on the last code point consumed; advance it by
    /// one to move on.
    pub fn draw_glyph_or_emoji(
        &mut self,
        pen: Vec2,
        cursor: &mut CodePointCursor<'_>,
        color: Color,
    ) -> f32 {
        let Some(font) = self.font() else {
            log::warn!("draw_glyph_or_emoji: no font set");
            return 0.0;
        };
        let Some(step) = resolve(cursor, font, self.emoji_provider()) else { return 0.0 };
        self.draw_resolved(pen, &step.resolved, font, color);
        step.width
    }

    /// Lays out one run starting at `start_x`. RTL runs fill the same
    /// extent from its right edge, moving the pen left before each glyph.
    fn draw_run(
        &mut self,
        start_x: f32,
        baseline: f32,
        text: &[char],
        direction: TextDirection,
        font: &dyn Font,
        color: Color,
    ) {
        let emoji = self.emoji_provider();
        let spacing = font.glyph_spacing();
        match direction {
            TextDirection::Ltr => {
                let mut x = start_x;
                walk_run(text, font, emoji, |kerning, step| {
                    x += kerning;
                    self.draw_resolved(Vec2::new(x, baseline), &step.resolved, font, color);
                    x += step.width + spacing;
                });
            }
            TextDirection::Rtl => {
                let mut x = start_x + run_width(text, font, emoji);
                walk_run(text, font, emoji, |kerning, step| {
                    x -= kerning + step.width;
                    self.draw_resolved(Vec2::new(x, baseline), &step.resolved, font, color);
                    x -= spacing;
                });
            }
        }
    }

    /// Draws `text` as a single left-to-right run with its first pen
    /// position at `baseline_start`. No bidi processing, no line breaks.
    pub fn draw_text_run(&mut self, baseline_start: Vec2, text: &str, color: Color) {
        let Some(font) = self.font() else {
            log::warn!("draw_text_run: no font set, skipping {text:?}");
            return;
        };
        let chars: Vec<char> = text.chars().collect();
        self.draw_run(baseline_start.x, baseline_start.y, &chars, TextDirection::Ltr, font, color);
    }

    /// [`Painter::draw_text_with_direction`] for an LTR paragraph.
    pub fn draw_text(&mut self, rect: IntRect, text: &str, alignment: TextAlignment, color: Color) {
        self.draw_text_with_direction(rect, text, alignment, color, TextDirection::Ltr);
    }

    /// Draws `text` inside `rect` with the current font.
    ///
    /// Lines split on `'\n'` and advance by the font's preferred line
    /// height. Each line is split into directional runs against
    /// `direction`, the runs are placed left to right, and each line is
    /// aligned on its own. The text is not clipped to `rect`.
    pub fn draw_text_with_direction(
        &mut self,
        rect: IntRect,
        text: &str,
        alignment: TextAlignment,
        color: Color,
        direction: TextDirection,
    ) {
        let Some(font) = self.font() else {
            log::warn!("draw_text: no font set, skipping {text:?}");
            return;
        };
        let emoji = self.emoji_provider();
        let spacing = font.glyph_spacing();
        let line_height = font.preferred_line_height();

        let lines: Vec<_> = text
            .split('\n')
            .map(|line| {
                let chars: Vec<char> = line.chars().collect();
                directional_runs(&chars, direction)
            })
            .collect();

        let block_height = line_height * lines.len() as f32;
        let top = align(rect.y as f32, rect.height as f32, block_height, alignment.vertical());

        for (i, runs) in lines.iter().enumerate() {
            let width = line_width(runs, font, emoji);
            let mut x = align(rect.x as f32, rect.width as f32, width, alignment.horizontal());
            let baseline = top + i as f32 * line_height + font.ascent();
            for run in runs {
                self.draw_run(x, baseline, run.text(), run.direction(), font, color);
                x += run_width(run.text(), font, emoji) + spacing;
            }
        }
    }
}
