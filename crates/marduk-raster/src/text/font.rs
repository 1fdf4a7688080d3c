use std::rc::Rc;

use crate::surface::Bitmap;

/// A 1-bit glyph image, row-major, rows padded to whole bytes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GlyphBitmap {
    width: i32,
    height: i32,
    bits: Vec<u8>,
}

impl GlyphBitmap {
    #[inline]
    fn stride(width: i32) -> usize {
        (width.max(0) as usize).div_ceil(8)
    }

    /// An all-clear bitmap.
    pub fn new(width: i32, height: i32) -> Self {
        let (width, height) = (width.max(0), height.max(0));
        Self { width, height, bits: vec![0; Self::stride(width) * height as usize] }
    }

    /// Builds a bitmap from text rows where `#` marks a set bit. The width is
    /// the longest row.
    pub fn from_ascii(rows: &[&str]) -> Self {
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as i32;
        let mut bitmap = Self::new(width, rows.len() as i32);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if ch == '#' {
                    bitmap.set_bit(x as i32, y as i32, true);
                }
            }
        }
        bitmap
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Out-of-range coordinates read as clear.
    #[inline]
    pub fn bit_at(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return false;
        }
        let byte = self.bits[y as usize * Self::stride(self.width) + x as usize / 8];
        byte & (0x80 >> (x % 8)) != 0
    }

    pub fn set_bit(&mut self, x: i32, y: i32, on: bool) {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return;
        }
        let idx = y as usize * Self::stride(self.width) + x as usize / 8;
        let mask = 0x80 >> (x % 8);
        if on {
            self.bits[idx] |= mask;
        } else {
            self.bits[idx] &= !mask;
        }
    }
}

/// Pixel data of a rasterized glyph.
#[derive(Debug, Clone)]
pub enum GlyphImage {
    /// Stencil: set bits are painted in the text color.
    Mono(GlyphBitmap),
    /// Coverage in the alpha channel; color channels are ignored.
    Alpha(Bitmap),
    /// A full-color glyph, drawn as-is.
    Color(Rc<Bitmap>),
}

/// One glyph, positioned relative to the pen on the baseline.
///
/// The image's top-left sits at `(pen.x + left_bearing, baseline - ascent)`.
#[derive(Debug, Clone)]
pub struct Glyph {
    pub image: GlyphImage,
    pub left_bearing: f32,
    pub advance: f32,
    pub ascent: f32,
}

/// A source of glyphs and metrics. All lengths are logical pixels.
pub trait Font {
    /// Rasterizes `ch`. `subpixel_offset` is the pen's fractional x in
    /// `[0, 1)`; fonts without subpixel positioning ignore it.
    fn glyph(&self, ch: char, subpixel_offset: f32) -> Option<Glyph>;

    fn contains_glyph(&self, ch: char) -> bool;

    /// Advance width of `ch`, excluding glyph spacing.
    fn glyph_width(&self, ch: char) -> f32;

    fn is_fixed_width(&self) -> bool {
        false
    }

    /// Advance of every glyph when [`Font::is_fixed_width`].
    fn fixed_width(&self) -> f32 {
        0.0
    }

    /// Extra space added after every glyph.
    fn glyph_spacing(&self) -> f32 {
        0.0
    }

    fn pixel_size(&self) -> f32;

    /// Distance from the top of a line to its baseline.
    fn ascent(&self) -> f32;

    fn preferred_line_height(&self) -> f32;

    fn glyphs_horizontal_kerning(&self, _left: char, _right: char) -> f32 {
        0.0
    }

    /// Whether the font carries its own color glyphs (for emoji).
    fn has_color_bitmaps(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_rows_set_bits() {
        let g = GlyphBitmap::from_ascii(&["#.#", ".#", "###"]);
        assert_eq!((g.width(), g.height()), (3, 3));
        assert!(g.bit_at(0, 0));
        assert!(!g.bit_at(1, 0));
        assert!(g.bit_at(2, 0));
        assert!(!g.bit_at(2, 1));
        assert!(g.bit_at(1, 2));
        assert!(!g.bit_at(3, 0));
        assert!(!g.bit_at(-1, 0));
    }

    #[test]
    fn wide_rows_span_bytes() {
        let mut g = GlyphBitmap::new(12, 2);
        g.set_bit(9, 1, true);
        assert!(g.bit_at(9, 1));
        assert!(!g.bit_at(9, 0));
        g.set_bit(9, 1, false);
        assert_eq!(g, GlyphBitmap::new(12, 2));
    }
}
